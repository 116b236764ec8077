//! Converter-specific error types.

use maas_client::MaasError;
use thiserror::Error;

/// Errors that can occur in the inventory converter.
///
/// Per-machine topology failures are not represented here; they are
/// recorded on the run report so one malformed machine never aborts the
/// batch. File I/O at the binary's edges reports through `anyhow` with
/// per-path context instead of a variant here.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// MAAS API error
    #[error("MAAS error: {0}")]
    Maas(#[from] MaasError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
