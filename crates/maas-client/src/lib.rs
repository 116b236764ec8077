//! MAAS REST API Client
//!
//! A Rust client library for reading machine inventory from the MAAS 2.0
//! REST API. Provides type-safe models for machines, interfaces and
//! subnets, with OAuth 1.0 PLAINTEXT authentication from a standard MAAS
//! API key.
//!
//! # Example
//!
//! ```no_run
//! use maas_client::MaasClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client from a MAAS API key (consumer:token:secret)
//! let client = MaasClient::new(
//!     "http://maas.example.com:5240/MAAS".to_string(),
//!     "consumer:token:secret",
//! )?;
//!
//! // Check connectivity and credentials
//! client.validate_credentials().await?;
//!
//! // Fetch machines with their full interface graphs
//! let machines = client.get_machines().await?;
//! for machine in &machines {
//!     println!("{}: {} interfaces", machine.system_id, machine.interface_set.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod maas_trait;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod models;


pub use client::MaasClient;
pub use error::MaasError;
pub use maas_trait::MaasClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockMaasClient;
pub use models::*;
