//! MaasClient trait for mocking
//!
//! Abstracts the MAAS client so converter unit tests can substitute an
//! in-memory mock for a live MAAS instance.

use crate::error::MaasError;
use crate::models::{Machine, Subnet};

/// Trait for MAAS API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait MaasClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API key
    async fn validate_credentials(&self) -> Result<(), MaasError>;

    /// Fetch all machines
    async fn get_machines(&self) -> Result<Vec<Machine>, MaasError>;

    /// Query machines by filter
    async fn query_machines(&self, filters: &[(&str, &str)]) -> Result<Vec<Machine>, MaasError>;

    /// Get one machine by system id
    async fn get_machine(&self, system_id: &str) -> Result<Machine, MaasError>;

    /// Fetch all subnets
    async fn get_subnets(&self) -> Result<Vec<Subnet>, MaasError>;
}

#[async_trait::async_trait]
impl MaasClientTrait for crate::client::MaasClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn validate_credentials(&self) -> Result<(), MaasError> {
        self.validate_credentials().await
    }

    async fn get_machines(&self) -> Result<Vec<Machine>, MaasError> {
        self.get_machines().await
    }

    async fn query_machines(&self, filters: &[(&str, &str)]) -> Result<Vec<Machine>, MaasError> {
        self.query_machines(filters).await
    }

    async fn get_machine(&self, system_id: &str) -> Result<Machine, MaasError> {
        self.get_machine(system_id).await
    }

    async fn get_subnets(&self) -> Result<Vec<Subnet>, MaasError> {
        self.get_subnets().await
    }
}
