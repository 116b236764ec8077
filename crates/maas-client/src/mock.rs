//! Mock MaasClient for unit testing
//!
//! Stores machines and subnets in memory so converter tests run without a
//! MAAS instance. Enabled through the `test-util` feature.

use crate::error::MaasError;
use crate::maas_trait::MaasClientTrait;
use crate::models::{Machine, Subnet};
use std::sync::{Arc, Mutex};

/// Mock MAAS client for testing
#[derive(Debug, Clone)]
pub struct MockMaasClient {
    base_url: String,
    machines: Arc<Mutex<Vec<Machine>>>,
    subnets: Arc<Mutex<Vec<Subnet>>>,
}

impl MockMaasClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            machines: Arc::new(Mutex::new(Vec::new())),
            subnets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a machine the mock will return
    pub fn add_machine(&self, machine: Machine) {
        self.machines.lock().unwrap().push(machine);
    }

    /// Register a subnet the mock will return
    pub fn add_subnet(&self, subnet: Subnet) {
        self.subnets.lock().unwrap().push(subnet);
    }
}

#[async_trait::async_trait]
impl MaasClientTrait for MockMaasClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), MaasError> {
        Ok(())
    }

    async fn get_machines(&self) -> Result<Vec<Machine>, MaasError> {
        Ok(self.machines.lock().unwrap().clone())
    }

    async fn query_machines(&self, filters: &[(&str, &str)]) -> Result<Vec<Machine>, MaasError> {
        let machines = self.machines.lock().unwrap();
        Ok(machines
            .iter()
            .filter(|m| {
                filters.iter().all(|(key, value)| match *key {
                    "hostname" => m.hostname.as_deref() == Some(*value),
                    "system_id" => m.system_id == *value,
                    _ => true,
                })
            })
            .cloned()
            .collect())
    }

    async fn get_machine(&self, system_id: &str) -> Result<Machine, MaasError> {
        self.machines
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.system_id == system_id)
            .cloned()
            .ok_or_else(|| MaasError::NotFound(format!("Machine {system_id} not found")))
    }

    async fn get_subnets(&self) -> Result<Vec<Subnet>, MaasError> {
        Ok(self.subnets.lock().unwrap().clone())
    }
}
