//! MAAS API client
//!
//! Implements the MAAS 2.0 REST API client for inventory reads.
//! Authentication uses OAuth 1.0 with the PLAINTEXT signature method, the
//! scheme the MAAS CLI itself uses, built from an API key of the form
//! `consumer_key:token_key:token_secret`.

use crate::error::MaasError;
use crate::models::{Machine, Subnet};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// MAAS API client
pub struct MaasClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    token_key: String,
    token_secret: String,
}

impl std::fmt::Debug for MaasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Credentials stay out of debug output.
        f.debug_struct("MaasClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MaasClient {
    /// Create a new MAAS client
    ///
    /// # Arguments
    /// * `base_url` - MAAS base URL (e.g., "http://maas.example.com:5240/MAAS")
    /// * `api_key` - API key in `consumer_key:token_key:token_secret` form
    pub fn new(base_url: String, api_key: &str) -> Result<Self, MaasError> {
        let parts: Vec<&str> = api_key.split(':').collect();
        let [consumer_key, token_key, token_secret] = parts[..] else {
            return Err(MaasError::InvalidApiKey(
                "expected consumer_key:token_key:token_secret".to_string(),
            ));
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(MaasError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key: consumer_key.to_string(),
            token_key: token_key.to_string(),
            token_secret: token_secret.to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!(
            "OAuth oauth_version=1.0, oauth_signature_method=PLAINTEXT, \
             oauth_consumer_key={}, oauth_token={}, oauth_signature=&{}",
            self.consumer_key, self.token_key, self.token_secret
        )
    }

    /// Validate the API key by making a lightweight authenticated request.
    ///
    /// # Returns
    /// * `Ok(())` - Credentials are valid and MAAS is reachable
    /// * `Err(MaasError)` - Credentials rejected or MAAS unreachable
    pub async fn validate_credentials(&self) -> Result<(), MaasError> {
        let url = format!("{}/api/2.0/users/?op=whoami", self.base_url);
        debug!("Validating MAAS credentials and connectivity");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(MaasError::Http)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == 401 || status == 403 {
            return Err(MaasError::Authentication(format!("{status} - {body}")));
        }

        if !status.is_success() {
            return Err(MaasError::Api(format!(
                "Failed to validate credentials: {status} - {body}"
            )));
        }

        debug!("Credentials validated successfully");
        Ok(())
    }

    /// Fetch a JSON list endpoint, surfacing decode failures with a body
    /// excerpt for diagnosis.
    async fn fetch_list<T: for<'de> serde::Deserialize<'de>>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<Vec<T>, MaasError> {
        debug!("Fetching {} from MAAS: {}", what, url);

        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MaasError::Api(format!(
                "Failed to fetch {what}: {status} - {body}"
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            MaasError::Api(format!(
                "error decoding {} body: {} - Response (first 500 chars): {}",
                what,
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Fetch all machines known to MAAS
    ///
    /// # Returns
    /// * `Ok(Vec<Machine>)` - All machines with their full interface sets
    /// * `Err(MaasError)` - If the request fails
    pub async fn get_machines(&self) -> Result<Vec<Machine>, MaasError> {
        let url = format!("{}/api/2.0/machines/", self.base_url);
        self.fetch_list(&url, "machines").await
    }

    /// Query machines by filter
    ///
    /// # Arguments
    /// * `filters` - Query parameters (e.g., [("hostname", "node-01")])
    ///
    /// # Returns
    /// * `Ok(Vec<Machine>)` - List of matching machines
    /// * `Err(MaasError)` - If the request fails
    pub async fn query_machines(&self, filters: &[(&str, &str)]) -> Result<Vec<Machine>, MaasError> {
        let mut url = format!("{}/api/2.0/machines/", self.base_url);

        if !filters.is_empty() {
            let query: Vec<String> = filters
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url = format!("{}?{}", url, query.join("&"));
        }

        debug!("Querying machines with filters: {:?}", filters);
        self.fetch_list(&url, "machines").await
    }

    /// Get a machine by system id
    ///
    /// # Arguments
    /// * `system_id` - MAAS system id
    ///
    /// # Returns
    /// * `Ok(Machine)` - The machine object
    /// * `Err(MaasError)` - If the request fails
    pub async fn get_machine(&self, system_id: &str) -> Result<Machine, MaasError> {
        let url = format!("{}/api/2.0/machines/{}/", self.base_url, system_id);
        debug!("Fetching machine {} from MAAS", system_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(MaasError::Http)?;

        if response.status() == 404 {
            return Err(MaasError::NotFound(format!("Machine {system_id} not found")));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MaasError::Api(format!(
                "Failed to get machine {system_id}: {status} - {body}"
            )));
        }

        let machine: Machine = response.json().await.map_err(MaasError::Http)?;
        Ok(machine)
    }

    /// Fetch all subnets from MAAS
    ///
    /// # Returns
    /// * `Ok(Vec<Subnet>)` - All subnets
    /// * `Err(MaasError)` - If the request fails
    pub async fn get_subnets(&self) -> Result<Vec<Subnet>, MaasError> {
        let url = format!("{}/api/2.0/subnets/", self.base_url);
        self.fetch_list(&url, "subnets").await
    }
}
