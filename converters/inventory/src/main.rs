//! MAAS to inventory converter
//!
//! Pulls machines and subnets from a MAAS region controller, resolves each
//! machine's network topology into Talos-style configuration entries, and
//! writes an Ansible inventory YAML for the PXE bootstrap playbooks.

mod convert;
mod error;
mod inventory;


use std::env;
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::convert::ConvertOptions;
use crate::error::ConverterError;
use crate::inventory::Inventory;
use maas_client::MaasClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting MAAS inventory converter");

    // Load configuration from environment variables
    let maas_url = env::var("MAAS_URL").map_err(|_| {
        ConverterError::InvalidConfig("MAAS_URL environment variable is required".to_string())
    })?;
    let api_key = env::var("MAAS_API_KEY").map_err(|_| {
        ConverterError::InvalidConfig("MAAS_API_KEY environment variable is required".to_string())
    })?;
    let output_file = env::var("INVENTORY_OUTPUT").unwrap_or_else(|_| "inventory.yml".to_string());
    let template_file = env::var("INVENTORY_TEMPLATE").ok();
    let options = ConvertOptions {
        domain: env::var("INVENTORY_DOMAIN").unwrap_or_else(|_| "pxe.local".to_string()),
        controlplane_tag: env::var("CONTROLPLANE_TAG")
            .unwrap_or_else(|_| "controller".to_string()),
    };

    info!("Configuration:");
    info!("  MAAS URL: {}", maas_url);
    info!("  Output: {}", output_file);
    info!("  Domain: {}", options.domain);
    info!("  Controlplane tag: {}", options.controlplane_tag);

    let client = MaasClient::new(maas_url, &api_key)?;
    client.validate_credentials().await?;

    let template = match template_file {
        Some(path) if Path::new(&path).exists() => {
            info!("Loading template from {}", path);
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template {path}"))?;
            Some(
                serde_yaml::from_str::<Inventory>(&contents)
                    .with_context(|| format!("Failed to parse template {path}"))?,
            )
        }
        Some(path) => {
            warn!("Template file {} not found, using default structure", path);
            None
        }
        None => None,
    };

    let (inventory, report) = convert::run(&client, &options, template).await?;

    let yaml = serde_yaml::to_string(&inventory).context("Failed to serialize inventory")?;
    std::fs::write(&output_file, yaml)
        .with_context(|| format!("Failed to write {output_file}"))?;

    info!(
        "Wrote {} with {} hosts ({} controlplane, {} worker)",
        output_file, report.converted, report.controlplane, report.worker
    );
    for (host, reason) in &report.skipped {
        info!("  Skipped {}: {}", host, reason);
    }
    for (host, reason) in &report.failed {
        warn!("  Failed {}: {}", host, reason);
    }

    Ok(())
}
