//! MAAS API models
//!
//! These models match the MAAS 2.0 REST API serializers, restricted to the
//! fields the inventory converter actually consumes. Interface records are
//! the `topology` crate's [`RawInterface`] so machine payloads deserialize
//! straight into the normalization pipeline's input.

use serde::{Deserialize, Serialize};
use topology::RawInterface;

/// One machine as returned by `/api/2.0/machines/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// MAAS system id, e.g. "xc4n3b".
    pub system_id: String,
    /// Short hostname.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Fully-qualified hostname.
    #[serde(default)]
    pub fqdn: Option<String>,
    /// Lifecycle status, e.g. "Deployed" or "Ready".
    #[serde(default)]
    pub status_name: Option<String>,
    /// Tags assigned in MAAS, used for role determination.
    #[serde(default)]
    pub tag_names: Vec<String>,
    /// The interface MAAS booted this machine from.
    #[serde(default)]
    pub boot_interface: Option<RawInterface>,
    /// The machine's full interface graph.
    #[serde(default)]
    pub interface_set: Vec<RawInterface>,
    /// Block devices, used for install-disk selection.
    #[serde(default)]
    pub blockdevice_set: Vec<BlockDevice>,
    /// MAAS power driver name, e.g. "ipmi" or "redfish".
    #[serde(default)]
    pub power_type: Option<String>,
    /// Driver-specific power parameters (address, credentials).
    #[serde(default)]
    pub power_parameters: Option<serde_json::Value>,
}

/// One block device from a machine's `blockdevice_set`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDevice {
    /// Device name, e.g. "sda" or "/dev/sda".
    #[serde(default)]
    pub name: Option<String>,
    /// Device type: "physical" or "virtual".
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
}

/// One subnet as returned by `/api/2.0/subnets/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet CIDR, e.g. "192.168.1.0/24".
    #[serde(default)]
    pub cidr: Option<String>,
    /// Gateway address, when configured.
    #[serde(default)]
    pub gateway_ip: Option<String>,
    /// DNS servers advertised on this subnet.
    #[serde(default)]
    pub dns_servers: Vec<String>,
    /// Whether MAAS manages address allocation here.
    #[serde(default)]
    pub managed: bool,
    /// Whether proxied DHCP is allowed.
    #[serde(default)]
    pub allow_proxy: bool,
}
