//! Ansible inventory output model
//!
//! Typed shape of the generated `inventory.yml`: a single `localhost`
//! control host carrying the PXE network settings and the list of
//! `pxe_hosts` to deploy. An optional template file deserializes into the
//! same structure, so operator-set fields survive regeneration.

use serde::{Deserialize, Serialize};
use topology::NetworkConfigEntry;

/// Root of the Ansible inventory document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// The implicit "all" group.
    #[serde(default)]
    pub all: AllGroup,
}

/// The "all" group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllGroup {
    /// Hosts in the group.
    #[serde(default)]
    pub hosts: Hosts,
}

/// Hosts of the "all" group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hosts {
    /// The control host running the PXE services and playbooks.
    #[serde(default)]
    pub localhost: Localhost,
}

/// Variables attached to the `localhost` control host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Localhost {
    /// Ansible connection type, always "local".
    pub ansible_connection: String,
    /// Interface the DHCP/TFTP services bind to.
    pub dhcp_interface: String,
    /// Domain appended to bare hostnames.
    pub domain: String,
    /// Gateway of the PXE subnet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_gateway: Option<String>,
    /// Prefix length of the PXE subnet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_netmask: Option<u8>,
    /// Nameservers advertised to deployed nodes.
    pub network_nameservers: Vec<String>,
    /// MTU pushed to deployed nodes.
    pub network_mtu: u32,
    /// Global ignored-interface overrides; per-host lists live on each
    /// pxe_host entry.
    pub network_ignored_interfaces: Vec<String>,
    /// Most common boot interface name across the converted machines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_primary_interface: Option<String>,
    /// Longhorn data mount path on deployed nodes.
    pub longhorn_mount_path: String,
    /// Talos system extensions to install.
    pub talos_extensions: Vec<String>,
    /// The machines to deploy.
    pub pxe_hosts: Vec<PxeHost>,
}

impl Default for Localhost {
    fn default() -> Self {
        Self {
            ansible_connection: "local".to_string(),
            dhcp_interface: "eth0".to_string(),
            domain: String::new(),
            network_gateway: None,
            network_netmask: None,
            network_nameservers: Vec::new(),
            network_mtu: 1500,
            network_ignored_interfaces: Vec::new(),
            network_primary_interface: None,
            longhorn_mount_path: "/var/lib/longhorn".to_string(),
            talos_extensions: vec![
                "siderolabs/iscsi-tools".to_string(),
                "siderolabs/util-linux-tools".to_string(),
            ],
            pxe_hosts: Vec::new(),
        }
    }
}

/// Cluster role of a converted machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Kubernetes control-plane node.
    Controlplane,
    /// Kubernetes worker node.
    Worker,
}

/// One machine entry in `pxe_hosts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PxeHost {
    /// Fully-qualified hostname.
    pub name: String,
    /// Boot interface MAC address.
    pub mac: String,
    /// Principal static IP.
    pub ip: String,
    /// controlplane or worker.
    pub role: Role,
    /// Target installation disk.
    pub install_disk: String,
    /// Out-of-band management kind (ipmi, redfish, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oob_type: Option<String>,
    /// OOB controller address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oob_address: Option<String>,
    /// OOB username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oob_username: Option<String>,
    /// OOB password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oob_password: Option<String>,
    /// Resolved network configuration entries for this machine.
    pub network_config: Vec<NetworkConfigEntry>,
    /// Interfaces with no role in the resolved configuration.
    pub ignored_interfaces: Vec<String>,
    /// The entry carrying the principal IP.
    pub primary_interface: String,
}
