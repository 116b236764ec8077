//! MAAS to inventory conversion
//!
//! Walks the MAAS machine list, resolves each machine's network topology,
//! and produces the Ansible inventory structure. A machine that fails to
//! convert is recorded on the run report and skipped; it never aborts the
//! run.

use std::collections::HashMap;
use std::net::IpAddr;

use tracing::{debug, info, warn};

use maas_client::maas_trait::MaasClientTrait;
use maas_client::{Machine, Subnet};
use topology::resolve_machine;

use crate::error::ConverterError;
use crate::inventory::{Inventory, Localhost, PxeHost, Role};

/// Machine statuses eligible for conversion.
const ELIGIBLE_STATUSES: [&str; 4] = ["Deployed", "Ready", "Allocated", "Deploying"];

/// Tags that mark a machine as a control-plane node, besides the configured one.
const CONTROLPLANE_TAGS: [&str; 5] = ["controlplane", "control-plane", "master", "cp", "controller"];

/// Nameservers used when the PXE subnet declares none.
const FALLBACK_NAMESERVERS: [&str; 2] = ["8.8.8.8", "1.1.1.1"];

/// Conversion settings.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Domain appended to bare hostnames.
    pub domain: String,
    /// Tag that marks control-plane machines.
    pub controlplane_tag: String,
}

/// Outcome of a conversion run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Machines converted into pxe_hosts entries.
    pub converted: usize,
    /// Machines skipped with the reason, e.g. ineligible status.
    pub skipped: Vec<(String, String)>,
    /// Machines whose topology failed to resolve, with the error text.
    pub failed: Vec<(String, String)>,
    /// Control-plane entries among the converted machines.
    pub controlplane: usize,
    /// Worker entries among the converted machines.
    pub worker: usize,
}

/// Converts the MAAS machine list into an inventory.
///
/// `template` seeds the output so operator-set fields survive
/// regeneration; pxe_hosts and the subnet-derived settings are always
/// overwritten from MAAS.
pub async fn run(
    client: &dyn MaasClientTrait,
    options: &ConvertOptions,
    template: Option<Inventory>,
) -> Result<(Inventory, RunReport), ConverterError> {
    let mut inventory = template.unwrap_or_default();
    let localhost = &mut inventory.all.hosts.localhost;
    localhost.domain = options.domain.clone();

    let subnets = client.get_subnets().await?;
    match find_pxe_subnet(&subnets) {
        Some(subnet) => {
            info!(cidr = subnet.cidr.as_deref().unwrap_or("unknown"), "Found PXE subnet");
            apply_network_settings(localhost, subnet);
        }
        None => warn!("No PXE subnet found in MAAS"),
    }

    let machines = client.get_machines().await?;
    info!(count = machines.len(), "Fetched machines from MAAS");

    let mut report = RunReport::default();
    let mut hosts = Vec::new();
    let mut boot_interfaces = Vec::new();

    for machine in &machines {
        let hostname = display_name(machine);
        let status = machine.status_name.as_deref().unwrap_or("");
        if !ELIGIBLE_STATUSES.contains(&status) {
            debug!(host = %hostname, status, "Skipping machine");
            report.skipped.push((hostname, format!("status {status}")));
            continue;
        }

        match convert_machine(machine, options) {
            Ok((host, boot_interface)) => {
                debug!(host = %host.name, role = ?host.role, "Converted machine");
                match host.role {
                    Role::Controlplane => report.controlplane += 1,
                    Role::Worker => report.worker += 1,
                }
                report.converted += 1;
                boot_interfaces.push(boot_interface);
                hosts.push(host);
            }
            Err(ConvertSkip::Skip(reason)) => {
                warn!(host = %hostname, %reason, "Skipping machine");
                report.skipped.push((hostname, reason));
            }
            Err(ConvertSkip::Failed(reason)) => {
                warn!(host = %hostname, %reason, "Failed to convert machine");
                report.failed.push((hostname, reason));
            }
        }
    }

    hosts.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(primary) = most_common_interface(&boot_interfaces) {
        info!(interface = %primary, "Primary network interface");
        localhost.network_primary_interface = Some(primary);
    }
    localhost.pxe_hosts = hosts;

    Ok((inventory, report))
}

/// Why a machine produced no inventory entry.
enum ConvertSkip {
    /// The machine lacks data required for an entry.
    Skip(String),
    /// The machine's interface records could not be resolved.
    Failed(String),
}

/// Converts one eligible machine into a pxe_hosts entry plus its boot
/// interface name.
fn convert_machine(
    machine: &Machine,
    options: &ConvertOptions,
) -> Result<(PxeHost, String), ConvertSkip> {
    let hostname = display_name(machine);

    let Some(mac) = extract_boot_mac(machine) else {
        return Err(ConvertSkip::Skip("no MAC address".to_string()));
    };
    let Some(ip) = extract_principal_ip(machine) else {
        return Err(ConvertSkip::Skip("no static IP address".to_string()));
    };

    let topology = resolve_machine(&machine.interface_set, ip)
        .map_err(|e| ConvertSkip::Failed(e.to_string()))?;

    let name = if hostname.contains('.') {
        hostname
    } else {
        format!("{hostname}.{}", options.domain)
    };

    let (oob_type, oob_address, oob_username, oob_password) = extract_oob(machine);
    let boot_interface = extract_boot_interface_name(machine);

    let mut ignored: Vec<String> = topology.ignored_interfaces.into_iter().collect();
    ignored.sort();

    let host = PxeHost {
        name,
        mac,
        ip: ip.to_string(),
        role: determine_role(machine, &options.controlplane_tag),
        install_disk: extract_install_disk(machine),
        oob_type,
        oob_address,
        oob_username,
        oob_password,
        network_config: topology.entries,
        ignored_interfaces: ignored,
        primary_interface: topology.primary_interface,
    };
    Ok((host, boot_interface))
}

fn display_name(machine: &Machine) -> String {
    machine
        .hostname
        .clone()
        .filter(|h| !h.is_empty())
        .or_else(|| machine.fqdn.clone())
        .unwrap_or_else(|| machine.system_id.clone())
}

/// Picks the PXE boot subnet: the first managed or proxying one, else the
/// first subnet at all.
pub fn find_pxe_subnet(subnets: &[Subnet]) -> Option<&Subnet> {
    subnets
        .iter()
        .find(|s| s.managed || s.allow_proxy)
        .or_else(|| {
            if !subnets.is_empty() {
                warn!("No DHCP-enabled subnet found, using first subnet as fallback");
            }
            subnets.first()
        })
}

/// Copies gateway, prefix and nameservers from the PXE subnet onto the
/// localhost vars.
pub fn apply_network_settings(localhost: &mut Localhost, subnet: &Subnet) {
    localhost.network_gateway = subnet.gateway_ip.clone();
    localhost.network_netmask = subnet
        .cidr
        .as_deref()
        .and_then(|cidr| cidr.rsplit_once('/'))
        .and_then(|(_, prefix)| prefix.parse().ok());
    localhost.network_nameservers = if subnet.dns_servers.is_empty() {
        FALLBACK_NAMESERVERS.iter().map(|s| s.to_string()).collect()
    } else {
        subnet.dns_servers.clone()
    };
}

/// MAC of the boot interface, falling back to the first interface.
pub fn extract_boot_mac(machine: &Machine) -> Option<String> {
    machine
        .boot_interface
        .as_ref()
        .and_then(|i| i.mac_address.clone())
        .or_else(|| {
            machine
                .interface_set
                .iter()
                .find_map(|i| i.mac_address.clone())
        })
        .filter(|mac| !mac.is_empty())
}

/// Name of the boot interface, falling back to the first physical
/// interface, then "eth0".
pub fn extract_boot_interface_name(machine: &Machine) -> String {
    if let Some(boot) = &machine.boot_interface {
        if !boot.name.is_empty() {
            return boot.name.clone();
        }
    }
    machine
        .interface_set
        .iter()
        .find(|i| i.if_type == "physical" && !i.name.is_empty())
        .map(|i| i.name.clone())
        .unwrap_or_else(|| "eth0".to_string())
}

/// First static link address, trying the boot interface before the rest.
pub fn extract_principal_ip(machine: &Machine) -> Option<IpAddr> {
    let static_ip = |iface: &topology::RawInterface| {
        iface
            .links
            .iter()
            .filter(|l| l.mode.as_deref() == Some("static"))
            .find_map(|l| l.ip_address.as_deref())
            .and_then(|ip| ip.parse().ok())
    };

    machine
        .boot_interface
        .as_ref()
        .and_then(&static_ip)
        .or_else(|| machine.interface_set.iter().find_map(|i| static_ip(i)))
}

/// First physical block device as a /dev path, else /dev/sda.
pub fn extract_install_disk(machine: &Machine) -> String {
    machine
        .blockdevice_set
        .iter()
        .find(|d| d.device_type.as_deref() == Some("physical"))
        .and_then(|d| d.name.as_deref())
        .map(|name| {
            if name.starts_with("/dev/") {
                name.to_string()
            } else {
                format!("/dev/{name}")
            }
        })
        .unwrap_or_else(|| "/dev/sda".to_string())
}

/// Control-plane when the machine carries the configured tag or one of
/// the common aliases; worker otherwise.
pub fn determine_role(machine: &Machine, controlplane_tag: &str) -> Role {
    let tags: Vec<String> = machine.tag_names.iter().map(|t| t.to_lowercase()).collect();
    let wanted = controlplane_tag.to_lowercase();
    if tags.iter().any(|t| *t == wanted) || tags.iter().any(|t| CONTROLPLANE_TAGS.contains(&t.as_str()))
    {
        Role::Controlplane
    } else {
        Role::Worker
    }
}

/// Maps the MAAS power driver to an OOB kind and pulls the connection
/// details out of power_parameters.
pub fn extract_oob(
    machine: &Machine,
) -> (Option<String>, Option<String>, Option<String>, Option<String>) {
    let raw_power_type = machine.power_type.clone().unwrap_or_default();
    let power_type = raw_power_type.to_lowercase();
    let oob_type = if power_type.is_empty() {
        "manual".to_string()
    } else if power_type.contains("ipmi") {
        "ipmi".to_string()
    } else if power_type.contains("virsh") {
        "virsh".to_string()
    } else if power_type.contains("hmc") {
        "hmc".to_string()
    } else if power_type.contains("ilo") {
        "ilo".to_string()
    } else if power_type.contains("drac") {
        "idrac".to_string()
    } else if power_type.contains("redfish") {
        "redfish".to_string()
    } else {
        raw_power_type
    };

    let param = |key: &str| {
        machine
            .power_parameters
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    (
        Some(oob_type),
        param("power_address"),
        param("power_user"),
        param("power_pass"),
    )
}

/// The boot interface name shared by the most machines. Ties break to the
/// lexicographically smallest name so repeated runs agree.
pub fn most_common_interface(names: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, _)| name.to_string())
}
