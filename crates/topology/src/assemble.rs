//! Topology assembler
//!
//! Turns the post-resolution interface set into the final
//! [`ResolvedTopology`]: one config entry per interface that carries
//! addresses, in original discovery order, plus the ignored-interface set
//! and the primary interface selection.
//!
//! "Used but not emitted standalone" is an explicit set computed here,
//! never a flag on the interfaces: members slaved to an emitted bond and
//! parents carrying an emitted VLAN are in service even when they have no
//! addresses of their own, so they land in neither the entry list nor the
//! ignored list.

use crate::error::TopologyError;
use crate::model::{
    BondConfig, Interface, InterfaceKind, LACP_RATE, NetworkConfigEntry, ResolvedTopology,
    VLAN_PROTOCOL, VlanConfig,
};
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::debug;

/// Assemble the resolved topology for one machine.
///
/// `principal_ip` is the machine's designated principal address, resolved
/// upstream from the boot interface; the entry carrying it becomes the
/// primary interface. Fails with
/// [`TopologyError::PrimaryInterfaceNotFound`] when no entry carries it,
/// and with [`TopologyError::DanglingMember`] when an emitted VLAN's
/// parent or an emitted bond's member is not in the retained set.
pub fn assemble(
    interfaces: &[Interface],
    principal_ip: IpAddr,
) -> Result<ResolvedTopology, TopologyError> {
    let retained: HashSet<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();

    let mut entries = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for iface in interfaces {
        if iface.addresses.is_empty() {
            continue;
        }

        let (vlan, bond) = match &iface.kind {
            InterfaceKind::Vlan { parent, vlan_id } => {
                if !retained.contains(parent.as_str()) {
                    return Err(TopologyError::DanglingMember {
                        interface: iface.name.clone(),
                        member: parent.clone(),
                    });
                }
                used.insert(parent.as_str());
                (
                    Some(VlanConfig {
                        vlan_id: *vlan_id,
                        vlan_protocol: VLAN_PROTOCOL.to_string(),
                    }),
                    None,
                )
            }
            InterfaceKind::Bond { mode, members } => {
                for member in members {
                    if !retained.contains(member.as_str()) {
                        return Err(TopologyError::DanglingMember {
                            interface: iface.name.clone(),
                            member: member.clone(),
                        });
                    }
                    used.insert(member.as_str());
                }
                (
                    None,
                    Some(BondConfig {
                        mode: mode.clone(),
                        lacp_rate: LACP_RATE.to_string(),
                        interfaces: members.clone(),
                    }),
                )
            }
            InterfaceKind::Physical => (None, None),
            InterfaceKind::Bridge { .. } => {
                // Bridges never survive resolution; seeing one here means
                // the caller skipped the resolver.
                return Err(TopologyError::MalformedInterface {
                    name: iface.name.clone(),
                    reason: "unresolved bridge reached assembly".to_string(),
                });
            }
        };

        entries.push(NetworkConfigEntry {
            interface: iface.name.clone(),
            addresses: iface.addresses.clone(),
            mtu: iface.mtu,
            vlan,
            bond,
            routes: iface.routes.clone(),
        });
    }

    let ignored_interfaces: Vec<String> = interfaces
        .iter()
        .filter(|i| i.addresses.is_empty() && !used.contains(i.name.as_str()))
        .map(|i| i.name.clone())
        .collect();

    let primary_interface = entries
        .iter()
        .find(|e| e.addresses.iter().any(|a| a.ip == principal_ip))
        .map(|e| e.interface.clone())
        .ok_or(TopologyError::PrimaryInterfaceNotFound {
            address: principal_ip,
        })?;

    debug!(
        entries = entries.len(),
        ignored = ignored_interfaces.len(),
        primary = %primary_interface,
        "assembled topology"
    );

    Ok(ResolvedTopology {
        entries,
        ignored_interfaces,
        primary_interface,
    })
}
