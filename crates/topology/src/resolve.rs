//! Bridge resolver
//!
//! Bridges have no first-class equivalent in the target configuration
//! schema, so every bridge is unwrapped: a multi-member bridge becomes a
//! synthesized LACP bond named after the bridge, a single-member bridge
//! collapses onto its member, and the bridge's address/route/MTU data
//! migrates to the replacement. Absorbed members stay in the list as
//! addressless standalone records; the assembler files them in its used
//! set, so no physical NIC is configured twice.
//!
//! Resolution never mutates its input entries in place; the output list
//! is built fresh, which keeps the stage order-independent and auditable.

use crate::error::TopologyError;
use crate::model::{BOND_MODE_LACP, BRIDGE_BOND_PREFIX, Interface, InterfaceKind};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Replace every bridge in the classified set per the unwrap policy.
///
/// Validates graph integrity for the whole set while at it: every bond or
/// bridge member must name an existing interface, a bridge member must not
/// itself be a bridge, and a bridge member must not carry its own address
/// data (the source never assigns addresses to slaved NICs; if it does,
/// the record is malformed rather than silently overwritten).
pub fn resolve_bridges(interfaces: Vec<Interface>) -> Result<Vec<Interface>, TopologyError> {
    let by_name: HashMap<&str, &Interface> = interfaces
        .iter()
        .map(|iface| (iface.name.as_str(), iface))
        .collect();

    // Graph integrity for every member list, bridges and plain bonds alike.
    for iface in &interfaces {
        for member in iface.members() {
            let Some(target) = by_name.get(member.as_str()) else {
                return Err(TopologyError::DanglingMember {
                    interface: iface.name.clone(),
                    member: member.clone(),
                });
            };
            if iface.is_bridge() {
                if target.is_bridge() {
                    return Err(TopologyError::NestedBridge {
                        bridge: iface.name.clone(),
                        member: member.clone(),
                    });
                }
                if !target.addresses.is_empty() {
                    return Err(TopologyError::MalformedInterface {
                        name: member.clone(),
                        reason: format!(
                            "bridge member of '{}' carries its own addresses",
                            iface.name
                        ),
                    });
                }
            }
        }
    }

    // Per-bridge unwrap plan. Each member may belong to at most one bridge.
    let mut absorbed: HashSet<&str> = HashSet::new();
    let mut passthrough: HashMap<&str, &Interface> = HashMap::new();
    let mut replacement: HashMap<&str, String> = HashMap::new();

    for iface in interfaces.iter().filter(|i| i.is_bridge()) {
        let members = iface.members();
        match members {
            [] => {
                return Err(TopologyError::EmptyBridge {
                    bridge: iface.name.clone(),
                });
            }
            [sole] => {
                if passthrough.contains_key(sole.as_str()) || absorbed.contains(sole.as_str()) {
                    return Err(TopologyError::MalformedInterface {
                        name: sole.clone(),
                        reason: "interface is a member of more than one bridge".to_string(),
                    });
                }
                passthrough.insert(sole.as_str(), iface);
                replacement.insert(iface.name.as_str(), sole.clone());
            }
            many => {
                let bond_name = format!("{BRIDGE_BOND_PREFIX}{}", iface.name);
                if by_name.contains_key(bond_name.as_str()) {
                    return Err(TopologyError::MalformedInterface {
                        name: iface.name.clone(),
                        reason: format!("synthesized bond name '{bond_name}' already exists"),
                    });
                }
                for member in many {
                    if passthrough.contains_key(member.as_str())
                        || !absorbed.insert(member.as_str())
                    {
                        return Err(TopologyError::MalformedInterface {
                            name: member.clone(),
                            reason: "interface is a member of more than one bridge".to_string(),
                        });
                    }
                }
                replacement.insert(iface.name.as_str(), bond_name);
            }
        }
    }

    // Rebuild the list in discovery order. A multi-member bridge is emitted
    // as the synthesized bond at the bridge's position; a single-member
    // bridge is emitted at its member's position under the member's name.
    let mut resolved = Vec::with_capacity(interfaces.len());
    for iface in &interfaces {
        if let Some(bridge) = passthrough.get(iface.name.as_str()) {
            debug!(
                bridge = %bridge.name,
                member = %iface.name,
                "collapsing single-member bridge onto its member"
            );
            resolved.push(Interface {
                name: iface.name.clone(),
                kind: iface.kind.clone(),
                mtu: bridge.mtu.or(iface.mtu),
                addresses: bridge.addresses.clone(),
                routes: bridge.routes.clone(),
            });
            continue;
        }
        match &iface.kind {
            InterfaceKind::Bridge { members } => {
                if members.len() < 2 {
                    // Single-member bridges were emitted at the member slot.
                    continue;
                }
                let bond_name = format!("{BRIDGE_BOND_PREFIX}{}", iface.name);
                debug!(bridge = %iface.name, bond = %bond_name, "unwrapping bridge into bond");
                resolved.push(Interface {
                    name: bond_name,
                    kind: InterfaceKind::Bond {
                        mode: BOND_MODE_LACP.to_string(),
                        members: members.clone(),
                    },
                    mtu: iface.mtu,
                    addresses: iface.addresses.clone(),
                    routes: iface.routes.clone(),
                });
            }
            InterfaceKind::Vlan { parent, vlan_id } => {
                // A VLAN riding a resolved bridge follows the replacement.
                let parent = replacement.get(parent.as_str()).unwrap_or(parent);
                resolved.push(Interface {
                    name: iface.name.clone(),
                    kind: InterfaceKind::Vlan {
                        parent: parent.clone(),
                        vlan_id: *vlan_id,
                    },
                    mtu: iface.mtu,
                    addresses: iface.addresses.clone(),
                    routes: iface.routes.clone(),
                });
            }
            _ => resolved.push(iface.clone()),
        }
    }

    Ok(resolved)
}
