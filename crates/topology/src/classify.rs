//! Interface classifier
//!
//! Maps raw MAAS interface records to classified [`Interface`] values.
//! Pure and deterministic: the same record always classifies the same way.
//!
//! Precedence, first match wins:
//! 1. type tag "bridge"
//! 2. type tag "bond"
//! 3. non-null VLAN id
//! 4. physical

use crate::error::TopologyError;
use crate::model::{
    Address, BOND_MODE_LACP, DEFAULT_ROUTE_NETWORK, DEFAULT_ROUTE_NETWORK_V6, Interface,
    InterfaceKind, RawInterface, Route,
};
use std::collections::HashSet;
use std::net::IpAddr;

/// Classify one raw interface record.
///
/// Fails with [`TopologyError::MalformedInterface`] when a field the
/// declared kind requires is missing (a VLAN without a vid or parent, a
/// bond without members) or when link data does not parse.
pub fn classify(raw: &RawInterface) -> Result<Interface, TopologyError> {
    let kind = classify_kind(raw)?;
    let (addresses, routes) = extract_links(raw)?;

    Ok(Interface {
        name: raw.name.clone(),
        kind,
        mtu: raw.effective_mtu,
        addresses,
        routes,
    })
}

/// Classify a full interface set, preserving source order.
///
/// Also enforces the name-uniqueness invariant: a duplicate interface name
/// within one machine is a [`TopologyError::MalformedInterface`].
pub fn classify_all(raws: &[RawInterface]) -> Result<Vec<Interface>, TopologyError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(raws.len());
    let mut classified = Vec::with_capacity(raws.len());

    for raw in raws {
        if !seen.insert(raw.name.as_str()) {
            return Err(TopologyError::MalformedInterface {
                name: raw.name.clone(),
                reason: "duplicate interface name".to_string(),
            });
        }
        classified.push(classify(raw)?);
    }

    Ok(classified)
}

fn classify_kind(raw: &RawInterface) -> Result<InterfaceKind, TopologyError> {
    match raw.if_type.as_str() {
        "bridge" => Ok(InterfaceKind::Bridge {
            members: raw.parents.clone(),
        }),
        "bond" => {
            if raw.parents.is_empty() {
                return Err(TopologyError::MalformedInterface {
                    name: raw.name.clone(),
                    reason: "bond declares no members".to_string(),
                });
            }
            let mode = raw
                .params
                .as_ref()
                .and_then(|p| p.bond_mode.clone())
                .unwrap_or_else(|| BOND_MODE_LACP.to_string());
            Ok(InterfaceKind::Bond {
                mode,
                members: raw.parents.clone(),
            })
        }
        // MAAS attaches the fabric's untagged VLAN (vid 0) to plain
        // interfaces; only a real tag makes the record a VLAN.
        _ => match raw.vlan.as_ref().and_then(|v| v.vid).filter(|vid| *vid != 0) {
            Some(vlan_id) => {
                let parent = raw.parents.first().cloned().ok_or_else(|| {
                    TopologyError::MalformedInterface {
                        name: raw.name.clone(),
                        reason: "vlan interface has no parent".to_string(),
                    }
                })?;
                Ok(InterfaceKind::Vlan { parent, vlan_id })
            }
            None if raw.if_type == "vlan" => Err(TopologyError::MalformedInterface {
                name: raw.name.clone(),
                reason: "vlan interface has no vid".to_string(),
            }),
            None => Ok(InterfaceKind::Physical),
        },
    }
}

/// Extract (address, route) data from the record's IP links.
///
/// Links without an assigned address (dhcp/auto/link_up) contribute
/// nothing. Each distinct subnet gateway contributes one default route,
/// first occurrence wins.
fn extract_links(raw: &RawInterface) -> Result<(Vec<Address>, Vec<Route>), TopologyError> {
    let mut addresses = Vec::new();
    let mut routes: Vec<Route> = Vec::new();

    for link in &raw.links {
        let Some(ip) = link.ip_address.as_deref() else {
            continue;
        };
        let ip: IpAddr = ip.parse().map_err(|_| TopologyError::MalformedInterface {
            name: raw.name.clone(),
            reason: format!("link address '{ip}' does not parse"),
        })?;

        let subnet = link
            .subnet
            .as_ref()
            .ok_or_else(|| TopologyError::MalformedInterface {
                name: raw.name.clone(),
                reason: format!("link {ip} has no subnet"),
            })?;
        let cidr = subnet
            .cidr
            .as_deref()
            .ok_or_else(|| TopologyError::MalformedInterface {
                name: raw.name.clone(),
                reason: format!("link {ip} subnet has no cidr"),
            })?;
        let prefix = cidr
            .rsplit_once('/')
            .and_then(|(_, p)| p.parse::<u8>().ok())
            .ok_or_else(|| TopologyError::MalformedInterface {
                name: raw.name.clone(),
                reason: format!("subnet cidr '{cidr}' does not parse"),
            })?;

        addresses.push(Address::new(ip, prefix));

        if let Some(gateway) = subnet.gateway_ip.as_deref() {
            let gateway: IpAddr =
                gateway
                    .parse()
                    .map_err(|_| TopologyError::MalformedInterface {
                        name: raw.name.clone(),
                        reason: format!("gateway '{gateway}' does not parse"),
                    })?;
            if !routes.iter().any(|r| r.gateway == gateway) {
                // The destination must match the gateway's family.
                let network = if gateway.is_ipv4() {
                    DEFAULT_ROUTE_NETWORK
                } else {
                    DEFAULT_ROUTE_NETWORK_V6
                };
                routes.push(Route {
                    network: network.to_string(),
                    gateway,
                });
            }
        }
    }

    Ok((addresses, routes))
}
