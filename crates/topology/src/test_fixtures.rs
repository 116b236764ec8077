//! Shared fixtures for topology unit tests

use crate::model::{
    Address, Interface, InterfaceKind, RawInterface, RawLink, RawParams, RawSubnet, RawVlan,
};

/// Bare raw record with the given name and type tag.
pub fn raw(name: &str, if_type: &str) -> RawInterface {
    RawInterface {
        name: name.to_string(),
        if_type: if_type.to_string(),
        parents: vec![],
        children: vec![],
        mac_address: None,
        vlan: None,
        params: None,
        effective_mtu: None,
        links: vec![],
    }
}

pub fn parents(mut iface: RawInterface, names: &[&str]) -> RawInterface {
    iface.parents = names.iter().map(|n| (*n).to_string()).collect();
    iface
}

pub fn vid(mut iface: RawInterface, vid: u16) -> RawInterface {
    iface.vlan = Some(RawVlan { vid: Some(vid) });
    iface
}

pub fn bond_mode(mut iface: RawInterface, mode: &str) -> RawInterface {
    iface.params = Some(RawParams {
        bond_mode: Some(mode.to_string()),
    });
    iface
}

/// Attach a static link with the given address, subnet cidr and optional
/// subnet gateway.
pub fn link(mut iface: RawInterface, ip: &str, cidr: &str, gateway: Option<&str>) -> RawInterface {
    iface.links.push(RawLink {
        mode: Some("static".to_string()),
        ip_address: Some(ip.to_string()),
        subnet: Some(RawSubnet {
            cidr: Some(cidr.to_string()),
            gateway_ip: gateway.map(str::to_string),
        }),
    });
    iface
}

/// Classified interface with no addresses or routes.
pub fn iface(name: &str, kind: InterfaceKind) -> Interface {
    Interface {
        name: name.to_string(),
        kind,
        mtu: None,
        addresses: vec![],
        routes: vec![],
    }
}

pub fn with_addr(mut iface: Interface, address: &str) -> Interface {
    iface.addresses.push(addr(address));
    iface
}

pub fn addr(s: &str) -> Address {
    s.parse().unwrap()
}
