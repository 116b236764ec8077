//! Topology data model
//!
//! Input side: `RawInterface` mirrors one record of a MAAS machine's
//! `interface_set` as returned by the MAAS 2.0 API. Output side:
//! `NetworkConfigEntry`/`ResolvedTopology` are the normalized,
//! Talos-compatible network configuration consumed by the inventory
//! emitter. Everything in between (`Interface`, `InterfaceKind`) is the
//! classified view the resolver and assembler operate on.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Bond mode used for bonds synthesized from multi-member bridges (LACP).
pub const BOND_MODE_LACP: &str = "802.3ad";

/// LACP rate applied to emitted bond configurations.
pub const LACP_RATE: &str = "fast";

/// VLAN protocol emitted for tagged sub-interfaces.
pub const VLAN_PROTOCOL: &str = "802.1q";

/// Name prefix for bonds synthesized from multi-member bridges
/// (`br0` becomes `bond-br0`).
pub const BRIDGE_BOND_PREFIX: &str = "bond-";

/// Default route destination for IPv4 gateways.
pub const DEFAULT_ROUTE_NETWORK: &str = "0.0.0.0/0";

/// Default route destination for IPv6 gateways.
pub const DEFAULT_ROUTE_NETWORK_V6: &str = "::/0";

/// One raw interface record from a MAAS machine's `interface_set`.
///
/// Field names match the MAAS API serializer; MAAS reports bond and bridge
/// membership through `parents` (the member interfaces) and the inverse
/// `children` edge, which this pipeline ignores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInterface {
    /// Interface name, e.g. "eno1", "bond0", "br0".
    pub name: String,
    /// MAAS type tag: "physical", "vlan", "bond" or "bridge".
    #[serde(rename = "type")]
    pub if_type: String,
    /// Member interfaces (bond/bridge) or the underlying interface (VLAN).
    #[serde(default)]
    pub parents: Vec<String>,
    /// Inverse of `parents`; not consumed by classification.
    #[serde(default)]
    pub children: Vec<String>,
    /// Hardware address, absent on some virtual constructs.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// VLAN reference; MAAS attaches one to every interface, with vid 0
    /// meaning untagged.
    #[serde(default)]
    pub vlan: Option<RawVlan>,
    /// Type-specific parameters (bond mode). MAAS serializes this as an
    /// empty string when there are none.
    #[serde(default, deserialize_with = "de_params")]
    pub params: Option<RawParams>,
    /// Effective MTU as computed by MAAS.
    #[serde(default)]
    pub effective_mtu: Option<u32>,
    /// IP link records attached to this interface.
    #[serde(default)]
    pub links: Vec<RawLink>,
}

/// VLAN reference on a raw interface record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVlan {
    /// 802.1Q VLAN id.
    #[serde(default)]
    pub vid: Option<u16>,
}

/// Type-specific parameters on a raw interface record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParams {
    /// Bond mode, e.g. "802.3ad" or "active-backup".
    #[serde(default)]
    pub bond_mode: Option<String>,
}

/// MAAS serializes `params` as `""` instead of an object when a record
/// has no type-specific parameters.
fn de_params<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RawParams>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ParamsOrEmpty {
        Params(RawParams),
        Other(serde_json::Value),
    }

    match Option::<ParamsOrEmpty>::deserialize(deserializer)? {
        Some(ParamsOrEmpty::Params(params)) => Ok(Some(params)),
        _ => Ok(None),
    }
}

/// One IP link on a raw interface record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLink {
    /// Link mode: "static", "dhcp", "auto" or "link_up".
    #[serde(default)]
    pub mode: Option<String>,
    /// Assigned address, present for static links.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Subnet the link belongs to.
    #[serde(default)]
    pub subnet: Option<RawSubnet>,
}

/// Subnet attached to an IP link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSubnet {
    /// Subnet CIDR, e.g. "192.168.1.0/24".
    #[serde(default)]
    pub cidr: Option<String>,
    /// Subnet gateway, source of the default route.
    #[serde(default)]
    pub gateway_ip: Option<String>,
}

/// An IP address with its prefix length, rendered as "ip/prefix".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Host address.
    pub ip: IpAddr,
    /// Prefix length of the containing subnet.
    pub prefix: u8,
}

impl Address {
    /// Build an address from its parts.
    pub fn new(ip: IpAddr, prefix: u8) -> Self {
        Self { ip, prefix }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix)
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("address '{s}' is not in ip/prefix form"))?;
        let ip = ip
            .parse::<IpAddr>()
            .map_err(|e| format!("invalid ip in '{s}': {e}"))?;
        let prefix = prefix
            .parse::<u8>()
            .map_err(|e| format!("invalid prefix in '{s}': {e}"))?;
        Ok(Self { ip, prefix })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A route entry, typically the default route inherited from a subnet gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination network in CIDR form.
    pub network: String,
    /// Next-hop gateway.
    pub gateway: IpAddr,
}

/// Classified interface kind.
///
/// A closed union so that missing structural fields are construction
/// failures at the classification boundary rather than runtime lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceKind {
    /// Plain physical NIC.
    Physical,
    /// Tagged sub-interface on `parent`.
    Vlan {
        /// Name of the interface carrying the tagged traffic.
        parent: String,
        /// 802.1Q VLAN id.
        vlan_id: u16,
    },
    /// Link aggregate of `members`.
    Bond {
        /// Bond mode, e.g. "802.3ad".
        mode: String,
        /// Member interface names, in source order.
        members: Vec<String>,
    },
    /// Layer-2 bridge over `members`; unwrapped by the resolver, never
    /// present in assembler input.
    Bridge {
        /// Member interface names, in source order.
        members: Vec<String>,
    },
}

/// A classified interface, the unit the resolver and assembler work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Unique name within one machine's interface set.
    pub name: String,
    /// Structural kind with its kind-specific fields.
    pub kind: InterfaceKind,
    /// Effective MTU, when the source reports one.
    pub mtu: Option<u32>,
    /// Assigned addresses, insertion order preserved.
    pub addresses: Vec<Address>,
    /// Routes, insertion order preserved.
    pub routes: Vec<Route>,
}

impl Interface {
    /// Member list for bond and bridge kinds, empty otherwise.
    pub fn members(&self) -> &[String] {
        match &self.kind {
            InterfaceKind::Bond { members, .. } | InterfaceKind::Bridge { members } => members,
            _ => &[],
        }
    }

    /// Whether this interface is a bridge.
    pub fn is_bridge(&self) -> bool {
        matches!(self.kind, InterfaceKind::Bridge { .. })
    }
}

/// VLAN block of a [`NetworkConfigEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanConfig {
    /// 802.1Q VLAN id.
    #[serde(rename = "vlanId")]
    pub vlan_id: u16,
    /// VLAN protocol, always [`VLAN_PROTOCOL`].
    #[serde(rename = "vlanProtocol")]
    pub vlan_protocol: String,
}

/// Bond block of a [`NetworkConfigEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondConfig {
    /// Bond mode, e.g. "802.3ad".
    pub mode: String,
    /// LACP negotiation rate.
    #[serde(rename = "lacpRate")]
    pub lacp_rate: String,
    /// Slaved interface names, in source order.
    pub interfaces: Vec<String>,
}

/// One resolved network-config entry, the final output unit per retained
/// interface. Serializes into the nested mapping the config generator
/// consumes: `interface`, `addresses`, `mtu`, `vlan`, `bond`, `routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfigEntry {
    /// Resolved interface name; may differ from the source name for
    /// synthesized bonds ("br0" becomes "bond-br0").
    pub interface: String,
    /// Addresses as "ip/prefix" strings.
    pub addresses: Vec<Address>,
    /// Effective MTU, omitted when the source reports none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// VLAN block, present for VLAN entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanConfig>,
    /// Bond block, present for bond entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond: Option<BondConfig>,
    /// Route entries.
    pub routes: Vec<Route>,
}

/// The resolved network topology for one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTopology {
    /// Config entries in original discovery order.
    pub entries: Vec<NetworkConfigEntry>,
    /// Interfaces with no address data and no structural role in any entry.
    pub ignored_interfaces: Vec<String>,
    /// The entry carrying the machine's principal IP.
    pub primary_interface: String,
}
