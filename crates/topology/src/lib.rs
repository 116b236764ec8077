//! MAAS network-topology normalization
//!
//! Takes one machine's raw interface graph as reported by MAAS (physical
//! NICs, VLANs, bonds, bridges, static IP links) and produces a normalized,
//! Talos-compatible network configuration in three stages:
//!
//! 1. **Classification** — each raw record is tagged as physical, VLAN,
//!    bond or bridge and its link data is parsed ([`classify`]).
//! 2. **Bridge resolution** — bridges are unwrapped into bonds or plain
//!    interfaces, since the target schema has no bridge construct
//!    ([`resolve_bridges`]).
//! 3. **Assembly** — the retained interfaces are merged into the final
//!    ordered entry list with the ignored-interface set and the primary
//!    interface selection ([`assemble`]).
//!
//! The whole pipeline is a pure, synchronous transformation over an
//! in-memory snapshot; machines are independent, so callers may process
//! them in parallel and sort the results afterwards.
//!
//! # Example
//!
//! ```
//! use topology::{RawInterface, resolve_machine};
//!
//! let interfaces: Vec<RawInterface> = serde_json::from_str(
//!     r#"[{
//!         "name": "eno1",
//!         "type": "physical",
//!         "links": [{
//!             "mode": "static",
//!             "ip_address": "192.168.1.10",
//!             "subnet": {"cidr": "192.168.1.0/24", "gateway_ip": "192.168.1.1"}
//!         }]
//!     }]"#,
//! )?;
//!
//! let resolved = resolve_machine(&interfaces, "192.168.1.10".parse()?)?;
//! assert_eq!(resolved.primary_interface, "eno1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assemble;
pub mod classify;
pub mod error;
pub mod model;
pub mod resolve;

mod assemble_test;
mod resolve_test;
#[cfg(test)]
mod test_fixtures;

pub use assemble::assemble;
pub use classify::{classify, classify_all};
pub use error::TopologyError;
pub use model::*;
pub use resolve::resolve_bridges;

use std::net::IpAddr;

/// Run the full pipeline for one machine: classification, bridge
/// resolution and assembly.
///
/// Either a fully-specified topology is produced or the machine fails as
/// a whole; there is no partial per-machine output.
pub fn resolve_machine(
    raw: &[RawInterface],
    principal_ip: IpAddr,
) -> Result<ResolvedTopology, TopologyError> {
    let classified = classify_all(raw)?;
    let resolved = resolve_bridges(classified)?;
    assemble(&resolved, principal_ip)
}
