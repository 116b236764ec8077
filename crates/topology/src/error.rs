//! Topology resolution errors
//!
//! Every variant is terminal for the affected machine only; callers keep
//! processing the rest of the batch and record the failure per machine.

use std::net::IpAddr;
use thiserror::Error;

/// Errors that can occur while normalizing one machine's interface graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// An interface record is missing a field its declared kind requires,
    /// or otherwise violates the data-model invariants.
    #[error("malformed interface '{name}': {reason}")]
    MalformedInterface {
        /// Offending interface name.
        name: String,
        /// What was missing or inconsistent.
        reason: String,
    },

    /// A bond or bridge names a member that is not in the machine's
    /// interface set.
    #[error("interface '{interface}' references unknown member '{member}'")]
    DanglingMember {
        /// Interface declaring the member list (or the VLAN whose parent
        /// is missing).
        interface: String,
        /// The missing name.
        member: String,
    },

    /// A bridge member is itself a bridge; cross-bridge dependencies are
    /// not permitted.
    #[error("bridge '{bridge}' has bridge member '{member}'")]
    NestedBridge {
        /// The outer bridge.
        bridge: String,
        /// The member that is also a bridge.
        member: String,
    },

    /// A bridge declares no members.
    #[error("bridge '{bridge}' has no members")]
    EmptyBridge {
        /// The empty bridge.
        bridge: String,
    },

    /// The machine's designated principal IP is not present on any emitted
    /// config entry.
    #[error("no config entry carries the principal address {address}")]
    PrimaryInterfaceNotFound {
        /// The principal IP that was searched for.
        address: IpAddr,
    },
}
