//! Unit tests for the topology assembler

#[cfg(test)]
mod tests {
    use crate::assemble::assemble;
    use crate::error::TopologyError;
    use crate::model::InterfaceKind;
    use crate::test_fixtures::*;
    use std::net::IpAddr;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_entries_preserve_discovery_order() {
        let input = vec![
            with_addr(
                iface(
                    "eno1.100",
                    InterfaceKind::Vlan {
                        parent: "eno1".to_string(),
                        vlan_id: 100,
                    },
                ),
                "172.16.0.5/24",
            ),
            iface("eno1", InterfaceKind::Physical),
            with_addr(iface("eno2", InterfaceKind::Physical), "192.168.1.10/24"),
        ];
        let topology = assemble(&input, ip("192.168.1.10")).unwrap();
        let names: Vec<&str> = topology.entries.iter().map(|e| e.interface.as_str()).collect();
        // VLAN first: entries interleave in discovery order, never re-sorted.
        assert_eq!(names, vec!["eno1.100", "eno2"]);
    }

    #[test]
    fn test_addressless_physical_is_ignored() {
        let input = vec![
            with_addr(iface("eno1", InterfaceKind::Physical), "192.168.1.10/24"),
            iface("eno2", InterfaceKind::Physical),
        ];
        let topology = assemble(&input, ip("192.168.1.10")).unwrap();
        assert_eq!(topology.ignored_interfaces, vec!["eno2".to_string()]);
        assert_eq!(topology.entries.len(), 1);
    }

    #[test]
    fn test_bond_members_are_used_not_ignored() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface("eno2", InterfaceKind::Physical),
            with_addr(
                iface(
                    "bond0",
                    InterfaceKind::Bond {
                        mode: "802.3ad".to_string(),
                        members: vec!["eno1".to_string(), "eno2".to_string()],
                    },
                ),
                "10.0.0.5/24",
            ),
        ];
        let topology = assemble(&input, ip("10.0.0.5")).unwrap();
        assert!(topology.ignored_interfaces.is_empty());
        assert_eq!(topology.entries.len(), 1);
        let bond = topology.entries[0].bond.as_ref().unwrap();
        assert_eq!(bond.mode, "802.3ad");
        assert_eq!(bond.lacp_rate, "fast");
        assert_eq!(bond.interfaces, vec!["eno1".to_string(), "eno2".to_string()]);
    }

    #[test]
    fn test_vlan_parent_is_used_not_ignored() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            with_addr(
                iface(
                    "eno1.100",
                    InterfaceKind::Vlan {
                        parent: "eno1".to_string(),
                        vlan_id: 100,
                    },
                ),
                "172.16.0.5/24",
            ),
        ];
        let topology = assemble(&input, ip("172.16.0.5")).unwrap();
        assert!(topology.ignored_interfaces.is_empty());
        let vlan = topology.entries[0].vlan.as_ref().unwrap();
        assert_eq!(vlan.vlan_id, 100);
        assert_eq!(vlan.vlan_protocol, "802.1q");
    }

    #[test]
    fn test_vlan_with_missing_parent_rejected() {
        let input = vec![with_addr(
            iface(
                "eno1.100",
                InterfaceKind::Vlan {
                    parent: "eno1".to_string(),
                    vlan_id: 100,
                },
            ),
            "172.16.0.5/24",
        )];
        let err = assemble(&input, ip("172.16.0.5")).unwrap_err();
        assert_eq!(
            err,
            TopologyError::DanglingMember {
                interface: "eno1.100".to_string(),
                member: "eno1".to_string(),
            }
        );
    }

    #[test]
    fn test_bond_with_missing_member_rejected() {
        // A bond slaving a name the resolver replaced (a bridge member
        // list once held it) must not emit a config entry referencing a
        // vanished interface.
        let input = vec![with_addr(
            iface(
                "bond0",
                InterfaceKind::Bond {
                    mode: "802.3ad".to_string(),
                    members: vec!["br0".to_string()],
                },
            ),
            "10.0.0.5/24",
        )];
        let err = assemble(&input, ip("10.0.0.5")).unwrap_err();
        assert_eq!(
            err,
            TopologyError::DanglingMember {
                interface: "bond0".to_string(),
                member: "br0".to_string(),
            }
        );
    }

    #[test]
    fn test_addressless_bond_and_member_are_ignored() {
        // A bond with no addresses emits no entry, so neither it nor its
        // member holds a structural role in the output.
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface(
                "bond0",
                InterfaceKind::Bond {
                    mode: "802.3ad".to_string(),
                    members: vec!["eno1".to_string()],
                },
            ),
            with_addr(iface("eno2", InterfaceKind::Physical), "10.0.0.5/24"),
        ];
        let topology = assemble(&input, ip("10.0.0.5")).unwrap();
        assert_eq!(
            topology.ignored_interfaces,
            vec!["eno1".to_string(), "bond0".to_string()]
        );
    }

    #[test]
    fn test_primary_selection() {
        let input = vec![
            with_addr(iface("eno1", InterfaceKind::Physical), "192.168.1.10/24"),
            with_addr(iface("eno2", InterfaceKind::Physical), "192.168.2.10/24"),
        ];
        let topology = assemble(&input, ip("192.168.1.10")).unwrap();
        assert_eq!(topology.primary_interface, "eno1");
    }

    #[test]
    fn test_primary_not_found() {
        let input = vec![with_addr(
            iface("eno1", InterfaceKind::Physical),
            "192.168.1.10/24",
        )];
        let err = assemble(&input, ip("10.99.99.99")).unwrap_err();
        assert_eq!(
            err,
            TopologyError::PrimaryInterfaceNotFound {
                address: ip("10.99.99.99")
            }
        );
    }

    #[test]
    fn test_unresolved_bridge_rejected() {
        let input = vec![with_addr(
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
            "192.168.1.5/24",
        )];
        let err = assemble(&input, ip("192.168.1.5")).unwrap_err();
        assert!(matches!(err, TopologyError::MalformedInterface { .. }));
    }
}
