//! Unit tests for the bridge resolver

#[cfg(test)]
mod tests {
    use crate::error::TopologyError;
    use crate::model::InterfaceKind;
    use crate::resolve::resolve_bridges;
    use crate::test_fixtures::*;

    #[test]
    fn test_single_member_bridge_collapses_onto_member() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            with_addr(
                iface(
                    "br0",
                    InterfaceKind::Bridge {
                        members: vec!["eno1".to_string()],
                    },
                ),
                "192.168.1.5/24",
            ),
        ];
        let resolved = resolve_bridges(input).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "eno1");
        assert_eq!(resolved[0].kind, InterfaceKind::Physical);
        assert_eq!(resolved[0].addresses, vec![addr("192.168.1.5/24")]);
    }

    #[test]
    fn test_single_member_bridge_mtu_transfer() {
        let mut bridge = with_addr(
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
            "192.168.1.5/24",
        );
        bridge.mtu = Some(9000);
        let input = vec![iface("eno1", InterfaceKind::Physical), bridge];
        let resolved = resolve_bridges(input).unwrap();
        assert_eq!(resolved[0].mtu, Some(9000));
    }

    #[test]
    fn test_multi_member_bridge_becomes_bond() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface("eno2", InterfaceKind::Physical),
            with_addr(
                iface(
                    "br0",
                    InterfaceKind::Bridge {
                        members: vec!["eno1".to_string(), "eno2".to_string()],
                    },
                ),
                "10.0.0.5/24",
            ),
        ];
        let resolved = resolve_bridges(input).unwrap();
        let names: Vec<&str> = resolved.iter().map(|i| i.name.as_str()).collect();
        // Members stay as addressless standalone records; the bond takes
        // the bridge's slot.
        assert_eq!(names, vec!["eno1", "eno2", "bond-br0"]);
        assert_eq!(
            resolved[2].kind,
            InterfaceKind::Bond {
                mode: "802.3ad".to_string(),
                members: vec!["eno1".to_string(), "eno2".to_string()],
            }
        );
        assert_eq!(resolved[2].addresses, vec![addr("10.0.0.5/24")]);
        assert!(resolved[0].addresses.is_empty());
        assert!(resolved[1].addresses.is_empty());
    }

    #[test]
    fn test_empty_bridge_rejected() {
        let input = vec![iface("br0", InterfaceKind::Bridge { members: vec![] })];
        let err = resolve_bridges(input).unwrap_err();
        assert_eq!(
            err,
            TopologyError::EmptyBridge {
                bridge: "br0".to_string()
            }
        );
    }

    #[test]
    fn test_dangling_bridge_member_rejected() {
        let input = vec![iface(
            "br0",
            InterfaceKind::Bridge {
                members: vec!["eno9".to_string()],
            },
        )];
        let err = resolve_bridges(input).unwrap_err();
        assert_eq!(
            err,
            TopologyError::DanglingMember {
                interface: "br0".to_string(),
                member: "eno9".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_bond_member_rejected() {
        let input = vec![iface(
            "bond0",
            InterfaceKind::Bond {
                mode: "802.3ad".to_string(),
                members: vec!["eno9".to_string()],
            },
        )];
        let err = resolve_bridges(input).unwrap_err();
        assert!(matches!(err, TopologyError::DanglingMember { .. }));
    }

    #[test]
    fn test_nested_bridge_rejected() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
            iface(
                "br1",
                InterfaceKind::Bridge {
                    members: vec!["br0".to_string()],
                },
            ),
        ];
        let err = resolve_bridges(input).unwrap_err();
        assert_eq!(
            err,
            TopologyError::NestedBridge {
                bridge: "br1".to_string(),
                member: "br0".to_string(),
            }
        );
    }

    #[test]
    fn test_addressed_bridge_member_is_malformed() {
        // The source never assigns addresses to slaved NICs; refusing is
        // safer than overwriting.
        let input = vec![
            with_addr(iface("eno1", InterfaceKind::Physical), "192.168.1.7/24"),
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
        ];
        let err = resolve_bridges(input).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::MalformedInterface { name, .. } if name == "eno1"
        ));
    }

    #[test]
    fn test_member_of_two_bridges_is_malformed() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
            iface(
                "br1",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
        ];
        let err = resolve_bridges(input).unwrap_err();
        assert!(matches!(err, TopologyError::MalformedInterface { .. }));
    }

    #[test]
    fn test_vlan_parent_remap_to_synthesized_bond() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface("eno2", InterfaceKind::Physical),
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string(), "eno2".to_string()],
                },
            ),
            with_addr(
                iface(
                    "br0.100",
                    InterfaceKind::Vlan {
                        parent: "br0".to_string(),
                        vlan_id: 100,
                    },
                ),
                "172.16.0.5/24",
            ),
        ];
        let resolved = resolve_bridges(input).unwrap();
        let vlan = resolved.iter().find(|i| i.name == "br0.100").unwrap();
        assert_eq!(
            vlan.kind,
            InterfaceKind::Vlan {
                parent: "bond-br0".to_string(),
                vlan_id: 100,
            }
        );
    }

    #[test]
    fn test_vlan_parent_remap_to_passthrough_member() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface(
                "br0",
                InterfaceKind::Bridge {
                    members: vec!["eno1".to_string()],
                },
            ),
            with_addr(
                iface(
                    "br0.200",
                    InterfaceKind::Vlan {
                        parent: "br0".to_string(),
                        vlan_id: 200,
                    },
                ),
                "172.16.0.5/24",
            ),
        ];
        let resolved = resolve_bridges(input).unwrap();
        let vlan = resolved.iter().find(|i| i.name == "br0.200").unwrap();
        assert!(matches!(
            &vlan.kind,
            InterfaceKind::Vlan { parent, .. } if parent == "eno1"
        ));
    }

    #[test]
    fn test_no_bridges_is_identity() {
        let input = vec![
            with_addr(iface("eno1", InterfaceKind::Physical), "192.168.1.10/24"),
            iface("eno2", InterfaceKind::Physical),
        ];
        let resolved = resolve_bridges(input.clone()).unwrap();
        assert_eq!(resolved, input);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = vec![
            iface("eno1", InterfaceKind::Physical),
            iface("eno2", InterfaceKind::Physical),
            iface("eno3", InterfaceKind::Physical),
            with_addr(
                iface(
                    "br0",
                    InterfaceKind::Bridge {
                        members: vec!["eno1".to_string(), "eno2".to_string()],
                    },
                ),
                "10.0.0.5/24",
            ),
            with_addr(
                iface(
                    "br1",
                    InterfaceKind::Bridge {
                        members: vec!["eno3".to_string()],
                    },
                ),
                "10.0.1.5/24",
            ),
        ];
        let first = resolve_bridges(input.clone()).unwrap();
        let second = resolve_bridges(input).unwrap();
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eno1", "eno2", "eno3", "bond-br0"]);
    }
}
