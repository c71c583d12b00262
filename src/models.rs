//! Static schema tables for the Peering Manager API.
//!
//! One [`Schema`] per resource type, grouped the way the API groups
//! them (`peering`, `net`, `bgp`, `devices`). Only relation and opaque
//! fields need declaring, since every undeclared key hydrates as a
//! scalar, so these tables list exactly the cross-resource structure.
//!
//! [`default_registry`] builds the full table once at startup; pass it
//! to [`crate::Api::new`]. Deployments mirroring a different API can
//! build their own registry with the same builder.

use crate::rest::{FieldSpec, Schema, SchemaRegistry};

/// Builds the registry of all supported Peering Manager resource
/// types.
#[must_use]
pub fn default_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        // peering
        .register(Schema::new(
            "autonomous-systems",
            "peering/autonomous-systems",
            vec![],
        ))
        .register(Schema::new("communities", "peering/communities", vec![]))
        .register(Schema::new(
            "routing-policies",
            "peering/routing-policies",
            vec![],
        ))
        .register(Schema::new(
            "internet-exchanges",
            "peering/internet-exchanges",
            vec![
                FieldSpec::single("local_autonomous_system", "autonomous-systems"),
                FieldSpec::list("import_routing_policies", "routing-policies"),
                FieldSpec::list("export_routing_policies", "routing-policies"),
                FieldSpec::list("communities", "communities"),
            ],
        ))
        .register(Schema::new(
            "bgp-groups",
            "peering/bgp-groups",
            vec![
                FieldSpec::single("local_autonomous_system", "autonomous-systems"),
                FieldSpec::list("import_routing_policies", "routing-policies"),
                FieldSpec::list("export_routing_policies", "routing-policies"),
                FieldSpec::list("communities", "communities"),
            ],
        ))
        .register(Schema::new("emails", "peering/emails", vec![]))
        .register(Schema::new(
            "internet-exchange-peering-sessions",
            "peering/internet-exchange-peering-sessions",
            vec![
                FieldSpec::single("autonomous_system", "autonomous-systems"),
                FieldSpec::single("ixp_connection", "connections"),
            ],
        ))
        .register(Schema::new(
            "routers",
            "peering/routers",
            vec![
                FieldSpec::single("platform", "platforms"),
                FieldSpec::single("local_autonomous_system", "autonomous-systems"),
            ],
        ))
        .register(Schema::new(
            "direct-peering-sessions",
            "peering/direct-peering-sessions",
            vec![
                FieldSpec::single("local_autonomous_system", "autonomous-systems"),
                FieldSpec::single("autonomous_system", "autonomous-systems"),
                FieldSpec::single("bgp_group", "bgp-groups"),
                FieldSpec::single("relationship", "relationships"),
                FieldSpec::single("router", "routers"),
                FieldSpec::list("import_routing_policies", "routing-policies"),
                FieldSpec::list("export_routing_policies", "routing-policies"),
            ],
        ))
        // net
        .register(Schema::new(
            "connections",
            "net/connections",
            vec![
                FieldSpec::single("internet_exchange_point", "internet-exchanges"),
                FieldSpec::single("router", "routers"),
                FieldSpec::opaque("config_context"),
            ],
        ))
        // bgp
        .register(Schema::new("relationships", "bgp/relationships", vec![]))
        // devices
        .register(Schema::new("platforms", "devices/platforms", vec![]))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::FieldKind;

    #[test]
    fn test_default_registry_covers_all_groups() {
        let registry = default_registry();
        for resource_type in [
            "autonomous-systems",
            "communities",
            "routing-policies",
            "internet-exchanges",
            "bgp-groups",
            "emails",
            "internet-exchange-peering-sessions",
            "routers",
            "direct-peering-sessions",
            "connections",
            "relationships",
            "platforms",
        ] {
            assert!(registry.contains(resource_type), "{resource_type} missing");
        }
    }

    #[test]
    fn test_relation_targets_are_all_registered() {
        let registry = default_registry();
        for resource_type in [
            "internet-exchanges",
            "bgp-groups",
            "internet-exchange-peering-sessions",
            "routers",
            "direct-peering-sessions",
            "connections",
        ] {
            let schema = registry.schema_for(resource_type).unwrap();
            for spec in schema.fields() {
                if let FieldKind::Single { target } | FieldKind::List { target } = spec.kind {
                    assert!(
                        registry.contains(target),
                        "{resource_type}.{} points at unregistered '{target}'",
                        spec.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_connections_config_context_is_opaque() {
        let registry = default_registry();
        let schema = registry.schema_for("connections").unwrap();
        assert_eq!(
            schema.field("config_context").unwrap().kind,
            FieldKind::Opaque
        );
    }
}
