//! Static schema declarations and the schema registry.
//!
//! A [`Schema`] declares, per resource type, which payload fields are
//! plain scalars, which relate to other resources, and which are opaque
//! JSON sub-trees. Schemas are pure data: they carry no behavior and
//! are declared once at process start, typically via
//! [`crate::models::default_registry`].
//!
//! Relation fields name their *target resource type* rather than
//! holding the target [`Schema`] directly. Peering Manager schemas are
//! mutually recursive (a connection points at an internet exchange,
//! whose sessions point back at connections), so targets are resolved
//! through the [`SchemaRegistry`] at relation-resolution time.
//!
//! # Example
//!
//! ```rust
//! use peering_manager::{FieldSpec, Schema, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder()
//!     .register(Schema::new(
//!         "routers",
//!         "peering/routers",
//!         vec![
//!             FieldSpec::scalar("name"),
//!             FieldSpec::single("local_autonomous_system", "autonomous-systems"),
//!         ],
//!     ))
//!     .register(Schema::new("autonomous-systems", "peering/autonomous-systems", vec![]))
//!     .build();
//!
//! let schema = registry.schema_for("routers").unwrap();
//! assert_eq!(schema.path(), "peering/routers");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;

/// How a declared field is interpreted during hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value, stored verbatim.
    Scalar,
    /// A to-one relation to another resource type.
    Single {
        /// Resource type of the related record.
        target: &'static str,
    },
    /// A to-many relation to another resource type.
    List {
        /// Resource type of the related records.
        target: &'static str,
    },
    /// An untyped JSON sub-tree, stored verbatim and excluded from
    /// relation resolution.
    Opaque,
}

/// Immutable declaration of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The payload key this spec applies to.
    pub name: &'static str,
    /// How values under that key are interpreted.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a scalar field.
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    /// Declares a to-one relation to `target`.
    #[must_use]
    pub const fn single(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Single { target },
        }
    }

    /// Declares a to-many relation to `target`.
    #[must_use]
    pub const fn list(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::List { target },
        }
    }

    /// Declares an opaque JSON field.
    #[must_use]
    pub const fn opaque(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Opaque,
        }
    }
}

/// Field declarations for one resource type.
///
/// Field order follows declaration order. Keys encountered in a payload
/// without a matching [`FieldSpec`] are *not* rejected; they hydrate as
/// untyped scalars, so server-side additions never break the client.
#[derive(Debug)]
pub struct Schema {
    resource_type: &'static str,
    path: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates a schema for `resource_type`, reachable under `path`
    /// relative to the API base (e.g. `peering/routers`).
    #[must_use]
    pub const fn new(
        resource_type: &'static str,
        path: &'static str,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            resource_type,
            path,
            fields,
        }
    }

    /// The resource type this schema describes.
    #[must_use]
    pub const fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// The URL path of this resource type relative to the API base.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up the declaration for a field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

/// Immutable mapping from resource-type name to [`Schema`].
///
/// Built once at process start via [`SchemaRegistry::builder`] and
/// passed explicitly into [`crate::Api::new`]; there is no ambient
/// global registry. Schemas are handed out as `Arc`s, so pointer
/// identity is sufficient for schema equality checks.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Returns a new, empty registry builder.
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            schemas: HashMap::new(),
        }
    }

    /// Looks up the schema for a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownResourceType`] if the type was
    /// never registered. Registration is explicit and total for a
    /// deployment, so this indicates a programming error, not missing
    /// server data.
    pub fn schema_for(&self, resource_type: &str) -> Result<&Arc<Schema>, ConfigError> {
        self.schemas
            .get(resource_type)
            .ok_or_else(|| ConfigError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })
    }

    /// Returns `true` if a schema is registered for `resource_type`.
    #[must_use]
    pub fn contains(&self, resource_type: &str) -> bool {
        self.schemas.contains_key(resource_type)
    }
}

/// Builder for [`SchemaRegistry`].
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<&'static str, Arc<Schema>>,
}

impl SchemaRegistryBuilder {
    /// Registers a schema under its resource type, replacing any
    /// earlier registration for the same type.
    #[must_use]
    pub fn register(mut self, schema: Schema) -> Self {
        self.schemas.insert(schema.resource_type, Arc::new(schema));
        self
    }

    /// Finalizes the registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(
            "routers",
            "peering/routers",
            vec![
                FieldSpec::scalar("name"),
                FieldSpec::single("platform", "platforms"),
                FieldSpec::list("tags", "tags"),
                FieldSpec::opaque("config_context"),
            ],
        )
    }

    #[test]
    fn test_field_lookup_by_name() {
        let schema = sample_schema();
        assert_eq!(schema.field("name").unwrap().kind, FieldKind::Scalar);
        assert_eq!(
            schema.field("platform").unwrap().kind,
            FieldKind::Single {
                target: "platforms"
            }
        );
        assert!(schema.field("unknown").is_none());
    }

    #[test]
    fn test_fields_preserve_declaration_order() {
        let schema = sample_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "platform", "tags", "config_context"]);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SchemaRegistry::builder().register(sample_schema()).build();
        assert!(registry.contains("routers"));
        assert_eq!(
            registry.schema_for("routers").unwrap().path(),
            "peering/routers"
        );
    }

    #[test]
    fn test_registry_rejects_unregistered_type() {
        let registry = SchemaRegistry::builder().build();
        assert!(matches!(
            registry.schema_for("routers"),
            Err(ConfigError::UnknownResourceType { .. })
        ));
    }

    #[test]
    fn test_schemas_share_identity_through_arcs() {
        let registry = SchemaRegistry::builder().register(sample_schema()).build();
        let a = Arc::clone(registry.schema_for("routers").unwrap());
        let b = Arc::clone(registry.schema_for("routers").unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }
}
