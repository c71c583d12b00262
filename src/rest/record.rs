//! Hydrated records and lazy relation resolution.
//!
//! A [`Record`] is the in-memory representation of one resource
//! instance. It is only ever created by [`Record::hydrate`] from a raw
//! JSON object and the resource's [`Schema`]: scalar and opaque fields
//! are stored verbatim, relation fields become lazy slots that resolve
//! into nested `Record`s on first access.
//!
//! # Relation slots
//!
//! A relation value arrives from the server in one of two shapes:
//!
//! - a *nested object*: the full body of the related resource embedded
//!   inline. Resolving hydrates it locally with zero network round
//!   trips.
//! - a *bare reference*: an id or URL. Resolving performs exactly one
//!   detail fetch through the executor.
//!
//! Either way the slot is memoized: it transitions from unresolved to
//! resolved at most once per `Record` instance, and every later access
//! returns the identical in-memory target. Resolution takes `&mut
//! self`, so sharing one `Record` across threads requires external
//! synchronization; the borrow checker enforces what would otherwise
//! be a data race on the slot.
//!
//! # Change tracking
//!
//! Hydration finishes by capturing a [`Snapshot`](crate::rest::tracking::Snapshot)
//! of the record's comparable state, so [`Record::diff`] is empty until
//! the first mutation and [`Record::save`] sends only what changed.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{json_type_name, RequestExecutor};
use crate::error::{AllocationError, ContentError, Error};
use crate::rest::schema::{FieldKind, Schema, SchemaRegistry};
use crate::rest::tracking::{diff_state, Snapshot};

/// Shared context a record needs to resolve relations and save itself:
/// the executor, the schema registry, and the API base URL used to
/// compose detail URLs from bare identifiers.
#[derive(Debug, Clone)]
pub struct EndpointContext {
    pub(crate) executor: Arc<RequestExecutor>,
    pub(crate) registry: Arc<SchemaRegistry>,
    pub(crate) base_url: String,
}

impl EndpointContext {
    /// Creates a context from its parts.
    #[must_use]
    pub fn new(
        executor: Arc<RequestExecutor>,
        registry: Arc<SchemaRegistry>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            registry,
            base_url: base_url.into(),
        }
    }
}

/// Lazily resolved state of one relation field.
#[derive(Debug)]
enum SlotState {
    /// To-one relation, raw payload (nested object or bare reference).
    UnresolvedOne(Value),
    /// To-one relation, resolved on a previous access.
    ResolvedOne(Box<Record>),
    /// To-many relation, raw element payloads in server order.
    UnresolvedMany(Vec<Value>),
    /// To-many relation, resolved on a previous access.
    ResolvedMany(Vec<Record>),
}

/// One relation field of a record.
#[derive(Debug)]
struct Relation {
    /// Target resource type, resolved through the registry on access.
    target: &'static str,
    /// Comparable form used as the diff baseline: the raw id/URL (or id
    /// sequence) captured at hydration or mutation time. Never
    /// recomputed from a resolved record, so resolving a relation can
    /// never surface as a spurious diff.
    comparable: Value,
    slot: SlotState,
}

/// The hydrated in-memory representation of one resource instance.
#[derive(Debug)]
pub struct Record {
    schema: Arc<Schema>,
    ctx: EndpointContext,
    /// Scalar, opaque, and unknown fields, stored verbatim.
    values: Map<String, Value>,
    /// Declared relation fields present in the payload.
    relations: std::collections::HashMap<String, Relation>,
    /// Diff baseline captured from the last server-agreed state.
    snapshot: Snapshot,
}

impl Record {
    /// Hydrates a raw JSON object against a schema.
    ///
    /// Pure of network I/O: every key in `raw` is dispatched on its
    /// [`FieldKind`] (keys without a declaration hydrate as scalars,
    /// preserving forward compatibility), relation values become lazy
    /// slots, and a change-tracking snapshot is taken from the
    /// just-built state, so mutation tracking starts from exactly what
    /// the server last reported.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::BadRelationShape`] for relation values
    /// of an unusable shape: an array in a to-one field, a non-array in
    /// a to-many field, or a to-many element that is itself an array.
    /// These fail here, not later at resolution time.
    pub fn hydrate(
        raw: Map<String, Value>,
        schema: &Arc<Schema>,
        ctx: EndpointContext,
    ) -> Result<Self, ContentError> {
        let mut values = Map::new();
        let mut relations = std::collections::HashMap::new();

        for (key, value) in raw {
            let kind = schema.field(&key).map_or(FieldKind::Scalar, |spec| spec.kind);
            match kind {
                FieldKind::Scalar | FieldKind::Opaque => {
                    values.insert(key, value);
                }
                FieldKind::Single { target } => match value {
                    Value::Null => {
                        values.insert(key, Value::Null);
                    }
                    Value::Array(_) => {
                        return Err(ContentError::BadRelationShape {
                            field: key,
                            reason: "holds an array but is declared to-one",
                        });
                    }
                    value => {
                        relations.insert(
                            key,
                            Relation {
                                target,
                                comparable: reference_form(&value),
                                slot: SlotState::UnresolvedOne(value),
                            },
                        );
                    }
                },
                FieldKind::List { target } => match value {
                    Value::Null => {
                        values.insert(key, Value::Null);
                    }
                    Value::Array(elements) => {
                        for element in &elements {
                            if matches!(element, Value::Array(_) | Value::Null) {
                                return Err(ContentError::BadRelationShape {
                                    field: key,
                                    reason:
                                        "contains an element that is neither an object nor a reference",
                                });
                            }
                        }
                        let comparable =
                            Value::Array(elements.iter().map(reference_form).collect());
                        relations.insert(
                            key,
                            Relation {
                                target,
                                comparable,
                                slot: SlotState::UnresolvedMany(elements),
                            },
                        );
                    }
                    other => {
                        return Err(ContentError::BadRelationShape {
                            field: key,
                            reason: match other {
                                Value::Object(_) => "holds an object but is declared to-many",
                                _ => "holds a scalar but is declared to-many",
                            },
                        });
                    }
                },
            }
        }

        let mut record = Self {
            schema: Arc::clone(schema),
            ctx,
            values,
            relations,
            snapshot: Snapshot::empty(),
        };
        record.snapshot = Snapshot::capture(record.comparable_state());
        Ok(record)
    }

    /// The resource type this record belongs to.
    #[must_use]
    pub fn resource_type(&self) -> &'static str {
        self.schema.resource_type()
    }

    /// The schema this record was hydrated against.
    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The server-assigned identifier, if present.
    ///
    /// Sub-resources embedded without their own identity return `None`.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.values.get("id").filter(|v| !v.is_null())
    }

    /// The record's canonical URL, used for detail lookups and as the
    /// mutation target.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.values.get("url").and_then(Value::as_str)
    }

    /// Returns a scalar, opaque, or unknown field value.
    ///
    /// Relation fields are not reachable through this accessor; use
    /// [`Record::relation`] / [`Record::relation_list`] (resolved) or
    /// [`Record::relation_ref`] (raw reference form) instead.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the raw reference form of a relation field (the id/URL,
    /// or id sequence for to-many relations) without resolving it.
    #[must_use]
    pub fn relation_ref(&self, name: &str) -> Option<&Value> {
        self.relations.get(name).map(|rel| &rel.comparable)
    }

    /// Returns `true` if `name` hydrated as a relation slot.
    #[must_use]
    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Sets a field to a new value.
    ///
    /// For scalar fields the value is stored verbatim. For relation
    /// fields the value replaces both the diff baseline and the lazy
    /// slot, so a subsequent access resolves the new target and
    /// [`Record::save`] sends the new reference. Setting a relation to
    /// `null` empties it, same as a null relation at hydration time.
    pub fn set(&mut self, name: &str, value: Value) {
        if value.is_null() {
            self.relations.remove(name);
            self.values.insert(name.to_string(), value);
            return;
        }
        if let Some(rel) = self.relations.get_mut(name) {
            match value {
                Value::Array(elements) => {
                    rel.comparable = Value::Array(elements.iter().map(reference_form).collect());
                    rel.slot = SlotState::UnresolvedMany(elements);
                }
                value => {
                    rel.comparable = reference_form(&value);
                    rel.slot = SlotState::UnresolvedOne(value);
                }
            }
        } else {
            self.values.insert(name.to_string(), value);
        }
    }

    /// Resolves a to-one relation, fetching the target on first access.
    ///
    /// Nested-object slots hydrate locally with zero network calls;
    /// reference slots perform exactly one detail fetch the first time
    /// and none afterwards. Both return the same in-memory target on
    /// every subsequent call.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::DanglingReference`] if the referenced
    ///   resource does not exist.
    /// - [`crate::ConfigError::UnknownResourceType`] if the target type
    ///   is not registered.
    /// - [`ContentError::BadRelationShape`] if `name` is not a to-one
    ///   relation of this record.
    pub async fn relation(&mut self, name: &str) -> Result<&Self, Error> {
        let ctx = self.ctx.clone();
        let Some(rel) = self.relations.get_mut(name) else {
            return Err(not_a_relation(name).into());
        };

        match &rel.slot {
            SlotState::ResolvedOne(_) => {}
            SlotState::UnresolvedOne(raw) => {
                let record = resolve_single(rel.target, raw.clone(), &ctx).await?;
                rel.slot = SlotState::ResolvedOne(Box::new(record));
            }
            SlotState::UnresolvedMany(_) | SlotState::ResolvedMany(_) => {
                return Err(ContentError::BadRelationShape {
                    field: name.to_string(),
                    reason: "is a to-many relation; use relation_list",
                }
                .into());
            }
        }

        match &self.relations[name].slot {
            SlotState::ResolvedOne(record) => Ok(record),
            _ => unreachable!("slot was resolved above"),
        }
    }

    /// Resolves a to-many relation, fetching referenced targets on
    /// first access.
    ///
    /// Elements resolve with the same rules as [`Record::relation`]:
    /// embedded objects locally, bare references via one detail fetch
    /// each. The resolved sequence is memoized and keeps server order.
    ///
    /// # Errors
    ///
    /// Same error classes as [`Record::relation`].
    pub async fn relation_list(&mut self, name: &str) -> Result<&[Self], Error> {
        let ctx = self.ctx.clone();
        let Some(rel) = self.relations.get_mut(name) else {
            // A null list hydrates as a scalar null: an empty relation.
            if matches!(self.values.get(name), Some(Value::Null)) {
                return Ok(&[]);
            }
            return Err(not_a_relation(name).into());
        };

        match &rel.slot {
            SlotState::ResolvedMany(_) => {}
            SlotState::UnresolvedMany(raws) => {
                let raws = raws.clone();
                let mut records = Vec::with_capacity(raws.len());
                for raw in raws {
                    records.push(resolve_single(rel.target, raw, &ctx).await?);
                }
                rel.slot = SlotState::ResolvedMany(records);
            }
            SlotState::UnresolvedOne(_) | SlotState::ResolvedOne(_) => {
                return Err(ContentError::BadRelationShape {
                    field: name.to_string(),
                    reason: "is a to-one relation; use relation",
                }
                .into());
            }
        }

        match &self.relations[name].slot {
            SlotState::ResolvedMany(records) => Ok(records),
            _ => unreachable!("slot was resolved above"),
        }
    }

    /// Returns the fields whose values differ from the last
    /// server-agreed snapshot.
    ///
    /// Comparison is by value, with relations compared in their raw
    /// reference form and opaque fields as whole values. Empty
    /// immediately after hydration.
    #[must_use]
    pub fn diff(&self) -> Map<String, Value> {
        diff_state(&self.snapshot, &self.comparable_state())
    }

    /// Persists local changes with a minimal partial update.
    ///
    /// Returns `Ok(false)` without touching the network when nothing
    /// changed. Otherwise PATCHes exactly the changed fields to the
    /// record's URL and rebuilds the record from the server's returned
    /// body, so server-side derived fields are picked up and the diff
    /// baseline is reset to the post-update state.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::UrlMissing`] if the record has no
    /// canonical URL, plus the executor's request/content errors.
    pub async fn save(&mut self) -> Result<bool, Error> {
        let diff = self.diff();
        if diff.is_empty() {
            return Ok(false);
        }

        let url = self
            .url()
            .ok_or_else(|| AllocationError::UrlMissing {
                resource_type: self.resource_type().to_string(),
            })?
            .to_string();

        tracing::debug!(
            resource_type = self.resource_type(),
            url,
            fields = diff.len(),
            "saving changed fields"
        );
        let ctx = self.ctx.clone();
        let raw = ctx.executor.patch(&url, &Value::Object(diff)).await?;
        let schema = Arc::clone(&self.schema);
        *self = Self::hydrate(raw, &schema, ctx)?;
        Ok(true)
    }

    /// Deletes the resource behind this record.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::UrlMissing`] if the record has no
    /// canonical URL, plus the executor's request errors.
    pub async fn delete(&self) -> Result<(), Error> {
        let url = self.url().ok_or_else(|| AllocationError::UrlMissing {
            resource_type: self.resource_type().to_string(),
        })?;
        self.ctx.executor.delete(url).await
    }

    /// Serializes the record to its portable comparable form: scalars
    /// and opaque values verbatim, relations as raw references.
    ///
    /// The output can be carried across a process boundary and
    /// rehydrated with [`Record::hydrate`]; no in-memory identity is
    /// assumed to survive the transfer.
    #[must_use]
    pub fn serialize(&self) -> Value {
        Value::Object(self.comparable_state())
    }

    /// Current state in comparable form, the input to snapshots and
    /// diffs.
    pub(crate) fn comparable_state(&self) -> Map<String, Value> {
        let mut state = self.values.clone();
        for (name, rel) in &self.relations {
            state.insert(name.clone(), rel.comparable.clone());
        }
        state
    }
}

impl fmt::Display for Record {
    /// Prefers the server-provided display value, then `name`, then the
    /// id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .get("display")
            .or_else(|| self.get("name"))
            .and_then(Value::as_str);
        match label {
            Some(label) => f.write_str(label),
            None => match self.id() {
                Some(id) => write!(f, "{}#{id}", self.resource_type()),
                None => f.write_str(self.resource_type()),
            },
        }
    }
}

/// Comparable reference form of a raw relation value: a nested object
/// reduces to its id (falling back to its URL, then to a structural
/// copy for id-less sub-resources); a bare reference is already in
/// comparable form.
fn reference_form(value: &Value) -> Value {
    match value {
        Value::Object(obj) => obj
            .get("id")
            .filter(|id| !id.is_null())
            .or_else(|| obj.get("url"))
            .cloned()
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

fn not_a_relation(name: &str) -> ContentError {
    ContentError::BadRelationShape {
        field: name.to_string(),
        reason: "is not declared as a relation",
    }
}

/// Resolves one relation payload into a record: nested objects hydrate
/// locally, bare references go through a single detail fetch.
async fn resolve_single(
    target: &'static str,
    raw: Value,
    ctx: &EndpointContext,
) -> Result<Record, Error> {
    let schema = Arc::clone(ctx.registry.schema_for(target)?);

    let body = match raw {
        Value::Object(body) => body,
        reference => {
            let url = match &reference {
                Value::String(s) if s.starts_with("http://") || s.starts_with("https://") => {
                    s.clone()
                }
                Value::String(s) => format!("{}/{}/{}/", ctx.base_url, schema.path(), s),
                Value::Number(n) => format!("{}/{}/{}/", ctx.base_url, schema.path(), n),
                other => {
                    return Err(ContentError::BadRelationShape {
                        field: target.to_string(),
                        reason: match json_type_name(other) {
                            "a boolean" => "holds a boolean, which is not a usable reference",
                            _ => "holds a value that is not a usable reference",
                        },
                    }
                    .into());
                }
            };

            tracing::debug!(target, url, "resolving reference slot");
            ctx.executor.fetch_one(&url).await?.ok_or_else(|| {
                AllocationError::DanglingReference {
                    resource_type: target.to_string(),
                    url,
                }
            })?
        }
    };

    Ok(Record::hydrate(body, &schema, ctx.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::rest::schema::{FieldSpec, SchemaRegistry};
    use serde_json::json;

    fn test_ctx(registry: SchemaRegistry) -> EndpointContext {
        let config = ApiConfig::builder().url("http://localhost:8000").build().unwrap();
        EndpointContext::new(
            Arc::new(RequestExecutor::new(&config)),
            Arc::new(registry),
            config.base_url().to_string(),
        )
    }

    fn router_registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .register(Schema::new(
                "routers",
                "peering/routers",
                vec![
                    FieldSpec::scalar("name"),
                    FieldSpec::single("platform", "platforms"),
                    FieldSpec::list("import_routing_policies", "routing-policies"),
                    FieldSpec::opaque("config_context"),
                ],
            ))
            .register(Schema::new("platforms", "devices/platforms", vec![]))
            .register(Schema::new(
                "routing-policies",
                "peering/routing-policies",
                vec![],
            ))
            .build()
    }

    fn hydrate_router(raw: Value) -> Result<Record, ContentError> {
        let registry = router_registry();
        let schema = Arc::clone(registry.schema_for("routers").unwrap());
        let Value::Object(raw) = raw else {
            panic!("test payload must be an object")
        };
        Record::hydrate(raw, &schema, test_ctx(router_registry()))
    }

    #[test]
    fn test_scalars_are_stored_verbatim() {
        let record = hydrate_router(json!({
            "id": 7,
            "url": "http://localhost:8000/api/peering/routers/7/",
            "name": "edge1",
            "encrypted_passwords": true,
        }))
        .unwrap();

        assert_eq!(record.id(), Some(&json!(7)));
        assert_eq!(record.get("name"), Some(&json!("edge1")));
        assert_eq!(record.get("encrypted_passwords"), Some(&json!(true)));
        assert_eq!(
            record.url(),
            Some("http://localhost:8000/api/peering/routers/7/")
        );
    }

    #[test]
    fn test_unknown_keys_hydrate_as_scalars() {
        let record = hydrate_router(json!({
            "id": 7,
            "field_added_next_release": {"nested": [1, 2]},
        }))
        .unwrap();

        assert_eq!(
            record.get("field_added_next_release"),
            Some(&json!({"nested": [1, 2]}))
        );
    }

    #[test]
    fn test_opaque_fields_pass_through_untyped() {
        let record = hydrate_router(json!({
            "id": 7,
            "config_context": {"bgp": {"asn": 64500}},
        }))
        .unwrap();

        assert_eq!(
            record.get("config_context"),
            Some(&json!({"bgp": {"asn": 64500}}))
        );
        assert!(!record.has_relation("config_context"));
    }

    #[test]
    fn test_nested_relation_becomes_slot_with_id_reference() {
        let record = hydrate_router(json!({
            "id": 7,
            "platform": {"id": 3, "name": "junos", "url": "http://x/api/devices/platforms/3/"},
        }))
        .unwrap();

        assert!(record.has_relation("platform"));
        assert_eq!(record.relation_ref("platform"), Some(&json!(3)));
    }

    #[test]
    fn test_bare_reference_keeps_its_value_as_baseline() {
        let record = hydrate_router(json!({"id": 7, "platform": 3})).unwrap();
        assert_eq!(record.relation_ref("platform"), Some(&json!(3)));
    }

    #[test]
    fn test_list_relation_baseline_is_ordered_ids() {
        let record = hydrate_router(json!({
            "id": 7,
            "import_routing_policies": [{"id": 4, "name": "allow"}, 9],
        }))
        .unwrap();

        assert_eq!(
            record.relation_ref("import_routing_policies"),
            Some(&json!([4, 9]))
        );
    }

    #[test]
    fn test_null_relation_is_an_empty_scalar() {
        let record = hydrate_router(json!({"id": 7, "platform": null})).unwrap();
        assert!(!record.has_relation("platform"));
        assert_eq!(record.get("platform"), Some(&json!(null)));
    }

    #[test]
    fn test_array_in_single_relation_fails_at_hydration() {
        let result = hydrate_router(json!({"id": 7, "platform": [1, 2]}));
        assert!(matches!(
            result,
            Err(ContentError::BadRelationShape { field, .. }) if field == "platform"
        ));
    }

    #[test]
    fn test_scalar_in_list_relation_fails_at_hydration() {
        let result = hydrate_router(json!({"id": 7, "import_routing_policies": 4}));
        assert!(matches!(
            result,
            Err(ContentError::BadRelationShape { .. })
        ));
    }

    #[test]
    fn test_nested_array_element_fails_at_hydration() {
        let result = hydrate_router(json!({"id": 7, "import_routing_policies": [[1]]}));
        assert!(matches!(
            result,
            Err(ContentError::BadRelationShape { .. })
        ));
    }

    #[test]
    fn test_diff_is_empty_after_hydration() {
        let record = hydrate_router(json!({
            "id": 7,
            "name": "edge1",
            "platform": {"id": 3, "name": "junos"},
            "import_routing_policies": [4, 9],
            "config_context": {"a": 1},
        }))
        .unwrap();

        assert!(record.diff().is_empty());
    }

    #[test]
    fn test_single_scalar_mutation_diffs_exactly_that_field() {
        let mut record = hydrate_router(json!({"id": 7, "name": "edge1"})).unwrap();
        record.set("name", json!("edge2"));

        let diff = record.diff();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("name"), Some(&json!("edge2")));
    }

    #[test]
    fn test_relation_mutation_diffs_as_reference() {
        let mut record =
            hydrate_router(json!({"id": 7, "platform": {"id": 3, "name": "junos"}})).unwrap();
        record.set("platform", json!(5));

        let diff = record.diff();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("platform"), Some(&json!(5)));
    }

    #[test]
    fn test_setting_a_relation_to_null_empties_it() {
        let mut record =
            hydrate_router(json!({"id": 7, "platform": {"id": 3, "name": "junos"}})).unwrap();
        record.set("platform", json!(null));

        // Same shape as a null relation at hydration time.
        assert!(!record.has_relation("platform"));
        assert_eq!(record.get("platform"), Some(&json!(null)));
        assert_eq!(record.diff().get("platform"), Some(&json!(null)));
    }

    #[test]
    fn test_opaque_mutation_compares_whole_value() {
        let mut record = hydrate_router(json!({"id": 7, "config_context": {"a": 1}})).unwrap();
        record.set("config_context", json!({"a": 1}));
        assert!(record.diff().is_empty());

        record.set("config_context", json!({"a": 2}));
        assert_eq!(record.diff().get("config_context"), Some(&json!({"a": 2})));
    }

    #[test]
    fn test_serialize_uses_reference_forms() {
        let record = hydrate_router(json!({
            "id": 7,
            "name": "edge1",
            "platform": {"id": 3, "name": "junos"},
            "import_routing_policies": [{"id": 4}, {"id": 9}],
        }))
        .unwrap();

        assert_eq!(
            record.serialize(),
            json!({
                "id": 7,
                "name": "edge1",
                "platform": 3,
                "import_routing_policies": [4, 9],
            })
        );
    }

    #[test]
    fn test_serialized_form_rehydrates() {
        let registry = router_registry();
        let schema = Arc::clone(registry.schema_for("routers").unwrap());

        let record = hydrate_router(json!({
            "id": 7,
            "name": "edge1",
            "platform": {"id": 3, "name": "junos"},
        }))
        .unwrap();

        let Value::Object(portable) = record.serialize() else {
            panic!("serialize must produce an object")
        };
        let restored = Record::hydrate(portable, &schema, test_ctx(router_registry())).unwrap();

        assert_eq!(restored.id(), Some(&json!(7)));
        assert_eq!(restored.relation_ref("platform"), Some(&json!(3)));
        assert!(restored.diff().is_empty());
    }

    #[test]
    fn test_display_prefers_display_then_name_then_id() {
        let named = hydrate_router(json!({"id": 7, "name": "edge1"})).unwrap();
        assert_eq!(named.to_string(), "edge1");

        let displayed =
            hydrate_router(json!({"id": 7, "name": "edge1", "display": "edge1.example.net"}))
                .unwrap();
        assert_eq!(displayed.to_string(), "edge1.example.net");

        let anonymous = hydrate_router(json!({"id": 7})).unwrap();
        assert_eq!(anonymous.to_string(), "routers#7");
    }

    #[test]
    fn test_reference_form_falls_back_to_url_then_copy() {
        assert_eq!(
            reference_form(&json!({"url": "http://x/api/p/1/", "name": "n"})),
            json!("http://x/api/p/1/")
        );
        assert_eq!(
            reference_form(&json!({"address": "192.0.2.1"})),
            json!({"address": "192.0.2.1"})
        );
    }
}
