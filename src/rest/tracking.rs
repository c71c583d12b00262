//! Change tracking for minimal partial updates.
//!
//! A [`Snapshot`] captures a record's comparable state (scalars
//! verbatim, relations as raw id/URL references, opaque fields as
//! structural copies) at hydration time and after each successful
//! save. [`diff_state`] compares the current state against the
//! snapshot by value and returns only what changed, which becomes the
//! PATCH body: never a full re-serialization, so untouched fields on
//! the server are never clobbered by a save.
//!
//! Relations are deliberately snapshotted as references, not as nested
//! objects. Serializing the related record would recurse without bound
//! and would freeze a stale copy of state that belongs to another
//! resource.

use serde_json::{Map, Value};

/// The last-known server-agreed state of a record, in comparable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// An empty baseline, used transiently while a record is being
    /// built.
    pub(crate) fn empty() -> Self {
        Self(Map::new())
    }

    /// Captures a comparable state as the new baseline.
    pub(crate) fn capture(state: Map<String, Value>) -> Self {
        Self(state)
    }

    pub(crate) fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Returns the fields of `current` whose values differ from `snapshot`.
///
/// Comparison is whole-value equality per field; fields absent from the
/// snapshot (added locally) are always included. Fields only present in
/// the snapshot are ignored; partial updates cannot delete fields.
pub(crate) fn diff_state(snapshot: &Snapshot, current: &Map<String, Value>) -> Map<String, Value> {
    let mut diff = Map::new();
    for (field, value) in current {
        if snapshot.get(field) != Some(value) {
            diff.insert(field.clone(), value.clone());
        }
    }
    diff
}
