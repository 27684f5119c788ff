//! Per-panel field change tracking.
//!
//! A [`FieldChangeTracker`] holds the pending edits of one editing panel and
//! keeps them minimal: every `record` compares the new value against the
//! shared [`BaselineDocument`], and a value equal to the baseline *removes*
//! the field instead of storing a no-op. Editing a field away and back again
//! therefore leaves nothing to submit.
//!
//! # Invariant
//!
//! ```text
//! field ∈ changes  ⇔  changes[field] != baseline[field]
//!                     (as of the last record() for that field)
//! ```
//!
//! Values that fail the field's kind/range check are dropped without
//! touching existing state. Nothing here ever raises an error; a rejected
//! edit is visible only as [`RecordOutcome::Rejected`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use plaza_types::{BaselineDocument, CoreField, CoreValue, ItemId, QUANTITY_MAX};
use tracing::trace;

/// A field identifier that can be tracked against the baseline.
pub trait TrackedField: Copy + Ord + fmt::Debug {
    type Value: Clone + PartialEq + fmt::Debug;

    /// The baseline value, or `None` if the baseline has no such field.
    fn baseline_value(self, baseline: &BaselineDocument) -> Option<Self::Value>;

    /// Declared kind/range check for `value` on this field.
    fn accepts(self, value: &Self::Value) -> bool;

    /// Key in the panel's diff object.
    fn diff_key(self) -> String;

    /// JSON form of a pending value.
    fn value_json(value: &Self::Value) -> serde_json::Value;
}

impl TrackedField for CoreField {
    type Value = CoreValue;

    fn baseline_value(self, baseline: &BaselineDocument) -> Option<CoreValue> {
        Some(baseline.core_value(self))
    }

    fn accepts(self, value: &CoreValue) -> bool {
        value.field() == self
    }

    fn diff_key(self) -> String {
        self.wire_key().to_string()
    }

    fn value_json(value: &CoreValue) -> serde_json::Value {
        value.to_json()
    }
}

impl TrackedField for ItemId {
    type Value = u32;

    fn baseline_value(self, baseline: &BaselineDocument) -> Option<u32> {
        baseline.quantity(self)
    }

    fn accepts(self, value: &u32) -> bool {
        *value <= QUANTITY_MAX
    }

    fn diff_key(self) -> String {
        self.wire_key()
    }

    fn value_json(value: &u32) -> serde_json::Value {
        serde_json::Value::from(*value)
    }
}

/// What a single `record` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Value differs from baseline and is now pending.
    Pending,
    /// Value equals baseline; any pending entry for the field was dropped.
    MatchesBaseline,
    /// Unknown field or value outside the declared range; nothing changed.
    Rejected,
}

/// Pending edits of one panel, compared against a shared baseline.
#[derive(Debug, Clone)]
pub struct FieldChangeTracker<F: TrackedField> {
    baseline: Arc<BaselineDocument>,
    changes: BTreeMap<F, F::Value>,
}

impl<F: TrackedField> FieldChangeTracker<F> {
    pub fn new(baseline: Arc<BaselineDocument>) -> Self {
        Self {
            baseline,
            changes: BTreeMap::new(),
        }
    }

    pub fn baseline(&self) -> &Arc<BaselineDocument> {
        &self.baseline
    }

    /// Record an edit of `field` to `value`.
    pub fn record(&mut self, field: F, value: F::Value) -> RecordOutcome {
        let Some(original) = field.baseline_value(&self.baseline) else {
            trace!("Discarding edit of {:?}: not in baseline", field);
            return RecordOutcome::Rejected;
        };
        if !field.accepts(&value) {
            trace!("Discarding edit of {:?}: {:?} out of range", field, value);
            return RecordOutcome::Rejected;
        }

        if value == original {
            if self.changes.remove(&field).is_some() {
                trace!("{:?} edited back to baseline, dropping pending change", field);
            }
            RecordOutcome::MatchesBaseline
        } else {
            self.changes.insert(field, value);
            RecordOutcome::Pending
        }
    }

    /// Pending value if any, otherwise the baseline value. This is what a
    /// presentation surface must show for `field`.
    pub fn current_value(&self, field: F) -> Option<F::Value> {
        self.changes
            .get(&field)
            .cloned()
            .or_else(|| field.baseline_value(&self.baseline))
    }

    pub fn pending(&self, field: F) -> Option<&F::Value> {
        self.changes.get(&field)
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Snapshot copy of the pending set. Later edits don't show through it.
    pub fn changes(&self) -> BTreeMap<F, F::Value> {
        self.changes.clone()
    }

    /// Pending set in wire form (`wire_key → JSON value`).
    pub fn changes_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.changes
            .iter()
            .map(|(field, value)| (field.diff_key(), F::value_json(value)))
            .collect()
    }

    /// Drop every pending change. Idempotent.
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Switch to a new baseline. Pending changes referred to the old one,
    /// so they are all dropped.
    pub fn rebase(&mut self, baseline: Arc<BaselineDocument>) {
        self.changes.clear();
        self.baseline = baseline;
    }
}

// ============================================================================
// TESTS
// ============================================================================
