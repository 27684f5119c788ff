//! Trainer core attribute panel.

use std::collections::BTreeMap;
use std::sync::Arc;

use plaza_types::{BaselineDocument, CoreField, CoreValue};
use tracing::debug;

use crate::constants::CORE_NAMESPACE;
use crate::panel::ChangePanel;
use crate::tracker::{FieldChangeTracker, RecordOutcome};

/// Edits name, gender, trainer ID and language.
#[derive(Debug, Clone)]
pub struct CoreEditor {
    tracker: FieldChangeTracker<CoreField>,
}

impl CoreEditor {
    pub fn new(baseline: Arc<BaselineDocument>) -> Self {
        Self {
            tracker: FieldChangeTracker::new(baseline),
        }
    }

    /// Handle raw text from an input box or select.
    ///
    /// Input that doesn't validate for the field's kind is discarded and
    /// whatever was pending for the field stays pending.
    pub fn input(&mut self, field: CoreField, raw: &str) -> RecordOutcome {
        match CoreValue::parse(field, raw) {
            Some(value) => self.tracker.record(field, value),
            None => {
                debug!("Ignoring invalid {} input {:?}", field, raw);
                RecordOutcome::Rejected
            }
        }
    }

    /// What the field should display: pending value or baseline.
    pub fn display(&self, field: CoreField) -> CoreValue {
        self.tracker
            .current_value(field)
            .unwrap_or_else(|| self.tracker.baseline().core_value(field))
    }

    pub fn changes(&self) -> BTreeMap<CoreField, CoreValue> {
        self.tracker.changes()
    }

    pub(crate) fn rebase(&mut self, baseline: Arc<BaselineDocument>) {
        self.tracker.rebase(baseline);
    }
}

impl ChangePanel for CoreEditor {
    fn namespace(&self) -> &'static str {
        CORE_NAMESPACE
    }

    fn has_changes(&self) -> bool {
        self.tracker.has_changes()
    }

    fn changes_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.tracker.changes_json()
    }

    fn clear(&mut self) {
        self.tracker.clear();
    }
}
