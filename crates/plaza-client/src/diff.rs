//! Change aggregation.
//!
//! [`build_diff`] snapshots every panel's pending set into one payload, keyed
//! by panel namespace, in panel order:
//!
//! ```json
//! { "core": { "tid": 99999 }, "bag": {} }
//! ```
//!
//! A panel with nothing pending still contributes an empty object. The
//! reconciliation server reads `changes.get("core", {})`, but an explicit
//! `{}` keeps "nothing changed here" unambiguous for any other consumer.

use indexmap::IndexMap;
use plaza_types::SaveRef;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::panel::ChangePanel;

/// Namespaced snapshot of all pending changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedDiff(IndexMap<&'static str, Map<String, Value>>);

impl AggregatedDiff {
    pub fn namespace(&self, name: &str) -> Option<&Map<String, Value>> {
        self.0.get(name)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Total number of changed fields across all panels.
    pub fn change_count(&self) -> usize {
        self.0.values().map(Map::len).sum()
    }

    /// True when no panel contributed any change.
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }
}

/// Snapshot every panel's pending changes, one key per panel.
pub fn build_diff(panels: &[&dyn ChangePanel]) -> AggregatedDiff {
    AggregatedDiff(
        panels
            .iter()
            .map(|panel| (panel.namespace(), panel.changes_json()))
            .collect(),
    )
}

/// Body of a `/modify` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifyRequest {
    pub changes: AggregatedDiff,
    pub save_data_ref: SaveRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str, Map<String, Value>);

    impl ChangePanel for Fixed {
        fn namespace(&self) -> &'static str {
            self.0
        }
        fn has_changes(&self) -> bool {
            !self.1.is_empty()
        }
        fn changes_json(&self) -> Map<String, Value> {
            self.1.clone()
        }
        fn clear(&mut self) {
            self.1.clear();
        }
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_panels_are_present() {
        let core = Fixed("core", obj(json!({"tid": 99999})));
        let bag = Fixed("bag", Map::new());
        let diff = build_diff(&[&core, &bag]);

        assert_eq!(serde_json::to_value(&diff).unwrap(), json!({"core": {"tid": 99999}, "bag": {}}));
        assert_eq!(diff.change_count(), 1);
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_panel_order_preserved() {
        let bag = Fixed("bag", Map::new());
        let core = Fixed("core", Map::new());
        let diff = build_diff(&[&bag, &core]);
        assert_eq!(diff.namespaces().collect::<Vec<_>>(), vec!["bag", "core"]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_is_a_snapshot() {
        let mut core = Fixed("core", obj(json!({"name": "Gary"})));
        let diff = build_diff(&[&core]);
        core.clear();
        assert_eq!(diff.namespace("core").unwrap().len(), 1);
    }

    #[test]
    fn test_modify_request_shape() {
        let core = Fixed("core", obj(json!({"gender": 1})));
        let bag = Fixed("bag", obj(json!({"bag_4": 10})));
        let save_ref = SaveRef::parse("8d1c6a52-3f0e-4c8e-9a0b-51c2f3e4d5a6").unwrap();
        let req = ModifyRequest {
            changes: build_diff(&[&core, &bag]),
            save_data_ref: save_ref,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "changes": {"core": {"gender": 1}, "bag": {"bag_4": 10}},
                "save_data_ref": "8d1c6a52-3f0e-4c8e-9a0b-51c2f3e4d5a6"
            })
        );
    }
}
