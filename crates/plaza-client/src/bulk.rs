//! Bulk quantity reconciliation.
//!
//! The bag panel has a "set all visible" control: a quantity box plus a
//! checkbox that reads as "every visible row holds this quantity". Writing
//! the bulk quantity goes through the same tracker as a hand edit, so rows
//! whose baseline already equals the bulk value don't become changes.
//!
//! ```text
//!            bulk_input / apply_to_visible (valid)
//!   ┌────────────┐ ───────────────────────────▶ ┌────────────┐
//!   │ indicator  │                              │ indicator  │
//!   │   off      │ ◀─────────────────────────── │    on      │
//!   └────────────┘  hand edit breaks uniformity └────────────┘
//!                   / filter change / panel cleared / new baseline
//!                   / toggle off
//! ```
//!
//! The reconciler is a registered [`EditObserver`] of the bag panel. It is
//! told about hand edits only after the edit has been recorded, and reads the
//! panel's display values (pending or baseline) to decide whether the
//! indicator still holds.

use std::sync::Arc;

use parking_lot::Mutex;
use plaza_types::quantity_in_range;
use tracing::{debug, trace};

use crate::bag_editor::{BagEditor, BagEvent, EditObserver};

/// Indicator state of the bulk control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkState {
    /// Last valid bulk quantity, `None` if the box holds nothing usable.
    pub target: Option<u32>,
    /// "All visible rows match `target`".
    pub all_match: bool,
}

/// Result of a bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The value was written to this many visible rows (possibly zero).
    Applied { rows: usize },
    /// The value was out of range or not a number; nothing was written.
    Rejected,
    /// Indicator toggled off; rows untouched.
    Cleared,
}

#[derive(Debug, Default)]
pub struct BulkReconciler {
    state: Mutex<BulkState>,
}

impl BulkReconciler {
    /// Create a reconciler and register it with `editor`.
    pub fn attach(editor: &mut BagEditor) -> Arc<Self> {
        let this = Arc::new(Self::default());
        editor.subscribe(this.clone());
        this
    }

    pub fn state(&self) -> BulkState {
        *self.state.lock()
    }

    pub fn all_match(&self) -> bool {
        self.state.lock().all_match
    }

    /// Write `value` into every visible row and raise the indicator.
    ///
    /// Out-of-range values are rejected without touching any row.
    pub fn apply_to_visible(&self, editor: &mut BagEditor, value: i64) -> BulkOutcome {
        if !quantity_in_range(value) {
            debug!("Bulk quantity {} out of range, ignoring", value);
            return BulkOutcome::Rejected;
        }
        let value = value as u32;
        let rows = editor.write_visible(value);
        *self.state.lock() = BulkState {
            target: Some(value),
            all_match: true,
        };
        debug!("Bulk quantity {} written to {} visible rows", value, rows);
        BulkOutcome::Applied { rows }
    }

    /// Handle raw text typed into the bulk quantity box.
    ///
    /// A valid quantity is applied immediately. Anything else forgets the
    /// target but leaves the rows and the indicator as they are.
    pub fn bulk_input(&self, editor: &mut BagEditor, raw: &str) -> BulkOutcome {
        match raw.trim().parse::<i64>() {
            Ok(value) if quantity_in_range(value) => self.apply_to_visible(editor, value),
            _ => {
                self.state.lock().target = None;
                BulkOutcome::Rejected
            }
        }
    }

    /// Handle the indicator checkbox.
    ///
    /// Turning it on re-applies the current target to the visible rows; with
    /// no usable target it stays off. Turning it off changes no rows.
    pub fn set_indicator(&self, editor: &mut BagEditor, checked: bool) -> BulkOutcome {
        if !checked {
            self.state.lock().all_match = false;
            return BulkOutcome::Cleared;
        }
        let target = self.state.lock().target;
        match target {
            Some(value) => self.apply_to_visible(editor, value as i64),
            None => BulkOutcome::Rejected,
        }
    }

    /// True iff every visible row displays `target`. Vacuously true when no
    /// row is visible.
    pub fn is_all_visible_matching(editor: &BagEditor, target: u32) -> bool {
        editor
            .visible()
            .into_iter()
            .all(|id| editor.display_quantity(id) == Some(target))
    }

    fn recheck(&self, editor: &BagEditor) {
        let mut state = self.state.lock();
        if !state.all_match {
            return;
        }
        let still = state
            .target
            .is_some_and(|t| Self::is_all_visible_matching(editor, t));
        if !still {
            trace!("Visible rows no longer match bulk target {:?}", state.target);
            state.all_match = false;
        }
    }
}

impl EditObserver for BulkReconciler {
    fn notify(&self, editor: &BagEditor, event: BagEvent) {
        match event {
            BagEvent::QuantityEdited(_) | BagEvent::FilterChanged | BagEvent::Cleared => {
                self.recheck(editor)
            }
            BagEvent::BaselineReplaced => *self.state.lock() = BulkState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag_editor::tests::fixture;
    use plaza_types::ItemId;

    fn setup() -> (BagEditor, Arc<BulkReconciler>) {
        let (base, cat) = fixture();
        let mut ed = BagEditor::new(base, cat);
        let bulk = BulkReconciler::attach(&mut ed);
        (ed, bulk)
    }

    #[test]
    fn test_hidden_row_scenario() {
        let (mut ed, bulk) = setup();
        // "n" hides C ("Calcium")
        ed.set_filter("n");
        assert_eq!(ed.visible(), vec![ItemId(1), ItemId(2)]);

        assert_eq!(bulk.apply_to_visible(&mut ed, 5), BulkOutcome::Applied { rows: 2 });
        let changes: Vec<_> = ed.changes().into_iter().collect();
        assert_eq!(changes, vec![(ItemId(1), 5), (ItemId(2), 5)]);
        assert!(bulk.all_match());
        assert_eq!(ed.display_quantity(ItemId(3)), Some(3));

        // Hand-edit A back to its baseline
        ed.set_quantity(ItemId(1), 1);
        let changes: Vec<_> = ed.changes().into_iter().collect();
        assert_eq!(changes, vec![(ItemId(2), 5)]);
        assert!(!bulk.all_match());
    }

    #[test]
    fn test_out_of_range_bulk_changes_nothing() {
        let (mut ed, bulk) = setup();
        ed.set_quantity(ItemId(2), 8);
        let before = ed.changes();

        assert_eq!(bulk.apply_to_visible(&mut ed, -1), BulkOutcome::Rejected);
        assert_eq!(bulk.apply_to_visible(&mut ed, 1000), BulkOutcome::Rejected);
        assert_eq!(bulk.bulk_input(&mut ed, "-4"), BulkOutcome::Rejected);
        assert_eq!(ed.changes(), before);
        assert!(!bulk.all_match());
    }

    #[test]
    fn test_bulk_to_baseline_value_is_minimal() {
        let (mut ed, bulk) = setup();
        bulk.apply_to_visible(&mut ed, 2);
        let changes: Vec<_> = ed.changes().into_iter().collect();
        assert_eq!(changes, vec![(ItemId(1), 2), (ItemId(3), 2)]);
    }

    #[test]
    fn test_empty_target() {
        let (mut ed, bulk) = setup();
        ed.set_filter("zzz");
        assert!(ed.visible().is_empty());
        assert!(BulkReconciler::is_all_visible_matching(&ed, 42));
        assert_eq!(bulk.apply_to_visible(&mut ed, 42), BulkOutcome::Applied { rows: 0 });
        assert!(ed.changes().is_empty());
    }

    #[test]
    fn test_hand_edit_keeping_uniformity_keeps_indicator() {
        let (mut ed, bulk) = setup();
        bulk.bulk_input(&mut ed, "7");
        assert!(bulk.all_match());
        ed.set_quantity(ItemId(2), 7);
        assert!(bulk.all_match());
        ed.input_quantity(ItemId(2), "6");
        assert!(!bulk.all_match());
    }

    #[test]
    fn test_filter_change_rechecks() {
        let (mut ed, bulk) = setup();
        ed.set_filter("n");
        bulk.apply_to_visible(&mut ed, 4);
        assert!(bulk.all_match());
        // Calcium (3) becomes visible and still shows 3
        ed.set_filter("");
        assert!(!bulk.all_match());
        // The hidden-row edits survived
        assert_eq!(ed.changes().len(), 2);
    }

    #[test]
    fn test_indicator_toggle() {
        let (mut ed, bulk) = setup();
        assert_eq!(bulk.set_indicator(&mut ed, true), BulkOutcome::Rejected);
        assert!(!bulk.all_match());

        bulk.bulk_input(&mut ed, "9");
        assert_eq!(bulk.set_indicator(&mut ed, false), BulkOutcome::Cleared);
        assert!(!bulk.all_match());
        assert_eq!(ed.changes().len(), 3);

        ed.set_quantity(ItemId(1), 1);
        assert_eq!(bulk.set_indicator(&mut ed, true), BulkOutcome::Applied { rows: 3 });
        assert!(bulk.all_match());
        assert_eq!(ed.display_quantity(ItemId(1)), Some(9));
    }

    #[test]
    fn test_garbage_input_forgets_target() {
        let (mut ed, bulk) = setup();
        bulk.bulk_input(&mut ed, "3");
        bulk.bulk_input(&mut ed, "");
        assert_eq!(bulk.state().target, None);
        assert!(bulk.all_match());
        ed.set_quantity(ItemId(1), 3);
        assert!(!bulk.all_match());
    }

    #[test]
    fn test_clearing_the_panel_rechecks() {
        use crate::panel::ChangePanel;

        let (mut ed, bulk) = setup();
        bulk.bulk_input(&mut ed, "5");
        assert!(bulk.all_match());
        ed.clear();
        assert!(!bulk.all_match());
        assert_eq!(bulk.state().target, Some(5));

        // Rows that already hold the target keep the indicator up.
        bulk.bulk_input(&mut ed, "2");
        ed.set_filter("burn");
        bulk.apply_to_visible(&mut ed, 2);
        ed.clear();
        assert!(bulk.all_match());
    }
}
