//! Bag quantity panel.
//!
//! One row per baseline bag entry that the [`ItemCatalog`] knows about. A
//! text filter decides which rows are visible; visibility never touches
//! tracked state, so edits to rows that get filtered out stay pending.
//!
//! Observers (the bulk reconciler, a UI) register through
//! [`BagEditor::subscribe`]. Events are queued while an edit is applied and
//! dispatched only once the edit's own state change is complete, so an
//! observer never sees a half-updated panel.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use plaza_types::{quantity_in_range, BaselineDocument, ItemId};
use tracing::{debug, trace};

use crate::catalog::ItemCatalog;
use crate::constants::BAG_NAMESPACE;
use crate::panel::ChangePanel;
use crate::tracker::{FieldChangeTracker, RecordOutcome};

/// Something that happened to the bag panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagEvent {
    /// A single row was edited by hand (not by a bulk write).
    QuantityEdited(ItemId),
    /// The filter changed, so the visible set may have changed.
    FilterChanged,
    /// A new baseline was loaded and every pending change was dropped.
    BaselineReplaced,
    /// Every pending change was dropped (after a successful submit).
    Cleared,
}

/// Receives [`BagEvent`]s after the triggering change has been applied.
pub trait EditObserver: Send + Sync {
    fn notify(&self, editor: &BagEditor, event: BagEvent);
}

pub struct BagEditor {
    tracker: FieldChangeTracker<ItemId>,
    catalog: Arc<ItemCatalog>,
    filter: String,
    observers: Vec<Arc<dyn EditObserver>>,
    queued: Vec<BagEvent>,
}

impl fmt::Debug for BagEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BagEditor")
            .field("pending", &self.tracker.len())
            .field("filter", &self.filter)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl BagEditor {
    pub fn new(baseline: Arc<BaselineDocument>, catalog: Arc<ItemCatalog>) -> Self {
        Self {
            tracker: FieldChangeTracker::new(baseline),
            catalog,
            filter: String::new(),
            observers: Vec::new(),
            queued: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Arc<dyn EditObserver>) {
        self.observers.push(observer);
    }

    /// Every editable row, in item order.
    pub fn rows(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.tracker
            .baseline()
            .bag()
            .entries
            .keys()
            .copied()
            .filter(|id| self.catalog.contains(*id))
    }

    pub fn has_row(&self, id: ItemId) -> bool {
        self.tracker.baseline().quantity(id).is_some() && self.catalog.contains(id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_visible(&self, id: ItemId) -> bool {
        self.has_row(id) && self.catalog.matches(id, &self.filter)
    }

    /// The bulk target: rows visible under the current filter.
    pub fn visible(&self) -> Vec<ItemId> {
        self.rows()
            .filter(|id| self.catalog.matches(*id, &self.filter))
            .collect()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        trace!("Bag filter now {:?}", self.filter);
        self.queued.push(BagEvent::FilterChanged);
        self.dispatch();
    }

    /// Quantity the row should display: pending value or baseline.
    pub fn display_quantity(&self, id: ItemId) -> Option<u32> {
        self.tracker.current_value(id)
    }

    /// Handle raw text typed into a row's quantity box.
    pub fn input_quantity(&mut self, id: ItemId, raw: &str) -> RecordOutcome {
        let parsed = raw.trim().parse::<i64>().ok().filter(|q| quantity_in_range(*q));
        match parsed {
            Some(q) => self.set_quantity(id, q as u32),
            None => {
                debug!("Ignoring invalid quantity {:?} for {}", raw, id);
                RecordOutcome::Rejected
            }
        }
    }

    /// Hand-edit one row.
    pub fn set_quantity(&mut self, id: ItemId, quantity: u32) -> RecordOutcome {
        if !self.has_row(id) {
            debug!("Ignoring edit of {}: no such row", id);
            return RecordOutcome::Rejected;
        }
        let outcome = self.tracker.record(id, quantity);
        if outcome != RecordOutcome::Rejected {
            self.queued.push(BagEvent::QuantityEdited(id));
        }
        self.dispatch();
        outcome
    }

    /// Write `quantity` into every visible row without raising per-row
    /// events. Returns the number of rows written.
    pub(crate) fn write_visible(&mut self, quantity: u32) -> usize {
        let targets = self.visible();
        for id in &targets {
            self.tracker.record(*id, quantity);
        }
        targets.len()
    }

    pub fn changes(&self) -> BTreeMap<ItemId, u32> {
        self.tracker.changes()
    }

    pub(crate) fn rebase(&mut self, baseline: Arc<BaselineDocument>) {
        self.tracker.rebase(baseline);
        self.queued.push(BagEvent::BaselineReplaced);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let events = std::mem::take(&mut self.queued);
        if events.is_empty() {
            return;
        }
        let observers = self.observers.clone();
        for event in events {
            for observer in &observers {
                observer.notify(self, event);
            }
        }
    }
}

impl ChangePanel for BagEditor {
    fn namespace(&self) -> &'static str {
        BAG_NAMESPACE
    }

    fn has_changes(&self) -> bool {
        self.tracker.has_changes()
    }

    fn changes_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.tracker.changes_json()
    }

    fn clear(&mut self) {
        self.tracker.clear();
        self.queued.push(BagEvent::Cleared);
        self.dispatch();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use plaza_types::{BagData, BagEntry, CoreData, DexData, Gender, Language, SaveRef};

    use crate::catalog::ItemInfo;

    /// A(1)=1 "Antidote", B(2)=2 "Burn Heal", C(3)=3 "Calcium", plus an entry
    /// (99) the catalog doesn't know.
    pub(crate) fn fixture() -> (Arc<BaselineDocument>, Arc<ItemCatalog>) {
        let mut bag = BagData::default();
        for (id, qty) in [(1, 1), (2, 2), (3, 3), (99, 7)] {
            bag.entries.insert(ItemId(id), BagEntry { category: 0, quantity: qty });
        }
        let baseline = BaselineDocument::new(
            SaveRef::new(),
            CoreData {
                name: "Ash".into(),
                gender: Gender::Male,
                tid: 12345,
                language: Language::English,
            },
            bag,
            DexData::default(),
        );
        let catalog = ItemCatalog::from_items([
            (ItemId(1), ItemInfo { english_ui_name: "Antidote".into(), expected_category: 0 }),
            (ItemId(2), ItemInfo { english_ui_name: "Burn Heal".into(), expected_category: 0 }),
            (ItemId(3), ItemInfo { english_ui_name: "Calcium".into(), expected_category: 0 }),
        ]);
        (Arc::new(baseline), Arc::new(catalog))
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(BagEvent, Option<u32>)>>,
    }

    impl EditObserver for Recorder {
        fn notify(&self, editor: &BagEditor, event: BagEvent) {
            let shown = match event {
                BagEvent::QuantityEdited(id) => editor.display_quantity(id),
                _ => None,
            };
            self.seen.lock().push((event, shown));
        }
    }

    #[test]
    fn test_rows_skip_unknown_items() {
        let (base, cat) = fixture();
        let ed = BagEditor::new(base, cat);
        assert_eq!(ed.rows().collect::<Vec<_>>(), vec![ItemId(1), ItemId(2), ItemId(3)]);
        assert!(!ed.has_row(ItemId(99)));
    }

    #[test]
    fn test_filter_hides_rows_but_keeps_changes() {
        let (base, cat) = fixture();
        let mut ed = BagEditor::new(base, cat);
        ed.set_quantity(ItemId(3), 30);
        ed.set_filter("heal");
        assert_eq!(ed.visible(), vec![ItemId(2)]);
        assert_eq!(ed.changes().get(&ItemId(3)), Some(&30));
        ed.set_filter("");
        assert_eq!(ed.visible().len(), 3);
    }

    #[test]
    fn test_input_validation() {
        let (base, cat) = fixture();
        let mut ed = BagEditor::new(base, cat);
        assert_eq!(ed.input_quantity(ItemId(1), "-1"), RecordOutcome::Rejected);
        assert_eq!(ed.input_quantity(ItemId(1), "1000"), RecordOutcome::Rejected);
        assert_eq!(ed.input_quantity(ItemId(1), "x"), RecordOutcome::Rejected);
        assert_eq!(ed.input_quantity(ItemId(99), "5"), RecordOutcome::Rejected);
        assert_eq!(ed.input_quantity(ItemId(1), " 999 "), RecordOutcome::Pending);
        assert_eq!(ed.changes_json().get("bag_1"), Some(&serde_json::json!(999)));
    }

    #[test]
    fn test_observer_sees_committed_state() {
        let (base, cat) = fixture();
        let mut ed = BagEditor::new(base, cat);
        let rec = Arc::new(Recorder::default());
        ed.subscribe(rec.clone());

        ed.set_quantity(ItemId(2), 40);
        ed.input_quantity(ItemId(2), "nope");
        ed.set_filter("cal");

        let seen = rec.seen.lock().clone();
        assert_eq!(
            seen,
            vec![
                (BagEvent::QuantityEdited(ItemId(2)), Some(40)),
                (BagEvent::FilterChanged, None),
            ]
        );
    }

    #[test]
    fn test_write_visible_is_silent() {
        let (base, cat) = fixture();
        let mut ed = BagEditor::new(base, cat);
        let rec = Arc::new(Recorder::default());
        ed.subscribe(rec.clone());
        ed.set_filter("a");
        rec.seen.lock().clear();

        let n = ed.write_visible(5);
        assert_eq!(n, ed.visible().len());
        assert!(rec.seen.lock().is_empty());
    }
}
