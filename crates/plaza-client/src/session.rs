//! One loaded save and its editing panels.
//!
//! An [`EditSession`] owns the panels built over a single baseline, with the
//! bulk reconciler already registered on the bag panel. Loading a new save
//! goes through [`EditSession::replace_baseline`], which resets every panel
//! together so no pending change can outlive the document it referred to.

use std::sync::Arc;

use plaza_types::{BaselineDocument, SaveRef};
use tracing::info;

use crate::bag_editor::BagEditor;
use crate::bulk::{BulkOutcome, BulkReconciler};
use crate::catalog::ItemCatalog;
use crate::core_editor::CoreEditor;
use crate::diff::{build_diff, AggregatedDiff};
use crate::panel::ChangePanel;

#[derive(Debug)]
pub struct EditSession {
    baseline: Arc<BaselineDocument>,
    core: CoreEditor,
    bag: BagEditor,
    bulk: Arc<BulkReconciler>,
}

impl EditSession {
    pub fn new(baseline: Arc<BaselineDocument>, catalog: Arc<ItemCatalog>) -> Self {
        let core = CoreEditor::new(baseline.clone());
        let mut bag = BagEditor::new(baseline.clone(), catalog);
        let bulk = BulkReconciler::attach(&mut bag);
        Self {
            baseline,
            core,
            bag,
            bulk,
        }
    }

    /// Swap in a freshly parsed document. Every pending change is dropped and
    /// the bulk indicator resets.
    pub fn replace_baseline(&mut self, baseline: Arc<BaselineDocument>) {
        info!(
            old = %self.baseline.ref_id().short(),
            new = %baseline.ref_id().short(),
            "Replacing baseline"
        );
        self.core.rebase(baseline.clone());
        self.bag.rebase(baseline.clone());
        self.baseline = baseline;
    }

    pub fn ref_id(&self) -> SaveRef {
        self.baseline.ref_id()
    }

    pub fn baseline(&self) -> &Arc<BaselineDocument> {
        &self.baseline
    }

    pub fn core(&self) -> &CoreEditor {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreEditor {
        &mut self.core
    }

    pub fn bag(&self) -> &BagEditor {
        &self.bag
    }

    pub fn bag_mut(&mut self) -> &mut BagEditor {
        &mut self.bag
    }

    pub fn bulk(&self) -> &BulkReconciler {
        &self.bulk
    }

    /// Set every visible bag row to `value`.
    pub fn bulk_apply(&mut self, value: i64) -> BulkOutcome {
        self.bulk.apply_to_visible(&mut self.bag, value)
    }

    /// Raw text typed into the bulk quantity box.
    pub fn bulk_input(&mut self, raw: &str) -> BulkOutcome {
        self.bulk.bulk_input(&mut self.bag, raw)
    }

    pub fn set_bulk_indicator(&mut self, checked: bool) -> BulkOutcome {
        self.bulk.set_indicator(&mut self.bag, checked)
    }

    pub fn has_changes(&self) -> bool {
        self.panels().iter().any(|p| p.has_changes())
    }

    /// Panels in diff order.
    pub fn panels(&self) -> [&dyn ChangePanel; 2] {
        [&self.core, &self.bag]
    }

    pub fn panels_mut(&mut self) -> [&mut dyn ChangePanel; 2] {
        [&mut self.core, &mut self.bag]
    }

    pub fn diff(&self) -> AggregatedDiff {
        build_diff(&self.panels())
    }
}
