//! The contract between editing panels and the sync controller.

use serde_json::{Map, Value};

/// An editing panel whose pending changes can be aggregated and cleared.
///
/// The sync controller talks to panels only through this trait: it asks
/// whether anything is pending, snapshots the pending set into the diff, and
/// clears it after the server confirms the diff was applied.
pub trait ChangePanel: Send {
    /// Key of this panel's object in the aggregated diff.
    fn namespace(&self) -> &'static str;

    fn has_changes(&self) -> bool;

    /// Snapshot of the pending set in wire form. Always a fresh copy.
    fn changes_json(&self) -> Map<String, Value>;

    /// Drop every pending change. Idempotent.
    fn clear(&mut self);
}
