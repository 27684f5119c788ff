//! Bag (inventory) entries.
//!
//! The server only reports entries for items it considers valid, keyed by
//! the item's index in the save's bag block. On the wire the keys are decimal
//! strings (`{"entries": {"17": {...}}}`); in a diff they become
//! `bag_<id>` so core and bag keys can never collide.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of bag keys in the modify request's `bag` object.
pub const BAG_FIELD_PREFIX: &str = "bag_";

/// Largest quantity the editor accepts (and the server clamps to).
pub const QUANTITY_MAX: u32 = 999;

/// Bag item identifier (index into the save's bag block).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u16);

impl ItemId {
    /// Key used in the modify request's `bag` object.
    pub fn wire_key(self) -> String {
        format!("{BAG_FIELD_PREFIX}{}", self.0)
    }

    /// Inverse of [`wire_key`](Self::wire_key). Accepts a bare number too.
    pub fn from_wire_key(key: &str) -> Option<Self> {
        key.strip_prefix(BAG_FIELD_PREFIX)
            .unwrap_or(key)
            .parse()
            .ok()
            .map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

/// Whether `quantity` is inside the editable range.
pub fn quantity_in_range(quantity: i64) -> bool {
    (0..=QUANTITY_MAX as i64).contains(&quantity)
}

/// One bag slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagEntry {
    pub category: u32,
    pub quantity: u32,
}

/// All bag slots the server reported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagData {
    pub entries: BTreeMap<ItemId, BagEntry>,
}

impl BagData {
    pub fn get(&self, id: ItemId) -> Option<&BagEntry> {
        self.entries.get(&id)
    }

    pub fn quantity(&self, id: ItemId) -> Option<u32> {
        self.entries.get(&id).map(|e| e.quantity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
