//! Read-only item catalog.
//!
//! The item database maps bag indices to display names and the category the
//! game expects for them. It is injected into whatever needs it (the bag
//! editor, the CLI) rather than read from a global, so tests can hand in a
//! three-item catalog.

use std::collections::BTreeMap;
use std::path::Path;

use plaza_types::ItemId;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("item database JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One item database record. Unknown fields in the source JSON are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ItemInfo {
    pub english_ui_name: String,
    #[serde(default)]
    pub expected_category: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemInfo>,
}

impl ItemCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_items(items: impl IntoIterator<Item = (ItemId, ItemInfo)>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemInfo> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Row label: `"<name> (#<id>)"`, or `None` for unknown items.
    pub fn label(&self, id: ItemId) -> Option<String> {
        self.get(id)
            .map(|info| format!("{} (#{})", info.english_ui_name, id.0))
    }

    /// Case-insensitive substring match of `needle` against the row label.
    /// An empty needle matches every known item.
    pub fn matches(&self, id: ItemId, needle: &str) -> bool {
        match self.label(id) {
            Some(label) => label.to_lowercase().contains(&needle.to_lowercase()),
            None => false,
        }
    }
}
