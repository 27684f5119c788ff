//! Pokédex entries.
//!
//! Carried in the baseline so a front end can show them, but no panel edits
//! them and they never appear in a diff.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-species dex flags, as reported by the parse endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexEntry {
    pub capture_flag: u32,
    pub battle_flag: u32,
    pub shiny_flag: u32,
    pub mega_flag: u32,
}

impl DexEntry {
    pub fn is_captured(&self) -> bool {
        self.capture_flag != 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexData {
    /// Species index → flags.
    pub entries: BTreeMap<u16, DexEntry>,
}

impl DexData {
    /// Number of species with the capture flag set.
    pub fn captured_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_captured()).count()
    }
}
