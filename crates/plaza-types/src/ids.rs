//! Save reference identifier.
//!
//! The parse endpoint keeps the decrypted save in memory and hands back an
//! opaque UUID (`ref_id`). Every modify request names the save it applies to
//! by that UUID. Displays as standard UUID text; `short()` is for logs only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-issued handle for a parsed save (UUIDv4 on the wire).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveRef(uuid::Uuid);

impl SaveRef {
    /// Fresh random reference. Only useful for fakes and tests; real
    /// references always come from the server.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse from standard UUID text (hyphenated or simple).
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }

    /// First 8 hex characters, for human display only (not lookup).
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// A nil reference, for sentinel values only.
    pub fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for SaveRef {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for SaveRef {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl fmt::Display for SaveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hyphenated form, which is what the server's file map is keyed by
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SaveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SaveRef({})", self.short())
    }
}

// ============================================================================
// Tests
// ============================================================================
