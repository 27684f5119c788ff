//! Baseline document and wire types for the PLZA save editor.
//!
//! This crate is the leaf of the workspace: typed field identifiers, the
//! immutable [`BaselineDocument`] the server hands back after parsing a save,
//! and the request/response shapes of the parse and modify endpoints. It has
//! **no internal plaza dependencies**.
//!
//! # Overview
//!
//! ```text
//! BaselineDocument (SaveRef) ← server-side parse of one uploaded save
//!     └── CoreData          name / gender / tid / language  (CoreField)
//!     └── BagData           ItemId → BagEntry { category, quantity }
//!     └── DexData           ItemId-like species id → DexEntry (read-only)
//! ```
//!
//! # Key Types
//!
//! |----------------------|------------------------------------------------|
//! | Type                 | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | [`SaveRef`]          | Server handle for a parsed save                |
//! | [`BaselineDocument`] | Read-only snapshot every edit is compared with |
//! | [`CoreField`]        | Enumerated core attribute identifier           |
//! | [`CoreValue`]        | Typed value of one core attribute              |
//! | [`ItemId`]           | Bag entry identifier                           |
//! | [`ParseOutcome`]     | Decoded `/parse` response                      |
//! | [`ModifyResponse`]   | Decoded `/modify` response                     |
//! |----------------------|------------------------------------------------|

pub mod bag;
pub mod baseline;
pub mod trainer;
pub mod dex;
pub mod ids;
pub mod wire;

// Re-export primary types at crate root for convenience.
pub use bag::{quantity_in_range, BagData, BagEntry, ItemId, BAG_FIELD_PREFIX, QUANTITY_MAX};
pub use baseline::BaselineDocument;
pub use trainer::{CoreData, CoreField, CoreValue, Gender, Language, UnknownOrdinal};
pub use dex::{DexData, DexEntry};
pub use ids::SaveRef;
pub use wire::{ModifyResponse, ParseError, ParseOutcome};
