//! PLZA save editor client library
//!
//! Tracks edits to a parsed save against its immutable baseline and submits
//! only the net changes to the editor server for reconciliation.
//!
//! ```text
//!   SaveService::parse ──▶ BaselineDocument ──▶ EditSession
//!                                               ├── CoreEditor ─┐
//!                                               └── BagEditor ──┤ FieldChangeTracker
//!                                                    └ BulkReconciler (observer)
//!   SyncController::submit ◀── build_diff(panels) ◀─┘
//!        └──▶ SaveService::modify ──▶ Applied (panels cleared) | Failed (intact)
//! ```

pub mod bag_editor;
pub mod bulk;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod core_editor;
pub mod diff;
pub mod http;
pub mod panel;
pub mod service;
pub mod session;
pub mod sync;
pub mod tracker;

pub use bag_editor::{BagEditor, BagEvent, EditObserver};
pub use bulk::{BulkOutcome, BulkReconciler, BulkState};
pub use catalog::{CatalogError, ItemCatalog, ItemInfo};
pub use config::{ClientConfig, ConfigError};
pub use core_editor::CoreEditor;
pub use diff::{build_diff, AggregatedDiff, ModifyRequest};
pub use http::HttpSaveService;
pub use panel::ChangePanel;
pub use service::{ingest, IngestError, SaveService, ServiceError};
pub use session::EditSession;
pub use sync::{StatusReporter, SubmitError, SubmitOutcome, SyncController, SyncState, TracingReporter};
pub use tracker::{FieldChangeTracker, RecordOutcome, TrackedField};
