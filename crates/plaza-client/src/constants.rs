//! Client constants.
//!
//! Endpoint paths, wire namespaces and the defaults that `ClientConfig`
//! falls back to.

use std::time::Duration;

pub use plaza_types::QUANTITY_MAX;

/// Default editor server for local development.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Parse endpoint path (multipart upload, form field [`UPLOAD_FIELD`]).
pub const PARSE_PATH: &str = "/parse";

/// Modify endpoint path (JSON diff).
pub const MODIFY_PATH: &str = "/modify";

/// Multipart form field the parse endpoint reads the save from.
pub const UPLOAD_FIELD: &str = "file";

/// File name the server suggests for the modified save.
pub const DEFAULT_OUTPUT_NAME: &str = "main";

/// Upper bound on a single request. The core imposes no timeout of its own;
/// this only keeps a wedged server from hanging the CLI forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Namespace of the core attribute panel in a diff.
pub const CORE_NAMESPACE: &str = "core";

/// Namespace of the bag panel in a diff.
pub const BAG_NAMESPACE: &str = "bag";
