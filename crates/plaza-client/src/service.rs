//! The save service seam.
//!
//! [`SaveService`] is everything the client needs from the editor server:
//! ingest a save, reconcile a diff, fetch the result. [`HttpSaveService`]
//! is the real implementation; tests hand in a fake.
//!
//! [`HttpSaveService`]: crate::http::HttpSaveService

use async_trait::async_trait;
use plaza_types::{BaselineDocument, ModifyResponse, ParseError, ParseOutcome};
use thiserror::Error;
use tracing::{info, warn};

use crate::diff::ModifyRequest;

/// Transport-level failures: the request never produced a usable answer.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Body(#[from] ParseError),
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

#[async_trait]
pub trait SaveService: Send + Sync {
    /// Upload a save file for decoding.
    async fn parse(&self, file_name: &str, bytes: Vec<u8>) -> Result<ParseOutcome, ServiceError>;

    /// Submit an aggregated diff against a previously parsed save.
    async fn modify(&self, request: &ModifyRequest) -> Result<ModifyResponse, ServiceError>;

    /// Fetch the artifact behind a `download_url`.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Why a save could not be turned into a baseline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The server refused the file.
    #[error("save rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Upload `bytes` and return the resulting baseline.
pub async fn ingest(
    service: &dyn SaveService,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<BaselineDocument, IngestError> {
    match service.parse(file_name, bytes).await? {
        ParseOutcome::Parsed(doc) => {
            info!(
                ref_id = %doc.ref_id().short(),
                trainer = %doc.core().name,
                items = doc.bag().len(),
                "Save parsed"
            );
            Ok(doc)
        }
        ParseOutcome::Rejected { reason } => {
            warn!("Server rejected {}: {}", file_name, reason);
            Err(IngestError::Rejected(reason))
        }
    }
}
