//! Parse and modify endpoint bodies.
//!
//! `/parse` answers `{success: true, ref_id, core, bag, dex}` on success. On
//! failure it answers `{success: false, log}`, but an unreadable upload comes
//! back as a serialized HTTP exception (`{status_code, detail}`) with a 200
//! status, so anything without `success: true` is treated as a rejection and
//! the most specific message available is kept.
//!
//! `/modify` answers `{success, download_url?, error?}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bag::BagData;
use crate::baseline::BaselineDocument;
use crate::dex::DexData;
use crate::ids::SaveRef;
use crate::trainer::CoreData;

/// Fallback reason when a rejected parse carries no message.
pub const DEFAULT_PARSE_FAILURE: &str = "Repair failed";

/// Fallback reason when a failed modify carries no message.
pub const DEFAULT_MODIFY_FAILURE: &str = "Unknown error occurred";

/// A response body that isn't valid JSON or doesn't have the expected shape.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("response is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("malformed {endpoint} response: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

#[derive(Deserialize)]
struct ParsePayload {
    ref_id: SaveRef,
    core: CoreData,
    bag: BagData,
    #[serde(default)]
    dex: DexData,
}

/// Decoded `/parse` response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The server accepted the save; this is the new baseline.
    Parsed(BaselineDocument),
    /// The server understood the request but refused the file.
    Rejected { reason: String },
}

impl ParseOutcome {
    pub fn from_slice(body: &[u8]) -> Result<Self, ParseError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        Self::from_json(value)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, ParseError> {
        let Some(obj) = value.as_object() else {
            return Err(ParseError::Malformed {
                endpoint: "parse",
                reason: "body is not an object".into(),
            });
        };

        let success = obj.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
        if !success {
            let reason = ["log", "detail", "error"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_PARSE_FAILURE)
                .to_string();
            return Ok(ParseOutcome::Rejected { reason });
        }

        let payload: ParsePayload =
            serde_json::from_value(value).map_err(|e| ParseError::Malformed {
                endpoint: "parse",
                reason: e.to_string(),
            })?;
        Ok(ParseOutcome::Parsed(BaselineDocument::new(
            payload.ref_id,
            payload.core,
            payload.bag,
            payload.dex,
        )))
    }
}

/// Decoded `/modify` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModifyResponse {
    pub fn applied(download_url: impl Into<String>) -> Self {
        Self {
            success: true,
            download_url: Some(download_url.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            download_url: None,
            error: Some(error.into()),
        }
    }

    /// `Ok(download_url)` on success, `Err(reason)` on an application-level
    /// failure.
    pub fn into_result(self) -> Result<Option<String>, String> {
        if self.success {
            Ok(self.download_url)
        } else {
            Err(self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_MODIFY_FAILURE.to_string()))
        }
    }
}
