//! Client configuration.
//!
//! Loaded from `~/.config/plaza-edit/config.ron` (or an explicit path). A
//! missing file means defaults; a file that exists but doesn't parse is an
//! error, so a typo never silently points the client at the wrong server.
//!
//! Example config.ron:
//! ```ron
//! (
//!     server_url: "http://localhost:8000",
//!     request_timeout_secs: 30,
//!     item_db: Some("item_db.json"),
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_URL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    /// Item database JSON. Without one the bag panel has no rows.
    pub item_db: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            item_db: None,
        }
    }
}

impl ClientConfig {
    /// `~/.config/plaza-edit/config.ron`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("plaza-edit").join("config.ron"))
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if given, otherwise from [`default_path`](Self::default_path).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, r#"(server_url: "http://10.0.0.2:8000")"#).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.2:8000");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT.as_secs());
        assert_eq!(config.item_db, None);
    }

    #[test]
    fn test_full_file() {
        let config = ClientConfig::from_ron(
            r#"(server_url: "http://x", request_timeout_secs: 5, item_db: Some("items.json"))"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.item_db, Some(PathBuf::from("items.json")));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(server_url: ").unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(ConfigError::Ron(_))));
    }
}
