//! HTTP implementation of [`SaveService`].

use std::time::Duration;

use async_trait::async_trait;
use plaza_types::{ModifyResponse, ParseOutcome};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::config::ClientConfig;
use crate::constants::{MODIFY_PATH, PARSE_PATH, UPLOAD_FIELD};
use crate::diff::ModifyRequest;
use crate::service::{SaveService, ServiceError};

/// Talks to the editor server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSaveService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSaveService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        Self::new(config.server_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = request.send().await.map_err(|e| transport(url, e))?;
        let status = response.status();
        debug!("{} -> {}", url, status);
        if !status.is_success() {
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn transport(url: &str, e: reqwest::Error) -> ServiceError {
    let reason = if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };
    ServiceError::Transport {
        url: url.to_string(),
        reason,
    }
}

#[async_trait]
impl SaveService for HttpSaveService {
    async fn parse(&self, file_name: &str, bytes: Vec<u8>) -> Result<ParseOutcome, ServiceError> {
        let url = self.url(PARSE_PATH);
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.send(&url, self.client.post(&url).multipart(form)).await?;
        let body = response.bytes().await.map_err(|e| transport(&url, e))?;
        Ok(ParseOutcome::from_slice(&body)?)
    }

    async fn modify(&self, request: &ModifyRequest) -> Result<ModifyResponse, ServiceError> {
        let url = self.url(MODIFY_PATH);
        let response = self.send(&url, self.client.post(&url).json(request)).await?;
        response
            .json::<ModifyResponse>()
            .await
            .map_err(|e| ServiceError::Decode {
                url: url.clone(),
                reason: e.to_string(),
            })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.url(url);
        let response = self.send(&url, self.client.get(&url)).await?;
        let body = response.bytes().await.map_err(|e| transport(&url, e))?;
        Ok(body.to_vec())
    }
}
