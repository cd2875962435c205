//! HTTP client for the controller bridge.
//!
//! Three endpoints: status, toggle and rename.  Response bodies are decoded
//! regardless of the HTTP status code because the bridge reports rejections
//! as JSON (`{"ok": false, "error": ...}`) alongside a 4xx status.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::protocol::{
    Device, RelayState, RenameRequest, RenameResponse, StatusSnapshot, ToggleRequest,
    ToggleResponse, RENAME_PATH, STATUS_PATH, TOGGLE_PATH,
};

/// Broad failure class.  The dashboard collapses all three into the same
/// outcome; the distinction only shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreachable host, timeout, connection reset.
    Transport,
    /// Body was not JSON or did not match the expected shape.
    Malformed,
    /// The bridge answered `ok: false`.
    Rejected,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("controller not reachable at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url} (HTTP {status}): {source}")]
    Malformed {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("controller rejected request: {0}")]
    Rejected(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport { .. } | ClientError::InvalidUrl(_) => ErrorKind::Transport,
            ClientError::Malformed { .. } => ErrorKind::Malformed,
            ClientError::Rejected(_) => ErrorKind::Rejected,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Cheap to clone; every spawned poll or command gets its own copy.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport {
                url: base_url.clone(),
                source: e,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/status`.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let url = self.url(STATUS_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        decode(&url, response).await
    }

    /// `POST /api/toggle`.  Returns the relay state the controller reports
    /// after the command, which is authoritative over `desired`.
    pub async fn toggle(&self, device: Device, desired: bool) -> Result<RelayState> {
        let url = self.url(TOGGLE_PATH);
        let body = ToggleRequest {
            device,
            state: desired,
        };
        let reply: ToggleResponse = self.post_json(&url, &body).await?;
        if !reply.ok {
            return Err(ClientError::Rejected(
                reply
                    .error
                    .unwrap_or_else(|| format!("toggle {} refused", device)),
            ));
        }
        reply
            .relay
            .ok_or_else(|| ClientError::Rejected("reply carried no relay state".to_string()))
    }

    /// `POST /api/rename`.
    pub async fn rename(&self, request: &RenameRequest) -> Result<()> {
        let url = self.url(RENAME_PATH);
        let reply: RenameResponse = self.post_json(&url, request).await?;
        if reply.ok {
            Ok(())
        } else {
            Err(ClientError::Rejected("rename refused".to_string()))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(url, e))?;
        decode(url, response).await
    }
}

fn transport(url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| transport(url, e))?;
    debug!(url, status = status.as_u16(), len = bytes.len(), "response");
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Malformed {
        url: url.to_string(),
        status: status.as_u16(),
        source,
    })
}
