// Backend HTTP API: GET /api/stats, /api/start_sniffer, /api/reset_stats

use crate::models::{ResetResponse, StartResponse, StatsSnapshot};
use crate::version::{NAME, VERSION};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::instrument;

pub const STATS_PATH: &str = "/api/stats";
pub const START_SNIFFER_PATH: &str = "/api/start_sniffer";
pub const RESET_STATS_PATH: &str = "/api/reset_stats";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("GET {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {path} returned HTTP {status}{}", message_suffix(.message))]
    Status {
        path: &'static str,
        status: StatusCode,
        message: Option<String>,
    },
    #[error("malformed {path} body: {source}")]
    Decode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Backend-provided error message, if the error body carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

/// The IDPS backend as seen by the dashboard. Futures are `Send` so cycles can run on spawned tasks.
pub trait Backend: Send + Sync + 'static {
    fn fetch_stats(&self) -> impl Future<Output = Result<StatsSnapshot, ClientError>> + Send;
    fn start_sniffer(&self) -> impl Future<Output = Result<StartResponse, ClientError>> + Send;
    fn reset_stats(&self) -> impl Future<Output = Result<ResetResponse, ClientError>> + Send;
}

/// reqwest-backed client. No request timeout is set; the transport's own limits apply.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", NAME, VERSION))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { path, source })?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { path, source })?;
        if !status.is_success() {
            return Err(ClientError::Status {
                path,
                status,
                message: error_message(&body),
            });
        }
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { path, source })
    }
}

/// Pull `message` out of a JSON error body, e.g. `{"status":"error","message":"..."}`.
fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

impl Backend for HttpBackend {
    #[instrument(skip(self), fields(operation = "fetch_stats"))]
    async fn fetch_stats(&self) -> Result<StatsSnapshot, ClientError> {
        self.get_json(STATS_PATH).await
    }

    #[instrument(skip(self), fields(operation = "start_sniffer"))]
    async fn start_sniffer(&self) -> Result<StartResponse, ClientError> {
        self.get_json(START_SNIFFER_PATH).await
    }

    #[instrument(skip(self), fields(operation = "reset_stats"))]
    async fn reset_stats(&self) -> Result<ResetResponse, ClientError> {
        self.get_json(RESET_STATS_PATH).await
    }
}
