// User-triggered backend mutations: start capture, reset statistics.

use crate::client::{Backend, ClientError};
use crate::models::{ResetResponse, StartResponse};
use crate::poller::Refresh;
use crate::view::UserPrompt;
use std::sync::Arc;

pub const RESET_CONFIRM_PROMPT: &str = "Are you sure you want to reset all statistics and logs?";
pub const RESET_NOT_FOUND_MESSAGE: &str = "Reset endpoint not found. The server is probably running an old version; please restart the server and try again.";
const RESET_DEFAULT_SUCCESS: &str = "All logs and blocked IPs cleared successfully";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// 404 from a command endpoint: the server predates it.
    #[error("endpoint not found ({0})")]
    EndpointNotFound(ClientError),
    /// Backend answered but did not report success.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for CommandError {
    fn from(e: ClientError) -> Self {
        if e.is_not_found() {
            CommandError::EndpointNotFound(e)
        } else {
            CommandError::Client(e)
        }
    }
}

impl CommandError {
    /// Text shown to the user for a failed reset.
    pub fn reset_alert(&self) -> String {
        match self {
            CommandError::EndpointNotFound(_) => RESET_NOT_FOUND_MESSAGE.to_string(),
            CommandError::Rejected(message) => format!("Reset failed: {}", message),
            CommandError::Client(e) => {
                format!("Reset failed: {}", e.backend_message().unwrap_or(&e.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// User said no; nothing was sent.
    Declined,
    Reset(ResetResponse),
}

pub struct CommandDispatcher<B, R> {
    backend: Arc<B>,
    refresher: R,
}

impl<B: Backend, R: Refresh> CommandDispatcher<B, R> {
    pub fn new(backend: Arc<B>, refresher: R) -> Self {
        Self { backend, refresher }
    }

    /// Ask the backend to start sniffing. The reply is only logged; failures are alerted.
    pub async fn start_capture(
        &self,
        prompt: &impl UserPrompt,
    ) -> Result<StartResponse, CommandError> {
        match self.backend.start_sniffer().await {
            Ok(resp) => {
                tracing::info!(
                    status = %resp.status,
                    already_running = resp.already_running(),
                    operation = "start_capture",
                    "sniffer start command sent"
                );
                Ok(resp)
            }
            Err(e) => {
                let err = CommandError::from(e);
                tracing::warn!(error = %err, operation = "start_capture", "sniffer start failed");
                prompt.alert(&format!("Failed to start sniffer: {}", err));
                Err(err)
            }
        }
    }

    /// Confirm, reset, then refresh once so the cleared state shows before the next tick.
    pub async fn reset_statistics(
        &self,
        prompt: &impl UserPrompt,
    ) -> Result<ResetOutcome, CommandError> {
        if !prompt.confirm(RESET_CONFIRM_PROMPT).await {
            tracing::debug!(operation = "reset_statistics", "reset declined by user");
            return Ok(ResetOutcome::Declined);
        }

        let result = match self.backend.reset_stats().await {
            Ok(resp) if resp.is_success() => Ok(resp),
            Ok(resp) => Err(CommandError::Rejected(
                resp.message.unwrap_or_else(|| format!("status \"{}\"", resp.status)),
            )),
            Err(e) => Err(CommandError::from(e)),
        };

        match result {
            Ok(resp) => {
                tracing::info!(operation = "reset_statistics", "statistics reset");
                prompt.alert(resp.message.as_deref().unwrap_or(RESET_DEFAULT_SUCCESS));
                self.refresher.refresh().await;
                Ok(ResetOutcome::Reset(resp))
            }
            Err(err) => {
                tracing::warn!(error = %err, operation = "reset_statistics", "reset failed");
                prompt.alert(&err.reset_alert());
                Err(err)
            }
        }
    }
}
