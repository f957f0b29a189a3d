// Command endpoint responses (GET /api/start_sniffer, GET /api/reset_stats)

use serde::{Deserialize, Serialize};

/// Body of /api/start_sniffer: "started" or "already_running".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub status: String,
}

impl StartResponse {
    pub fn already_running(&self) -> bool {
        self.status == "already_running"
    }
}

/// Body of /api/reset_stats. Only `status == "success"` counts as success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResetResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
