// Stats snapshot and log entry models (GET /api/stats)

use serde::{Deserialize, Deserializer, Serialize};

use super::AttackTypes;

/// Sniffer state reported by the backend; serializes as "Active" / "Inactive".
/// Anything other than "Active" is shown as offline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotStatus {
    Active,
    #[default]
    #[serde(other)]
    Inactive,
}

impl SnapshotStatus {
    pub fn is_active(self) -> bool {
        self == SnapshotStatus::Active
    }
}

/// One backend response: aggregate state at poll time. Fetched, rendered and dropped each cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub status: SnapshotStatus,
    pub total_attacks: u64,
    #[serde(default)]
    pub attack_types: AttackTypes,
    /// Most recent first; the window size is decided by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub src_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dst_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_: String,
    #[serde(default)]
    pub action: Option<String>,
}

impl LogEntry {
    /// True when `action` contains "block" in any case ("Blocked", "BLOCK-DROP", ...).
    pub fn is_blocked(&self) -> bool {
        self.action
            .as_deref()
            .is_some_and(|a| a.to_ascii_lowercase().contains("block"))
    }
}

/// Treat JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
