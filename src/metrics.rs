// Derived view metrics the backend snapshot does not carry directly.

use crate::models::LogEntry;
use std::collections::HashSet;

/// Values derived from one snapshot. Nothing carries over between polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedMetrics {
    pub unique_blocked_addresses: HashSet<String>,
}

impl DerivedMetrics {
    pub fn from_logs(logs: &[LogEntry]) -> Self {
        Self {
            unique_blocked_addresses: blocked_addresses(logs),
        }
    }

    /// Displayed "blocked IPs" counter.
    pub fn blocked_count(&self) -> usize {
        self.unique_blocked_addresses.len()
    }
}

/// Source addresses of entries whose action contains "block" (case-insensitive).
/// Only covers the current log window, not all-time blocks.
pub fn blocked_addresses(logs: &[LogEntry]) -> HashSet<String> {
    logs.iter()
        .filter(|entry| entry.is_blocked())
        .map(|entry| entry.src_ip.clone())
        .collect()
}

pub fn blocked_count(logs: &[LogEntry]) -> usize {
    blocked_addresses(logs).len()
}
