// Wire models exchanged with the IDPS backend

mod attack_types;
mod command;
mod snapshot;

pub use attack_types::AttackTypes;
pub use command::{ResetResponse, StartResponse};
pub use snapshot::{LogEntry, SnapshotStatus, StatsSnapshot};
