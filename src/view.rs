// Dashboard surface: status indicator, counters, log table, user prompts.
// The poller and command dispatcher only talk to these traits.

use crate::models::SnapshotStatus;
use crate::table::LogRow;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::Mutex;

/// Stable element identifiers of the dashboard page.
pub mod element {
    pub const STATUS_INDICATOR: &str = "status-indicator";
    pub const TOTAL_ATTACKS: &str = "total-attacks";
    pub const BLOCKED_COUNT: &str = "blocked-count";
    pub const ATTACK_CHART: &str = "attackChart";
    pub const LOGS_BODY: &str = "logs-body";
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("render failed: {0}")]
    Render(#[from] std::io::Error),
}

/// Class + text pair shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    pub class: &'static str,
    pub text: &'static str,
}

impl StatusIndicator {
    pub const ONLINE: StatusIndicator = StatusIndicator {
        class: "status online",
        text: "SYSTEM ACTIVE",
    };
    pub const OFFLINE: StatusIndicator = StatusIndicator {
        class: "status offline",
        text: "SYSTEM OFFLINE",
    };

    pub fn for_status(status: SnapshotStatus) -> Self {
        if status.is_active() {
            Self::ONLINE
        } else {
            Self::OFFLINE
        }
    }
}

/// Render target for one poll cycle. Each setter replaces what the element showed before.
pub trait DashboardView: Send + 'static {
    fn set_status(&mut self, indicator: StatusIndicator) -> Result<(), ViewError>;
    fn set_total_attacks(&mut self, total: u64) -> Result<(), ViewError>;
    fn set_blocked_count(&mut self, count: usize) -> Result<(), ViewError>;
    /// Replaces the whole table body; rows arrive most recent first.
    fn replace_rows(&mut self, rows: Vec<LogRow>) -> Result<(), ViewError>;
}

/// Blocking user interaction used by commands.
pub trait UserPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send;
    fn alert(&self, message: &str);
}

/// Plain-text dashboard written to any `Write` (stdout in the binary).
pub struct ConsoleView<W> {
    out: W,
}

impl ConsoleView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> DashboardView for ConsoleView<W> {
    fn set_status(&mut self, indicator: StatusIndicator) -> Result<(), ViewError> {
        writeln!(self.out, "[{}]", indicator.text)?;
        Ok(())
    }

    fn set_total_attacks(&mut self, total: u64) -> Result<(), ViewError> {
        writeln!(self.out, "Total attacks: {}", total)?;
        Ok(())
    }

    fn set_blocked_count(&mut self, count: usize) -> Result<(), ViewError> {
        writeln!(self.out, "Blocked IPs:   {}", count)?;
        Ok(())
    }

    fn replace_rows(&mut self, rows: Vec<LogRow>) -> Result<(), ViewError> {
        writeln!(
            self.out,
            "{:<20} {:<16} {:<16} {:<6} {:<28} {}",
            "TIME", "SOURCE", "DESTINATION", "PROTO", "TYPE", "ACTION"
        )?;
        for row in &rows {
            let [ts, src, dst, proto, kind, action] = row.cells();
            writeln!(
                self.out,
                "{:<20} {:<16} {:<16} {:<6} {:<28} {}",
                ts, src, dst, proto, kind, action
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Prompt that asks on stdout and reads the answer from a shared line reader.
/// The binary's command loop reads from the same reader, hence the mutex.
pub struct ConsolePrompt<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> ConsolePrompt<R> {
    pub fn new(lines: Arc<Mutex<Lines<R>>>) -> Self {
        Self { lines }
    }
}

impl<R: AsyncBufRead + Unpin + Send> UserPrompt for ConsolePrompt<R> {
    async fn confirm(&self, message: &str) -> bool {
        println!("{} [y/N]", message);
        let answer = self.lines.lock().await.next_line().await;
        match answer {
            Ok(Some(line)) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, operation = "confirm", "stdin read failed");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        println!("!! {}", message);
    }
}
