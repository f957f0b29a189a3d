// Stats poller: fixed-interval fetch of /api/stats, fanned out to the dashboard.
// Each tick is an independent request; nothing here backs off or gives up.

use crate::client::Backend;
use crate::dashboard::Dashboard;
use crate::view::DashboardView;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Duration, MissedTickBehavior, interval};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

pub struct PollerConfig {
    pub interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// What happened to one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Applied { seq: u64 },
    /// Fetch failed; nothing rendered.
    Failed { seq: u64 },
    /// A newer response was already applied; this one was dropped.
    Stale { seq: u64, last_applied: u64 },
}

/// Cycle counters since the poller was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollCounters {
    pub issued: u64,
    pub applied: u64,
    pub failed: u64,
    pub discarded: u64,
}

/// Something that can run a poll cycle on demand (used by commands after a mutation).
pub trait Refresh: Send + Sync {
    fn refresh(&self) -> impl Future<Output = ()> + Send;
}

struct Rendered<V> {
    last_applied: u64,
    dashboard: Dashboard<V>,
}

struct Shared<B, V> {
    backend: Arc<B>,
    rendered: Mutex<Rendered<V>>,
    next_seq: AtomicU64,
    applied: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

/// Cheap to clone; clones share the same dashboard and sequence counter.
pub struct Poller<B, V> {
    shared: Arc<Shared<B, V>>,
}

impl<B, V> Clone for Poller<B, V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<B: Backend, V: DashboardView> Poller<B, V> {
    pub fn new(backend: Arc<B>, dashboard: Dashboard<V>) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                rendered: Mutex::new(Rendered {
                    last_applied: 0,
                    dashboard,
                }),
                next_seq: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                discarded: AtomicU64::new(0),
            }),
        }
    }

    /// One cycle: fetch, then render unless a newer response got there first.
    pub async fn poll_once(&self) -> CycleOutcome {
        let seq = self.shared.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        match self.shared.backend.fetch_stats().await {
            Ok(snapshot) => {
                let mut rendered = self.lock_rendered();
                if seq <= rendered.last_applied {
                    self.shared.discarded.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(
                        seq,
                        last_applied = rendered.last_applied,
                        operation = "poll_stats",
                        "stale stats response discarded"
                    );
                    return CycleOutcome::Stale {
                        seq,
                        last_applied: rendered.last_applied,
                    };
                }
                rendered.last_applied = seq;
                let metrics = rendered.dashboard.render(&snapshot);
                self.shared.applied.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    seq,
                    total_attacks = snapshot.total_attacks,
                    blocked = metrics.blocked_count(),
                    categories = snapshot.attack_types.len(),
                    logs = snapshot.recent_logs.len(),
                    "stats applied"
                );
                CycleOutcome::Applied { seq }
            }
            Err(e) => {
                self.shared.failed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(seq, error = %e, operation = "poll_stats", "stats poll failed");
                CycleOutcome::Failed { seq }
            }
        }
    }

    /// Read access to the dashboard between cycles.
    pub fn with_dashboard<R>(&self, f: impl FnOnce(&Dashboard<V>) -> R) -> R {
        f(&self.lock_rendered().dashboard)
    }

    pub fn counters(&self) -> PollCounters {
        PollCounters {
            issued: self.shared.next_seq.load(Ordering::Relaxed),
            applied: self.shared.applied.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
            discarded: self.shared.discarded.load(Ordering::Relaxed),
        }
    }

    /// Render state is only touched synchronously, so a poisoned lock still holds a usable dashboard.
    fn lock_rendered(&self) -> MutexGuard<'_, Rendered<V>> {
        self.shared
            .rendered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start the interval loop. The first tick fires immediately. A tick never waits for
    /// earlier requests; each one runs on its own task. A zero interval is treated as 1ms.
    pub fn spawn(&self, config: PollerConfig) -> PollerHandle<B, V> {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let poller = self.clone();
        let interval_ms = config.interval_ms.max(1);

        let task = tokio::spawn(async move {
            let mut tick = interval(Duration::from_millis(interval_ms));
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut in_flight = JoinSet::new();

            tracing::info!(interval_ms, "poller started");
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let p = poller.clone();
                        in_flight.spawn(async move { p.poll_once().await });
                    }
                    Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                        if let Err(e) = joined {
                            tracing::warn!(error = %e, operation = "poll_stats", "poll task failed");
                        }
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }
            in_flight.shutdown().await;
            tracing::info!("poller stopped");
        });

        PollerHandle {
            poller: self.clone(),
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

impl<B: Backend, V: DashboardView> Refresh for Poller<B, V> {
    async fn refresh(&self) {
        self.poll_once().await;
    }
}

/// Owner of a running poll loop.
pub struct PollerHandle<B, V> {
    poller: Poller<B, V>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl<B: Backend, V: DashboardView> PollerHandle<B, V> {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Out-of-band cycle alongside the ticks; ordered against them by sequence number.
    pub async fn poll_now(&self) -> CycleOutcome {
        self.poller.poll_once().await
    }

    pub fn counters(&self) -> PollCounters {
        self.poller.counters()
    }

    /// Stop ticking, abort in-flight requests and wait for the loop to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "poller task ended abnormally");
        }
    }
}
