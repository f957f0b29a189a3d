// Shared test helpers: scripted backend, recording view/chart/prompt, axum mock server

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use idps_dashboard::chart::{ChartReconciler, ChartViewState, ChartWidget, UpdateMode};
use idps_dashboard::client::{Backend, ClientError, RESET_STATS_PATH, START_SNIFFER_PATH, STATS_PATH};
use idps_dashboard::dashboard::Dashboard;
use idps_dashboard::models::*;
use idps_dashboard::poller::Refresh;
use idps_dashboard::table::{FixedConfidence, LogRow, TableRenderer};
use idps_dashboard::view::{DashboardView, StatusIndicator, UserPrompt, ViewError};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;

pub fn log_entry(src_ip: &str, action: &str) -> LogEntry {
    LogEntry {
        id: None,
        timestamp: "2025-01-01 12:00:00".into(),
        src_ip: src_ip.into(),
        dst_ip: "10.0.0.5".into(),
        protocol: "TCP".into(),
        type_: "Malicious Traffic".into(),
        action: Some(action.into()),
    }
}

pub fn snapshot(total_attacks: u64, types: &[(&str, u64)], logs: Vec<LogEntry>) -> StatsSnapshot {
    StatsSnapshot {
        status: SnapshotStatus::Active,
        total_attacks,
        attack_types: types.iter().map(|(k, v)| (*k, *v)).collect(),
        recent_logs: logs,
    }
}

pub fn not_found(path: &'static str) -> ClientError {
    ClientError::Status {
        path,
        status: reqwest::StatusCode::NOT_FOUND,
        message: None,
    }
}

// --- Scripted backend ---

type Scripted<T> = Mutex<VecDeque<(Duration, Result<T, ClientError>)>>;

/// Backend replaying queued responses. The response is taken when the request is issued,
/// and delivered after its delay, so concurrent polls can complete out of order.
#[derive(Default)]
pub struct ScriptedBackend {
    stats: Scripted<StatsSnapshot>,
    start: Scripted<StartResponse>,
    reset: Scripted<ResetResponse>,
    pub stats_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stats(&self, result: Result<StatsSnapshot, ClientError>) {
        self.push_stats_delayed(Duration::ZERO, result);
    }

    pub fn push_stats_delayed(&self, delay: Duration, result: Result<StatsSnapshot, ClientError>) {
        self.stats.lock().unwrap().push_back((delay, result));
    }

    pub fn push_start(&self, result: Result<StartResponse, ClientError>) {
        self.start.lock().unwrap().push_back((Duration::ZERO, result));
    }

    pub fn push_reset(&self, result: Result<ResetResponse, ClientError>) {
        self.reset.lock().unwrap().push_back((Duration::ZERO, result));
    }
}

fn replay<T: Send + 'static>(
    queue: &Scripted<T>,
    calls: &AtomicUsize,
    path: &'static str,
) -> impl Future<Output = Result<T, ClientError>> + Send + 'static {
    calls.fetch_add(1, Ordering::SeqCst);
    let next = queue.lock().unwrap().pop_front();
    async move {
        match next {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(not_found(path)),
        }
    }
}

impl Backend for ScriptedBackend {
    fn fetch_stats(&self) -> impl Future<Output = Result<StatsSnapshot, ClientError>> + Send {
        replay(&self.stats, &self.stats_calls, STATS_PATH)
    }

    fn start_sniffer(&self) -> impl Future<Output = Result<StartResponse, ClientError>> + Send {
        replay(&self.start, &self.start_calls, START_SNIFFER_PATH)
    }

    fn reset_stats(&self) -> impl Future<Output = Result<ResetResponse, ClientError>> + Send {
        replay(&self.reset, &self.reset_calls, RESET_STATS_PATH)
    }
}

// --- Recording view ---

#[derive(Default)]
pub struct RecordingView {
    pub status: Option<StatusIndicator>,
    pub total_attacks: Option<u64>,
    pub blocked_count: Option<usize>,
    pub rows: Vec<LogRow>,
    pub row_replacements: usize,
    /// Elements that behave as if absent from the page.
    pub missing: Vec<&'static str>,
}

impl RecordingView {
    pub fn without(missing: &[&'static str]) -> Self {
        Self {
            missing: missing.to_vec(),
            ..Default::default()
        }
    }

    fn check(&self, id: &'static str) -> Result<(), ViewError> {
        if self.missing.contains(&id) {
            Err(ViewError::MissingElement(id))
        } else {
            Ok(())
        }
    }
}

impl DashboardView for RecordingView {
    fn set_status(&mut self, indicator: StatusIndicator) -> Result<(), ViewError> {
        self.check(idps_dashboard::view::element::STATUS_INDICATOR)?;
        self.status = Some(indicator);
        Ok(())
    }

    fn set_total_attacks(&mut self, total: u64) -> Result<(), ViewError> {
        self.check(idps_dashboard::view::element::TOTAL_ATTACKS)?;
        self.total_attacks = Some(total);
        Ok(())
    }

    fn set_blocked_count(&mut self, count: usize) -> Result<(), ViewError> {
        self.check(idps_dashboard::view::element::BLOCKED_COUNT)?;
        self.blocked_count = Some(count);
        Ok(())
    }

    fn replace_rows(&mut self, rows: Vec<LogRow>) -> Result<(), ViewError> {
        self.check(idps_dashboard::view::element::LOGS_BODY)?;
        self.rows = rows;
        self.row_replacements += 1;
        Ok(())
    }
}

// --- Recording chart widget ---

/// Widget that records every update; clones share the record.
#[derive(Clone, Default)]
pub struct RecordingChart {
    pub updates: Arc<Mutex<Vec<(ChartViewState, UpdateMode)>>>,
    pub fail: bool,
}

impl RecordingChart {
    pub fn updates(&self) -> Vec<(ChartViewState, UpdateMode)> {
        self.updates.lock().unwrap().clone()
    }
}

impl ChartWidget for RecordingChart {
    fn update(&mut self, state: &ChartViewState, mode: UpdateMode) -> Result<(), ViewError> {
        self.updates.lock().unwrap().push((state.clone(), mode));
        if self.fail {
            return Err(ViewError::Render(std::io::Error::other("canvas lost")));
        }
        Ok(())
    }
}

pub fn recording_dashboard(view: RecordingView) -> (Dashboard<RecordingView>, RecordingChart) {
    let chart = RecordingChart::default();
    let dashboard = Dashboard::new(
        view,
        ChartReconciler::new(Box::new(chart.clone())),
        TableRenderer::new(Box::new(FixedConfidence(90.0))),
    );
    (dashboard, chart)
}

// --- Prompt and refresh doubles ---

pub struct ScriptedPrompt {
    answer: bool,
    pub confirms: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirms: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    async fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

#[derive(Clone, Default)]
pub struct CountingRefresh(pub Arc<AtomicUsize>);

impl CountingRefresh {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Refresh for CountingRefresh {
    async fn refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

// --- axum mock of the IDPS backend ---

#[derive(Clone)]
pub struct MockServer {
    pub stats: Arc<Mutex<(StatusCode, String)>>,
    pub reset: Arc<Mutex<(StatusCode, String)>>,
    pub stats_hits: Arc<AtomicUsize>,
    pub start_hits: Arc<AtomicUsize>,
    pub reset_hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn new(stats_body: serde_json::Value) -> Self {
        Self {
            stats: Arc::new(Mutex::new((StatusCode::OK, stats_body.to_string()))),
            reset: Arc::new(Mutex::new((
                StatusCode::OK,
                serde_json::json!({
                    "message": "All logs and blocked IPs cleared successfully",
                    "status": "success"
                })
                .to_string(),
            ))),
            stats_hits: Arc::new(AtomicUsize::new(0)),
            start_hits: Arc::new(AtomicUsize::new(0)),
            reset_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_stats(&self, status: StatusCode, body: impl Into<String>) {
        *self.stats.lock().unwrap() = (status, body.into());
    }

    pub fn set_reset(&self, status: StatusCode, body: impl Into<String>) {
        *self.reset.lock().unwrap() = (status, body.into());
    }

    /// Serve on an ephemeral port; returns the base URL.
    pub async fn spawn(&self, with_reset: bool) -> String {
        let mut router = Router::new()
            .route(STATS_PATH, get(stats_handler))
            .route(START_SNIFFER_PATH, get(start_handler));
        if with_reset {
            router = router.route(RESET_STATS_PATH, get(reset_handler));
        }
        let app = router.with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

fn json_response(status: StatusCode, body: String) -> impl IntoResponse {
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn stats_handler(State(mock): State<MockServer>) -> impl IntoResponse {
    mock.stats_hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = mock.stats.lock().unwrap().clone();
    json_response(status, body)
}

async fn start_handler(State(mock): State<MockServer>) -> impl IntoResponse {
    let first = mock.start_hits.fetch_add(1, Ordering::SeqCst) == 0;
    Json(serde_json::json!({
        "status": if first { "started" } else { "already_running" }
    }))
}

async fn reset_handler(State(mock): State<MockServer>) -> impl IntoResponse {
    mock.reset_hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = mock.reset.lock().unwrap().clone();
    json_response(status, body)
}
