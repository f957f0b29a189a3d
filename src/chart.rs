// Attack-type chart: view state, placeholder policy, flicker-free commits.

use crate::models::AttackTypes;
use crate::view::ViewError;
use std::io::Write;
use tracing::instrument;

/// Label shown when the backend reports no categories.
pub const PLACEHOLDER_LABEL: &str = "No Attacks Yet";

/// Width of the longest bar drawn by `TextChart`.
const BAR_WIDTH: u64 = 30;

/// How the widget should transition to a new state. Only in-place redraws are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Redraw in place with no transition animation.
    #[default]
    None,
}

/// Index-aligned labels and values. Never empty: empty input becomes the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartViewState {
    labels: Vec<String>,
    values: Vec<u64>,
}

impl Default for ChartViewState {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl ChartViewState {
    pub fn placeholder() -> Self {
        Self {
            labels: vec![PLACEHOLDER_LABEL.to_string()],
            values: vec![0],
        }
    }

    /// Keys and counts in the mapping's own order; no sorting.
    pub fn from_attack_types(types: &AttackTypes) -> Self {
        let mut state = Self::placeholder();
        state.assign(types);
        state
    }

    /// Overwrite in place, reusing the existing allocations.
    fn assign(&mut self, types: &AttackTypes) {
        self.labels.clear();
        self.values.clear();
        if types.is_empty() {
            self.labels.push(PLACEHOLDER_LABEL.to_string());
            self.values.push(0);
            return;
        }
        for (name, count) in types.iter() {
            self.labels.push(name.to_string());
            self.values.push(count);
        }
    }

    fn matches(&self, types: &AttackTypes) -> bool {
        if types.is_empty() {
            return self.is_placeholder();
        }
        self.labels.len() == types.len()
            && self
                .labels
                .iter()
                .zip(&self.values)
                .zip(types.iter())
                .all(|((label, value), (name, count))| label == name && *value == count)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == PLACEHOLDER_LABEL && self.values[0] == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Drawing surface hosting the chart.
pub trait ChartWidget: Send {
    fn update(&mut self, state: &ChartViewState, mode: UpdateMode) -> Result<(), ViewError>;
}

/// Owns the chart state and its widget. One instance per dashboard.
pub struct ChartReconciler {
    state: ChartViewState,
    widget: Option<Box<dyn ChartWidget>>,
    drawn: bool,
    commits: u64,
}

impl Default for ChartReconciler {
    fn default() -> Self {
        Self::detached()
    }
}

impl ChartReconciler {
    pub fn new(widget: Box<dyn ChartWidget>) -> Self {
        Self {
            widget: Some(widget),
            ..Self::detached()
        }
    }

    /// Reconciler without a widget; reconcile is a logged no-op until `attach`.
    pub fn detached() -> Self {
        Self {
            state: ChartViewState::placeholder(),
            widget: None,
            drawn: false,
            commits: 0,
        }
    }

    pub fn attach(&mut self, widget: Box<dyn ChartWidget>) {
        self.widget = Some(widget);
        self.drawn = false;
    }

    pub fn is_attached(&self) -> bool {
        self.widget.is_some()
    }

    pub fn state(&self) -> &ChartViewState {
        &self.state
    }

    /// Number of times the widget was asked to redraw.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Fold `types` into the chart state and redraw without animation.
    /// Never fails: widget problems are logged and the cycle carries on.
    #[instrument(skip_all, fields(categories = types.len()))]
    pub fn reconcile(&mut self, types: &AttackTypes) -> &ChartViewState {
        let Some(widget) = self.widget.as_mut() else {
            tracing::warn!(
                element = crate::view::element::ATTACK_CHART,
                operation = "reconcile_chart",
                "chart widget not initialized; skipping update"
            );
            return &self.state;
        };

        if self.drawn && self.state.matches(types) {
            tracing::trace!("chart unchanged; skipping redraw");
            return &self.state;
        }

        self.state.assign(types);
        self.commits += 1;
        match widget.update(&self.state, UpdateMode::None) {
            Ok(()) => self.drawn = true,
            Err(e) => {
                self.drawn = false;
                tracing::warn!(error = %e, operation = "update_chart", "chart update failed");
            }
        }
        &self.state
    }
}

/// Horizontal bar chart printed as text.
pub struct TextChart<W> {
    out: W,
}

impl TextChart<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> ChartWidget for TextChart<W> {
    fn update(&mut self, state: &ChartViewState, _mode: UpdateMode) -> Result<(), ViewError> {
        let label_width = state.labels().iter().map(|l| l.len()).max().unwrap_or(0);
        let max = state.values().iter().copied().max().unwrap_or(0);
        for (label, value) in state.iter() {
            let bar = if max == 0 {
                0
            } else {
                (u128::from(value) * u128::from(BAR_WIDTH) / u128::from(max)) as usize
            };
            writeln!(
                self.out,
                "{:<width$} | {} {}",
                label,
                "#".repeat(bar),
                value,
                width = label_width
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
