// One snapshot -> every dashboard element.

use crate::chart::ChartReconciler;
use crate::metrics::DerivedMetrics;
use crate::models::StatsSnapshot;
use crate::table::TableRenderer;
use crate::view::{DashboardView, StatusIndicator, ViewError};

/// Everything a poll cycle renders into. Chart state survives between cycles; the rest is replaced.
pub struct Dashboard<V> {
    view: V,
    chart: ChartReconciler,
    table: TableRenderer,
}

impl<V: DashboardView> Dashboard<V> {
    pub fn new(view: V, chart: ChartReconciler, table: TableRenderer) -> Self {
        Self { view, chart, table }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn chart(&self) -> &ChartReconciler {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartReconciler {
        &mut self.chart
    }

    /// Apply one snapshot. Element failures are logged per element; the rest still renders.
    pub fn render(&mut self, snapshot: &StatsSnapshot) -> DerivedMetrics {
        log_view_error(
            "set_status",
            self.view
                .set_status(StatusIndicator::for_status(snapshot.status)),
        );
        log_view_error(
            "set_total_attacks",
            self.view.set_total_attacks(snapshot.total_attacks),
        );

        let metrics = DerivedMetrics::from_logs(&snapshot.recent_logs);
        log_view_error(
            "set_blocked_count",
            self.view.set_blocked_count(metrics.blocked_count()),
        );

        self.chart.reconcile(&snapshot.attack_types);

        let rows = self.table.render(&snapshot.recent_logs);
        log_view_error("replace_rows", self.view.replace_rows(rows));

        metrics
    }
}

fn log_view_error(operation: &'static str, result: Result<(), ViewError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, operation, "dashboard element update failed");
    }
}
