//! Performance store: streaming query telemetry.

use super::metric::{PerformanceAggregate, QueryMetric};
use std::collections::VecDeque;
use tokio::sync::watch;

/// Number of recent queries kept in the history window.
pub const QUERY_HISTORY_LIMIT: usize = 50;

/// Observable state held by [`PerformanceStore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceState {
    /// Most recent queries, oldest first, at most [`QUERY_HISTORY_LIMIT`].
    pub queries_history: VecDeque<QueryMetric>,
    pub aggregate: PerformanceAggregate,
}

impl PerformanceState {
    fn record(&mut self, metric: QueryMetric) {
        let n = self.aggregate.total_queries as f64;
        let aggregate = &mut self.aggregate;
        aggregate.avg_response_time =
            (aggregate.avg_response_time * n + metric.response_time_seconds) / (n + 1.0);
        aggregate.avg_context_size =
            (aggregate.avg_context_size * n + metric.context_token_count as f64) / (n + 1.0);
        aggregate.total_queries += 1;

        self.queries_history.push_back(metric);
        while self.queries_history.len() > QUERY_HISTORY_LIMIT {
            self.queries_history.pop_front();
        }

        let deep = self
            .queries_history
            .iter()
            .filter(|m| m.used_deep_traversal)
            .count();
        self.aggregate.deep_traversal_usage_percent =
            deep as f64 / self.queries_history.len() as f64 * 100.0;
    }
}

/// Holds per-query metrics and running aggregates.
///
/// Averages are updated incrementally from the previous average and count,
/// never from a stored sum, so no full history is needed for them.
pub struct PerformanceStore {
    state: watch::Sender<PerformanceState>,
}

impl PerformanceStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(PerformanceState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<PerformanceState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PerformanceState {
        self.state.borrow().clone()
    }

    pub fn aggregate(&self) -> PerformanceAggregate {
        self.state.borrow().aggregate
    }

    pub fn record_query(&self, metric: QueryMetric) {
        tracing::debug!(
            "[PerformanceStore] record_query: {:.3}s, {} tokens, deep={}",
            metric.response_time_seconds,
            metric.context_token_count,
            metric.used_deep_traversal
        );
        self.state.send_modify(|state| state.record(metric));
    }

    pub fn reset_metrics(&self) {
        self.state.send_replace(PerformanceState::default());
    }
}

impl Default for PerformanceStore {
    fn default() -> Self {
        Self::new()
    }
}
