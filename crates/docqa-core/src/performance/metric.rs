//! Per-query metrics and their running aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telemetry for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetric {
    pub timestamp: DateTime<Utc>,
    pub response_time_seconds: f64,
    pub context_token_count: u64,
    pub used_deep_traversal: bool,
}

impl QueryMetric {
    /// Creates a metric stamped with the current time.
    pub fn new(
        response_time_seconds: f64,
        context_token_count: u64,
        used_deep_traversal: bool,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            response_time_seconds,
            context_token_count,
            used_deep_traversal,
        }
    }
}

/// Running aggregates over recorded queries.
///
/// `avg_response_time` and `avg_context_size` cover every query recorded
/// since the last reset; `deep_traversal_usage_percent` covers only the
/// current history window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceAggregate {
    pub total_queries: u64,
    pub avg_response_time: f64,
    pub avg_context_size: f64,
    pub deep_traversal_usage_percent: f64,
}
