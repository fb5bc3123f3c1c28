//! Streaming performance telemetry for answered queries.

mod metric;
mod store;

pub use metric::{PerformanceAggregate, QueryMetric};
pub use store::{PerformanceState, PerformanceStore, QUERY_HISTORY_LIMIT};
