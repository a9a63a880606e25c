use thiserror::Error;

/// Failures the aggregation layer can surface.
///
/// Validation variants reject before any outbound query; upstream variants
/// fail the whole aggregate (no partial facets) and carry the name of the
/// query template that failed so operators can tell which metric broke.
/// An empty result set is not an error — callers distinguish "no data yet"
/// from failure by the `Result` itself.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("site_key is required")]
    MissingSiteKey,

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("query '{name}' failed: {source}")]
    QueryFailed {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{operation} aggregation timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
}
