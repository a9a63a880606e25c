//! Event-store abstraction.
//!
//! The aggregation layer is strictly read-only against a shared, multi-tenant
//! event store; this trait is its only seam to the outside world. The HTTP
//! client in `casalytics-eventstore` is the production implementation;
//! tests script the trait directly.

use serde_json::Value;

#[async_trait::async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Execute a read query and return its rows as JSON objects, one per
    /// row, keyed by the column aliases in the SQL.
    async fn select(&self, sql: &str) -> anyhow::Result<Vec<Value>>;

    /// Lightweight liveness check for the `/health` endpoint.
    async fn ping(&self) -> anyhow::Result<()>;
}
