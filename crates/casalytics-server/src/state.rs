use std::sync::Arc;

use casalytics_core::catalog::EventCatalog;
use casalytics_core::config::Config;
use casalytics_core::store::EventStore;
use casalytics_eventstore::InsightsService;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The service is stateless and read-only, so the whole state is safe to
/// share across any number of concurrent requests.
pub struct AppState {
    pub insights: InsightsService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the insights service over the given event store. The store is a
    /// trait object so integration tests can inject a scripted one.
    pub fn new(store: Arc<dyn EventStore>, config: Config) -> Self {
        let catalog = Arc::new(EventCatalog::builtin());
        let insights = InsightsService::new(store, catalog, config.query_timeout());
        Self {
            insights,
            config: Arc::new(config),
        }
    }
}
