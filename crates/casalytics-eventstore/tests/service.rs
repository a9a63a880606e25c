//! Aggregation-service tests over a scripted event store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use casalytics_core::catalog::EventCatalog;
use casalytics_core::error::InsightsError;
use casalytics_core::insights::{InsightsQuery, MetricRow};
use casalytics_core::store::EventStore;
use casalytics_eventstore::InsightsService;

/// Records every SQL text it receives and answers via the scripted closure.
struct ScriptedStore {
    calls: Mutex<Vec<String>>,
    respond: Box<dyn Fn(&str) -> anyhow::Result<Vec<Value>> + Send + Sync>,
}

impl ScriptedStore {
    fn new(
        respond: impl Fn(&str) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    fn empty() -> Arc<Self> {
        Self::new(|_| Ok(Vec::new()))
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

#[async_trait::async_trait]
impl EventStore for ScriptedStore {
    async fn select(&self, sql: &str) -> anyhow::Result<Vec<Value>> {
        self.calls.lock().expect("lock").push(sql.to_string());
        (self.respond)(sql)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn service(store: Arc<ScriptedStore>) -> InsightsService {
    InsightsService::new(
        store,
        Arc::new(EventCatalog::builtin()),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn missing_site_key_fails_before_any_query() {
    let store = ScriptedStore::empty();
    let svc = service(Arc::clone(&store));

    let err = svc
        .overview(&InsightsQuery::default())
        .await
        .expect_err("must reject");
    assert!(matches!(err, InsightsError::MissingSiteKey));
    assert_eq!(store.call_count(), 0, "no outbound query may be issued");

    let err = svc
        .funnel(&InsightsQuery::for_site("  "))
        .await
        .expect_err("must reject");
    assert!(matches!(err, InsightsError::MissingSiteKey));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn overview_with_no_events_is_empty_success() {
    let store = ScriptedStore::empty();
    let svc = service(Arc::clone(&store));

    let report = svc
        .overview(&InsightsQuery::for_site("site_new"))
        .await
        .expect("empty site must succeed");

    assert!(report.top_cities.is_empty());
    assert!(report.top_filter_combinations.is_empty());
    assert!(report.top_events.is_empty());
    assert_eq!(report.category_totals.search, 0);
    assert_eq!(report.category_totals.uncategorized, 0);
    assert_eq!(store.call_count(), 12, "all facet queries still run");
}

#[tokio::test]
async fn overview_reshapes_rows_and_folds_categories() {
    let store = ScriptedStore::new(|sql| {
        if sql.contains("SELECT event AS label") && !sql.contains("event IN") {
            // event_counts: mixed catalog and unknown names.
            Ok(vec![
                json!({"label": "search_submit", "hits": "120"}),
                json!({"label": "property_view", "hits": "80"}),
                json!({"label": "contact_form_submit", "hits": "9"}),
                json!({"label": "mortgage_widget_open", "hits": "33"}),
            ])
        } else if sql.contains("properties.city") {
            Ok(vec![
                json!({"label": "São Paulo", "hits": "120"}),
                json!({"label": "Rio de Janeiro", "hits": "45"}),
            ])
        } else {
            Ok(Vec::new())
        }
    });
    let svc = service(Arc::clone(&store));

    let report = svc
        .overview(&InsightsQuery::for_site("site_1"))
        .await
        .expect("overview");

    assert_eq!(
        report.top_cities,
        vec![
            MetricRow::new("São Paulo", 120),
            MetricRow::new("Rio de Janeiro", 45),
        ]
    );
    assert_eq!(report.category_totals.search, 120);
    assert_eq!(report.category_totals.property, 80);
    assert_eq!(report.category_totals.conversion, 9, "legacy name still counts");
    assert_eq!(report.category_totals.uncategorized, 33);
    assert_eq!(report.top_events.len(), 4);
    assert_eq!(report.top_events[0].label, "search_submit");
}

#[tokio::test]
async fn failing_facet_fails_the_whole_overview_with_its_name() {
    let store = ScriptedStore::new(|sql| {
        if sql.contains("concat(properties.filter_field") {
            anyhow::bail!("store is on fire")
        }
        Ok(Vec::new())
    });
    let svc = service(store);

    let err = svc
        .overview(&InsightsQuery::for_site("site_1"))
        .await
        .expect_err("must fail, never partial");
    match err {
        InsightsError::QueryFailed { name, .. } => {
            assert_eq!(name, "overview.top_filter_combinations");
        }
        other => panic!("expected QueryFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn funnel_preserves_business_order_over_count_order() {
    let store = ScriptedStore::new(|sql| {
        if sql.contains("uniqIf") {
            // property_view anomalously exceeds search_submit.
            Ok(vec![json!({
                "session_start": "1000",
                "search_submit": "400",
                "property_view": "650",
                "contact_form_open": "50",
                "conversion": "10",
            })])
        } else {
            Ok(Vec::new())
        }
    });
    let svc = service(store);

    let report = svc
        .funnel(&InsightsQuery::for_site("site_1"))
        .await
        .expect("funnel");

    let order: Vec<&str> = report.stages.iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "session_start",
            "search_submit",
            "property_view",
            "contact_form_open",
            "conversion"
        ]
    );
    assert_eq!(report.total_entered, 1000);
    assert_eq!(report.stages[1].sessions, 400);
    assert_eq!(report.stages[1].drop_off_pct, 60.0);
    assert_eq!(report.stages[2].drop_off_pct, 0.0, "anomalous growth floors at 0");
    assert_eq!(report.final_conversion_pct, 1.0);
}

#[tokio::test]
async fn conversion_summary_uses_real_conversion_counts() {
    let store = ScriptedStore::new(|sql| {
        if sql.contains("uniq(properties.session_id) AS hits") {
            Ok(vec![json!({"hits": "200"})])
        } else if sql.starts_with("SELECT count() AS hits") {
            Ok(vec![json!({"hits": "30"})])
        } else if sql.contains("SELECT event AS label") {
            Ok(vec![
                json!({"label": "conversion_whatsapp_click", "hits": "18"}),
                json!({"label": "conversion_contact_form", "hits": "12"}),
            ])
        } else {
            Ok(Vec::new())
        }
    });
    let svc = service(store);

    let summary = svc
        .conversions(&InsightsQuery::for_site("site_1"))
        .await
        .expect("conversions");

    assert_eq!(summary.total_conversions, 30);
    assert_eq!(summary.total_sessions, 200);
    assert_eq!(summary.conversion_rate_pct, 15.0);
    assert_eq!(summary.conversions_by_type[0].label, "conversion_whatsapp_click");
    assert_eq!(summary.conversions_by_type[0].count, 18);
}

#[tokio::test]
async fn journeys_compute_session_shape_metrics() {
    let store = ScriptedStore::new(|sql| {
        if sql.contains("AS sessions, count() AS events") {
            Ok(vec![json!({"sessions": "100", "events": "500"})])
        } else if sql.contains("countIf(events = 1)") {
            Ok(vec![json!({"bounced": "40", "total": "100"})])
        } else if sql.contains("avg(duration)") {
            Ok(vec![json!({"avg_seconds": 184.25})])
        } else if sql.contains("toString(properties.page_depth)") {
            Ok(vec![
                json!({"label": "1", "hits": "60"}),
                json!({"label": "2", "hits": "25"}),
            ])
        } else {
            Ok(Vec::new())
        }
    });
    let svc = service(store);

    let report = svc
        .journeys(&InsightsQuery::for_site("site_1"))
        .await
        .expect("journeys");

    assert_eq!(report.total_sessions, 100);
    assert_eq!(report.total_events, 500);
    assert_eq!(report.avg_events_per_session, 5.0);
    assert_eq!(report.bounced_sessions, 40);
    assert_eq!(report.bounce_rate_pct, 40.0);
    assert_eq!(report.avg_session_duration_seconds, 184.25);
    assert_eq!(report.page_depth[0], MetricRow::new("1", 60));
}

#[tokio::test]
async fn invalid_custom_range_fails_without_outbound_queries() {
    let store = ScriptedStore::empty();
    let svc = service(Arc::clone(&store));

    let query = InsightsQuery {
        date_filter: casalytics_core::insights::DateFilter::parse(Some("custom")).expect("parse"),
        ..InsightsQuery::for_site("site_1")
    };
    let err = svc.conversions(&query).await.expect_err("must reject");
    assert!(matches!(err, InsightsError::InvalidDateRange(_)));
    assert_eq!(store.call_count(), 0);
}

/// A store whose queries never complete within the service timeout.
struct HangingStore;

#[async_trait::async_trait]
impl EventStore for HangingStore {
    async fn select(&self, _sql: &str) -> anyhow::Result<Vec<Value>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_store_times_out_the_whole_aggregate() {
    let svc = InsightsService::new(
        Arc::new(HangingStore),
        Arc::new(EventCatalog::builtin()),
        Duration::from_millis(250),
    );

    let err = svc
        .overview(&InsightsQuery::for_site("site_1"))
        .await
        .expect_err("must time out");
    match err {
        InsightsError::Timeout {
            operation,
            timeout_ms,
        } => {
            assert_eq!(operation, "overview");
            assert_eq!(timeout_ms, 250);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}
