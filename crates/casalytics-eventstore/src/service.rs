//! The aggregation service.
//!
//! Orchestrates one logical report per call: validates the request, renders
//! the named templates, fans the independent queries out concurrently, joins
//! them, reshapes the rows, and assembles the derived metrics. Stateless and
//! strictly read-only — many aggregate calls may run concurrently across
//! tenants.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use casalytics_core::catalog::{EventCatalog, EventCategory};
use casalytics_core::error::InsightsError;
use casalytics_core::insights::{
    CategoryTotals, ConversionSummary, FunnelReport, FunnelStage, InsightsQuery, JourneyReport,
    MetricRow, OverviewReport, FUNNEL_STAGES,
};
use casalytics_core::rates;
use casalytics_core::store::EventStore;

use crate::queries::{conversions, funnel, journeys, overview, QueryContext};
use crate::reshape;

pub struct InsightsService {
    store: Arc<dyn EventStore>,
    catalog: Arc<EventCatalog>,
    query_timeout: Duration,
}

impl InsightsService {
    pub fn new(
        store: Arc<dyn EventStore>,
        catalog: Arc<EventCatalog>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            query_timeout,
        }
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }

    /// Run one named template, tagging any failure with the template name so
    /// operators can tell which metric broke.
    async fn fetch(&self, name: &'static str, sql: String) -> Result<Vec<Value>, InsightsError> {
        debug!(query = name, "issuing event store query");
        self.store
            .select(&sql)
            .await
            .map_err(|source| InsightsError::QueryFailed { name, source })
    }

    /// Bound a whole fan-out with the configured timeout. A hung sub-query
    /// fails the aggregate; partial data is never returned.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, InsightsError>
    where
        F: Future<Output = Result<T, InsightsError>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(InsightsError::Timeout {
                operation,
                timeout_ms: self.query_timeout.as_millis() as u64,
            }),
        }
    }

    pub async fn overview(&self, query: &InsightsQuery) -> Result<OverviewReport, InsightsError> {
        let ctx = QueryContext::new(query)?;
        let limit = query.bounded_limit() as usize;
        self.bounded("overview", async {
            let (
                cities,
                neighborhoods,
                property_types,
                price_ranges,
                bedrooms,
                search_terms,
                filters,
                filter_combinations,
                properties,
                pages,
                ctas,
                event_rows,
            ) = tokio::try_join!(
                self.fetch(overview::TOP_CITIES, overview::top_cities_sql(&ctx)),
                self.fetch(
                    overview::TOP_NEIGHBORHOODS,
                    overview::top_neighborhoods_sql(&ctx)
                ),
                self.fetch(
                    overview::TOP_PROPERTY_TYPES,
                    overview::top_property_types_sql(&ctx)
                ),
                self.fetch(
                    overview::TOP_PRICE_RANGES,
                    overview::top_price_ranges_sql(&ctx)
                ),
                self.fetch(overview::TOP_BEDROOMS, overview::top_bedrooms_sql(&ctx)),
                self.fetch(
                    overview::TOP_SEARCH_TERMS,
                    overview::top_search_terms_sql(&ctx)
                ),
                self.fetch(overview::TOP_FILTERS, overview::top_filters_sql(&ctx)),
                self.fetch(
                    overview::TOP_FILTER_COMBINATIONS,
                    overview::top_filter_combinations_sql(&ctx)
                ),
                self.fetch(overview::TOP_PROPERTIES, overview::top_properties_sql(&ctx)),
                self.fetch(overview::TOP_PAGES, overview::top_pages_sql(&ctx)),
                self.fetch(
                    overview::TOP_CTAS,
                    overview::top_ctas_sql(&ctx, &self.catalog)
                ),
                self.fetch(overview::EVENT_COUNTS, overview::event_counts_sql(&ctx)),
            )?;

            let all_events = reshape::metric_rows(&event_rows);
            let category_totals = fold_categories(&self.catalog, &all_events);

            Ok(OverviewReport {
                top_cities: reshape::metric_rows(&cities),
                top_neighborhoods: reshape::metric_rows(&neighborhoods),
                top_property_types: reshape::metric_rows(&property_types),
                top_price_ranges: reshape::metric_rows(&price_ranges),
                top_bedrooms: reshape::metric_rows(&bedrooms),
                top_search_terms: reshape::metric_rows(&search_terms),
                top_filters: reshape::metric_rows(&filters),
                top_filter_combinations: reshape::metric_rows(&filter_combinations),
                top_properties: reshape::metric_rows(&properties),
                top_pages: reshape::metric_rows(&pages),
                top_ctas: reshape::metric_rows(&ctas),
                top_events: all_events.into_iter().take(limit).collect(),
                category_totals,
            })
        })
        .await
    }

    pub async fn conversions(
        &self,
        query: &InsightsQuery,
    ) -> Result<ConversionSummary, InsightsError> {
        let ctx = QueryContext::new(query)?;
        self.bounded("conversions", async {
            let (totals, sessions, by_type, by_city, by_property) = tokio::try_join!(
                self.fetch(
                    conversions::TOTAL_CONVERSIONS,
                    conversions::total_conversions_sql(&ctx, &self.catalog)
                ),
                self.fetch(
                    conversions::TOTAL_SESSIONS,
                    conversions::total_sessions_sql(&ctx)
                ),
                self.fetch(
                    conversions::BY_TYPE,
                    conversions::by_type_sql(&ctx, &self.catalog)
                ),
                self.fetch(
                    conversions::BY_CITY,
                    conversions::by_city_sql(&ctx, &self.catalog)
                ),
                self.fetch(
                    conversions::BY_PROPERTY,
                    conversions::by_property_sql(&ctx, &self.catalog)
                ),
            )?;

            let total_conversions = reshape::scalar(&totals, reshape::COUNT_COLUMN);
            let total_sessions = reshape::scalar(&sessions, reshape::COUNT_COLUMN);

            Ok(ConversionSummary {
                total_conversions,
                total_sessions,
                conversion_rate_pct: rates::rate(total_conversions, total_sessions),
                conversions_by_type: reshape::metric_rows(&by_type),
                conversions_by_city: reshape::metric_rows(&by_city),
                conversions_by_property: reshape::metric_rows(&by_property),
            })
        })
        .await
    }

    pub async fn funnel(&self, query: &InsightsQuery) -> Result<FunnelReport, InsightsError> {
        let ctx = QueryContext::new(query)?;
        self.bounded("funnel", async {
            let rows = self
                .fetch(
                    funnel::STAGE_COUNTS,
                    funnel::stage_counts_sql(&ctx, &self.catalog),
                )
                .await?;
            let counts: Vec<i64> = FUNNEL_STAGES
                .iter()
                .map(|(stage, _)| reshape::scalar(&rows, stage))
                .collect();
            Ok(build_funnel_report(&counts))
        })
        .await
    }

    pub async fn journeys(&self, query: &InsightsQuery) -> Result<JourneyReport, InsightsError> {
        let ctx = QueryContext::new(query)?;
        self.bounded("journeys", async {
            let (totals, bounce, duration, depth, entries) = tokio::try_join!(
                self.fetch(
                    journeys::SESSION_TOTALS,
                    journeys::session_totals_sql(&ctx)
                ),
                self.fetch(journeys::BOUNCE, journeys::bounce_sql(&ctx)),
                self.fetch(journeys::AVG_DURATION, journeys::avg_duration_sql(&ctx)),
                self.fetch(journeys::PAGE_DEPTH, journeys::page_depth_sql(&ctx)),
                self.fetch(journeys::ENTRY_PAGES, journeys::entry_pages_sql(&ctx)),
            )?;

            let total_sessions = reshape::scalar(&totals, "sessions");
            let total_events = reshape::scalar(&totals, "events");
            let bounced = reshape::scalar(&bounce, "bounced");
            let bounce_total = reshape::scalar(&bounce, "total");

            Ok(JourneyReport {
                total_sessions,
                total_events,
                avg_events_per_session: rates::ratio(total_events, total_sessions),
                bounced_sessions: bounced,
                bounce_rate_pct: rates::bounce_rate(bounced, bounce_total),
                avg_session_duration_seconds: reshape::scalar_f64(&duration, "avg_seconds"),
                page_depth: reshape::metric_rows(&depth),
                entry_pages: reshape::metric_rows(&entries),
            })
        })
        .await
    }
}

/// Fold per-event-name counts into category totals. Names the catalog does
/// not know land in `uncategorized` — they still count, just not in any
/// category-scoped facet.
pub(crate) fn fold_categories(catalog: &EventCatalog, rows: &[MetricRow]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();
    for row in rows {
        match catalog.category_of(&row.label) {
            Some(EventCategory::Search) => totals.search += row.count,
            Some(EventCategory::Navigation) => totals.navigation += row.count,
            Some(EventCategory::Property) => totals.property += row.count,
            Some(EventCategory::Conversion) => totals.conversion += row.count,
            None => totals.uncategorized += row.count,
        }
    }
    totals
}

/// Assemble the funnel report from per-stage session counts, which arrive in
/// `FUNNEL_STAGES` order. Output order is the declared business order —
/// never re-sorted by count, even when data anomalies make a downstream
/// stage exceed an upstream one.
pub(crate) fn build_funnel_report(stage_counts: &[i64]) -> FunnelReport {
    let total_entered = stage_counts.first().copied().unwrap_or(0);
    let mut stages = Vec::with_capacity(FUNNEL_STAGES.len());
    let mut previous: Option<i64> = None;

    for (idx, (stage, label)) in FUNNEL_STAGES.iter().enumerate() {
        let sessions = stage_counts.get(idx).copied().unwrap_or(0);
        let drop_off_pct = match previous {
            Some(prev) => rates::drop_off(prev, sessions),
            None => 0.0,
        };
        stages.push(FunnelStage {
            stage: (*stage).to_string(),
            label: (*label).to_string(),
            sessions,
            drop_off_pct,
            reached_from_start_pct: rates::rate(sessions, total_entered),
        });
        previous = Some(sessions);
    }

    let final_sessions = stage_counts
        .get(FUNNEL_STAGES.len() - 1)
        .copied()
        .unwrap_or(0);

    FunnelReport {
        total_entered,
        final_conversion_pct: rates::rate(final_sessions, total_entered),
        stages,
    }
}
