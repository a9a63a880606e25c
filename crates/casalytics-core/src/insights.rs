//! Insights request and report types.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of rows per facet when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Hard cap on rows per facet — bounds response size on high-cardinality
/// dimensions (cities, property codes, filter combinations).
pub const MAX_LIMIT: u32 = 100;
/// Trailing window applied when no date filter is supplied.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    Day,
    Week,
    Month,
    Custom,
}

impl DateFilter {
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some("day") => Ok(Some(Self::Day)),
            Some("week") => Ok(Some(Self::Week)),
            Some("month") => Ok(Some(Self::Month)),
            Some("custom") => Ok(Some(Self::Custom)),
            Some(_) => Err(anyhow!(
                "date_filter must be one of: day, week, month, custom"
            )),
        }
    }
}

/// Parameters common to every insights operation.
///
/// `site_key` is the only mandatory field; it scopes every outbound query to
/// one tenant and its absence short-circuits before any query is issued.
#[derive(Debug, Clone, Default)]
pub struct InsightsQuery {
    pub site_key: String,
    pub date_filter: Option<DateFilter>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl InsightsQuery {
    pub fn for_site(site_key: &str) -> Self {
        Self {
            site_key: site_key.to_string(),
            ..Self::default()
        }
    }

    /// Caller limit clamped into `1..=MAX_LIMIT`.
    pub fn bounded_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// The normalized unit of aggregated output: a label and its count.
/// Row order is significant (count-descending from the query layer, business
/// order for funnel stages) and is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    pub count: i64,
}

impl MetricRow {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Event volume per semantic category, plus everything the catalog does not
/// know about. Unknown names count here and in `top_events`, never in the
/// category-scoped facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub search: i64,
    pub navigation: i64,
    pub property: i64,
    pub conversion: i64,
    pub uncategorized: i64,
}

/// The overview dashboard payload: one `MetricRow` list per facet, in fixed
/// declaration order, plus category totals folded from the event-name rows.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub top_cities: Vec<MetricRow>,
    pub top_neighborhoods: Vec<MetricRow>,
    pub top_property_types: Vec<MetricRow>,
    pub top_price_ranges: Vec<MetricRow>,
    pub top_bedrooms: Vec<MetricRow>,
    pub top_search_terms: Vec<MetricRow>,
    pub top_filters: Vec<MetricRow>,
    pub top_filter_combinations: Vec<MetricRow>,
    pub top_properties: Vec<MetricRow>,
    pub top_pages: Vec<MetricRow>,
    pub top_ctas: Vec<MetricRow>,
    pub top_events: Vec<MetricRow>,
    pub category_totals: CategoryTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub total_conversions: i64,
    pub total_sessions: i64,
    /// `rate(total_conversions, total_sessions)` — computed from real
    /// conversion events, never estimated from upstream funnel counts.
    pub conversion_rate_pct: f64,
    pub conversions_by_type: Vec<MetricRow>,
    pub conversions_by_city: Vec<MetricRow>,
    pub conversions_by_property: Vec<MetricRow>,
}

/// The funnel topology, in business order. This order is fixed by semantics
/// — output never re-sorts by count. The final stage matches any event in
/// the Conversion category rather than a single name.
pub const FUNNEL_STAGES: &[(&str, &str)] = &[
    ("session_start", "Session started"),
    ("search_submit", "Search submitted"),
    ("property_view", "Property viewed"),
    ("contact_form_open", "Contact form opened"),
    ("conversion", "Converted"),
];

#[derive(Debug, Clone, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub label: String,
    pub sessions: i64,
    /// Percent decrease from the immediately preceding stage (0 for the
    /// first stage).
    pub drop_off_pct: f64,
    /// Share of stage-one sessions that reached this stage.
    pub reached_from_start_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelReport {
    pub total_entered: i64,
    pub final_conversion_pct: f64,
    pub stages: Vec<FunnelStage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JourneyReport {
    pub total_sessions: i64,
    pub total_events: i64,
    pub avg_events_per_session: f64,
    pub bounced_sessions: i64,
    pub bounce_rate_pct: f64,
    pub avg_session_duration_seconds: f64,
    pub page_depth: Vec<MetricRow>,
    pub entry_pages: Vec<MetricRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_filter_parses_known_values() {
        assert_eq!(DateFilter::parse(None).ok(), Some(None));
        assert_eq!(DateFilter::parse(Some("")).ok(), Some(None));
        assert_eq!(DateFilter::parse(Some("day")).ok(), Some(Some(DateFilter::Day)));
        assert_eq!(
            DateFilter::parse(Some(" custom ")).ok(),
            Some(Some(DateFilter::Custom))
        );
        assert!(DateFilter::parse(Some("fortnight")).is_err());
    }

    #[test]
    fn limit_is_clamped() {
        let mut query = InsightsQuery::for_site("site_1");
        assert_eq!(query.bounded_limit(), DEFAULT_LIMIT);
        query.limit = Some(0);
        assert_eq!(query.bounded_limit(), 1);
        query.limit = Some(10_000);
        assert_eq!(query.bounded_limit(), MAX_LIMIT);
    }

    #[test]
    fn funnel_topology_is_five_fixed_stages() {
        let stages: Vec<&str> = FUNNEL_STAGES.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(
            stages,
            vec![
                "session_start",
                "search_submit",
                "property_view",
                "contact_form_open",
                "conversion"
            ]
        );
    }
}
