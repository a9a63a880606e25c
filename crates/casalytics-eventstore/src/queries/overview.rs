//! Overview facet templates.
//!
//! Twelve named queries behind `InsightsService::overview`. Search facets
//! read the search-submit payload, engagement facets read the matching
//! engagement events, and `event_counts` feeds both the `top_events` facet
//! and the category totals (it is the one template that deliberately does
//! not restrict to catalog names — unknown events still count).

use casalytics_core::catalog::{EventCatalog, EventCategory};

use super::{event_in_predicate, QueryContext};

/// Guard for the GROUP BY over event names. Event-name cardinality is tiny
/// (the catalog plus stray unknowns), so this bound is never reached in
/// practice; it caps the response if a misbehaving snippet floods names.
const EVENT_NAME_CAP: u32 = 1000;

pub const TOP_CITIES: &str = "overview.top_cities";
pub const TOP_NEIGHBORHOODS: &str = "overview.top_neighborhoods";
pub const TOP_PROPERTY_TYPES: &str = "overview.top_property_types";
pub const TOP_PRICE_RANGES: &str = "overview.top_price_ranges";
pub const TOP_BEDROOMS: &str = "overview.top_bedrooms";
pub const TOP_SEARCH_TERMS: &str = "overview.top_search_terms";
pub const TOP_FILTERS: &str = "overview.top_filters";
pub const TOP_FILTER_COMBINATIONS: &str = "overview.top_filter_combinations";
pub const TOP_PROPERTIES: &str = "overview.top_properties";
pub const TOP_PAGES: &str = "overview.top_pages";
pub const TOP_CTAS: &str = "overview.top_ctas";
pub const EVENT_COUNTS: &str = "overview.event_counts";

/// One facet template: count events matching `event_predicate`, grouped by
/// `label_expr`, for the request's site and window.
fn facet(ctx: &QueryContext, label_expr: &str, event_predicate: &str) -> String {
    format!(
        "SELECT {label_expr} AS label, count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND {event_predicate}\n  AND notEmpty(label)\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit} OFFSET {offset}",
        site = ctx.site(),
        window = ctx.window(),
        limit = ctx.limit(),
        offset = ctx.offset(),
    )
}

pub fn top_cities_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.city", "event = 'search_submit'")
}

pub fn top_neighborhoods_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.neighborhood", "event = 'search_submit'")
}

pub fn top_property_types_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.property_type", "event = 'search_submit'")
}

pub fn top_price_ranges_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.price_range", "event = 'search_submit'")
}

pub fn top_bedrooms_sql(ctx: &QueryContext) -> String {
    facet(ctx, "toString(properties.bedrooms)", "event = 'search_submit'")
}

pub fn top_search_terms_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.query", "event = 'search_submit'")
}

pub fn top_filters_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.filter_field", "event = 'filter_apply'")
}

/// Filter-combination ranking: field and value paired into one label so the
/// dashboard can rank `bedrooms=3` against `city=Campinas`.
pub fn top_filter_combinations_sql(ctx: &QueryContext) -> String {
    facet(
        ctx,
        "concat(properties.filter_field, '=', properties.filter_value)",
        "event = 'filter_apply'",
    )
}

pub fn top_properties_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.property_code", "event = 'property_view'")
}

pub fn top_pages_sql(ctx: &QueryContext) -> String {
    facet(ctx, "properties.page", "event = 'page_view'")
}

/// CTA breakdown across every conversion-category event, legacy names
/// included.
pub fn top_ctas_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    facet(
        ctx,
        "properties.cta",
        &event_in_predicate(&catalog.events_in(EventCategory::Conversion)),
    )
}

/// Raw event-name counts for the whole site and window. No category
/// restriction: the service folds these rows through the catalog and keeps
/// unknown names in the uncategorized bucket.
pub fn event_counts_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT event AS label, count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {EVENT_NAME_CAP}",
        site = ctx.site(),
        window = ctx.window(),
    )
}
