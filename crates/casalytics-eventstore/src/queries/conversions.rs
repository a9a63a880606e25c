//! Conversion summary templates.

use casalytics_core::catalog::{EventCatalog, EventCategory};

use super::{event_in_predicate, QueryContext};

pub const TOTAL_CONVERSIONS: &str = "conversions.total";
pub const TOTAL_SESSIONS: &str = "conversions.sessions";
pub const BY_TYPE: &str = "conversions.by_type";
pub const BY_CITY: &str = "conversions.by_city";
pub const BY_PROPERTY: &str = "conversions.by_property";

fn conversion_predicate(catalog: &EventCatalog) -> String {
    event_in_predicate(&catalog.events_in(EventCategory::Conversion))
}

pub fn total_conversions_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    format!(
        "SELECT count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND {conversions}\n  {window}",
        site = ctx.site(),
        conversions = conversion_predicate(catalog),
        window = ctx.window(),
    )
}

/// Denominator for the conversion rate: distinct sessions across all events
/// in the window, not just converting ones.
pub fn total_sessions_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT uniq(properties.session_id) AS hits\n\
         FROM events\n\
         WHERE {site}\n  {window}",
        site = ctx.site(),
        window = ctx.window(),
    )
}

pub fn by_type_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    format!(
        "SELECT event AS label, count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND {conversions}\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit}",
        site = ctx.site(),
        conversions = conversion_predicate(catalog),
        window = ctx.window(),
        limit = ctx.limit(),
    )
}

pub fn by_city_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    format!(
        "SELECT properties.city AS label, count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND {conversions}\n  AND notEmpty(label)\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit}",
        site = ctx.site(),
        conversions = conversion_predicate(catalog),
        window = ctx.window(),
        limit = ctx.limit(),
    )
}

pub fn by_property_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    format!(
        "SELECT properties.property_code AS label, count() AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND {conversions}\n  AND notEmpty(label)\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit}",
        site = ctx.site(),
        conversions = conversion_predicate(catalog),
        window = ctx.window(),
        limit = ctx.limit(),
    )
}
