//! Journey and session-shape templates.

use super::QueryContext;

pub const SESSION_TOTALS: &str = "journeys.session_totals";
pub const BOUNCE: &str = "journeys.bounce";
pub const AVG_DURATION: &str = "journeys.avg_duration";
pub const PAGE_DEPTH: &str = "journeys.page_depth";
pub const ENTRY_PAGES: &str = "journeys.entry_pages";

pub fn session_totals_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT uniq(properties.session_id) AS sessions, count() AS events\n\
         FROM events\n\
         WHERE {site}\n  {window}",
        site = ctx.site(),
        window = ctx.window(),
    )
}

/// A bounce is a session with exactly one event in the window.
pub fn bounce_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT countIf(events = 1) AS bounced, count() AS total\n\
         FROM (\n\
           SELECT properties.session_id AS session, count() AS events\n\
           FROM events\n\
           WHERE {site}\n    {window}\n\
           GROUP BY session\n\
         )",
        site = ctx.site(),
        window = ctx.window(),
    )
}

pub fn avg_duration_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT avg(duration) AS avg_seconds\n\
         FROM (\n\
           SELECT properties.session_id AS session,\n\
                  toUnixTimestamp(max(timestamp)) - toUnixTimestamp(min(timestamp)) AS duration\n\
           FROM events\n\
           WHERE {site}\n    {window}\n\
           GROUP BY session\n\
         )",
        site = ctx.site(),
        window = ctx.window(),
    )
}

/// How deep sessions go: sessions per reported page depth, deepest-traffic
/// first.
pub fn page_depth_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT toString(properties.page_depth) AS label, uniq(properties.session_id) AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND event = 'page_view'\n  AND notEmpty(label)\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit}",
        site = ctx.site(),
        window = ctx.window(),
        limit = ctx.limit(),
    )
}

/// Pages sessions start on, from the session_start payload.
pub fn entry_pages_sql(ctx: &QueryContext) -> String {
    format!(
        "SELECT properties.page AS label, uniq(properties.session_id) AS hits\n\
         FROM events\n\
         WHERE {site}\n  AND event = 'session_start'\n  AND notEmpty(label)\n  {window}\n\
         GROUP BY label\n\
         ORDER BY hits DESC\n\
         LIMIT {limit}",
        site = ctx.site(),
        window = ctx.window(),
        limit = ctx.limit(),
    )
}
