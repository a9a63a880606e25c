//! Funnel stage-count template.
//!
//! One single-row query with a `uniqIf` column per stage — the same
//! one-round-trip shape the rest of the read path uses. Stages are measured
//! independently (how many sessions reached each), so per-stage columns do
//! not depend on each other; the fixed business order lives in
//! `FUNNEL_STAGES`, not in this SQL.

use casalytics_core::catalog::{EventCatalog, EventCategory};
use casalytics_core::insights::FUNNEL_STAGES;

use super::{event_in_predicate, QueryContext};
use crate::escape::escape_literal;

pub const STAGE_COUNTS: &str = "funnel.stage_counts";

/// Condition matching one stage. The terminal `conversion` stage matches any
/// event in the Conversion category; every other stage is a single canonical
/// event name.
fn stage_condition(stage: &str, catalog: &EventCatalog) -> String {
    if stage == "conversion" {
        event_in_predicate(&catalog.events_in(EventCategory::Conversion))
    } else {
        format!("event = '{}'", escape_literal(stage))
    }
}

pub fn stage_counts_sql(ctx: &QueryContext, catalog: &EventCatalog) -> String {
    let columns: Vec<String> = FUNNEL_STAGES
        .iter()
        .map(|(stage, _)| {
            format!(
                "uniqIf(properties.session_id, {condition}) AS {stage}",
                condition = stage_condition(stage, catalog),
            )
        })
        .collect();

    format!(
        "SELECT\n  {columns}\n\
         FROM events\n\
         WHERE {site}\n  {window}",
        columns = columns.join(",\n  "),
        site = ctx.site(),
        window = ctx.window(),
    )
}
