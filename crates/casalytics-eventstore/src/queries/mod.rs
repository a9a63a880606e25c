//! Named query templates for the external event store.
//!
//! Every template reads from the virtual `events` table (columns `event`,
//! `timestamp`, nested `properties`) and embeds two mandatory pieces: the
//! tenant scope `properties.site = '…'` and a trailing time-window
//! predicate. Tabular templates alias their columns to `label`/`hits`, sort
//! `ORDER BY hits DESC` at the query layer, and bound output with `LIMIT`.

pub mod conversions;
pub mod funnel;
pub mod journeys;
pub mod overview;

use casalytics_core::error::InsightsError;
use casalytics_core::insights::InsightsQuery;

use crate::escape::escape_literal;
use crate::window::TimeWindow;

/// Validated, pre-rendered pieces shared by all templates of one request.
///
/// Construction is the fail-fast point: an empty `site_key` or a bad date
/// range is rejected here, before any query text exists to execute.
#[derive(Debug, Clone)]
pub struct QueryContext {
    site_predicate: String,
    window_predicate: String,
    limit: u32,
    offset: u32,
}

impl QueryContext {
    pub fn new(query: &InsightsQuery) -> Result<Self, InsightsError> {
        let site_key = query.site_key.trim();
        if site_key.is_empty() {
            return Err(InsightsError::MissingSiteKey);
        }
        let window = TimeWindow::resolve(query)?;
        Ok(Self {
            site_predicate: format!("properties.site = '{}'", escape_literal(site_key)),
            window_predicate: window.predicate(),
            limit: query.bounded_limit(),
            offset: query.offset(),
        })
    }

    pub fn site(&self) -> &str {
        &self.site_predicate
    }

    pub fn window(&self) -> &str {
        &self.window_predicate
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Render `event IN ('a', 'b', …)` from catalog names.
pub fn event_in_predicate(names: &[&str]) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|name| format!("'{}'", escape_literal(name)))
        .collect();
    format!("event IN ({})", quoted.join(", "))
}
