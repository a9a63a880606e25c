pub mod conversions;
pub mod funnel;
pub mod health;
pub mod journeys;
pub mod overview;

use chrono::NaiveDate;
use serde::Deserialize;

use casalytics_core::insights::{DateFilter, InsightsQuery};

use crate::error::AppError;

/// Query parameters shared by every insights endpoint.
///
/// `site_key` is optional at the HTTP layer so its absence reaches the
/// service and is rejected there, before any outbound query — keeping the
/// fail-fast guarantee in one place.
#[derive(Debug, Deserialize)]
pub struct InsightsParams {
    pub site_key: Option<String>,
    pub date_filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl InsightsParams {
    pub fn into_query(self) -> Result<InsightsQuery, AppError> {
        let date_filter = DateFilter::parse(self.date_filter.as_deref())
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(InsightsQuery {
            site_key: self.site_key.unwrap_or_default(),
            date_filter,
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{field} must be formatted YYYY-MM-DD"))),
    }
}
