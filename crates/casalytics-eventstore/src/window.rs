//! Time-window resolution.
//!
//! Every query template ends with a trailing time-window predicate. The
//! window comes from the request's `date_filter`: the relative filters map to
//! trailing day counts, `custom` requires an explicit inclusive date range,
//! and no filter at all means the default trailing 30 days.

use chrono::NaiveDate;

use casalytics_core::error::InsightsError;
use casalytics_core::insights::{DateFilter, InsightsQuery, DEFAULT_WINDOW_DAYS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeWindow {
    /// `timestamp >= now() - INTERVAL days DAY`
    Trailing { days: u32 },
    /// Inclusive calendar dates; rendered with an exclusive upper bound one
    /// day past `end` so the whole end date is covered.
    Between { start: NaiveDate, end: NaiveDate },
}

impl TimeWindow {
    pub fn resolve(query: &InsightsQuery) -> Result<Self, InsightsError> {
        match query.date_filter {
            None => Ok(Self::Trailing {
                days: DEFAULT_WINDOW_DAYS,
            }),
            Some(DateFilter::Day) => Ok(Self::Trailing { days: 1 }),
            Some(DateFilter::Week) => Ok(Self::Trailing { days: 7 }),
            Some(DateFilter::Month) => Ok(Self::Trailing { days: 30 }),
            Some(DateFilter::Custom) => {
                let start = query.start_date.ok_or_else(|| {
                    InsightsError::InvalidDateRange(
                        "start_date is required for date_filter=custom".to_string(),
                    )
                })?;
                let end = query.end_date.ok_or_else(|| {
                    InsightsError::InvalidDateRange(
                        "end_date is required for date_filter=custom".to_string(),
                    )
                })?;
                if end < start {
                    return Err(InsightsError::InvalidDateRange(
                        "end_date must be on or after start_date".to_string(),
                    ));
                }
                Ok(Self::Between { start, end })
            }
        }
    }

    /// The `AND timestamp …` fragment appended to every template's WHERE
    /// clause. Dates render through a fixed `%Y-%m-%d` format, so no
    /// caller-controlled text reaches the query here.
    pub fn predicate(&self) -> String {
        match self {
            TimeWindow::Trailing { days } => {
                format!("AND timestamp >= now() - INTERVAL {days} DAY")
            }
            TimeWindow::Between { start, end } => {
                let end_next = *end + chrono::Duration::days(1);
                format!(
                    "AND timestamp >= toDateTime('{} 00:00:00') AND timestamp < toDateTime('{} 00:00:00')",
                    start.format("%Y-%m-%d"),
                    end_next.format("%Y-%m-%d")
                )
            }
        }
    }
}
