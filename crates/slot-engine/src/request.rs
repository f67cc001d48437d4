//! Validated slot queries, built at the boundary from loosely typed payloads.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::{parse_time_of_day, AvailabilityConfig};
use crate::error::{Result, SlotError};
use crate::window::WorkingWindow;

/// Raw query as an agent sends it: `{date, duration_minutes}` with optional
/// `day_start`/`day_end` overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub date: String,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_end: Option<String>,
}

/// A query that has passed validation: the date parses and the duration is
/// positive.
///
/// `day_start`/`day_end` override the configured working hours; a missing
/// bound falls back to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub day_start: Option<NaiveTime>,
    pub day_end: Option<NaiveTime>,
}

impl SlotRequest {
    /// # Errors
    /// Returns `SlotError::InvalidArgument` if `duration_minutes <= 0`.
    pub fn new(date: NaiveDate, duration_minutes: i64) -> Result<Self> {
        if duration_minutes <= 0 {
            return Err(SlotError::InvalidArgument(format!(
                "duration_minutes must be a positive integer, got {}",
                duration_minutes
            )));
        }
        Ok(Self {
            date,
            duration_minutes,
            day_start: None,
            day_end: None,
        })
    }

    /// Override the configured working hours for this request only.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidArgument` if `start >= end`.
    pub fn with_hours(mut self, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidArgument(format!(
                "day_start {} must be before day_end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        self.day_start = Some(start);
        self.day_end = Some(end);
        Ok(self)
    }

    /// Resolve the working window, preferring the request's own hours over
    /// the configured ones.
    ///
    /// # Errors
    /// `InvalidArgument` if the resolved hours are inverted, `InvalidTimezone`
    /// if the configured zone is unknown.
    pub fn window(&self, config: &AvailabilityConfig) -> Result<WorkingWindow> {
        let start = self.day_start.unwrap_or(config.day_start);
        let end = self.day_end.unwrap_or(config.day_end);
        WorkingWindow::for_date(self.date, start, end, config.tz()?)
    }
}

impl TryFrom<&SlotQuery> for SlotRequest {
    type Error = SlotError;

    fn try_from(query: &SlotQuery) -> Result<Self> {
        let mut request = SlotRequest::new(parse_date(&query.date)?, query.duration_minutes)?;
        request.day_start = query.day_start.as_deref().map(parse_time_of_day).transpose()?;
        request.day_end = query.day_end.as_deref().map(parse_time_of_day).transpose()?;
        if let (Some(start), Some(end)) = (request.day_start, request.day_end) {
            return request.with_hours(start, end);
        }
        Ok(request)
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
/// Returns `SlotError::InvalidArgument` for anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidArgument(format!("invalid date '{}': {}", s, e)))
}
