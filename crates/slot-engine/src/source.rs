//! Busy interval suppliers.
//!
//! The engine does not care whether busy time comes from a remote calendar
//! service or a local event store. Anything that can list busy intervals for a
//! range implements [`BusySource`]; [`MultiSource`] fans a query out to several
//! of them so double-booking is avoided across providers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SlotError};
use crate::interval::Interval;

/// A calendar provider as seen by the engine.
pub trait BusySource: Send + Sync {
    /// Short identifier used in logs and error messages (e.g. "google", "local").
    fn name(&self) -> &str;

    /// List the busy intervals that intersect `range`.
    ///
    /// # Errors
    /// Implementations report provider failures as
    /// `SlotError::UpstreamUnavailable`.
    fn list_busy_intervals(&self, range: Interval) -> Result<Vec<Interval>>;
}

impl<S: BusySource + ?Sized> BusySource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_busy_intervals(&self, range: Interval) -> Result<Vec<Interval>> {
        (**self).list_busy_intervals(range)
    }
}

/// An in-memory event list, e.g. the local event store or intervals handed
/// over by a host that already queried its provider.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    intervals: Vec<Interval>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    /// Build a source from provider records, dropping malformed ones.
    pub fn from_raw(name: impl Into<String>, raw: &[RawBusyInterval], tz: Tz) -> Self {
        let name = name.into();
        let parsed = parse_busy_intervals(raw, tz);
        if parsed.dropped > 0 {
            warn!(source = %name, dropped = parsed.dropped, "dropped malformed busy intervals");
        }
        Self::new(name, parsed.intervals)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }
}

impl BusySource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_busy_intervals(&self, range: Interval) -> Result<Vec<Interval>> {
        Ok(self
            .intervals
            .iter()
            .filter(|i| i.start < range.end && range.start < i.end)
            .copied()
            .collect())
    }
}

/// Adapts a closure, typically wrapping a provider client, into a source.
pub struct FnSource<F> {
    name: String,
    list: F,
}

impl<F> FnSource<F>
where
    F: Fn(Interval) -> Result<Vec<Interval>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, list: F) -> Self {
        Self {
            name: name.into(),
            list,
        }
    }
}

impl<F> BusySource for FnSource<F>
where
    F: Fn(Interval) -> Result<Vec<Interval>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn list_busy_intervals(&self, range: Interval) -> Result<Vec<Interval>> {
        (self.list)(range)
    }
}

/// Queries every inner source and concatenates their intervals.
///
/// One failing source fails the whole query.
#[derive(Default)]
pub struct MultiSource {
    sources: Vec<Box<dyn BusySource>>,
}

impl MultiSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl BusySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl BusySource for MultiSource {
    fn name(&self) -> &str {
        "multi"
    }

    fn list_busy_intervals(&self, range: Interval) -> Result<Vec<Interval>> {
        let mut all = Vec::new();
        for source in &self.sources {
            let intervals = source.list_busy_intervals(range).map_err(|e| match e {
                SlotError::UpstreamUnavailable { .. } => e,
                other => SlotError::UpstreamUnavailable {
                    source_name: source.name().to_string(),
                    reason: other.to_string(),
                },
            })?;
            debug!(source = source.name(), count = intervals.len(), "listed busy intervals");
            all.extend(intervals);
        }
        Ok(all)
    }
}

/// A busy interval as a provider reports it. Fields may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBusyInterval {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl RawBusyInterval {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// Result of lenient parsing: the usable intervals and how many were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBusy {
    pub intervals: Vec<Interval>,
    pub dropped: usize,
}

/// Parse provider records, skipping malformed ones in input order.
pub fn parse_busy_intervals(raw: &[RawBusyInterval], tz: Tz) -> ParsedBusy {
    let mut parsed = ParsedBusy::default();
    for record in raw {
        match parse_busy_interval(record, tz) {
            Ok(interval) => parsed.intervals.push(interval),
            Err(e) => {
                debug!(error = %e, "skipping busy interval");
                parsed.dropped += 1;
            }
        }
    }
    parsed
}

/// Parse one provider record.
///
/// # Errors
/// Returns `SlotError::MalformedBusyInterval` for a missing field, an
/// unparseable datetime or `start >= end`.
pub fn parse_busy_interval(raw: &RawBusyInterval, tz: Tz) -> Result<Interval> {
    let start = raw
        .start
        .as_deref()
        .ok_or_else(|| SlotError::MalformedBusyInterval("missing start".to_string()))?;
    let end = raw
        .end
        .as_deref()
        .ok_or_else(|| SlotError::MalformedBusyInterval("missing end".to_string()))?;

    let start = parse_datetime(start, tz)
        .map_err(|e| SlotError::MalformedBusyInterval(e.to_string()))?;
    let end =
        parse_datetime(end, tz).map_err(|e| SlotError::MalformedBusyInterval(e.to_string()))?;

    Interval::new(start, end)
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset), a naive datetime interpreted in `tz`, or a
/// bare date meaning local midnight (all-day events).
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if no format matches or the local
/// time does not exist in `tz`.
pub fn parse_datetime(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    // Try RFC 3339 first (has timezone info).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| SlotError::InvalidArgument(format!("invalid datetime '{}': {}", s, e)))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::InvalidArgument(format!("'{}' does not exist in {}", s, tz.name()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_naive_and_date_forms() {
        let tz = chrono_tz::Europe::Berlin;
        let rfc = parse_datetime("2026-03-02T09:00:00+01:00", tz).unwrap();
        let naive = parse_datetime("2026-03-02T09:00:00", tz).unwrap();
        let short = parse_datetime("2026-03-02T09:00", tz).unwrap();
        assert_eq!(rfc, naive);
        assert_eq!(naive, short);
        let midnight = parse_datetime("2026-03-02", tz).unwrap();
        assert_eq!(midnight.to_rfc3339(), "2026-03-01T23:00:00+00:00");
    }

    #[test]
    fn missing_fields_are_malformed() {
        let raw = RawBusyInterval {
            start: Some("2026-03-02T09:00:00Z".to_string()),
            end: None,
        };
        assert!(matches!(
            parse_busy_interval(&raw, chrono_tz::UTC),
            Err(SlotError::MalformedBusyInterval(_))
        ));
    }

    #[test]
    fn lenient_parse_counts_drops() {
        let raw = vec![
            RawBusyInterval::new("2026-03-02T09:00:00Z", "2026-03-02T10:00:00Z"),
            RawBusyInterval::new("2026-03-02T11:00:00Z", "2026-03-02T10:00:00Z"),
            RawBusyInterval::new("soon", "later"),
            RawBusyInterval::default(),
        ];
        let parsed = parse_busy_intervals(&raw, chrono_tz::UTC);
        assert_eq!(parsed.intervals.len(), 1);
        assert_eq!(parsed.dropped, 3);
    }
}
