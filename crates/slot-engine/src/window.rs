//! Working-hours boundary for a single calendar day.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::interval::Interval;

/// The allowed boundary for one calendar date.
///
/// Both bounds are absolute instants resolved from wall-clock times on `date`
/// in the query's zone. Windows are only built through [`WorkingWindow::for_date`]
/// and [`WorkingWindow::full_day`], so `day_start < day_end` always holds and
/// both bounds belong to `date` locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    date: NaiveDate,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
}

impl WorkingWindow {
    /// Build the window `[start, end)` on `date`, interpreting both wall-clock
    /// times in `tz`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidArgument` if the bounds are inverted or a
    /// bound falls into a DST gap.
    pub fn for_date(date: NaiveDate, start: NaiveTime, end: NaiveTime, tz: Tz) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidArgument(format!(
                "working hours {} - {} are inverted",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        let day_start = local_instant(date, start, tz)?;
        let day_end = local_instant(date, end, tz)?;
        if day_start >= day_end {
            // Wall-clock order need not survive a DST fold.
            return Err(SlotError::InvalidArgument(format!(
                "working window {} - {} on {} is empty in {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                date,
                tz.name()
            )));
        }
        Ok(Self {
            date,
            day_start,
            day_end,
        })
    }

    /// The listing window `00:00`–`23:59` on `date`.
    pub fn full_day(date: NaiveDate, tz: Tz) -> Result<Self> {
        Self::for_date(date, NaiveTime::MIN, full_day_end(), tz)
    }

    /// Local calendar date the window was built for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_start(&self) -> DateTime<Utc> {
        self.day_start
    }

    pub fn day_end(&self) -> DateTime<Utc> {
        self.day_end
    }

    pub fn length_minutes(&self) -> i64 {
        (self.day_end - self.day_start).num_minutes()
    }

    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.day_start,
            end: self.day_end,
        }
    }
}

fn full_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::InvalidArgument(format!(
                "{} {} does not exist in {}",
                date,
                time.format("%H:%M"),
                tz.name()
            ))
        })
}
