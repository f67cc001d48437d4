//! Half-open time intervals and busy-period merging.
//!
//! Every interval in this crate is `[start, end)`: an interval ending at 10:00
//! and one starting at 10:00 touch but do not overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A closed-open `[start, end)` range of absolute instants.
///
/// Fields are public so that providers can hand over whatever they received;
/// [`Interval::is_valid`] tells the engine whether an interval takes part in
/// the scan. Use [`Interval::new`] to enforce `start < end` at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns `SlotError::MalformedBusyInterval` for empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let interval = Self { start, end };
        if interval.is_valid() {
            Ok(interval)
        } else {
            Err(SlotError::MalformedBusyInterval(format!(
                "start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Half-open overlap test: `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
    ///
    /// Touching intervals (`b == c`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Merge overlapping or adjacent busy periods, clipped to `window`.
///
/// Malformed intervals and intervals entirely outside the window are dropped.
/// Returns a sorted, non-overlapping list.
pub fn merge_busy_periods(busy: &[Interval], window: Interval) -> Vec<Interval> {
    let mut clipped: Vec<Interval> = busy
        .iter()
        .filter(|b| b.is_valid() && b.overlaps(&window))
        .map(|b| Interval {
            start: b.start.max(window.start),
            end: b.end.min(window.end),
        })
        .collect();
    clipped.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(clipped.len());
    for block in clipped {
        match merged.last_mut() {
            // Half-open blocks that touch still form one busy stretch.
            Some(current) if block.start <= current.end => {
                current.end = current.end.max(block.end);
            }
            _ => merged.push(block),
        }
    }
    merged
}
