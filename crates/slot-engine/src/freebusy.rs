//! Compute free time slots of a requested duration from busy interval lists.
//!
//! The scan walks a fixed grid anchored at the window start. Each grid point is
//! a candidate start; the candidate `[cursor, cursor + duration)` is free when
//! it overlaps no busy interval. The cursor advances by the step, not by the
//! duration, so a 90-minute request still probes every 30 minutes and the
//! emitted slots may overlap one another.

use std::iter;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SlotError};
use crate::interval::Interval;
use crate::window::WorkingWindow;

/// Scan granularity used by every caller unless configured otherwise.
pub const DEFAULT_STEP_MINUTES: i64 = 30;

/// A free time slot of exactly the requested duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Find every grid-aligned slot of `duration_minutes` inside `window` that
/// overlaps none of the `busy` intervals.
///
/// `busy` may be unsorted, may overlap itself and may contain duplicates.
/// Intervals with `start >= end` are skipped. Returns slots sorted by start.
/// A duration longer than the window yields an empty list, not an error.
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if `duration_minutes` or
/// `step_minutes` is not positive.
pub fn compute_free_slots(
    busy: &[Interval],
    window: &WorkingWindow,
    duration_minutes: i64,
    step_minutes: i64,
) -> Result<Vec<FreeSlot>> {
    validate_scan(duration_minutes, step_minutes)?;

    let valid = valid_busy(busy);
    let slots: Vec<FreeSlot> = scan(&valid, window, duration_minutes, step_minutes).collect();

    debug!(
        date = %window.date(),
        busy = valid.len(),
        duration_minutes,
        step_minutes,
        free = slots.len(),
        "computed free slots"
    );

    Ok(slots)
}

/// Find the earliest free slot of `duration_minutes` inside `window`.
///
/// Same rules as [`compute_free_slots`], but stops at the first hit.
pub fn find_first_free_slot(
    busy: &[Interval],
    window: &WorkingWindow,
    duration_minutes: i64,
    step_minutes: i64,
) -> Result<Option<FreeSlot>> {
    validate_scan(duration_minutes, step_minutes)?;

    let valid = valid_busy(busy);
    let first = scan(&valid, window, duration_minutes, step_minutes).next();
    Ok(first)
}

/// Lazily yield the free candidates on the grid `day_start + k * step`.
///
/// Arguments are already validated. A duration that cannot fit yields
/// nothing, and a step that runs past the representable range ends the scan
/// after the last reachable candidate.
fn scan<'a>(
    busy: &'a [Interval],
    window: &WorkingWindow,
    duration_minutes: i64,
    step_minutes: i64,
) -> impl Iterator<Item = FreeSlot> + 'a {
    let day_end = window.day_end();
    let duration = Duration::try_minutes(duration_minutes)
        .filter(|_| duration_minutes <= window.length_minutes());
    let step = Duration::try_minutes(step_minutes);
    let first = duration.map(|_| window.day_start());

    iter::successors(first, move |cursor| {
        step.and_then(|step| cursor.checked_add_signed(step))
    })
    .map_while(move |cursor| {
        let end = cursor.checked_add_signed(duration?)?;
        (end <= day_end).then_some(Interval { start: cursor, end })
    })
    .filter(move |candidate| !busy.iter().any(|b| candidate.overlaps(b)))
    .map(move |candidate| FreeSlot {
        start: candidate.start,
        end: candidate.end,
        duration_minutes,
    })
}

fn validate_scan(duration_minutes: i64, step_minutes: i64) -> Result<()> {
    if duration_minutes <= 0 {
        return Err(SlotError::InvalidArgument(format!(
            "duration_minutes must be positive, got {}",
            duration_minutes
        )));
    }
    if step_minutes <= 0 {
        return Err(SlotError::InvalidArgument(format!(
            "step_minutes must be positive, got {}",
            step_minutes
        )));
    }
    Ok(())
}

/// Drop malformed intervals, logging how many were discarded.
fn valid_busy(busy: &[Interval]) -> Vec<Interval> {
    let valid: Vec<Interval> = busy.iter().copied().filter(Interval::is_valid).collect();
    let dropped = busy.len() - valid.len();
    if dropped > 0 {
        warn!(dropped, "skipping busy intervals with start >= end");
    }
    valid
}
