//! Agent-facing response records.
//!
//! Field names here are a wire contract: downstream agents pattern-match on
//! `date`, `available_slots`, `count` and `error`.

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::freebusy::FreeSlot;
use crate::interval::Interval;

/// One free slot rendered for an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

impl SlotRecord {
    /// Render a slot with RFC 3339 strings in the local zone `tz`.
    pub fn from_slot(slot: &FreeSlot, tz: Tz) -> Self {
        Self {
            start: slot.start.with_timezone(&tz).to_rfc3339(),
            end: slot.end.with_timezone(&tz).to_rfc3339(),
            duration_minutes: slot.duration_minutes,
        }
    }
}

/// `{ date, available_slots, count }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub date: String,
    pub available_slots: Vec<SlotRecord>,
    /// Total number of free slots found, before any presentation cap.
    pub count: usize,
}

/// `{ error }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&SlotError> for ErrorResponse {
    fn from(e: &SlotError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotResponse {
    Available(AvailableSlots),
    Error(ErrorResponse),
}

impl SlotResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, SlotResponse::Error(_))
    }
}

impl From<SlotError> for SlotResponse {
    fn from(e: SlotError) -> Self {
        SlotResponse::Error(ErrorResponse::from(&e))
    }
}

/// Coarse time-of-day band used to pick activity suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// `[6, 12)`
    Morning,
    /// `[12, 18)`
    Afternoon,
    /// `[18, 24)` and `[0, 6)`
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn of<T: Timelike>(time: &T) -> Self {
        Self::from_hour(time.hour())
    }

    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            TimeOfDay::Morning => MORNING_SUGGESTIONS,
            TimeOfDay::Afternoon => AFTERNOON_SUGGESTIONS,
            TimeOfDay::Evening => EVENING_SUGGESTIONS,
        }
    }
}

const MORNING_SUGGESTIONS: &[&str] = &[
    "Morning workout or run",
    "Deep-focus work session",
    "Meditation or journaling",
];

const AFTERNOON_SUGGESTIONS: &[&str] = &[
    "Walk or light exercise",
    "Meetings or collaborative work",
    "Errands and admin tasks",
];

const EVENING_SUGGESTIONS: &[&str] = &[
    "Reading or a hobby",
    "Time with family or friends",
    "Wind-down routine and planning for tomorrow",
];

/// Free slots plus activity ideas for the current time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySuggestions {
    pub date: String,
    pub available_slots: Vec<SlotRecord>,
    pub count: usize,
    pub time_of_day: TimeOfDay,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionResponse {
    Suggested(ActivitySuggestions),
    Error(ErrorResponse),
}

impl SuggestionResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, SuggestionResponse::Error(_))
    }
}

impl From<SlotError> for SuggestionResponse {
    fn from(e: SlotError) -> Self {
        SuggestionResponse::Error(ErrorResponse::from(&e))
    }
}

/// A busy block rendered for a day listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyRecord {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

/// `{ date, busy_blocks, count }` for the full-day listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayListing {
    pub date: String,
    pub busy_blocks: Vec<BusyRecord>,
    pub count: usize,
}

pub fn format_day(date: NaiveDate, busy: &[Interval], tz: Tz) -> DayListing {
    DayListing {
        date: date.format("%Y-%m-%d").to_string(),
        busy_blocks: busy
            .iter()
            .map(|b| BusyRecord {
                start: b.start.with_timezone(&tz).to_rfc3339(),
                end: b.end.with_timezone(&tz).to_rfc3339(),
                duration_minutes: b.duration_minutes(),
            })
            .collect(),
        count: busy.len(),
    }
}

/// Render `slots` for `date`, keeping at most `limit` records. `count` always
/// reports the full number of slots.
pub fn format_slots(
    date: NaiveDate,
    slots: &[FreeSlot],
    tz: Tz,
    limit: Option<usize>,
) -> AvailableSlots {
    let shown = limit.unwrap_or(slots.len()).min(slots.len());
    AvailableSlots {
        date: date.format("%Y-%m-%d").to_string(),
        available_slots: slots[..shown]
            .iter()
            .map(|s| SlotRecord::from_slot(s, tz))
            .collect(),
        count: slots.len(),
    }
}

/// Attach the suggestions for `band` to a capped slot listing.
pub fn format_suggestions(
    date: NaiveDate,
    slots: &[FreeSlot],
    tz: Tz,
    limit: usize,
    band: TimeOfDay,
) -> ActivitySuggestions {
    let listing = format_slots(date, slots, tz, Some(limit));
    ActivitySuggestions {
        date: listing.date,
        available_slots: listing.available_slots,
        count: listing.count,
        time_of_day: band,
        suggestions: band.suggestions().iter().map(|s| s.to_string()).collect(),
    }
}
