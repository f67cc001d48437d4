//! Working-hours policy passed explicitly into the engine.
//!
//! Defaults: 06:00–22:00, 30-minute scan step, 5 presented slots, UTC.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::freebusy::DEFAULT_STEP_MINUTES;

pub const DEFAULT_MAX_PRESENTED_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Local start of the working window, `"HH:MM"`.
    #[serde(with = "hhmm")]
    pub day_start: NaiveTime,
    /// Local end of the working window, `"HH:MM"`.
    #[serde(with = "hhmm")]
    pub day_end: NaiveTime,
    pub step_minutes: i64,
    /// Cap on slots shown in a response; `count` still reports the total.
    pub max_presented_slots: usize,
    /// IANA zone used to interpret dates and naive datetimes.
    pub timezone: String,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            step_minutes: DEFAULT_STEP_MINUTES,
            max_presented_slots: DEFAULT_MAX_PRESENTED_SLOTS,
            timezone: "UTC".to_string(),
        }
    }
}

impl AvailabilityConfig {
    /// Check the policy before any query runs.
    ///
    /// # Errors
    /// `InvalidArgument` for inverted hours or a non-positive step;
    /// `InvalidTimezone` for an unknown zone name.
    pub fn validate(&self) -> Result<()> {
        if self.day_start >= self.day_end {
            return Err(SlotError::InvalidArgument(format!(
                "day_start {} must be before day_end {}",
                self.day_start.format("%H:%M"),
                self.day_end.format("%H:%M")
            )));
        }
        if self.step_minutes <= 0 {
            return Err(SlotError::InvalidArgument(format!(
                "step_minutes must be positive, got {}",
                self.step_minutes
            )));
        }
        self.tz().map(|_| ())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.timezone.clone()))
    }
}

/// Parse a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| SlotError::InvalidArgument(format!("invalid time of day '{}': {}", s, e)))
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }
}
