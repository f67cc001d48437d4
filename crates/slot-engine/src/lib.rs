//! # slot-engine
//!
//! Deterministic free-slot computation for calendar planning agents.
//!
//! Given the busy intervals of a day and a requested duration, the engine
//! scans the working window on a fixed grid and reports every slot of that
//! duration that collides with nothing. Planning agents call it to find open
//! time, validate a proposed placement, and avoid double-booking across
//! several calendar providers.
//!
//! ## Modules
//!
//! - [`freebusy`] — Fixed-grid free-slot scan
//! - [`interval`] — Half-open intervals and busy-period merging
//! - [`window`] — Working-hours boundary for one day
//! - [`conflict`] — Check a proposed placement against busy time
//! - [`request`] — Validated slot queries
//! - [`source`] — Busy interval providers (`BusySource`)
//! - [`format`] — Agent-facing response records and activity suggestions
//! - [`service`] — End-to-end query pipeline
//! - [`config`] — Working-hours policy
//! - [`error`] — Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod format;
pub mod freebusy;
pub mod interval;
pub mod request;
pub mod service;
pub mod source;
pub mod window;

pub use config::AvailabilityConfig;
pub use conflict::{check_placement, Conflict};
pub use error::SlotError;
pub use format::{
    ActivitySuggestions, AvailableSlots, DayListing, ErrorResponse, SlotRecord, SlotResponse,
    SuggestionResponse, TimeOfDay,
};
pub use freebusy::{compute_free_slots, find_first_free_slot, FreeSlot, DEFAULT_STEP_MINUTES};
pub use interval::{merge_busy_periods, Interval};
pub use request::{SlotQuery, SlotRequest};
pub use service::AvailabilityService;
pub use source::{BusySource, FnSource, MultiSource, RawBusyInterval, StaticSource};
pub use window::WorkingWindow;
