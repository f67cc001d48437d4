//! Query pipeline: validate request → build window → ask the busy source →
//! scan → format.
//!
//! Every agent-facing operation returns a well-formed response object, even
//! when validation or the upstream provider fails.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, instrument, warn};

use crate::config::AvailabilityConfig;
use crate::conflict::{self, Conflict};
use crate::error::{Result, SlotError};
use crate::format::{self, DayListing, SlotResponse, SuggestionResponse, TimeOfDay};
use crate::freebusy::{self, FreeSlot};
use crate::interval::{self, Interval};
use crate::request::{SlotQuery, SlotRequest};
use crate::source::BusySource;
use crate::window::WorkingWindow;

/// Availability queries against one busy source under one policy.
#[derive(Debug, Clone)]
pub struct AvailabilityService<S> {
    source: S,
    config: AvailabilityConfig,
    tz: Tz,
}

impl<S: BusySource> AvailabilityService<S> {
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn new(source: S, config: AvailabilityConfig) -> Result<Self> {
        config.validate()?;
        let tz = config.tz()?;
        Ok(Self { source, config, tz })
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Free slots for a validated request, unformatted.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub fn free_slots(&self, request: &SlotRequest) -> Result<Vec<FreeSlot>> {
        let window = request.window(&self.config)?;
        let busy = self.busy_in(&window)?;
        freebusy::compute_free_slots(
            &busy,
            &window,
            request.duration_minutes,
            self.config.step_minutes,
        )
    }

    /// `{date, available_slots, count}` or `{error}` for a raw agent query.
    pub fn available_slots(&self, query: &SlotQuery) -> SlotResponse {
        match SlotRequest::try_from(query) {
            Ok(request) => self.available_slots_for(&request),
            Err(e) => reject(e).into(),
        }
    }

    pub fn available_slots_for(&self, request: &SlotRequest) -> SlotResponse {
        match self.free_slots(request) {
            Ok(slots) => SlotResponse::Available(format::format_slots(
                request.date,
                &slots,
                self.tz,
                None,
            )),
            Err(e) => reject(e).into(),
        }
    }

    /// Free slots capped for presentation, plus activity ideas.
    ///
    /// The band comes from `now` (the current wall-clock time in the
    /// configured zone), not from the slots themselves.
    pub fn suggest_activities(&self, query: &SlotQuery, now: DateTime<Utc>) -> SuggestionResponse {
        let request = match SlotRequest::try_from(query) {
            Ok(request) => request,
            Err(e) => return reject(e).into(),
        };
        match self.free_slots(&request) {
            Ok(slots) => {
                let band = TimeOfDay::of(&now.with_timezone(&self.tz));
                debug!(?band, total = slots.len(), "suggesting activities");
                SuggestionResponse::Suggested(format::format_suggestions(
                    request.date,
                    &slots,
                    self.tz,
                    self.config.max_presented_slots,
                    band,
                ))
            }
            Err(e) => reject(e).into(),
        }
    }

    /// Earliest opening for the request, if any.
    pub fn first_available(&self, request: &SlotRequest) -> Result<Option<FreeSlot>> {
        let window = request.window(&self.config)?;
        let busy = self.busy_in(&window)?;
        freebusy::find_first_free_slot(
            &busy,
            &window,
            request.duration_minutes,
            self.config.step_minutes,
        )
    }

    /// Busy intervals a proposed event would collide with. Empty means the
    /// placement is free.
    ///
    /// # Errors
    /// `InvalidArgument` if `proposed` is empty or inverted; provider errors
    /// are passed through.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub fn check_placement(&self, proposed: Interval) -> Result<Vec<Conflict>> {
        if !proposed.is_valid() {
            return Err(SlotError::InvalidArgument(format!(
                "proposed start {} is not before end {}",
                proposed.start.to_rfc3339(),
                proposed.end.to_rfc3339()
            )));
        }
        let busy = self.source.list_busy_intervals(proposed)?;
        Ok(conflict::check_placement(&proposed, &busy))
    }

    /// Merged busy blocks over the whole day (00:00–23:59 local).
    pub fn list_day(&self, date: NaiveDate) -> Result<DayListing> {
        let window = WorkingWindow::full_day(date, self.tz)?;
        let busy = self.busy_in(&window)?;
        let merged = interval::merge_busy_periods(&busy, window.as_interval());
        Ok(format::format_day(date, &merged, self.tz))
    }

    fn busy_in(&self, window: &WorkingWindow) -> Result<Vec<Interval>> {
        let busy = self.source.list_busy_intervals(window.as_interval())?;
        debug!(source = self.source.name(), count = busy.len(), "fetched busy intervals");
        Ok(busy)
    }
}

fn reject(e: SlotError) -> SlotError {
    warn!(error = %e, "availability query failed");
    e
}
