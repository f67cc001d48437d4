//! Property-based tests for the free slot scan using proptest.
//!
//! These tests verify invariants that should hold for *any* busy list,
//! window, duration and step, not just the scenarios in `freebusy_tests.rs`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::freebusy::compute_free_slots;
use slot_engine::{Interval, WorkingWindow};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
}

/// A window starting somewhere in the morning and lasting 1-11 hours.
fn arb_window() -> impl Strategy<Value = WorkingWindow> {
    (0u32..=12 * 60, 60u32..=11 * 60).prop_map(|(offset, length)| {
        let start = NaiveTime::MIN + Duration::minutes(offset.into());
        let end = start + Duration::minutes(length.into());
        WorkingWindow::for_date(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            start,
            end,
            chrono_tz::UTC,
        )
        .unwrap()
    })
}

/// Busy intervals anywhere across the day and a bit beyond. Lengths may be
/// zero or negative to exercise malformed input.
fn arb_busy() -> impl Strategy<Value = Interval> {
    (-120i64..=26 * 60, -60i64..=240).prop_map(|(offset, length)| {
        let start = midnight() + Duration::minutes(offset);
        Interval {
            start,
            end: start + Duration::minutes(length),
        }
    })
}

fn arb_busy_list() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec(arb_busy(), 0..12)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    1i64..=600
}

fn arb_step() -> impl Strategy<Value = i64> {
    prop_oneof![Just(30i64), 5i64..=120]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn slots_stay_inside_window(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        for slot in &slots {
            prop_assert!(slot.start >= window.day_start());
            prop_assert!(slot.end <= window.day_end());
        }
    }

    #[test]
    fn slots_never_overlap_valid_busy(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        for slot in &slots {
            for b in busy.iter().filter(|b| b.is_valid()) {
                prop_assert!(
                    !(slot.start < b.end && b.start < slot.end),
                    "slot {:?} overlaps busy {:?}", slot, b
                );
            }
        }
    }

    #[test]
    fn slots_have_exact_duration(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        for slot in &slots {
            prop_assert_eq!((slot.end - slot.start).num_minutes(), duration);
            prop_assert_eq!(slot.duration_minutes, duration);
        }
    }

    #[test]
    fn slots_are_grid_aligned(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        for slot in &slots {
            let offset = (slot.start - window.day_start()).num_minutes();
            prop_assert_eq!(offset % step, 0);
        }
    }

    #[test]
    fn slots_ascend_and_stop_before_last_fit(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
        let last_start = window.day_end() - Duration::minutes(duration);
        for slot in &slots {
            prop_assert!(slot.start <= last_start);
        }
    }

    #[test]
    fn infeasible_duration_is_empty(
        busy in arb_busy_list(),
        window in arb_window(),
        extra in 1i64..=300,
        step in arb_step(),
    ) {
        let duration = window.length_minutes() + extra;
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        prop_assert!(slots.is_empty());
    }

    #[test]
    fn oversized_duration_or_step_never_panics(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in prop_oneof![arb_duration(), 1i64 << 40..=i64::MAX],
        step in prop_oneof![arb_step(), 1i64 << 40..=i64::MAX],
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        prop_assert!(slots.len() <= 1 || step <= window.length_minutes());
        if duration > window.length_minutes() {
            prop_assert!(slots.is_empty());
        }
    }

    #[test]
    fn output_ignores_busy_order_and_duplicates(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let first = compute_free_slots(&busy, &window, duration, step).unwrap();

        let mut shuffled: Vec<Interval> = busy.iter().rev().copied().collect();
        shuffled.extend(busy.iter().copied());
        let second = compute_free_slots(&shuffled, &window, duration, step).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_skipped_grid_point_is_blocked(
        busy in arb_busy_list(),
        window in arb_window(),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let slots = compute_free_slots(&busy, &window, duration, step).unwrap();
        let emitted: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();

        let mut cursor = window.day_start();
        while cursor + Duration::minutes(duration) <= window.day_end() {
            if !emitted.contains(&cursor) {
                let candidate = Interval { start: cursor, end: cursor + Duration::minutes(duration) };
                prop_assert!(
                    busy.iter().any(|b| b.is_valid() && candidate.overlaps(b)),
                    "free candidate {:?} was not emitted", candidate
                );
            }
            cursor += Duration::minutes(step);
        }
    }
}
