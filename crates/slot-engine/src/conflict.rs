//! Validate a proposed event placement against existing busy intervals.
//!
//! Adjacent events (where one ends exactly when another starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// A busy interval that a proposed placement collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub busy: Interval,
    pub overlap_minutes: i64,
}

/// Find every busy interval that `proposed` overlaps.
///
/// Two intervals overlap when `a.start < b.end && b.start < a.end`.
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
/// Malformed busy intervals are ignored. Conflicts are returned in
/// ascending order of the busy interval.
pub fn check_placement(proposed: &Interval, busy: &[Interval]) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = busy
        .iter()
        .filter(|b| b.is_valid() && proposed.overlaps(b))
        .map(|b| {
            let overlap_start = proposed.start.max(b.start);
            let overlap_end = proposed.end.min(b.end);
            Conflict {
                busy: *b,
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            }
        })
        .collect();

    conflicts.sort_by_key(|c| c.busy);
    conflicts
}
