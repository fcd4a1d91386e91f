//! The overlap predicate shared by conflict detection and slot recommendation.
//!
//! Boundaries are inclusive: a range ending exactly when another starts counts
//! as overlapping it. Malformed ranges (`end <= start`) overlap nothing.

use chrono::Duration;

use crate::booking::{Booking, TimeRange};

/// Two ranges overlap iff `a.start <= b.end && b.start <= a.end`.
///
/// Touching endpoints count. Returns `false` if either range is malformed.
pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    a.is_valid() && b.is_valid() && a.start <= b.end && b.start <= a.end
}

/// Overlap test on the time ranges of two bookings. Owners are not compared.
pub fn bookings_overlap(a: &Booking, b: &Booking) -> bool {
    ranges_overlap(&a.range(), &b.range())
}

/// Length of the intersection of two ranges.
///
/// Zero when the ranges do not overlap or only touch at an endpoint.
pub fn overlap_duration(a: &TimeRange, b: &TimeRange) -> Duration {
    if !ranges_overlap(a, b) {
        return Duration::zero();
    }
    a.end.min(b.end) - a.start.max(b.start)
}
