//! Alternative-slot recommendation for a conflicting booking.
//!
//! Four candidate strategies run in a fixed order and all of them contribute:
//!
//! 1. the start of each declared availability window long enough to hold the booking,
//! 2. the booking moved one shift period earlier (never before today),
//! 3. the booking moved one shift period later,
//! 4. the first free day of a bounded forward scan starting tomorrow.
//!
//! Every candidate keeps the original duration and must not overlap any other
//! booking of the same owner. Accepted candidates are ranked by score, then by
//! earliest start, and truncated to the policy's limit. The result is advisory
//! only; nothing is written back.

use chrono::{DateTime, Days, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::booking::{AvailabilityWindow, Booking, TimeRange};
use crate::policy::RecommenderPolicy;

/// Which strategy produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStrategy {
    AvailabilityWindow,
    ShiftedEarlier,
    ShiftedLater,
    ForwardScan,
}

impl SuggestionStrategy {
    /// Stable machine-readable name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStrategy::AvailabilityWindow => "availability_window",
            SuggestionStrategy::ShiftedEarlier => "shifted_earlier",
            SuggestionStrategy::ShiftedLater => "shifted_later",
            SuggestionStrategy::ForwardScan => "forward_scan",
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            SuggestionStrategy::AvailabilityWindow => "confirmed availability window",
            SuggestionStrategy::ShiftedEarlier => "shifted one period earlier",
            SuggestionStrategy::ShiftedLater => "shifted one period later",
            SuggestionStrategy::ForwardScan => "first conflict-free slot found by forward search",
        }
    }

    pub fn score(self, policy: &RecommenderPolicy) -> u32 {
        match self {
            SuggestionStrategy::AvailabilityWindow => policy.scores.availability_window,
            SuggestionStrategy::ShiftedEarlier => policy.scores.shifted_earlier,
            SuggestionStrategy::ShiftedLater => policy.scores.shifted_later,
            SuggestionStrategy::ForwardScan => policy.scores.forward_scan,
        }
    }
}

/// A candidate replacement time range for one conflicting booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: u32,
    pub rationale: String,
    pub strategy: SuggestionStrategy,
}

impl Suggestion {
    fn new(range: TimeRange, strategy: SuggestionStrategy, policy: &RecommenderPolicy) -> Self {
        Self {
            start: range.start,
            end: range.end,
            score: strategy.score(policy),
            rationale: strategy.rationale().to_string(),
            strategy,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Propose up to `policy.max_suggestions` replacement slots for `booking`.
///
/// `bookings` and `windows` may contain entries for other owners; only those
/// sharing `booking.owner_id` are considered. The booking itself (matched by
/// id) is excluded from the overlap checks. `now` drives the "not in the past"
/// rule and the scan start.
///
/// "Not in the past" is judged by calendar day: an earlier slot starting any
/// time today (in the policy timezone) is accepted, even if `now` is later.
///
/// Candidates whose end would fall outside chrono's representable range are
/// dropped rather than proposed.
///
/// An empty result is a valid outcome (fully booked owner, no availability).
pub fn suggest_alternatives(
    booking: &Booking,
    bookings: &[Booking],
    windows: &[AvailabilityWindow],
    now: DateTime<Utc>,
    policy: &RecommenderPolicy,
) -> Vec<Suggestion> {
    if !booking.is_well_formed() {
        warn!(booking_id = %booking.id, "no suggestions for a booking whose end is not after its start");
        return Vec::new();
    }

    let duration = booking.duration();
    let others: Vec<TimeRange> = bookings
        .iter()
        .filter(|b| b.owner_id == booking.owner_id && b.id != booking.id)
        .map(Booking::range)
        .collect();
    let is_free = |candidate: &TimeRange| !others.iter().any(|other| candidate.overlaps(other));
    let today = policy.start_of_today(now);

    let mut candidates = Vec::new();

    for window in windows
        .iter()
        .filter(|w| w.available && w.owner_id == booking.owner_id)
    {
        let range = window.range();
        if !range.is_valid() {
            warn!(owner_id = %window.owner_id, start = %window.start, end = %window.end,
                "skipping availability window whose end is not after its start");
            continue;
        }
        if range.duration() < duration {
            continue;
        }
        let Some(candidate) = span(range.start, duration) else {
            continue;
        };
        if is_free(&candidate) {
            candidates.push(Suggestion::new(candidate, SuggestionStrategy::AvailabilityWindow, policy));
        } else {
            debug!(booking_id = %booking.id, start = %candidate.start, "availability window slot is taken");
        }
    }

    let period = i64::from(policy.shift_days);
    if let Some(earlier) = shifted(booking, -period, duration, policy) {
        if earlier.start < today {
            debug!(booking_id = %booking.id, start = %earlier.start, "earlier slot is in the past");
        } else if is_free(&earlier) {
            candidates.push(Suggestion::new(earlier, SuggestionStrategy::ShiftedEarlier, policy));
        }
    }

    if let Some(later) = shifted(booking, period, duration, policy) {
        if is_free(&later) {
            candidates.push(Suggestion::new(later, SuggestionStrategy::ShiftedLater, policy));
        }
    }

    match forward_scan(now, duration, policy, &is_free) {
        Some(slot) => candidates.push(Suggestion::new(slot, SuggestionStrategy::ForwardScan, policy)),
        None => debug!(booking_id = %booking.id, days = policy.scan_days, "forward scan found no free day"),
    }

    rank(candidates, policy.max_suggestions)
}

fn shifted(
    booking: &Booking,
    days: i64,
    duration: Duration,
    policy: &RecommenderPolicy,
) -> Option<TimeRange> {
    let start = policy.shift_calendar_days(booking.start, days)?;
    span(start, duration)
}

/// `[start, start + duration)`, or `None` if the end overflows.
fn span(start: DateTime<Utc>, duration: Duration) -> Option<TimeRange> {
    match start.checked_add_signed(duration) {
        Some(end) => Some(TimeRange::new(start, end)),
        None => {
            debug!(start = %start, "candidate end is out of range");
            None
        }
    }
}

/// Walk forward one day at a time from tomorrow's midnight, for at most
/// `policy.scan_days` days, returning the first slot that is free.
fn forward_scan(
    now: DateTime<Utc>,
    duration: Duration,
    policy: &RecommenderPolicy,
    is_free: impl Fn(&TimeRange) -> bool,
) -> Option<TimeRange> {
    let today = policy.calendar_date(now);
    (1..=u64::from(policy.scan_days))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|date| span(policy.start_of_day(date), duration))
        .find(|candidate| is_free(candidate))
}

/// Sort best first (score descending, then earliest start), drop duplicate
/// ranges keeping the better-scored copy, and keep at most `limit`.
fn rank(mut candidates: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.start.cmp(&b.start)));

    let mut ranked: Vec<Suggestion> = Vec::with_capacity(limit);
    for candidate in candidates {
        if ranked.len() == limit {
            break;
        }
        if ranked
            .iter()
            .any(|kept| kept.start == candidate.start && kept.end == candidate.end)
        {
            continue;
        }
        ranked.push(candidate);
    }
    ranked
}
