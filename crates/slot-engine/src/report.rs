//! Per-owner conflict report: the engine's entry point and its wire payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::booking::{AvailabilityWindow, Booking};
use crate::conflict::find_conflicting_bookings;
use crate::error::Result;
use crate::policy::RecommenderPolicy;
use crate::recommender::{suggest_alternatives, Suggestion};
use crate::store::ScheduleStore;

/// One conflicting booking and its ranked alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEntry {
    pub booking: Booking,
    pub suggestions: Vec<Suggestion>,
}

/// Every conflicting booking of one owner, in booking-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictReport {
    pub owner_id: String,
    pub conflicts: Vec<ConflictEntry>,
}

/// How instants are rendered in a [`ReportPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `YYYY-MM-DD` in the policy timezone.
    #[default]
    Date,
    /// Full RFC 3339 in UTC.
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub conflicts: Vec<ConflictPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPayload {
    pub booking_id: String,
    pub title: String,
    pub current_start: String,
    pub current_end: String,
    pub suggestions: Vec<SuggestionPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPayload {
    pub start: String,
    pub end: String,
    pub score: u32,
    pub rationale: String,
}

/// Build the conflict report for `owner_id` from already-fetched lists.
///
/// Both lists are filtered to `owner_id` (and to `available` windows) first,
/// so passing a multi-owner export is safe.
pub fn build_report(
    owner_id: &str,
    bookings: &[Booking],
    windows: &[AvailabilityWindow],
    now: DateTime<Utc>,
    policy: &RecommenderPolicy,
) -> ConflictReport {
    let owned: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.owner_id == owner_id)
        .cloned()
        .collect();
    if owned.len() < bookings.len() {
        debug!(
            owner_id,
            skipped = bookings.len() - owned.len(),
            "dropped bookings belonging to other owners"
        );
    }
    let owned_windows: Vec<AvailabilityWindow> = windows
        .iter()
        .filter(|w| w.owner_id == owner_id && w.available)
        .cloned()
        .collect();

    let conflicts: Vec<ConflictEntry> = find_conflicting_bookings(&owned)
        .into_iter()
        .map(|booking| {
            let suggestions = suggest_alternatives(&booking, &owned, &owned_windows, now, policy);
            ConflictEntry {
                booking,
                suggestions,
            }
        })
        .collect();

    info!(
        owner_id,
        bookings = owned.len(),
        windows = owned_windows.len(),
        conflicts = conflicts.len(),
        "built conflict report"
    );

    ConflictReport {
        owner_id: owner_id.to_string(),
        conflicts,
    }
}

/// Fetch one owner's bookings and availability from `store` and build the report.
///
/// # Errors
/// Returns `SlotError::InvalidPolicy` for an unusable policy and propagates any
/// store error unchanged; nothing is partially computed.
pub fn analyze_owner<S: ScheduleStore + ?Sized>(
    store: &S,
    owner_id: &str,
    now: DateTime<Utc>,
    policy: &RecommenderPolicy,
) -> Result<ConflictReport> {
    policy.validate()?;
    let bookings = store.bookings_for(owner_id)?;
    let windows = store.availability_for(owner_id)?;
    Ok(build_report(owner_id, &bookings, &windows, now, policy))
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Render the report as the `{ conflicts: [...] }` payload sent to callers.
    pub fn to_payload(&self, format: DateFormat, policy: &RecommenderPolicy) -> ReportPayload {
        let render = |instant: DateTime<Utc>| match format {
            DateFormat::Date => policy.calendar_date(instant).format("%Y-%m-%d").to_string(),
            DateFormat::DateTime => instant.to_rfc3339(),
        };

        ReportPayload {
            conflicts: self
                .conflicts
                .iter()
                .map(|entry| ConflictPayload {
                    booking_id: entry.booking.id.clone(),
                    title: entry.booking.title.clone(),
                    current_start: render(entry.booking.start),
                    current_end: render(entry.booking.end),
                    suggestions: entry
                        .suggestions
                        .iter()
                        .map(|s| SuggestionPayload {
                            start: render(s.start),
                            end: render(s.end),
                            score: s.score,
                            rationale: s.rationale.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
