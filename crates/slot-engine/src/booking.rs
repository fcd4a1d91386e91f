//! Booking and availability value types.
//!
//! These mirror the rows of the external booking and availability stores. The
//! engine only ever reads them; it never creates, mutates or persists a booking.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::overlap;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// A range is well formed when it ends strictly after it starts.
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// See [`overlap::ranges_overlap`].
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlap::ranges_overlap(self, other)
    }
}

/// Lifecycle state of a booking. Passed through untouched; the engine never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Planned,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    /// Any status string the store uses that is not listed above.
    #[serde(untagged)]
    Other(String),
}

/// A scheduled time range assigned to an owner (a trainer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Opaque identifier from the booking store.
    pub id: String,
    /// The resource being scheduled.
    pub owner_id: String,
    /// Human-readable label, carried through unchanged.
    #[serde(default)]
    pub title: String,
    #[serde(with = "instant")]
    pub start: DateTime<Utc>,
    #[serde(with = "instant")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_well_formed(&self) -> bool {
        self.range().is_valid()
    }
}

/// An interval an owner has declared about their availability.
///
/// Only windows with `available == true` are used for placing bookings.
/// Windows may overlap each other; they are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub owner_id: String,
    #[serde(with = "instant")]
    pub start: DateTime<Utc>,
    #[serde(with = "instant")]
    pub end: DateTime<Utc>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl AvailabilityWindow {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Parse an ISO 8601 string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (`2025-03-10T09:00:00+01:00`), naive datetimes
/// (`2025-03-10T09:00:00`, read as UTC) and bare dates (`2025-03-10`, midnight UTC).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ndt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| SlotError::InvalidDateTime(format!("'{}': {}", s, e)))
}

/// Serde adapter: lenient ISO 8601 on the way in, RFC 3339 on the way out.
mod instant {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_instant(&raw).map_err(serde::de::Error::custom)
    }
}

