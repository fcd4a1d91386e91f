//! Scoring constants and the recommender policy.
//!
//! The constants are the reference policy. A deployment can override any of
//! them through [`RecommenderPolicy`], which deserializes with per-field
//! defaults so a config file only needs the values it changes.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Score for a slot placed at the start of a declared availability window.
pub const AVAILABILITY_WINDOW_SCORE: u32 = 95;
/// Score for the booking moved one period earlier.
pub const SHIFT_EARLIER_SCORE: u32 = 80;
/// Score for the booking moved one period later.
pub const SHIFT_LATER_SCORE: u32 = 75;
/// Score for the first free day found by the forward scan.
pub const FORWARD_SCAN_SCORE: u32 = 60;
/// Length of one shift period, in calendar days.
pub const SHIFT_DAYS: u32 = 7;
/// Upper bound on the forward scan, in days.
pub const SCAN_DAYS: u32 = 90;
/// Largest `scan_days` a policy may configure (about ten years).
pub const MAX_SCAN_DAYS: u32 = 3660;
/// Suggestions returned per conflicting booking.
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreTable {
    pub availability_window: u32,
    pub shifted_earlier: u32,
    pub shifted_later: u32,
    pub forward_scan: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            availability_window: AVAILABILITY_WINDOW_SCORE,
            shifted_earlier: SHIFT_EARLIER_SCORE,
            shifted_later: SHIFT_LATER_SCORE,
            forward_scan: FORWARD_SCAN_SCORE,
        }
    }
}

/// Tunables for [`crate::recommender::suggest_alternatives`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommenderPolicy {
    pub shift_days: u32,
    pub scan_days: u32,
    pub max_suggestions: usize,
    pub scores: ScoreTable,
    /// Calendar used to decide what "today" is and where days start.
    pub timezone: Tz,
}

impl Default for RecommenderPolicy {
    fn default() -> Self {
        Self {
            shift_days: SHIFT_DAYS,
            scan_days: SCAN_DAYS,
            max_suggestions: MAX_SUGGESTIONS,
            scores: ScoreTable::default(),
            timezone: Tz::UTC,
        }
    }
}

impl RecommenderPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.shift_days == 0 {
            return Err(SlotError::InvalidPolicy(
                "shift_days must be at least 1".to_string(),
            ));
        }
        if self.scan_days == 0 {
            return Err(SlotError::InvalidPolicy(
                "scan_days must be at least 1".to_string(),
            ));
        }
        if self.scan_days > MAX_SCAN_DAYS {
            return Err(SlotError::InvalidPolicy(format!(
                "scan_days must be at most {}",
                MAX_SCAN_DAYS
            )));
        }
        if self.max_suggestions == 0 {
            return Err(SlotError::InvalidPolicy(
                "max_suggestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace the calendar timezone by IANA name (e.g. "Africa/Libreville").
    pub fn with_timezone_name(mut self, name: &str) -> Result<Self> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    /// The calendar date `instant` falls on in the policy timezone.
    pub fn calendar_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Midnight at the start of `date` in the policy timezone.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.localize(date.and_time(NaiveTime::MIN))
    }

    /// Midnight at the start of the day containing `now`.
    pub fn start_of_today(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_day(self.calendar_date(now))
    }

    /// Move `instant` by whole calendar days, keeping its local wall-clock time.
    ///
    /// Returns `None` only when the result falls outside chrono's range.
    pub fn shift_calendar_days(&self, instant: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
        let local = instant.with_timezone(&self.timezone).naive_local();
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            local.checked_add_days(magnitude)
        } else {
            local.checked_sub_days(magnitude)
        }?;
        Some(self.localize(shifted))
    }

    fn localize(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // A wall-clock time skipped by a DST gap falls back to reading it as UTC.
        self.timezone
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| local.and_utc())
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}
