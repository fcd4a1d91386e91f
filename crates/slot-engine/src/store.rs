//! Read-only access to the booking and availability stores.
//!
//! The engine reads one owner's bookings and availability per invocation and
//! never writes. [`ScheduleSnapshot`] is the in-memory implementation, loaded
//! from a JSON export of both stores.

use serde::{Deserialize, Serialize};

use crate::booking::{AvailabilityWindow, Booking};
use crate::error::Result;

/// Source of bookings and availability windows, keyed by owner.
///
/// A failing read is fatal to the invocation: no partial report is built.
pub trait ScheduleStore {
    /// All bookings belonging to `owner_id`.
    fn bookings_for(&self, owner_id: &str) -> Result<Vec<Booking>>;

    /// The owner's availability windows flagged `available`.
    fn availability_for(&self, owner_id: &str) -> Result<Vec<AvailabilityWindow>>;
}

/// A point-in-time copy of both stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
}

impl ScheduleSnapshot {
    pub fn new(bookings: Vec<Booking>, availability: Vec<AvailabilityWindow>) -> Self {
        Self {
            bookings,
            availability,
        }
    }

    /// Parse a snapshot from `{"bookings": [...], "availability": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Distinct owner ids that have at least one booking, in first-seen order.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = Vec::new();
        for booking in &self.bookings {
            if !owners.contains(&booking.owner_id.as_str()) {
                owners.push(&booking.owner_id);
            }
        }
        owners
    }
}

impl ScheduleStore for ScheduleSnapshot {
    fn bookings_for(&self, owner_id: &str) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn availability_for(&self, owner_id: &str) -> Result<Vec<AvailabilityWindow>> {
        Ok(self
            .availability
            .iter()
            .filter(|w| w.owner_id == owner_id && w.available)
            .cloned()
            .collect())
    }
}
