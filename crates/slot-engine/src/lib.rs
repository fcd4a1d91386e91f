//! # slot-engine
//!
//! Conflict detection and alternative-slot recommendation for trainer bookings.
//!
//! Given one owner's bookings and declared availability, the engine finds every
//! booking that overlaps another (touching endpoints included) and proposes up
//! to three ranked replacement slots for each. Everything is pure computation
//! over a snapshot; "now" is always passed in, never read from the clock.
//!
//! ## Modules
//!
//! - [`booking`] — Booking, availability window and time range types
//! - [`overlap`] — The inclusive overlap predicate
//! - [`conflict`] — Detect overlapping bookings for one owner
//! - [`recommender`] — Rank alternative slots for a conflicting booking
//! - [`policy`] — Scoring constants and configurable policy
//! - [`store`] — Read-only store trait and in-memory snapshot
//! - [`report`] — Per-owner entry point and output payload
//! - [`error`] — Error types

pub mod booking;
pub mod conflict;
pub mod error;
pub mod overlap;
pub mod policy;
pub mod recommender;
pub mod report;
pub mod store;

pub use booking::{parse_instant, AvailabilityWindow, Booking, BookingStatus, TimeRange};
pub use conflict::{find_conflict_pairs, find_conflicting_bookings, group_conflicts, ConflictPair};
pub use error::SlotError;
pub use overlap::ranges_overlap;
pub use policy::RecommenderPolicy;
pub use recommender::{suggest_alternatives, Suggestion, SuggestionStrategy};
pub use report::{analyze_owner, build_report, ConflictReport, DateFormat, ReportPayload};
pub use store::{ScheduleSnapshot, ScheduleStore};
