//! WASM bindings for slot-engine.
//!
//! Exposes conflict detection, slot suggestions and the per-owner report to the
//! portal's JavaScript/serverless callers via `wasm-bindgen`. All complex types
//! cross the boundary as JSON strings using the same camelCase shapes as the
//! booking store rows.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use slot_engine::booking::{AvailabilityWindow, Booking};
use slot_engine::policy::RecommenderPolicy;
use slot_engine::report::DateFormat;
use slot_engine::store::ScheduleSnapshot;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionDto {
    start: String,
    end: String,
    score: u32,
    rationale: String,
    strategy: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out, errors as JsValue strings
// ---------------------------------------------------------------------------

fn parse_now(now: Option<String>) -> Result<DateTime<Utc>, JsValue> {
    match now {
        Some(s) => slot_engine::parse_instant(&s).map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(Utc::now()),
    }
}

fn parse_policy(policy_json: Option<String>) -> Result<RecommenderPolicy, JsValue> {
    let policy: RecommenderPolicy = match policy_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid policy JSON: {}", e)))?,
        None => RecommenderPolicy::default(),
    };
    policy
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(policy)
}

fn parse_bookings_json(json: &str) -> Result<Vec<Booking>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid bookings JSON: {}", e)))
}

fn parse_windows_json(json: &str) -> Result<Vec<AvailabilityWindow>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid availability JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Return the bookings that overlap at least one other booking.
///
/// `bookings_json` is a JSON array of booking rows for a single owner.
/// Returns the conflicting subset as a JSON array, in input order.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(bookings_json: &str) -> Result<String, JsValue> {
    let bookings = parse_bookings_json(bookings_json)?;
    let conflicts = slot_engine::find_conflicting_bookings(&bookings);
    to_json(&conflicts)
}

/// Rank replacement slots for one conflicting booking.
///
/// # Arguments
/// - `booking_json` -- the conflicting booking row
/// - `bookings_json` -- the owner's full booking list
/// - `availability_json` -- the owner's availability windows
/// - `now` -- optional ISO 8601 "current time"; defaults to the host clock
/// - `policy_json` -- optional policy overrides
#[wasm_bindgen(js_name = "suggestAlternatives")]
pub fn suggest_alternatives(
    booking_json: &str,
    bookings_json: &str,
    availability_json: &str,
    now: Option<String>,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let booking: Booking = serde_json::from_str(booking_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid booking JSON: {}", e)))?;
    let bookings = parse_bookings_json(bookings_json)?;
    let windows = parse_windows_json(availability_json)?;
    let now = parse_now(now)?;
    let policy = parse_policy(policy_json)?;

    let suggestions =
        slot_engine::suggest_alternatives(&booking, &bookings, &windows, now, &policy);

    let dtos: Vec<SuggestionDto> = suggestions
        .iter()
        .map(|s| SuggestionDto {
            start: s.start.to_rfc3339(),
            end: s.end.to_rfc3339(),
            score: s.score,
            rationale: s.rationale.clone(),
            strategy: s.strategy.as_str(),
        })
        .collect();

    to_json(&dtos)
}

/// Build the conflict report for one owner from a store snapshot.
///
/// `snapshot_json` is `{"bookings": [...], "availability": [...]}`; rows for
/// other owners are ignored. Returns the `{"conflicts": [...]}` payload with
/// date-only strings, or RFC 3339 strings when `full_datetimes` is true.
#[wasm_bindgen(js_name = "analyzeOwner")]
pub fn analyze_owner(
    snapshot_json: &str,
    owner_id: &str,
    now: Option<String>,
    policy_json: Option<String>,
    full_datetimes: Option<bool>,
) -> Result<String, JsValue> {
    let snapshot = ScheduleSnapshot::from_json(snapshot_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid snapshot JSON: {}", e)))?;
    let now = parse_now(now)?;
    let policy = parse_policy(policy_json)?;

    let report = slot_engine::analyze_owner(&snapshot, owner_id, now, &policy)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let format = if full_datetimes.unwrap_or(false) {
        DateFormat::DateTime
    } else {
        DateFormat::Date
    };
    to_json(&report.to_payload(format, &policy))
}
