//! Tests for the per-owner report, the store adapter and the output payload.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::booking::{AvailabilityWindow, Booking};
use slot_engine::error::{Result, SlotError};
use slot_engine::policy::RecommenderPolicy;
use slot_engine::report::{analyze_owner, build_report, DateFormat};
use slot_engine::store::{ScheduleSnapshot, ScheduleStore};

const SNAPSHOT: &str = r#"{
  "bookings": [
    {"id": "b1", "ownerId": "x", "title": "Outboard engine maintenance", "start": "2025-03-10", "end": "2025-03-12", "status": "confirmed"},
    {"id": "b2", "ownerId": "x", "title": "Fish conservation", "start": "2025-03-11", "end": "2025-03-13"},
    {"id": "b3", "ownerId": "x", "title": "Safety at sea", "start": "2025-04-01", "end": "2025-04-02"},
    {"id": "c1", "ownerId": "y", "title": "Net mending", "start": "2025-03-10", "end": "2025-03-12"}
  ],
  "availability": [
    {"ownerId": "x", "start": "2025-03-20", "end": "2025-03-25", "available": true},
    {"ownerId": "x", "start": "2025-03-14", "end": "2025-03-19", "available": false},
    {"ownerId": "y", "start": "2025-03-14", "end": "2025-03-19"}
  ]
}"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn snapshot() -> ScheduleSnapshot {
    ScheduleSnapshot::from_json(SNAPSHOT).expect("fixture snapshot must parse")
}

struct UnreachableStore;

impl ScheduleStore for UnreachableStore {
    fn bookings_for(&self, _owner_id: &str) -> Result<Vec<Booking>> {
        Err(SlotError::store("bookings_for", "connection refused"))
    }

    fn availability_for(&self, _owner_id: &str) -> Result<Vec<AvailabilityWindow>> {
        Ok(Vec::new())
    }
}

#[test]
fn snapshot_filters_by_owner_and_flag() {
    let snapshot = snapshot();
    assert_eq!(snapshot.owners(), vec!["x", "y"]);
    assert_eq!(snapshot.bookings_for("x").unwrap().len(), 3);
    assert_eq!(snapshot.availability_for("x").unwrap().len(), 1);
    assert!(snapshot.bookings_for("nobody").unwrap().is_empty());
}

#[test]
fn analyze_owner_reports_conflicts_with_suggestions() {
    let report = analyze_owner(&snapshot(), "x", now(), &RecommenderPolicy::default()).unwrap();

    assert_eq!(report.owner_id, "x");
    let ids: Vec<_> = report.conflicts.iter().map(|c| c.booking.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2"]);

    let top = &report.conflicts[0].suggestions[0];
    assert_eq!(top.start, Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap());
    assert_eq!(top.end, Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 0).unwrap());
    assert_eq!(top.score, 95);
}

#[test]
fn owner_without_conflicts_gets_empty_report() {
    let report = analyze_owner(&snapshot(), "y", now(), &RecommenderPolicy::default()).unwrap();
    assert!(report.is_empty());

    let report = analyze_owner(&snapshot(), "nobody", now(), &RecommenderPolicy::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn build_report_ignores_other_owners_in_input() {
    let snapshot = snapshot();
    // Owner y's booking overlaps b1 in time but belongs to someone else.
    let report = build_report(
        "y",
        &snapshot.bookings,
        &snapshot.availability,
        now(),
        &RecommenderPolicy::default(),
    );
    assert!(report.is_empty());
}

#[test]
fn store_failure_aborts_whole_operation() {
    let err = analyze_owner(&UnreachableStore, "x", now(), &RecommenderPolicy::default())
        .unwrap_err();
    assert!(matches!(err, SlotError::Store { .. }));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn invalid_policy_is_rejected_before_reading_store() {
    let policy = RecommenderPolicy {
        scan_days: 0,
        ..RecommenderPolicy::default()
    };
    let err = analyze_owner(&UnreachableStore, "x", now(), &policy).unwrap_err();
    assert!(matches!(err, SlotError::InvalidPolicy(_)));
}

#[test]
fn payload_uses_date_only_camel_case_fields() {
    let policy = RecommenderPolicy::default();
    let report = analyze_owner(&snapshot(), "x", now(), &policy).unwrap();

    let payload = report.to_payload(DateFormat::Date, &policy);
    let json = serde_json::to_value(&payload).unwrap();

    let first = &json["conflicts"][0];
    assert_eq!(first["bookingId"], "b1");
    assert_eq!(first["title"], "Outboard engine maintenance");
    assert_eq!(first["currentStart"], "2025-03-10");
    assert_eq!(first["currentEnd"], "2025-03-12");
    assert_eq!(first["suggestions"][0]["start"], "2025-03-20");
    assert_eq!(first["suggestions"][0]["end"], "2025-03-22");
    assert_eq!(first["suggestions"][0]["score"], 95);
    assert_eq!(
        first["suggestions"][0]["rationale"],
        "confirmed availability window"
    );
    assert!(first["suggestions"].as_array().unwrap().len() <= 3);
}

#[test]
fn payload_datetime_format_is_rfc3339() {
    let policy = RecommenderPolicy::default();
    let report = analyze_owner(&snapshot(), "x", now(), &policy).unwrap();

    let payload = report.to_payload(DateFormat::DateTime, &policy);

    assert_eq!(payload.conflicts[0].current_start, "2025-03-10T00:00:00+00:00");
}

#[test]
fn payload_dates_follow_policy_timezone() {
    let policy = RecommenderPolicy::default()
        .with_timezone_name("Africa/Libreville")
        .unwrap();
    let bookings = vec![
        Booking {
            id: "late".to_string(),
            owner_id: "x".to_string(),
            title: String::new(),
            // 23:30 UTC on the 9th is 00:30 on the 10th in Libreville (UTC+1).
            start: Utc.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap(),
            status: Default::default(),
        },
        Booking {
            id: "other".to_string(),
            owner_id: "x".to_string(),
            title: String::new(),
            start: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap(),
            status: Default::default(),
        },
    ];

    let report = build_report("x", &bookings, &[], now(), &policy);
    let payload = report.to_payload(DateFormat::Date, &policy);

    assert_eq!(payload.conflicts[0].current_start, "2025-03-10");
}
