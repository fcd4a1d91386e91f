//! Tests for policy defaults, validation, overrides and calendar helpers.

use chrono::{NaiveDate, TimeZone, Utc};
use slot_engine::policy::{
    parse_timezone, RecommenderPolicy, AVAILABILITY_WINDOW_SCORE, FORWARD_SCAN_SCORE,
    MAX_SCAN_DAYS, MAX_SUGGESTIONS, SCAN_DAYS, SHIFT_DAYS, SHIFT_EARLIER_SCORE, SHIFT_LATER_SCORE,
};
use slot_engine::SlotError;

#[test]
fn defaults_match_reference_constants() {
    let policy = RecommenderPolicy::default();
    assert_eq!(policy.shift_days, SHIFT_DAYS);
    assert_eq!(policy.scan_days, SCAN_DAYS);
    assert_eq!(policy.max_suggestions, MAX_SUGGESTIONS);
    assert_eq!(policy.scores.availability_window, AVAILABILITY_WINDOW_SCORE);
    assert_eq!(policy.scores.shifted_earlier, SHIFT_EARLIER_SCORE);
    assert_eq!(policy.scores.shifted_later, SHIFT_LATER_SCORE);
    assert_eq!(policy.scores.forward_scan, FORWARD_SCAN_SCORE);
    assert_eq!(
        (SHIFT_DAYS, SCAN_DAYS, MAX_SUGGESTIONS),
        (7, 90, 3),
        "reference policy constants"
    );
    assert_eq!(
        (
            AVAILABILITY_WINDOW_SCORE,
            SHIFT_EARLIER_SCORE,
            SHIFT_LATER_SCORE,
            FORWARD_SCAN_SCORE
        ),
        (95, 80, 75, 60)
    );
    assert!(policy.validate().is_ok());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let json = r#"{"scan_days": 30, "scores": {"forward_scan": 50}, "timezone": "Africa/Libreville"}"#;
    let policy: RecommenderPolicy = serde_json::from_str(json).unwrap();

    assert_eq!(policy.scan_days, 30);
    assert_eq!(policy.shift_days, SHIFT_DAYS);
    assert_eq!(policy.scores.forward_scan, 50);
    assert_eq!(policy.scores.availability_window, AVAILABILITY_WINDOW_SCORE);
    assert_eq!(policy.timezone.name(), "Africa/Libreville");
}

#[test]
fn unknown_policy_field_is_rejected() {
    let json = r#"{"scan_dayz": 30}"#;
    assert!(serde_json::from_str::<RecommenderPolicy>(json).is_err());
}

#[test]
fn validation_rejects_zero_limits() {
    for policy in [
        RecommenderPolicy {
            shift_days: 0,
            ..RecommenderPolicy::default()
        },
        RecommenderPolicy {
            scan_days: 0,
            ..RecommenderPolicy::default()
        },
        RecommenderPolicy {
            max_suggestions: 0,
            ..RecommenderPolicy::default()
        },
    ] {
        assert!(matches!(
            policy.validate(),
            Err(SlotError::InvalidPolicy(_))
        ));
    }
}

#[test]
fn validation_caps_scan_days() {
    let at_cap = RecommenderPolicy {
        scan_days: MAX_SCAN_DAYS,
        ..RecommenderPolicy::default()
    };
    assert!(at_cap.validate().is_ok());

    let json = r#"{"scan_days": 4294967295}"#;
    let huge: RecommenderPolicy = serde_json::from_str(json).unwrap();
    assert!(matches!(huge.validate(), Err(SlotError::InvalidPolicy(_))));
}

#[test]
fn timezone_names_are_checked() {
    assert!(parse_timezone("Africa/Libreville").is_ok());
    assert!(matches!(
        parse_timezone("Mars/Olympus_Mons"),
        Err(SlotError::InvalidTimezone(_))
    ));
    assert!(RecommenderPolicy::default()
        .with_timezone_name("Not/AZone")
        .is_err());
}

#[test]
fn start_of_today_uses_policy_timezone() {
    let policy = RecommenderPolicy::default()
        .with_timezone_name("Africa/Libreville")
        .unwrap();
    // 23:30 UTC on 03-09 is already 03-10 in Libreville (UTC+1).
    let now = Utc.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap();

    assert_eq!(
        policy.calendar_date(now),
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    );
    assert_eq!(
        policy.start_of_today(now),
        Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap()
    );
}

#[test]
fn calendar_shift_keeps_wall_clock_across_dst() {
    let policy = RecommenderPolicy::default()
        .with_timezone_name("Europe/Paris")
        .unwrap();
    // 09:00 Paris (UTC+1) on 2025-03-27; Paris moves to UTC+2 on 03-30.
    let before = Utc.with_ymd_and_hms(2025, 3, 27, 8, 0, 0).unwrap();

    let after = policy.shift_calendar_days(before, 7).unwrap();

    // 09:00 Paris (UTC+2) on 2025-04-03.
    assert_eq!(after, Utc.with_ymd_and_hms(2025, 4, 3, 7, 0, 0).unwrap());
    assert_eq!(policy.shift_calendar_days(after, -7), Some(before));
}
