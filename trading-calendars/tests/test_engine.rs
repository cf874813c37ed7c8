//! End-to-end tests: bundled configurations through the engine, registry,
//! and JSON-configured calendars.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::{Arc, OnceLock};
use std::thread;
use trading_calendars::exchanges::{iepa, register_all, xnys};
use trading_calendars::time::Date;
use trading_calendars::{
    CalendarRegistry, Direction, Error, ExchangeCalendar, ExchangeCalendarSpec,
};

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

fn iepa_2024() -> ExchangeCalendar {
    ExchangeCalendar::new(iepa::spec().unwrap(), date(2024, 1, 1), date(2024, 12, 31)).unwrap()
}

// ───────────────────────── IEPA scenario ─────────────────────────

#[test]
fn test_iepa_mlk_day_opens_previous_evening_and_closes_early() {
    let cal = iepa_2024();
    let (open, close) = cal.open_close_for_session(date(2024, 1, 15)).unwrap();
    // Sunday 2024-01-14 20:01 EST and Monday 13:00 EST (not 18:00).
    assert_eq!(open, utc(2024, 1, 15, 1, 1));
    assert_eq!(close, utc(2024, 1, 15, 18, 0));
    assert_eq!(cal.special_closes().get(&date(2024, 1, 15)).map(|t| t.to_string()), Some("13:00".into()));
}

#[test]
fn test_iepa_minute_queries_across_overnight_session() {
    let cal = iepa_2024();
    // Tuesday 2024-01-16 02:00 UTC is Monday 21:00 EST: inside Tuesday's session.
    let s = cal.session_for_minute(utc(2024, 1, 16, 2, 0)).unwrap().unwrap();
    assert_eq!(s.session_date, date(2024, 1, 16));
    // Monday 19:00 EST falls between the early close and Tuesday's open.
    let gap = utc(2024, 1, 16, 0, 0);
    assert!(!cal.is_open_on_minute(gap).unwrap());
    assert_eq!(cal.minute_to_session(gap, Direction::Next).unwrap().session_date, date(2024, 1, 16));
    assert_eq!(cal.minute_to_session(gap, Direction::Previous).unwrap().session_date, date(2024, 1, 15));
    assert_eq!(cal.next_open(gap).unwrap(), utc(2024, 1, 16, 1, 1));
    assert_eq!(cal.previous_close(gap).unwrap(), utc(2024, 1, 15, 18, 0));
}

#[test]
fn test_iepa_spring_forward_week() {
    let cal = iepa_2024();
    // Monday 2024-03-11 opens Sunday 20:01 EDT (after the 02:00 jump).
    assert_eq!(cal.session_open(date(2024, 3, 11)).unwrap(), utc(2024, 3, 11, 0, 1));
    assert_eq!(cal.session_close(date(2024, 3, 8)).unwrap(), utc(2024, 3, 8, 23, 0));
    assert_eq!(cal.session_minutes(date(2024, 3, 11)).unwrap(), 21 * 60 + 59);
}

#[test]
fn test_adhoc_and_regular_overlap_suppresses_one_session() {
    // Christmas is a regular holiday; also list it ad hoc.
    let mut spec = iepa::spec().unwrap();
    spec.adhoc_holidays.push(date(2024, 12, 25));
    let cal = ExchangeCalendar::new(spec, date(2024, 12, 1), date(2024, 12, 31)).unwrap();
    assert!(!cal.is_session(date(2024, 12, 25)).unwrap());
    assert_eq!(cal.holidays(), vec![date(2024, 12, 25)]);
    assert_eq!(cal.sessions_in_range(date(2024, 12, 1), date(2024, 12, 31)).unwrap().len(), 21);
}

// ───────────────────────── Range growth ─────────────────────────

#[test]
fn test_out_of_range_is_recoverable_by_extending() {
    init_tracing();
    let cal = iepa_2024();
    let err = cal
        .sessions_in_range(date(2024, 12, 1), date(2025, 1, 31))
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));
    assert!(err.is_recoverable());

    cal.ensure_range(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
    let sessions = cal.sessions_in_range(date(2024, 12, 1), date(2025, 1, 31)).unwrap();
    assert!(sessions.iter().all(|s| s.session_date != date(2025, 1, 9)));
    assert_eq!(cal.built_range(), (date(2024, 1, 1), date(2025, 1, 31)));
}

#[test]
fn test_concurrent_extension_is_idempotent() {
    let cal = Arc::new(iepa_2024());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cal = Arc::clone(&cal);
            thread::spawn(move || {
                let end = date(2025 + i, 12, 31);
                cal.ensure_range(date(2024, 1, 1), end).unwrap();
                assert!(cal.is_session(date(2025, 6, 2)).unwrap());
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cal.built_range().1, date(2028, 12, 31));
}

// ───────────────────────── Registry ─────────────────────────

#[test]
fn test_registry_holds_bundled_calendars() {
    let mut registry = CalendarRegistry::new();
    register_all(&mut registry, date(2020, 1, 1), date(2020, 12, 31)).unwrap();
    assert_eq!(registry.names(), vec!["IEPA".to_string(), "XNYS".to_string()]);

    let nyse = registry.get(xnys::NAME).unwrap();
    // Independence Day 2020 observed Friday Jul 3: a closure on XNYS, an
    // early close on IEPA.
    assert!(!nyse.is_session(date(2020, 7, 3)).unwrap());
    let ice = registry.get(iepa::NAME).unwrap();
    assert!(ice.is_session(date(2020, 7, 3)).unwrap());
    assert_eq!(ice.session_close(date(2020, 7, 3)).unwrap(), utc(2020, 7, 3, 17, 0));

    assert!(matches!(
        register_all(&mut registry, date(2020, 1, 1), date(2020, 12, 31)),
        Err(Error::InvalidArgument(_))
    ));
}

// ───────────────────────── JSON configuration ─────────────────────────

const JSON_SPEC: &str = r#"{
    "name": "JSONX",
    "timezone": "Europe/London",
    "open_times": [
        {"time": "08:00"},
        {"start": "2020-01-01", "time": "07:30"}
    ],
    "close_times": [{"time": "16:30"}],
    "regular_holidays": [{
        "name": "uk",
        "rules": [
            {"name": "Easter Monday", "rule": {"kind": "offset", "days": 1, "base": {"kind": "easter"}}},
            {"name": "Boxing Day",
             "rule": {"kind": "observed", "observance": "next_monday_or_tuesday",
                      "base": {"kind": "fixed", "month": "December", "day": 26}}}
        ]
    }],
    "special_sessions": [
        {"kind": "close", "time": "12:30", "dates": ["2019-12-24", "2020-12-24"]}
    ]
}"#;

#[test]
fn test_json_configured_calendar() {
    let spec = ExchangeCalendarSpec::from_json_str(JSON_SPEC).unwrap();
    let cal = ExchangeCalendar::new(spec, date(2019, 1, 1), date(2020, 12, 31)).unwrap();
    // First matching window wins, so the unbounded 08:00 entry covers 2020 too.
    assert_eq!(cal.session_open(date(2020, 6, 1)).unwrap(), utc(2020, 6, 1, 7, 0));
    assert!(!cal.is_session(date(2020, 4, 13)).unwrap());
    // Boxing Day 2020 was a Saturday: observed Monday Dec 28.
    assert!(!cal.is_session(date(2020, 12, 28)).unwrap());
    // 12:30 GMT.
    assert_eq!(cal.session_close(date(2019, 12, 24)).unwrap(), utc(2019, 12, 24, 12, 30));
}

#[test]
fn test_json_rejects_bad_rule() {
    let bad = JSON_SPEC.replace("\"day\": 26", "\"day\": 32");
    assert!(matches!(
        ExchangeCalendarSpec::from_json_str(&bad),
        Err(Error::InvalidRule(_))
    ));
}

// ───────────────────────── Properties ─────────────────────────

fn xnys_decade() -> &'static ExchangeCalendar {
    static CAL: OnceLock<ExchangeCalendar> = OnceLock::new();
    CAL.get_or_init(|| {
        ExchangeCalendar::new(xnys::spec().unwrap(), date(2010, 1, 1), date(2019, 12, 31)).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_xnys_navigation_round_trips(offset in 10i32..3_600) {
        let cal = xnys_decade();
        let d = date(2010, 1, 1).add_days(offset).unwrap();
        let next = cal.next_session(d).unwrap();
        prop_assert!(next.session_date > d);
        let back = cal.previous_session(next.session_date).unwrap();
        prop_assert!(back.session_date <= d);
        prop_assert_eq!(cal.next_session(back.session_date).unwrap(), next);
    }

    #[test]
    fn prop_xnys_distance_matches_range_len(a in 0i32..3_400, len in 0i32..200) {
        let cal = xnys_decade();
        let start = date(2010, 1, 1).add_days(a).unwrap();
        let end = start.add_days(len).unwrap();
        let n = cal.sessions_in_range(start, end).unwrap().len() as i64;
        prop_assert_eq!(cal.session_distance(start, end).unwrap(), n);
        prop_assert_eq!(cal.session_distance(end, start).unwrap(), -n);
    }
}
