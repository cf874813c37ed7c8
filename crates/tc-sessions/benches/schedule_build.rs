//! Schedule build and query benchmarks.
//!
//! - Build a 50-year overnight schedule (holidays, special closes, DST)
//! - Index lookups by date and by instant over the built range

use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tc_sessions::{CalendarIndex, Direction, ExchangeCalendarSpec, SessionScheduleBuilder};
use tc_time::{Date, Holiday, HolidayCalendar, HolidayRule, LocalTime, Month, Observance, Weekday};

fn holidays() -> HolidayCalendar {
    HolidayCalendar::new(
        "bench",
        vec![
            Holiday::new(
                "New Year",
                HolidayRule::fixed(Month::January, 1).observed(Observance::SundayToMonday),
            ),
            Holiday::new("Good Friday", HolidayRule::Easter.offset(-2)),
            Holiday::new(
                "Christmas",
                HolidayRule::fixed(Month::December, 25).observed(Observance::NearestWorkday),
            ),
        ],
    )
}

fn early_closes() -> HolidayCalendar {
    HolidayCalendar::new(
        "early",
        vec![
            Holiday::new(
                "MLK",
                HolidayRule::nth_weekday(Month::January, Weekday::Monday, 3),
            ),
            Holiday::new(
                "Thanksgiving",
                HolidayRule::nth_weekday(Month::November, Weekday::Thursday, 4),
            ),
        ],
    )
}

fn spec() -> ExchangeCalendarSpec {
    ExchangeCalendarSpec::builder("BENCH", New_York)
        .open_time(LocalTime::hm(20, 1))
        .open_offset(-1)
        .close_time(LocalTime::hm(18, 0))
        .regular_holidays(holidays())
        .special_close(LocalTime::hm(13, 0), early_closes())
        .build()
        .expect("bench spec")
}

fn bench_build(c: &mut Criterion) {
    let spec = spec();
    let start = Date::from_ymd(1990, 1, 1).expect("start");
    let end = Date::from_ymd(2039, 12, 31).expect("end");
    c.bench_function("build_50y_schedule", |b| {
        b.iter(|| {
            SessionScheduleBuilder::new(black_box(&spec), start, end)
                .build()
                .expect("build")
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let spec = spec();
    let start = Date::from_ymd(1990, 1, 1).expect("start");
    let end = Date::from_ymd(2039, 12, 31).expect("end");
    let index = CalendarIndex::build(&spec, start, end).expect("index");
    let day = Date::from_ymd(2015, 7, 2).expect("day");
    let instant = Utc.with_ymd_and_hms(2015, 7, 4, 12, 0, 0).unwrap();

    c.bench_function("is_session", |b| {
        b.iter(|| index.is_session(black_box(day)).expect("in range"))
    });
    c.bench_function("next_session", |b| {
        b.iter(|| index.next_session(black_box(day)).expect("in range"))
    });
    c.bench_function("minute_to_session", |b| {
        b.iter(|| {
            index
                .minute_to_session(black_box(instant), Direction::Next)
                .expect("in range")
        })
    });
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
