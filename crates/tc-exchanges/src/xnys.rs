//! New York Stock Exchange (XNYS).
//!
//! Regular hours 09:30–16:00 New York time, with 13:00 early closes on the
//! day before Independence Day, the day after Thanksgiving, and Christmas
//! Eve.

use crate::us_holidays::{
    christmas, good_friday, independence_day, juneteenth, labor_day,
    martin_luther_king_after_1998, memorial_day, memorial_day_before_1971, new_years_day,
    presidents_day, thanksgiving, NATIONAL_DAYS_OF_MOURNING,
};
use chrono_tz::America::New_York;
use tc_core::errors::Result;
use tc_sessions::ExchangeCalendarSpec;
use tc_time::{Date, Holiday, HolidayCalendar, HolidayRule, LocalTime, Month, Weekday};

/// Calendar name.
pub const NAME: &str = "XNYS";

const MON_TO_THU: [Weekday; 4] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
];

/// Closures after the September 11 attacks.
pub const SEPTEMBER_11: [Date; 4] = [
    Date::civil(2001, 9, 11),
    Date::civil(2001, 9, 12),
    Date::civil(2001, 9, 13),
    Date::civil(2001, 9, 14),
];

/// Hurricane Sandy closures.
pub const HURRICANE_SANDY: [Date; 2] = [Date::civil(2012, 10, 29), Date::civil(2012, 10, 30)];

/// Full-closure holiday rules.
pub fn regular_holidays() -> HolidayCalendar {
    HolidayCalendar::new(
        "XNYS holidays",
        vec![
            new_years_day(),
            martin_luther_king_after_1998(),
            presidents_day(),
            good_friday(),
            memorial_day_before_1971(),
            memorial_day(),
            juneteenth(),
            independence_day(),
            labor_day(),
            thanksgiving(),
            christmas(),
        ],
    )
}

/// Days with a 13:00 close.
pub fn early_close_holidays() -> HolidayCalendar {
    HolidayCalendar::new(
        "XNYS early closes",
        vec![
            Holiday::new("Day before Independence Day", HolidayRule::fixed(Month::July, 3))
                .starting(Date::civil(1995, 1, 1))
                .on_days(MON_TO_THU),
            Holiday::new(
                "Day after Thanksgiving",
                HolidayRule::nth_weekday(Month::November, Weekday::Thursday, 4).offset(1),
            )
            .starting(Date::civil(1993, 1, 1)),
            Holiday::new("Christmas Eve", HolidayRule::fixed(Month::December, 24))
                .starting(Date::civil(1999, 1, 1))
                .on_days(MON_TO_THU),
        ],
    )
}

/// One-off closures.
pub fn adhoc_holidays() -> Vec<Date> {
    NATIONAL_DAYS_OF_MOURNING
        .iter()
        .chain(SEPTEMBER_11.iter())
        .chain(HURRICANE_SANDY.iter())
        .copied()
        .collect()
}

/// The XNYS calendar configuration.
pub fn spec() -> Result<ExchangeCalendarSpec> {
    ExchangeCalendarSpec::builder(NAME, New_York)
        .open_time(LocalTime::hm(9, 30))
        .close_time(LocalTime::hm(16, 0))
        .regular_holidays(regular_holidays())
        .adhoc_holidays(adhoc_holidays())
        .special_close(LocalTime::hm(13, 0), early_close_holidays())
        .build()
}
