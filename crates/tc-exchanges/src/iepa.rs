//! ICE Futures US (IEPA).
//!
//! Sessions open at 20:01 New York time on the evening before the trading
//! date and close at 18:00. Several US federal holidays are early closes at
//! 13:00 rather than full closures.

use crate::us_holidays::{
    christmas, good_friday, independence_day, labor_day, martin_luther_king_after_1998,
    memorial_day, new_years_day, presidents_day, thanksgiving, NATIONAL_DAYS_OF_MOURNING,
};
use chrono_tz::America::New_York;
use tc_core::errors::Result;
use tc_sessions::ExchangeCalendarSpec;
use tc_time::{Date, HolidayCalendar, LocalTime};

/// Calendar name.
pub const NAME: &str = "IEPA";

/// Hurricane Sandy. ICE closed only on the first day of the market closure.
pub const HURRICANE_SANDY: Date = Date::civil(2012, 10, 29);

/// Full-closure holiday rules.
pub fn regular_holidays() -> HolidayCalendar {
    HolidayCalendar::new(
        "IEPA holidays",
        vec![new_years_day(), good_friday(), christmas()],
    )
}

/// Holidays on which the session closes at 13:00.
pub fn early_close_holidays() -> HolidayCalendar {
    HolidayCalendar::new(
        "IEPA early closes",
        vec![
            martin_luther_king_after_1998(),
            presidents_day(),
            memorial_day(),
            independence_day(),
            labor_day(),
            thanksgiving(),
        ],
    )
}

/// One-off closures.
pub fn adhoc_holidays() -> Vec<Date> {
    NATIONAL_DAYS_OF_MOURNING
        .iter()
        .copied()
        .chain([HURRICANE_SANDY])
        .collect()
}

/// The IEPA calendar configuration.
pub fn spec() -> Result<ExchangeCalendarSpec> {
    ExchangeCalendarSpec::builder(NAME, New_York)
        .open_time(LocalTime::hm(20, 1))
        .open_offset(-1)
        .close_time(LocalTime::hm(18, 0))
        .regular_holidays(regular_holidays())
        .adhoc_holidays(adhoc_holidays())
        .special_close(LocalTime::hm(13, 0), early_close_holidays())
        .build()
}
