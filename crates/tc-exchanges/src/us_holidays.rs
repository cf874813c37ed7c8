//! United States holiday rules shared by US exchange calendars.
//!
//! Each function returns one [`Holiday`]; exchange configurations pick the
//! subset they close (or close early) for.

use tc_time::{Date, Holiday, HolidayRule, Month, Observance, Weekday};

/// New Year's Day (Jan 1). A Sunday holiday moves to Monday; a Saturday one
/// is not moved.
pub fn new_years_day() -> Holiday {
    Holiday::new(
        "New Year's Day",
        HolidayRule::fixed(Month::January, 1).observed(Observance::SundayToMonday),
    )
}

/// Martin Luther King Jr. Day (3rd Monday in January), from 1998.
pub fn martin_luther_king_after_1998() -> Holiday {
    Holiday::new(
        "Martin Luther King Jr. Day",
        HolidayRule::nth_weekday(Month::January, Weekday::Monday, 3),
    )
    .starting(Date::civil(1998, 1, 1))
}

/// Presidents' Day (3rd Monday in February).
pub fn presidents_day() -> Holiday {
    Holiday::new(
        "Presidents' Day",
        HolidayRule::nth_weekday(Month::February, Weekday::Monday, 3),
    )
}

/// Good Friday (two days before Easter Sunday).
pub fn good_friday() -> Holiday {
    Holiday::new("Good Friday", HolidayRule::Easter.offset(-2))
}

/// Memorial Day (last Monday in May), from 1971.
pub fn memorial_day() -> Holiday {
    Holiday::new(
        "Memorial Day",
        HolidayRule::nth_weekday(Month::May, Weekday::Monday, -1),
    )
    .starting(Date::civil(1971, 1, 1))
}

/// Memorial Day before 1971 (May 30, Sunday moves to Monday).
pub fn memorial_day_before_1971() -> Holiday {
    Holiday::new(
        "Memorial Day",
        HolidayRule::fixed(Month::May, 30).observed(Observance::SundayToMonday),
    )
    .ending(Date::civil(1970, 12, 31))
}

/// Juneteenth National Independence Day (Jun 19, nearest workday), from 2022.
pub fn juneteenth() -> Holiday {
    Holiday::new(
        "Juneteenth",
        HolidayRule::fixed(Month::June, 19).observed(Observance::NearestWorkday),
    )
    .starting(Date::civil(2022, 1, 1))
}

/// Independence Day (Jul 4, nearest workday).
pub fn independence_day() -> Holiday {
    Holiday::new(
        "Independence Day",
        HolidayRule::fixed(Month::July, 4).observed(Observance::NearestWorkday),
    )
}

/// Labor Day (1st Monday in September).
pub fn labor_day() -> Holiday {
    Holiday::new(
        "Labor Day",
        HolidayRule::nth_weekday(Month::September, Weekday::Monday, 1),
    )
}

/// Thanksgiving Day (4th Thursday in November).
pub fn thanksgiving() -> Holiday {
    Holiday::new(
        "Thanksgiving",
        HolidayRule::nth_weekday(Month::November, Weekday::Thursday, 4),
    )
}

/// Christmas Day (Dec 25, nearest workday).
pub fn christmas() -> Holiday {
    Holiday::new(
        "Christmas",
        HolidayRule::fixed(Month::December, 25).observed(Observance::NearestWorkday),
    )
}

/// National days of mourning on which US markets closed.
pub const NATIONAL_DAYS_OF_MOURNING: [Date; 10] = [
    Date::civil(1963, 11, 25), // John F. Kennedy
    Date::civil(1968, 4, 9),   // Martin Luther King Jr.
    Date::civil(1969, 3, 31),  // Dwight D. Eisenhower
    Date::civil(1972, 12, 28), // Harry S. Truman
    Date::civil(1973, 1, 25),  // Lyndon B. Johnson
    Date::civil(1994, 4, 27),  // Richard Nixon
    Date::civil(2004, 6, 11),  // Ronald Reagan
    Date::civil(2007, 1, 2),   // Gerald Ford
    Date::civil(2018, 12, 5),  // George H. W. Bush
    Date::civil(2025, 1, 9),   // Jimmy Carter
];
