//! Recurring holiday rules.
//!
//! A [`HolidayRule`] describes *how* a holiday recurs each year; a
//! [`Holiday`] gives it a name and optional bounds. Evaluating either over a
//! date range yields an ascending, duplicate-free list of dates.
//!
//! Rules compose: Good Friday is `Offset { base: Easter, days: -2 }`, and US
//! Independence Day is `Observed { base: Fixed { July, 4 }, observance:
//! NearestWorkday }`. Evaluation is a pure function of the rule and the
//! queried range, so a rule can be evaluated any number of times.

use crate::date::Date;
use crate::easter::easter_sunday;
use crate::month::Month;
use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};
use tc_core::errors::{Error, Result};

/// Largest total day offset a rule may apply to its reference date.
///
/// Evaluation scans one reference year either side of the queried range, so
/// any shift below half a year is always captured.
pub const MAX_OFFSET_DAYS: i32 = 180;

/// How a holiday recurs within a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HolidayRule {
    /// The same month and day every year (e.g. 25 December).
    ///
    /// 29 February only occurs in leap years.
    Fixed {
        /// Month of the holiday.
        month: Month,
        /// Day of the month.
        day: u8,
    },
    /// The `nth` occurrence of `weekday` in `month`; negative `nth` counts
    /// from the end of the month (`-1` is the last).
    ///
    /// Years in which the month has no such occurrence (a 5th Monday, say)
    /// contribute no date.
    NthWeekday {
        /// Month of the holiday.
        month: Month,
        /// Weekday of the holiday.
        weekday: Weekday,
        /// Occurrence, in `1..=5` or `-5..=-1`.
        nth: i8,
    },
    /// Western Easter Sunday.
    Easter,
    /// Another rule's date shifted by a fixed number of calendar days.
    Offset {
        /// The rule being shifted.
        base: Box<HolidayRule>,
        /// Signed day shift.
        days: i32,
    },
    /// Another rule's date moved off the weekend by an [`Observance`].
    Observed {
        /// The rule whose date is adjusted.
        base: Box<HolidayRule>,
        /// The adjustment applied.
        observance: Observance,
    },
}

/// Weekend-to-weekday shift applied to an actual holiday date to obtain the
/// date on which it is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observance {
    /// Saturday → preceding Friday, Sunday → following Monday.
    NearestWorkday,
    /// Sunday → following Monday; Saturday unchanged.
    SundayToMonday,
    /// Saturday or Sunday → following Monday.
    NextMonday,
    /// Saturday → Monday, Sunday or Monday → Tuesday.
    NextMondayOrTuesday,
    /// Saturday or Sunday → preceding Friday.
    PreviousFriday,
    /// The first weekday strictly after the date.
    NextWorkday,
    /// The last weekday strictly before the date.
    PreviousWorkday,
    /// The weekday before the nearest workday.
    BeforeNearestWorkday,
    /// The weekday after the nearest workday.
    AfterNearestWorkday,
}

impl Observance {
    /// Apply the shift to `date`. Returns `None` if the result would leave
    /// the representable date range.
    pub fn apply(self, date: Date) -> Option<Date> {
        use Weekday::{Monday, Saturday, Sunday};
        let w = date.weekday();
        match self {
            Observance::NearestWorkday => match w {
                Saturday => date.checked_add_days(-1),
                Sunday => date.checked_add_days(1),
                _ => Some(date),
            },
            Observance::SundayToMonday => match w {
                Sunday => date.checked_add_days(1),
                _ => Some(date),
            },
            Observance::NextMonday => match w {
                Saturday => date.checked_add_days(2),
                Sunday => date.checked_add_days(1),
                _ => Some(date),
            },
            Observance::NextMondayOrTuesday => match w {
                Saturday | Sunday => date.checked_add_days(2),
                Monday => date.checked_add_days(1),
                _ => Some(date),
            },
            Observance::PreviousFriday => match w {
                Saturday => date.checked_add_days(-1),
                Sunday => date.checked_add_days(-2),
                _ => Some(date),
            },
            Observance::NextWorkday => step_to_weekday(date, 1),
            Observance::PreviousWorkday => step_to_weekday(date, -1),
            Observance::BeforeNearestWorkday => {
                Observance::NearestWorkday.apply(date).and_then(|d| step_to_weekday(d, -1))
            }
            Observance::AfterNearestWorkday => {
                Observance::NearestWorkday.apply(date).and_then(|d| step_to_weekday(d, 1))
            }
        }
    }
}

/// Move at least one day in direction `step`, then keep going past weekends.
fn step_to_weekday(date: Date, step: i32) -> Option<Date> {
    let mut d = date.checked_add_days(step)?;
    while d.is_weekend() {
        d = d.checked_add_days(step)?;
    }
    Some(d)
}

impl HolidayRule {
    /// Shorthand for [`HolidayRule::Fixed`].
    pub fn fixed(month: Month, day: u8) -> Self {
        HolidayRule::Fixed { month, day }
    }

    /// Shorthand for [`HolidayRule::NthWeekday`].
    pub fn nth_weekday(month: Month, weekday: Weekday, nth: i8) -> Self {
        HolidayRule::NthWeekday {
            month,
            weekday,
            nth,
        }
    }

    /// Wrap this rule in an [`HolidayRule::Offset`].
    pub fn offset(self, days: i32) -> Self {
        HolidayRule::Offset {
            base: Box::new(self),
            days,
        }
    }

    /// Wrap this rule in an [`HolidayRule::Observed`].
    pub fn observed(self, observance: Observance) -> Self {
        HolidayRule::Observed {
            base: Box::new(self),
            observance,
        }
    }

    /// Check that the recurrence parameters describe a possible date.
    ///
    /// # Errors
    /// [`Error::InvalidRule`] for a day that can never occur in the month,
    /// an occurrence outside `±1..=5`, or offsets totalling more than
    /// [`MAX_OFFSET_DAYS`].
    pub fn validate(&self) -> Result<()> {
        self.validate_with_offset(0)
    }

    fn validate_with_offset(&self, offset: i32) -> Result<()> {
        match self {
            HolidayRule::Fixed { month, day } => {
                if *day == 0 || *day > month.max_days() {
                    return Err(Error::InvalidRule(format!(
                        "{month} has no day {day}"
                    )));
                }
                Ok(())
            }
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
            } => {
                if *nth == 0 || nth.unsigned_abs() > 5 {
                    return Err(Error::InvalidRule(format!(
                        "occurrence {nth} of {weekday} in {month} is impossible"
                    )));
                }
                Ok(())
            }
            HolidayRule::Easter => Ok(()),
            HolidayRule::Offset { base, days } => {
                let total = offset.saturating_add(*days);
                if total.abs() > MAX_OFFSET_DAYS {
                    return Err(Error::InvalidRule(format!(
                        "offset of {total} days exceeds {MAX_OFFSET_DAYS}"
                    )));
                }
                base.validate_with_offset(total)
            }
            HolidayRule::Observed { base, .. } => base.validate_with_offset(offset),
        }
    }

    /// The date this rule produces for reference `year`, if any.
    ///
    /// The result may fall outside `year` when offsets or observance move it
    /// across a year boundary (e.g. a Saturday 1 January observed on the
    /// preceding Friday).
    pub fn date_for_year(&self, year: u16) -> Result<Option<Date>> {
        Ok(match self {
            HolidayRule::Fixed { month, day } => {
                if *day > month.days_in(year) {
                    None
                } else {
                    Some(Date::from_ymd(year, month.number(), *day)?)
                }
            }
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
            } => Date::nth_weekday(*nth, *weekday, year, month.number()).ok(),
            HolidayRule::Easter => Some(easter_sunday(year)?),
            HolidayRule::Offset { base, days } => base
                .date_for_year(year)?
                .and_then(|d| d.checked_add_days(*days)),
            HolidayRule::Observed { base, observance } => {
                base.date_for_year(year)?.and_then(|d| observance.apply(d))
            }
        })
    }
}

/// Evaluate `rule` over the inclusive range `[start, end]`.
///
/// Returns dates in ascending order without duplicates. A date that
/// observance or an offset moves outside the range is excluded rather than
/// clamped.
///
/// # Errors
/// [`Error::InvalidRule`] if the rule fails [`HolidayRule::validate`];
/// [`Error::InvalidArgument`] if `start > end`.
pub fn dates_in_range(rule: &HolidayRule, start: Date, end: Date) -> Result<Vec<Date>> {
    rule.validate()?;
    if start > end {
        return Err(Error::InvalidArgument(format!(
            "range start {start} is after end {end}"
        )));
    }
    let first_year = start.year().saturating_sub(1).max(Date::MIN.year());
    let last_year = end.year().saturating_add(1).min(Date::MAX.year());
    let mut dates = Vec::with_capacity((last_year - first_year + 1) as usize);
    for year in first_year..=last_year {
        if let Some(d) = rule.date_for_year(year)? {
            if d >= start && d <= end {
                dates.push(d);
            }
        }
    }
    dates.sort_unstable();
    dates.dedup();
    Ok(dates)
}

/// A named holiday: a rule plus optional bounds and weekday filter.
///
/// Bounds (`start_date`, `end_date`, both inclusive) and the weekday filter
/// apply to the *observed* date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Human-readable name.
    pub name: String,
    /// Recurrence rule.
    pub rule: HolidayRule,
    /// First date on which the holiday can occur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// Last date on which the holiday can occur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    /// If present, only dates falling on one of these weekdays are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<Weekday>>,
}

impl Holiday {
    /// Create an unbounded holiday.
    pub fn new(name: impl Into<String>, rule: HolidayRule) -> Self {
        Self {
            name: name.into(),
            rule,
            start_date: None,
            end_date: None,
            days_of_week: None,
        }
    }

    /// Only observe the holiday on or after `date`.
    pub fn starting(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Only observe the holiday on or before `date`.
    pub fn ending(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Only keep dates falling on one of `days`.
    pub fn on_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.days_of_week = Some(days.into_iter().collect());
        self
    }

    /// Validate the rule and the bounds.
    pub fn validate(&self) -> Result<()> {
        self.rule
            .validate()
            .map_err(|e| Error::InvalidRule(format!("{}: {e}", self.name)))?;
        if let (Some(s), Some(e)) = (self.start_date, self.end_date) {
            if s > e {
                return Err(Error::InvalidRule(format!(
                    "{}: start {s} is after end {e}",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Evaluate the holiday over the inclusive range `[start, end]`.
    pub fn dates(&self, start: Date, end: Date) -> Result<Vec<Date>> {
        self.validate()?;
        let lo = self.start_date.map_or(start, |s| s.max(start));
        let hi = self.end_date.map_or(end, |e| e.min(end));
        if lo > hi {
            return Ok(Vec::new());
        }
        let mut dates = dates_in_range(&self.rule, lo, hi)?;
        if let Some(days) = &self.days_of_week {
            dates.retain(|d| days.contains(&d.weekday()));
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn fixed_date_every_year() {
        let rule = HolidayRule::fixed(Month::December, 25);
        let dates = dates_in_range(&rule, date(2020, 1, 1), date(2022, 12, 31)).unwrap();
        assert_eq!(
            dates,
            vec![date(2020, 12, 25), date(2021, 12, 25), date(2022, 12, 25)]
        );
    }

    #[test]
    fn leap_day_only_in_leap_years() {
        let rule = HolidayRule::fixed(Month::February, 29);
        let dates = dates_in_range(&rule, date(2021, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2024, 2, 29)]);
    }

    #[test]
    fn observed_saturday_moves_into_previous_year() {
        // 1 January 2022 was a Saturday: observed Friday 31 December 2021.
        let rule = HolidayRule::fixed(Month::January, 1).observed(Observance::NearestWorkday);
        let dates = dates_in_range(&rule, date(2021, 6, 1), date(2021, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2021, 12, 31)]);
    }

    #[test]
    fn observed_date_outside_window_is_excluded() {
        // 4 July 2021 was a Sunday, observed Monday 5 July.
        let rule = HolidayRule::fixed(Month::July, 4).observed(Observance::NearestWorkday);
        let dates = dates_in_range(&rule, date(2021, 7, 1), date(2021, 7, 4)).unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn offset_from_easter() {
        let good_friday = HolidayRule::Easter.offset(-2);
        let dates = dates_in_range(&good_friday, date(2023, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2023, 4, 7), date(2024, 3, 29)]);
    }

    #[test]
    fn last_weekday_of_month() {
        let memorial = HolidayRule::nth_weekday(Month::May, Weekday::Monday, -1);
        let dates = dates_in_range(&memorial, date(2023, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2023, 5, 29), date(2024, 5, 27)]);
    }

    #[test]
    fn impossible_rules_rejected() {
        let sixth = HolidayRule::nth_weekday(Month::January, Weekday::Monday, 6);
        assert!(matches!(
            dates_in_range(&sixth, date(2020, 1, 1), date(2020, 12, 31)),
            Err(Error::InvalidRule(_))
        ));
        let feb30 = HolidayRule::fixed(Month::February, 30);
        assert!(matches!(feb30.validate(), Err(Error::InvalidRule(_))));
        let zeroth = HolidayRule::nth_weekday(Month::March, Weekday::Friday, 0);
        assert!(matches!(zeroth.validate(), Err(Error::InvalidRule(_))));
        let far = HolidayRule::Easter.offset(150).offset(100);
        assert!(matches!(far.validate(), Err(Error::InvalidRule(_))));
    }

    #[test]
    fn observances() {
        let sat = date(2022, 1, 1);
        let sun = date(2023, 1, 1);
        let mon = date(2023, 1, 2);
        assert_eq!(Observance::NearestWorkday.apply(sat), Some(date(2021, 12, 31)));
        assert_eq!(Observance::NearestWorkday.apply(sun), Some(mon));
        assert_eq!(Observance::SundayToMonday.apply(sat), Some(sat));
        assert_eq!(Observance::NextMonday.apply(sat), Some(date(2022, 1, 3)));
        assert_eq!(Observance::NextMondayOrTuesday.apply(sun), Some(date(2023, 1, 3)));
        assert_eq!(Observance::NextMondayOrTuesday.apply(mon), Some(date(2023, 1, 3)));
        assert_eq!(Observance::PreviousFriday.apply(sun), Some(date(2022, 12, 30)));
        assert_eq!(Observance::NextWorkday.apply(date(2023, 1, 6)), Some(date(2023, 1, 9)));
        assert_eq!(Observance::PreviousWorkday.apply(mon), Some(date(2022, 12, 30)));
        assert_eq!(
            Observance::BeforeNearestWorkday.apply(sun),
            Some(date(2022, 12, 30))
        );
        assert_eq!(
            Observance::AfterNearestWorkday.apply(sat),
            Some(date(2022, 1, 3))
        );
    }

    #[test]
    fn holiday_bounds_apply_to_observed_date() {
        let mlk = Holiday::new(
            "Martin Luther King Jr. Day",
            HolidayRule::nth_weekday(Month::January, Weekday::Monday, 3),
        )
        .starting(date(1998, 1, 1));
        let dates = mlk.dates(date(1996, 1, 1), date(1999, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(1998, 1, 19), date(1999, 1, 18)]);
    }

    #[test]
    fn weekday_filter() {
        let h = Holiday::new("Christmas Eve", HolidayRule::fixed(Month::December, 24))
            .on_days([Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday, Weekday::Thursday]);
        // 2019-12-24 Tue kept, 2020-12-24 Thu kept, 2021-12-24 Fri dropped.
        let dates = h.dates(date(2019, 1, 1), date(2021, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2019, 12, 24), date(2020, 12, 24)]);
    }

    #[test]
    fn serde_round_trip_of_nested_rule() {
        let rule = HolidayRule::fixed(Month::July, 4).observed(Observance::NearestWorkday);
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"kind\":\"observed\""));
        let back: HolidayRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
