//! Holiday calendars and the holiday merge step.
//!
//! A [`HolidayCalendar`] is a named list of [`Holiday`] rules. Several of
//! them, plus a list of ad-hoc closure dates, are merged once per range into
//! a [`HolidaySet`]: the canonical, deduplicated set of full-closure dates.
//! A date that qualifies through more than one source (a named holiday that
//! is also listed as an ad-hoc closure) simply appears once.

use crate::date::{Date, DateRange};
use crate::holiday::Holiday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tc_core::errors::{Error, Result};
use tracing::debug;

/// A named collection of holiday rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// The rules in this calendar.
    pub rules: Vec<Holiday>,
}

impl HolidayCalendar {
    /// Create a calendar from a list of rules.
    pub fn new(name: impl Into<String>, rules: Vec<Holiday>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Add a rule.
    pub fn with(mut self, holiday: Holiday) -> Self {
        self.rules.push(holiday);
        self
    }

    /// Return `true` if the calendar holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate every rule.
    pub fn validate(&self) -> Result<()> {
        self.rules.iter().try_for_each(Holiday::validate)
    }

    /// All dates produced by any rule within `[start, end]`, ascending.
    pub fn dates(&self, start: Date, end: Date) -> Result<BTreeSet<Date>> {
        let mut out = BTreeSet::new();
        for holiday in &self.rules {
            out.extend(holiday.dates(start, end)?);
        }
        Ok(out)
    }
}

/// Merge rule-based calendars and ad-hoc dates into one holiday set for the
/// inclusive range `[start, end]`.
///
/// The result is a pure union; ad-hoc dates outside the range are ignored.
///
/// # Errors
/// [`Error::InvalidRule`] if any rule is malformed;
/// [`Error::InvalidArgument`] if `start > end`.
pub fn merged_holidays(
    rule_sets: &[HolidayCalendar],
    adhoc: &[Date],
    start: Date,
    end: Date,
) -> Result<HolidaySet> {
    if start > end {
        return Err(Error::InvalidArgument(format!(
            "range start {start} is after end {end}"
        )));
    }
    let mut dates = BTreeSet::new();
    for calendar in rule_sets {
        let found = calendar.dates(start, end)?;
        debug!(calendar = %calendar.name, count = found.len(), %start, %end, "evaluated holiday rules");
        dates.extend(found);
    }
    let before = dates.len();
    dates.extend(adhoc.iter().copied().filter(|d| *d >= start && *d <= end));
    debug!(
        adhoc = dates.len() - before,
        total = dates.len(),
        "merged ad-hoc holidays"
    );
    Ok(HolidaySet { start, end, dates })
}

/// The merged set of full-closure dates over a bounded range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySet {
    start: Date,
    end: Date,
    dates: BTreeSet<Date>,
}

impl HolidaySet {
    /// First date of the range this set was computed for.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last date of the range this set was computed for.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Return `true` if `date` is a holiday.
    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// Return `true` if `date` is a weekday that is not a holiday.
    ///
    /// Only meaningful for dates inside `[start, end]`.
    pub fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.contains(date)
    }

    /// Number of holiday dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Return `true` if there are no holidays in the range.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Holiday dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.dates.iter().copied()
    }

    /// Business days (weekdays minus holidays) in ascending order.
    pub fn business_days(&self) -> BusinessDays<'_> {
        BusinessDays {
            days: Date::range_inclusive(self.start, self.end),
            holidays: self,
        }
    }
}

/// Iterator over the business days of a [`HolidaySet`].
#[derive(Debug, Clone)]
pub struct BusinessDays<'a> {
    days: DateRange,
    holidays: &'a HolidaySet,
}

impl Iterator for BusinessDays<'_> {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let holidays = self.holidays;
        self.days.find(|d| holidays.is_business_day(*d))
    }
}
