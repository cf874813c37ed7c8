//! `Date` type.
//!
//! Dates are represented as a serial number of days since the Unix epoch
//! (1970-01-01 has serial 0) in the proleptic Gregorian calendar. The serial
//! form makes day arithmetic and dense, array-backed lookups trivial; the
//! year/month/day view is recovered on demand.
//!
//! # Valid range
//! 1800-01-01 to 2399-12-31, which comfortably covers any exchange history
//! and a few centuries of forward schedule generation.

use crate::month::Month;
use crate::weekday::Weekday;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tc_core::errors::{Error, Result};

/// A timezone-naive civil date represented as a serial number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

// ── Constants ─────────────────────────────────────────────────────────────────

impl Date {
    /// Minimum valid date: January 1, 1800.
    pub const MIN: Date = Date(days_from_civil(1800, 1, 1));

    /// Maximum valid date: December 31, 2399.
    pub const MAX: Date = Date(days_from_civil(2399, 12, 31));

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from a serial number (days since 1970-01-01).
    pub fn from_serial(serial: i32) -> Result<Self> {
        let d = Date(serial);
        if d < Self::MIN || d > Self::MAX {
            return Err(Error::Date(format!(
                "serial {serial} outside [{}, {}]",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(d)
    }

    /// Create a date from year, month (1–12), and day-of-month (1–31).
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1800..=2399).contains(&year) {
            return Err(Error::Date(format!(
                "year {year} out of range [1800, 2399]"
            )));
        }
        let mon = Month::from_number(month)
            .ok_or_else(|| Error::Date(format!("month {month} out of range [1, 12]")))?;
        let days_in = mon.days_in(year);
        if day == 0 || day > days_in {
            return Err(Error::Date(format!(
                "day {day} out of range [1, {days_in}] for {year}-{month:02}"
            )));
        }
        Ok(Date(days_from_civil(year as i32, month as i32, day as i32)))
    }

    /// Const constructor for literal configuration data.
    ///
    /// # Panics
    /// Panics (at compile time in const contexts) if the date is invalid or
    /// outside the supported range.
    pub const fn civil(year: u16, month: u8, day: u8) -> Self {
        let (y, m, d) = (year as i32, month as i32, day as i32);
        let serial = days_from_civil(y, m, d);
        let (ry, rm, rd) = civil_from_days(serial);
        assert!(
            ry == y && rm == m && rd == d && year >= 1800 && year <= 2399 && month >= 1 && month <= 12,
            "invalid civil date"
        );
        Date(serial)
    }

    /// Convert from a `chrono::NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Result<Self> {
        let year = u16::try_from(date.year())
            .map_err(|_| Error::Date(format!("year {} out of range", date.year())))?;
        Self::from_ymd(year, date.month() as u8, date.day() as u8)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Return the serial number (days since 1970-01-01).
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// Return the year.
    pub fn year(&self) -> u16 {
        civil_from_days(self.0).0 as u16
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u8 {
        civil_from_days(self.0).1 as u8
    }

    /// Return the day of the month (1–31).
    pub fn day_of_month(&self) -> u8 {
        civil_from_days(self.0).2 as u8
    }

    /// Return `(year, month, day)`.
    pub fn ymd(&self) -> (u16, u8, u8) {
        let (y, m, d) = civil_from_days(self.0);
        (y as u16, m as u8, d as u8)
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        // 1970-01-01 was a Thursday (ordinal 4).
        let w = ((self.0 + 3).rem_euclid(7) + 1) as u8;
        Weekday::from_ordinal(w).unwrap_or(Weekday::Monday)
    }

    /// Return `true` if this date falls on Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        self.weekday().is_weekend()
    }

    /// Convert to a `chrono::NaiveDate`.
    pub fn to_naive(self) -> NaiveDate {
        let (y, m, d) = civil_from_days(self.0);
        // Every in-range serial maps to a date chrono can represent.
        NaiveDate::from_ymd_opt(y, m as u32, d as u32).unwrap_or(NaiveDate::MIN)
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` days, returning `None` if the result leaves the valid
    /// range.
    pub fn checked_add_days(self, n: i32) -> Option<Self> {
        let serial = self.0.checked_add(n)?;
        let d = Date(serial);
        (Self::MIN..=Self::MAX).contains(&d).then_some(d)
    }

    /// Advance by `n` days. Returns an error if the result is out of range.
    pub fn add_days(self, n: i32) -> Result<Self> {
        self.checked_add_days(n).ok_or_else(|| {
            Error::Date(format!("date arithmetic: {self} + {n} days out of range"))
        })
    }

    /// Return the number of calendar days from `self` to `other`.
    /// Positive if `other > self`.
    pub fn days_between(self, other: Date) -> i32 {
        other.0 - self.0
    }

    /// Iterate over every date in `[start, end]`.
    pub fn range_inclusive(start: Date, end: Date) -> DateRange {
        DateRange {
            next: start.0,
            last: end.0,
        }
    }

    /// Return the *n*-th occurrence of `weekday` in `year`/`month`.
    ///
    /// Positive `n` counts from the start of the month (`1` is the first
    /// occurrence); negative `n` counts from the end (`-1` is the last).
    ///
    /// # Errors
    /// Returns an error if `n` is zero or if the month has no such
    /// occurrence (e.g. a 5th Wednesday in February 2024).
    pub fn nth_weekday(n: i8, weekday: Weekday, year: u16, month: u8) -> Result<Self> {
        if n == 0 {
            return Err(Error::Date("nth_weekday: n must be non-zero".into()));
        }
        let days_in = Month::from_number(month)
            .ok_or_else(|| Error::Date(format!("month {month} out of range [1, 12]")))?
            .days_in(year);
        let target = weekday.ordinal() as i32;
        let day = if n > 0 {
            let first = Date::from_ymd(year, month, 1)?;
            let skip = (target - first.weekday().ordinal() as i32).rem_euclid(7);
            1 + skip + 7 * (n as i32 - 1)
        } else {
            let last = Date::from_ymd(year, month, days_in)?;
            let back = (last.weekday().ordinal() as i32 - target).rem_euclid(7);
            days_in as i32 - back - 7 * (-(n as i32) - 1)
        };
        if day < 1 || day > days_in as i32 {
            return Err(Error::Date(format!(
                "nth_weekday: occurrence {n} of {weekday} does not exist in {year}-{month:02}"
            )));
        }
        Date::from_ymd(year, month, day as u8)
    }
}

// ── Arithmetic operators ──────────────────────────────────────────────────────

impl std::ops::Add<i32> for Date {
    type Output = Self;
    fn add(self, rhs: i32) -> Self {
        self.add_days(rhs).expect("date addition overflow")
    }
}

impl std::ops::Sub<i32> for Date {
    type Output = Self;
    fn sub(self, rhs: i32) -> Self {
        self.add_days(-rhs).expect("date subtraction underflow")
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

impl std::ops::AddAssign<i32> for Date {
    fn add_assign(&mut self, rhs: i32) {
        *self = *self + rhs;
    }
}

// ── Iteration ─────────────────────────────────────────────────────────────────

/// Iterator over an inclusive range of dates, produced by
/// [`Date::range_inclusive`].
#[derive(Debug, Clone)]
pub struct DateRange {
    next: i32,
    last: i32,
}

impl Iterator for DateRange {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.next > self.last {
            return None;
        }
        let d = Date(self.next);
        self.next += 1;
        Some(d)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.last - self.next + 1).max(0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateRange {}

// ── Display / parsing ─────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = civil_from_days(self.0);
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({self})")
    }
}

impl FromStr for Date {
    type Err = Error;

    /// Parse an ISO `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::Date(format!("expected YYYY-MM-DD, got {s:?}"));
        let mut parts = s.trim().splitn(3, '-');
        let y = parts.next().and_then(|p| p.parse::<u16>().ok()).ok_or_else(bad)?;
        let m = parts.next().and_then(|p| p.parse::<u8>().ok()).ok_or_else(bad)?;
        let d = parts.next().and_then(|p| p.parse::<u8>().ok()).ok_or_else(bad)?;
        Date::from_ymd(y, m, d)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Days since 1970-01-01 for a proleptic Gregorian (year, month, day).
const fn days_from_civil(year: i32, month: i32, day: i32) -> i32 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
const fn civil_from_days(serial: i32) -> (i32, i32, i32) {
    let z = serial + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + (if m <= 2 { 1 } else { 0 });
    (y, m, d)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
