//! Special sessions: early/late closes and late/early opens.
//!
//! A [`SpecialSessionRule`] overrides the open or close time-of-day on the
//! dates produced by a holiday subset (e.g. "13:00 close on Thanksgiving")
//! and/or on an explicit ad-hoc date list, optionally restricted to a
//! validity window.
//!
//! # Precedence
//!
//! Rules are applied in declaration order, and a later-declared rule
//! overrides an earlier one on every date both of them match. Configuration
//! therefore lists broad rules first and narrower or more recent ones after
//! them. Opens and closes are resolved independently of each other.
//!
//! A date that is a full holiday (regular or ad-hoc) never receives a
//! special session: the closure wins and the rule is ignored for that date.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tc_core::errors::Result;
use tc_time::{Date, DateWindow, HolidayCalendar, HolidaySet, LocalTime};
use tracing::warn;

/// Which end of the session a special rule overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    /// Override the open time.
    Open,
    /// Override the close time.
    Close,
}

/// A declared special open or close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialSessionRule {
    /// Open or close override.
    pub kind: SpecialKind,
    /// The overriding wall-clock time.
    pub time: LocalTime,
    /// Holiday rules whose dates receive the override.
    #[serde(default)]
    pub holidays: HolidayCalendar,
    /// Explicit dates that receive the override.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Date>,
    /// Restricts the rule to dates inside this window.
    #[serde(default)]
    pub window: DateWindow,
}

impl SpecialSessionRule {
    /// Special close on the dates of `holidays`.
    pub fn close(time: LocalTime, holidays: HolidayCalendar) -> Self {
        Self::new(SpecialKind::Close, time, holidays, Vec::new())
    }

    /// Special close on an explicit list of dates.
    pub fn close_adhoc(time: LocalTime, dates: Vec<Date>) -> Self {
        Self::new(SpecialKind::Close, time, HolidayCalendar::default(), dates)
    }

    /// Special open on the dates of `holidays`.
    pub fn open(time: LocalTime, holidays: HolidayCalendar) -> Self {
        Self::new(SpecialKind::Open, time, holidays, Vec::new())
    }

    /// Special open on an explicit list of dates.
    pub fn open_adhoc(time: LocalTime, dates: Vec<Date>) -> Self {
        Self::new(SpecialKind::Open, time, HolidayCalendar::default(), dates)
    }

    fn new(kind: SpecialKind, time: LocalTime, holidays: HolidayCalendar, dates: Vec<Date>) -> Self {
        Self {
            kind,
            time,
            holidays,
            dates,
            window: DateWindow::ALL,
        }
    }

    /// Restrict the rule to `window`.
    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }

    /// Validate the holiday subset.
    pub fn validate(&self) -> Result<()> {
        self.holidays.validate()
    }

    /// Dates in `[start, end]` this rule applies to, before holiday
    /// suppression.
    pub fn dates_in_range(&self, start: Date, end: Date) -> Result<Vec<Date>> {
        let mut dates = self.holidays.dates(start, end)?;
        dates.extend(self.dates.iter().copied().filter(|d| *d >= start && *d <= end));
        Ok(dates
            .into_iter()
            .filter(|d| self.window.contains(*d))
            .collect())
    }
}

/// Per-date special open/close times over a bounded range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialSessionResolver {
    opens: BTreeMap<Date, LocalTime>,
    closes: BTreeMap<Date, LocalTime>,
}

impl SpecialSessionResolver {
    /// Resolve `rules` over `[start, end]`, suppressing any date that is in
    /// `holidays`.
    pub fn new(
        rules: &[SpecialSessionRule],
        holidays: &HolidaySet,
        start: Date,
        end: Date,
    ) -> Result<Self> {
        let mut resolver = Self::default();
        for rule in rules {
            let target = match rule.kind {
                SpecialKind::Open => &mut resolver.opens,
                SpecialKind::Close => &mut resolver.closes,
            };
            for date in rule.dates_in_range(start, end)? {
                if date.is_weekend() {
                    continue;
                }
                if holidays.contains(date) {
                    warn!(%date, kind = ?rule.kind, time = %rule.time,
                        "special session ignored: date is a full holiday");
                    continue;
                }
                target.insert(date, rule.time);
            }
        }
        Ok(resolver)
    }

    /// The special close time for `date`, if any.
    pub fn resolve(&self, date: Date) -> Option<LocalTime> {
        self.resolve_close(date)
    }

    /// The special close time for `date`, if any.
    pub fn resolve_close(&self, date: Date) -> Option<LocalTime> {
        self.closes.get(&date).copied()
    }

    /// The special open time for `date`, if any.
    pub fn resolve_open(&self, date: Date) -> Option<LocalTime> {
        self.opens.get(&date).copied()
    }

    /// The override for `date` of the given kind, if any.
    pub fn resolve_kind(&self, date: Date, kind: SpecialKind) -> Option<LocalTime> {
        match kind {
            SpecialKind::Open => self.resolve_open(date),
            SpecialKind::Close => self.resolve_close(date),
        }
    }

    /// All resolved special opens.
    pub fn special_opens(&self) -> &BTreeMap<Date, LocalTime> {
        &self.opens
    }

    /// All resolved special closes.
    pub fn special_closes(&self) -> &BTreeMap<Date, LocalTime> {
        &self.closes
    }
}
