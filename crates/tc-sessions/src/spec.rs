//! `ExchangeCalendarSpec` — the declarative description of an exchange.
//!
//! A spec is plain data: timezone, time-of-day schedules, offsets, holiday
//! rule sets, ad-hoc closures, and special-session rules. It is built once
//! (with [`ExchangeCalendarSpec::builder`] or from JSON) and never mutated;
//! every exchange is an instance of the same struct, consumed by one generic
//! engine.

use crate::special::SpecialSessionRule;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tc_core::errors::{Error, Result};
use tc_time::{Date, DateWindow, HolidayCalendar, LocalTime};

/// Largest magnitude accepted for the open and close day offsets.
pub const MAX_DAY_OFFSET: i32 = 2;

/// A time of day that applies inside a validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Dates the entry applies to.
    #[serde(flatten)]
    pub window: DateWindow,
    /// The wall-clock time.
    pub time: LocalTime,
}

/// An ordered list of windowed times of day. The first entry whose window
/// contains a date applies to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSchedule {
    entries: Vec<TimeWindow>,
}

impl TimeSchedule {
    /// One time for every date.
    pub fn constant(time: LocalTime) -> Self {
        Self {
            entries: vec![TimeWindow {
                window: DateWindow::ALL,
                time,
            }],
        }
    }

    /// Explicit windowed entries, in priority order.
    pub fn new(entries: Vec<TimeWindow>) -> Self {
        Self { entries }
    }

    /// Build from `(effective_from, time)` pairs in ascending order.
    ///
    /// Each time applies from its start date until the next entry's start
    /// date. Only the first entry may have no start date, meaning "since
    /// forever".
    ///
    /// ```
    /// use tc_sessions::TimeSchedule;
    /// use tc_time::{Date, LocalTime};
    ///
    /// let changeover = Date::from_ymd(2011, 1, 1).unwrap();
    /// let s = TimeSchedule::from_start_dates(&[
    ///     (None, LocalTime::hm(9, 0)),
    ///     (Some(changeover), LocalTime::hm(8, 0)),
    /// ])
    /// .unwrap();
    /// assert_eq!(s.time_for(Date::from_ymd(2010, 6, 1).unwrap()), Some(LocalTime::hm(9, 0)));
    /// assert_eq!(s.time_for(changeover), Some(LocalTime::hm(8, 0)));
    /// ```
    pub fn from_start_dates(pairs: &[(Option<Date>, LocalTime)]) -> Result<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (i, (start, time)) in pairs.iter().enumerate() {
            if i > 0 && start.is_none() {
                return Err(Error::Config(format!(
                    "time schedule entry {i} has no start date; only the first may omit it"
                )));
            }
            let end = match pairs.get(i + 1) {
                Some((Some(next), _)) => {
                    if let Some(s) = start {
                        if s >= next {
                            return Err(Error::Config(format!(
                                "time schedule start dates must ascend: {s} then {next}"
                            )));
                        }
                    }
                    Some(*next)
                }
                _ => None,
            };
            entries.push(TimeWindow {
                window: DateWindow { start: *start, end },
                time: *time,
            });
        }
        Ok(Self { entries })
    }

    /// The time applying to `date`, if any entry covers it.
    pub fn time_for(&self, date: Date) -> Option<LocalTime> {
        self.entries
            .iter()
            .find(|e| e.window.contains(date))
            .map(|e| e.time)
    }

    /// The entries in priority order.
    pub fn entries(&self) -> &[TimeWindow] {
        &self.entries
    }

    /// Return `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declarative configuration of one exchange calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeCalendarSpec {
    /// Calendar name (e.g. `"IEPA"`).
    pub name: String,
    /// Exchange timezone.
    #[serde(with = "tz_serde")]
    pub timezone: Tz,
    /// Base open times.
    pub open_times: TimeSchedule,
    /// Base close times.
    pub close_times: TimeSchedule,
    /// Day offset of the open relative to the session date; `-1` opens on
    /// the previous calendar day.
    #[serde(default)]
    pub open_offset: i32,
    /// Day offset of the close relative to the session date.
    #[serde(default)]
    pub close_offset: i32,
    /// Recurring full-closure rule sets.
    #[serde(default)]
    pub regular_holidays: Vec<HolidayCalendar>,
    /// One-off full closures.
    #[serde(default)]
    pub adhoc_holidays: Vec<Date>,
    /// Special opens and closes, in override-priority order.
    #[serde(default)]
    pub special_sessions: Vec<SpecialSessionRule>,
}

/// Serde helpers for `chrono_tz::Tz`, stored as its IANA name.
mod tz_serde {
    use chrono_tz::Tz;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(tz.name())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Tz, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        crate::tz::timezone_from_name(&s).map_err(serde::de::Error::custom)
    }
}

impl ExchangeCalendarSpec {
    /// Begin building a spec.
    pub fn builder(name: impl Into<String>, timezone: Tz) -> ExchangeCalendarSpecBuilder {
        ExchangeCalendarSpecBuilder::new(name, timezone)
    }

    /// Parse and validate a spec from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check the configuration for configuration errors.
    ///
    /// # Errors
    /// [`Error::Config`] for an empty name, empty time schedules, or
    /// out-of-range offsets; [`Error::InvalidRule`] for malformed holiday
    /// rules (regular or special).
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("calendar name is empty".into()));
        }
        if self.open_times.is_empty() || self.close_times.is_empty() {
            return Err(Error::Config(format!(
                "{}: open and close times must both be configured",
                self.name
            )));
        }
        for (label, offset) in [("open", self.open_offset), ("close", self.close_offset)] {
            if offset.abs() > MAX_DAY_OFFSET {
                return Err(Error::Config(format!(
                    "{}: {label} offset {offset} outside [-{MAX_DAY_OFFSET}, {MAX_DAY_OFFSET}]",
                    self.name
                )));
            }
        }
        self.regular_holidays
            .iter()
            .try_for_each(HolidayCalendar::validate)?;
        self.special_sessions
            .iter()
            .try_for_each(SpecialSessionRule::validate)
    }
}

/// Builder for [`ExchangeCalendarSpec`].
#[derive(Debug, Clone)]
pub struct ExchangeCalendarSpecBuilder {
    name: String,
    timezone: Tz,
    open_times: TimeSchedule,
    close_times: TimeSchedule,
    open_offset: i32,
    close_offset: i32,
    regular_holidays: Vec<HolidayCalendar>,
    adhoc_holidays: Vec<Date>,
    special_sessions: Vec<SpecialSessionRule>,
}

impl ExchangeCalendarSpecBuilder {
    /// Begin building a spec with no times, offsets of zero, and no holidays.
    pub fn new(name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            name: name.into(),
            timezone,
            open_times: TimeSchedule::default(),
            close_times: TimeSchedule::default(),
            open_offset: 0,
            close_offset: 0,
            regular_holidays: Vec::new(),
            adhoc_holidays: Vec::new(),
            special_sessions: Vec::new(),
        }
    }

    /// A single open time for all dates.
    pub fn open_time(mut self, time: LocalTime) -> Self {
        self.open_times = TimeSchedule::constant(time);
        self
    }

    /// Windowed open times.
    pub fn open_times(mut self, times: TimeSchedule) -> Self {
        self.open_times = times;
        self
    }

    /// A single close time for all dates.
    pub fn close_time(mut self, time: LocalTime) -> Self {
        self.close_times = TimeSchedule::constant(time);
        self
    }

    /// Windowed close times.
    pub fn close_times(mut self, times: TimeSchedule) -> Self {
        self.close_times = times;
        self
    }

    /// Set the open day offset.
    pub fn open_offset(mut self, days: i32) -> Self {
        self.open_offset = days;
        self
    }

    /// Set the close day offset.
    pub fn close_offset(mut self, days: i32) -> Self {
        self.close_offset = days;
        self
    }

    /// Add a recurring holiday rule set.
    pub fn regular_holidays(mut self, calendar: HolidayCalendar) -> Self {
        self.regular_holidays.push(calendar);
        self
    }

    /// Add one-off closure dates.
    pub fn adhoc_holidays(mut self, dates: impl IntoIterator<Item = Date>) -> Self {
        self.adhoc_holidays.extend(dates);
        self
    }

    /// Append a special-session rule (later rules take precedence).
    pub fn special(mut self, rule: SpecialSessionRule) -> Self {
        self.special_sessions.push(rule);
        self
    }

    /// Append a rule-based special close.
    pub fn special_close(self, time: LocalTime, holidays: HolidayCalendar) -> Self {
        self.special(SpecialSessionRule::close(time, holidays))
    }

    /// Append a rule-based special close limited to `window`.
    pub fn special_close_within(
        self,
        time: LocalTime,
        holidays: HolidayCalendar,
        window: DateWindow,
    ) -> Self {
        self.special(SpecialSessionRule::close(time, holidays).within(window))
    }

    /// Append an ad-hoc special close.
    pub fn special_close_adhoc(self, time: LocalTime, dates: Vec<Date>) -> Self {
        self.special(SpecialSessionRule::close_adhoc(time, dates))
    }

    /// Append a rule-based special open.
    pub fn special_open(self, time: LocalTime, holidays: HolidayCalendar) -> Self {
        self.special(SpecialSessionRule::open(time, holidays))
    }

    /// Append an ad-hoc special open.
    pub fn special_open_adhoc(self, time: LocalTime, dates: Vec<Date>) -> Self {
        self.special(SpecialSessionRule::open_adhoc(time, dates))
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ExchangeCalendarSpec> {
        let spec = ExchangeCalendarSpec {
            name: self.name,
            timezone: self.timezone,
            open_times: self.open_times,
            close_times: self.close_times,
            open_offset: self.open_offset,
            close_offset: self.close_offset,
            regular_holidays: self.regular_holidays,
            adhoc_holidays: self.adhoc_holidays,
            special_sessions: self.special_sessions,
        };
        spec.validate()?;
        Ok(spec)
    }
}
