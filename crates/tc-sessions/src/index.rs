//! `CalendarIndex` — read-only lookup structures over a built schedule.
//!
//! The index keeps the sessions in a sorted array plus a dense table mapping
//! each date of the built range to its session position, so date queries are
//! O(1) and instant queries are a binary search over the (monotonic) open
//! times.
//!
//! Every query is defined only inside the built range. Dates outside it, and
//! instants outside the span of wall-clock time the built sessions fully
//! account for, fail with [`Error::OutOfRange`].

use crate::schedule::{SessionSchedule, SessionScheduleBuilder};
use crate::session::Session;
use crate::spec::ExchangeCalendarSpec;
use crate::tz::{anchor_day, resolve_local};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tc_core::ensure;
use tc_core::errors::{Error, Result};
use tc_time::{Date, HolidaySet, LocalTime};

/// How [`CalendarIndex::minute_to_session`] treats an instant that falls
/// outside every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Roll forward to the next session.
    Next,
    /// Roll back to the previous session.
    Previous,
    /// Fail with [`Error::InvalidArgument`].
    None,
}

/// Query index over the sessions of one calendar and date range.
#[derive(Debug, Clone)]
pub struct CalendarIndex {
    schedule: SessionSchedule,
    /// Position of each date's session in `sessions`, indexed from `start`.
    by_date: Vec<Option<u32>>,
    /// Instants in `[first_instant, last_instant)` cannot belong to a session
    /// outside the built range, given that sessions never overlap.
    first_instant: DateTime<Utc>,
    last_instant: DateTime<Utc>,
}

impl CalendarIndex {
    /// Build the schedule of `spec` over `[start, end]` and index it.
    pub fn build(spec: &ExchangeCalendarSpec, start: Date, end: Date) -> Result<Self> {
        let schedule = SessionScheduleBuilder::new(spec, start, end).build()?;
        Self::from_schedule(spec, schedule)
    }

    /// Index an already built schedule of `spec`.
    ///
    /// # Errors
    /// [`Error::Precondition`] if a session opens before the previous one
    /// closes.
    pub fn from_schedule(spec: &ExchangeCalendarSpec, schedule: SessionSchedule) -> Result<Self> {
        let (start, end) = (schedule.start(), schedule.end());
        let mut by_date = vec![None; start.days_between(end) as usize + 1];
        for (i, s) in schedule.sessions().iter().enumerate() {
            let slot = start.days_between(s.session_date) as usize;
            by_date[slot] = Some(i as u32);
        }

        for pair in schedule.sessions().windows(2) {
            ensure!(
                pair[0].close_utc <= pair[1].open_utc,
                "sessions {} and {} overlap",
                pair[0].session_date,
                pair[1].session_date
            );
        }

        let midnight = LocalTime::hm(0, 0);
        let first_day = anchor_day(start, spec.close_offset.max(0))?;
        let last_day = anchor_day(end, 1 + spec.open_offset.min(0))?;
        let mut first_instant = resolve_local(&spec.timezone, first_day, midnight)?;
        let mut last_instant = resolve_local(&spec.timezone, last_day, midnight)?;
        if let Some(first) = schedule.sessions().first() {
            first_instant = first_instant.min(first.open_utc);
        }
        if let Some(last) = schedule.sessions().last() {
            last_instant = last_instant.max(last.close_utc);
        }

        Ok(Self {
            schedule,
            by_date,
            first_instant,
            last_instant,
        })
    }

    // ── Range ────────────────────────────────────────────────────────────────

    /// First date of the built range.
    pub fn start(&self) -> Date {
        self.schedule.start()
    }

    /// Last date of the built range (inclusive).
    pub fn end(&self) -> Date {
        self.schedule.end()
    }

    /// Return `true` if `[start, end]` lies inside the built range.
    pub fn covers(&self, start: Date, end: Date) -> bool {
        start >= self.start() && end <= self.end()
    }

    fn out_of_range(&self, start: impl ToString, end: impl ToString) -> Error {
        Error::OutOfRange {
            start: start.to_string(),
            end: end.to_string(),
            built_start: self.start().to_string(),
            built_end: self.end().to_string(),
        }
    }

    fn check_date(&self, date: Date) -> Result<usize> {
        if !self.covers(date, date) {
            return Err(self.out_of_range(date, date));
        }
        Ok(self.start().days_between(date) as usize)
    }

    fn check_range(&self, start: Date, end: Date) -> Result<()> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "range start {start} is after end {end}"
            )));
        }
        if !self.covers(start, end) {
            return Err(self.out_of_range(start, end));
        }
        Ok(())
    }

    fn check_instant(&self, instant: DateTime<Utc>) -> Result<()> {
        if instant < self.first_instant || instant >= self.last_instant {
            return Err(Error::OutOfRange {
                start: instant.to_rfc3339(),
                end: instant.to_rfc3339(),
                built_start: self.first_instant.to_rfc3339(),
                built_end: self.last_instant.to_rfc3339(),
            });
        }
        Ok(())
    }

    fn position(&self, date: Date) -> Result<Option<usize>> {
        let slot = self.check_date(date)?;
        Ok(self.by_date[slot].map(|i| i as usize))
    }

    fn position_of_session(&self, date: Date) -> Result<usize> {
        self.position(date)?
            .ok_or_else(|| Error::InvalidArgument(format!("{date} is not a session")))
    }

    // ── Whole-index accessors ────────────────────────────────────────────────

    /// All sessions in ascending order.
    pub fn sessions(&self) -> &[Session] {
        self.schedule.sessions()
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    /// Return `true` if the built range holds no session.
    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }

    /// The earliest session, if any.
    pub fn first_session(&self) -> Option<Session> {
        self.sessions().first().copied()
    }

    /// The latest session, if any.
    pub fn last_session(&self) -> Option<Session> {
        self.sessions().last().copied()
    }

    /// Merged full-closure dates for the built range.
    pub fn holidays(&self) -> &HolidaySet {
        self.schedule.holidays()
    }

    /// Special opens in effect over the built range.
    pub fn special_opens(&self) -> &BTreeMap<Date, LocalTime> {
        self.schedule.special_opens()
    }

    /// Special closes in effect over the built range.
    pub fn special_closes(&self) -> &BTreeMap<Date, LocalTime> {
        self.schedule.special_closes()
    }

    // ── Date queries ─────────────────────────────────────────────────────────

    /// Return `true` if `date` is a session.
    pub fn is_session(&self, date: Date) -> Result<bool> {
        Ok(self.position(date)?.is_some())
    }

    /// The session on `date`, if `date` is a session.
    pub fn session(&self, date: Date) -> Result<Option<Session>> {
        Ok(self.position(date)?.map(|i| self.sessions()[i]))
    }

    /// Open and close instants of the session on `date`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `date` is not a session.
    pub fn open_close_for_session(&self, date: Date) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let s = self.sessions()[self.position_of_session(date)?];
        Ok((s.open_utc, s.close_utc))
    }

    /// Open instant of the session on `date`.
    pub fn session_open(&self, date: Date) -> Result<DateTime<Utc>> {
        self.open_close_for_session(date).map(|(open, _)| open)
    }

    /// Close instant of the session on `date`.
    pub fn session_close(&self, date: Date) -> Result<DateTime<Utc>> {
        self.open_close_for_session(date).map(|(_, close)| close)
    }

    /// Length of the session on `date` in whole minutes.
    pub fn session_minutes(&self, date: Date) -> Result<i64> {
        Ok(self.sessions()[self.position_of_session(date)?].minutes())
    }

    /// The first session strictly after `date`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `date` is outside the built range or no
    /// later session has been built.
    pub fn next_session(&self, date: Date) -> Result<Session> {
        self.check_date(date)?;
        let i = self.sessions().partition_point(|s| s.session_date <= date);
        self.sessions()
            .get(i)
            .copied()
            .ok_or_else(|| self.out_of_range(date, self.end().add_days(1).unwrap_or(Date::MAX)))
    }

    /// The last session strictly before `date`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `date` is outside the built range or no
    /// earlier session has been built.
    pub fn previous_session(&self, date: Date) -> Result<Session> {
        self.check_date(date)?;
        let i = self.sessions().partition_point(|s| s.session_date < date);
        match i.checked_sub(1) {
            Some(j) => Ok(self.sessions()[j]),
            None => Err(self.out_of_range(self.start().add_days(-1).unwrap_or(Date::MIN), date)),
        }
    }

    /// Sessions with `start <= session_date <= end`, ascending.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if any part of `[start, end]` lies outside the
    /// built range; the result is never silently truncated.
    pub fn sessions_in_range(&self, start: Date, end: Date) -> Result<&[Session]> {
        self.check_range(start, end)?;
        let sessions = self.sessions();
        let lo = sessions.partition_point(|s| s.session_date < start);
        let hi = sessions.partition_point(|s| s.session_date <= end);
        Ok(&sessions[lo..hi])
    }

    /// Number of sessions between `start` and `end` inclusive; negative if
    /// `start` is after `end`.
    pub fn session_distance(&self, start: Date, end: Date) -> Result<i64> {
        if start > end {
            return self.session_distance(end, start).map(|n| -n);
        }
        Ok(self.sessions_in_range(start, end)?.len() as i64)
    }

    /// The session on `date` and the `count` sessions after it (or, for a
    /// negative `count`, before it), in ascending order.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `date` is not a session;
    /// [`Error::OutOfRange`] if the window extends past the built range.
    pub fn sessions_window(&self, date: Date, count: i32) -> Result<&[Session]> {
        let i = self.position_of_session(date)? as i64;
        let j = i + i64::from(count);
        let (lo, hi) = (i.min(j), i.max(j));
        if lo < 0 || hi >= self.len() as i64 {
            let edge = if lo < 0 { self.start() } else { self.end() };
            return Err(self.out_of_range(format!("{date}{count:+} sessions"), edge));
        }
        Ok(&self.sessions()[lo as usize..=hi as usize])
    }

    // ── Instant queries ──────────────────────────────────────────────────────

    /// The session whose `[open_utc, close_utc)` contains `instant`.
    pub fn session_for_minute(&self, instant: DateTime<Utc>) -> Result<Option<Session>> {
        self.check_instant(instant)?;
        let i = self.sessions().partition_point(|s| s.open_utc <= instant);
        Ok(i.checked_sub(1)
            .map(|j| self.sessions()[j])
            .filter(|s| s.contains(instant)))
    }

    /// Return `true` if the exchange is open at `instant`.
    pub fn is_open_on_minute(&self, instant: DateTime<Utc>) -> Result<bool> {
        Ok(self.session_for_minute(instant)?.is_some())
    }

    /// The session containing `instant`, or, outside every session, the
    /// neighbouring session chosen by `direction`.
    pub fn minute_to_session(&self, instant: DateTime<Utc>, direction: Direction) -> Result<Session> {
        if let Some(s) = self.session_for_minute(instant)? {
            return Ok(s);
        }
        let sessions = self.sessions();
        let beyond = || self.out_of_range(instant.to_rfc3339(), instant.to_rfc3339());
        match direction {
            Direction::Next => {
                let i = sessions.partition_point(|s| s.open_utc <= instant);
                sessions.get(i).copied().ok_or_else(beyond)
            }
            Direction::Previous => {
                let i = sessions.partition_point(|s| s.close_utc <= instant);
                i.checked_sub(1).map(|j| sessions[j]).ok_or_else(beyond)
            }
            Direction::None => Err(Error::InvalidArgument(format!(
                "{} is not a trading minute",
                instant.to_rfc3339()
            ))),
        }
    }

    /// The first open strictly after `instant`.
    pub fn next_open(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.check_instant(instant)?;
        let i = self.sessions().partition_point(|s| s.open_utc <= instant);
        self.instant_at(i, instant).map(|s| s.open_utc)
    }

    /// The first close strictly after `instant`.
    pub fn next_close(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.check_instant(instant)?;
        let i = self.sessions().partition_point(|s| s.close_utc <= instant);
        self.instant_at(i, instant).map(|s| s.close_utc)
    }

    /// The last open strictly before `instant`.
    pub fn previous_open(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.check_instant(instant)?;
        let i = self.sessions().partition_point(|s| s.open_utc < instant);
        self.instant_before(i, instant).map(|s| s.open_utc)
    }

    /// The last close strictly before `instant`.
    pub fn previous_close(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.check_instant(instant)?;
        let i = self.sessions().partition_point(|s| s.close_utc < instant);
        self.instant_before(i, instant).map(|s| s.close_utc)
    }

    fn instant_at(&self, i: usize, instant: DateTime<Utc>) -> Result<Session> {
        self.sessions()
            .get(i)
            .copied()
            .ok_or_else(|| self.out_of_range(instant.to_rfc3339(), instant.to_rfc3339()))
    }

    fn instant_before(&self, i: usize, instant: DateTime<Utc>) -> Result<Session> {
        match i.checked_sub(1) {
            Some(j) => Ok(self.sessions()[j]),
            None => Err(self.out_of_range(instant.to_rfc3339(), instant.to_rfc3339())),
        }
    }
}
