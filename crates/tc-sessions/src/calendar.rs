//! `ExchangeCalendar` — the engine.
//!
//! An `ExchangeCalendar` owns an immutable [`ExchangeCalendarSpec`] and a
//! [`CalendarIndex`] built from it for a bounded date range. The index lives
//! behind a [`SwapHandle`]: queries take a snapshot and run lock-free against
//! it, while [`ExchangeCalendar::ensure_range`] rebuilds for the union of the
//! current and requested ranges and publishes the new index in one swap.
//!
//! The built range only ever grows. Queries never extend it implicitly; a
//! query outside the range fails with [`Error::OutOfRange`] and the caller
//! decides whether to extend and retry.

use crate::index::{CalendarIndex, Direction};
use crate::session::Session;
use crate::spec::ExchangeCalendarSpec;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tc_core::errors::{Error, Result};
use tc_core::SwapHandle;
use tc_time::{Date, LocalTime};
use tracing::info;

/// A trading calendar: a spec plus its cached, extendable session index.
#[derive(Debug, Clone)]
pub struct ExchangeCalendar {
    spec: Arc<ExchangeCalendarSpec>,
    index: SwapHandle<CalendarIndex>,
}

impl ExchangeCalendar {
    /// Build a calendar for `spec` covering `[start, end]`.
    pub fn new(spec: ExchangeCalendarSpec, start: Date, end: Date) -> Result<Self> {
        Self::from_arc(Arc::new(spec), start, end)
    }

    /// Build a calendar from a shared spec.
    pub fn from_arc(spec: Arc<ExchangeCalendarSpec>, start: Date, end: Date) -> Result<Self> {
        spec.validate()?;
        let index = CalendarIndex::build(&spec, start, end)?;
        Ok(Self {
            spec,
            index: SwapHandle::new(index),
        })
    }

    /// Calendar name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The configuration this calendar was built from.
    pub fn spec(&self) -> &ExchangeCalendarSpec {
        &self.spec
    }

    /// A snapshot of the current index. It stays valid, and unchanged, even
    /// if the calendar is extended afterwards.
    pub fn index(&self) -> Arc<CalendarIndex> {
        self.index.load()
    }

    /// The currently built range `(start, end)`, inclusive.
    pub fn built_range(&self) -> (Date, Date) {
        let index = self.index();
        (index.start(), index.end())
    }

    /// Make sure `[start, end]` is built, rebuilding for the union of the
    /// current and requested ranges if needed. Returns the index that covers
    /// the request.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `start > end`; any build error for the
    /// union range, in which case the existing index is kept.
    pub fn ensure_range(&self, start: Date, end: Date) -> Result<Arc<CalendarIndex>> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "range start {start} is after end {end}"
            )));
        }
        let current = self.index();
        if current.covers(start, end) {
            return Ok(current);
        }
        let spec = &self.spec;
        self.index.update(|current| {
            // Another writer may have extended the range while we waited.
            if current.covers(start, end) {
                return Ok(None);
            }
            let (new_start, new_end) = (start.min(current.start()), end.max(current.end()));
            let next = CalendarIndex::build(spec, new_start, new_end)?;
            info!(
                calendar = %spec.name,
                from_start = %current.start(),
                from_end = %current.end(),
                to_start = %new_start,
                to_end = %new_end,
                "extended calendar range"
            );
            Ok(Some(next))
        })
    }

    // ── Introspection ────────────────────────────────────────────────────────

    /// Full-closure dates (regular and ad-hoc) over the built range.
    pub fn holidays(&self) -> Vec<Date> {
        self.index().holidays().iter().collect()
    }

    /// Special closes in effect over the built range.
    pub fn special_closes(&self) -> BTreeMap<Date, LocalTime> {
        self.index().special_closes().clone()
    }

    /// Special opens in effect over the built range.
    pub fn special_opens(&self) -> BTreeMap<Date, LocalTime> {
        self.index().special_opens().clone()
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// See [`CalendarIndex::is_session`].
    pub fn is_session(&self, date: Date) -> Result<bool> {
        self.index().is_session(date)
    }

    /// See [`CalendarIndex::session`].
    pub fn session(&self, date: Date) -> Result<Option<Session>> {
        self.index().session(date)
    }

    /// See [`CalendarIndex::sessions_in_range`].
    pub fn sessions_in_range(&self, start: Date, end: Date) -> Result<Vec<Session>> {
        self.index().sessions_in_range(start, end).map(<[Session]>::to_vec)
    }

    /// See [`CalendarIndex::next_session`].
    pub fn next_session(&self, date: Date) -> Result<Session> {
        self.index().next_session(date)
    }

    /// See [`CalendarIndex::previous_session`].
    pub fn previous_session(&self, date: Date) -> Result<Session> {
        self.index().previous_session(date)
    }

    /// See [`CalendarIndex::open_close_for_session`].
    pub fn open_close_for_session(&self, date: Date) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        self.index().open_close_for_session(date)
    }

    /// See [`CalendarIndex::session_open`].
    pub fn session_open(&self, date: Date) -> Result<DateTime<Utc>> {
        self.index().session_open(date)
    }

    /// See [`CalendarIndex::session_close`].
    pub fn session_close(&self, date: Date) -> Result<DateTime<Utc>> {
        self.index().session_close(date)
    }

    /// See [`CalendarIndex::session_minutes`].
    pub fn session_minutes(&self, date: Date) -> Result<i64> {
        self.index().session_minutes(date)
    }

    /// See [`CalendarIndex::session_distance`].
    pub fn session_distance(&self, start: Date, end: Date) -> Result<i64> {
        self.index().session_distance(start, end)
    }

    /// See [`CalendarIndex::sessions_window`].
    pub fn sessions_window(&self, date: Date, count: i32) -> Result<Vec<Session>> {
        self.index().sessions_window(date, count).map(<[Session]>::to_vec)
    }

    /// See [`CalendarIndex::session_for_minute`].
    pub fn session_for_minute(&self, instant: DateTime<Utc>) -> Result<Option<Session>> {
        self.index().session_for_minute(instant)
    }

    /// See [`CalendarIndex::is_open_on_minute`].
    pub fn is_open_on_minute(&self, instant: DateTime<Utc>) -> Result<bool> {
        self.index().is_open_on_minute(instant)
    }

    /// See [`CalendarIndex::minute_to_session`].
    pub fn minute_to_session(&self, instant: DateTime<Utc>, direction: Direction) -> Result<Session> {
        self.index().minute_to_session(instant, direction)
    }

    /// See [`CalendarIndex::next_open`].
    pub fn next_open(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.index().next_open(instant)
    }

    /// See [`CalendarIndex::next_close`].
    pub fn next_close(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.index().next_close(instant)
    }

    /// See [`CalendarIndex::previous_open`].
    pub fn previous_open(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.index().previous_open(instant)
    }

    /// See [`CalendarIndex::previous_close`].
    pub fn previous_close(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.index().previous_close(instant)
    }

    /// The first session, if any.
    pub fn first_session(&self) -> Option<Session> {
        self.index().first_session()
    }

    /// The last session, if any.
    pub fn last_session(&self) -> Option<Session> {
        self.index().last_session()
    }
}
