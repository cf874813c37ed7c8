//! Session schedule generation.
//!
//! [`SessionScheduleBuilder`] turns an [`ExchangeCalendarSpec`] into the
//! ordered [`Session`] sequence for an inclusive date range:
//!
//! 1. merge the regular and ad-hoc holidays into one [`HolidaySet`];
//! 2. resolve special opens and closes against that set;
//! 3. for every business day, pick the base open/close time from the
//!    windowed schedules, apply any special override, anchor the open and
//!    close to their calendar days via the day offsets, and convert both to
//!    UTC through the exchange timezone.
//!
//! Misconfiguration is fatal: a business day with no applicable time window,
//! or a session whose close is not after its open, fails the whole build.

use crate::session::Session;
use crate::special::SpecialSessionResolver;
use crate::spec::ExchangeCalendarSpec;
use crate::tz::{anchor_day, resolve_local};
use std::collections::BTreeMap;
use tc_core::errors::{Error, Result};
use tc_time::{merged_holidays, Date, HolidaySet, LocalTime};
use tracing::info;

/// The result of a schedule build: sessions plus the intermediate holiday
/// and special-session data they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSchedule {
    start: Date,
    end: Date,
    sessions: Vec<Session>,
    holidays: HolidaySet,
    specials: SpecialSessionResolver,
}

impl SessionSchedule {
    /// First date of the built range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last date of the built range (inclusive).
    pub fn end(&self) -> Date {
        self.end
    }

    /// Sessions in ascending date order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Consume the schedule, returning its sessions.
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }

    /// Merged full-closure dates for the range.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Special opens that took effect in the range.
    pub fn special_opens(&self) -> &BTreeMap<Date, LocalTime> {
        self.specials.special_opens()
    }

    /// Special closes that took effect in the range.
    pub fn special_closes(&self) -> &BTreeMap<Date, LocalTime> {
        self.specials.special_closes()
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Return `true` if no date in the range is a session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Builder for [`SessionSchedule`].
#[derive(Debug, Clone, Copy)]
pub struct SessionScheduleBuilder<'a> {
    spec: &'a ExchangeCalendarSpec,
    start: Date,
    end: Date,
}

impl<'a> SessionScheduleBuilder<'a> {
    /// Begin building the schedule of `spec` over `[start, end]`.
    pub fn new(spec: &'a ExchangeCalendarSpec, start: Date, end: Date) -> Self {
        Self { spec, start, end }
    }

    /// Build the `SessionSchedule`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `start > end`; [`Error::InvalidRule`]
    /// from holiday evaluation; [`Error::UnmatchedScheduleWindow`] if a
    /// business day has no base open or close time;
    /// [`Error::InconsistentSchedule`] if a resolved close is not after its
    /// open.
    pub fn build(self) -> Result<SessionSchedule> {
        let (start, end, spec) = (self.start, self.end, self.spec);
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "schedule start {start} is after end {end}"
            )));
        }

        let holidays = merged_holidays(&spec.regular_holidays, &spec.adhoc_holidays, start, end)?;
        let specials = SpecialSessionResolver::new(&spec.special_sessions, &holidays, start, end)?;

        let mut sessions = Vec::new();
        for date in holidays.business_days() {
            sessions.push(self.session_for(date, &specials)?);
        }

        info!(
            calendar = %spec.name,
            %start,
            %end,
            sessions = sessions.len(),
            holidays = holidays.len(),
            special_opens = specials.special_opens().len(),
            special_closes = specials.special_closes().len(),
            "built session schedule"
        );

        Ok(SessionSchedule {
            start,
            end,
            sessions,
            holidays,
            specials,
        })
    }

    fn session_for(&self, date: Date, specials: &SpecialSessionResolver) -> Result<Session> {
        let spec = self.spec;
        let unmatched = || Error::UnmatchedScheduleWindow {
            date: date.to_string(),
        };
        let base_open = spec.open_times.time_for(date).ok_or_else(unmatched)?;
        let base_close = spec.close_times.time_for(date).ok_or_else(unmatched)?;
        let open_time = specials.resolve_open(date).unwrap_or(base_open);
        let close_time = specials.resolve_close(date).unwrap_or(base_close);

        let open_utc = resolve_local(&spec.timezone, anchor_day(date, spec.open_offset)?, open_time)?;
        let close_utc = resolve_local(&spec.timezone, anchor_day(date, spec.close_offset)?, close_time)?;
        if close_utc <= open_utc {
            return Err(Error::InconsistentSchedule {
                date: date.to_string(),
                open: open_utc.to_rfc3339(),
                close: close_utc.to_rfc3339(),
            });
        }
        Ok(Session {
            session_date: date,
            open_utc,
            close_utc,
        })
    }
}

/// Build the sessions of `spec` over `[start, end]`.
pub fn build_sessions(spec: &ExchangeCalendarSpec, start: Date, end: Date) -> Result<Vec<Session>> {
    SessionScheduleBuilder::new(spec, start, end)
        .build()
        .map(SessionSchedule::into_sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TimeSchedule;
    use chrono::{TimeZone, Utc};
    use chrono_tz::{America::New_York, Europe::London};
    use tc_time::{Holiday, HolidayCalendar, HolidayRule, Month, Weekday};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn mlk() -> HolidayCalendar {
        HolidayCalendar::new(
            "mlk",
            vec![Holiday::new(
                "MLK",
                HolidayRule::nth_weekday(Month::January, Weekday::Monday, 3),
            )],
        )
    }

    fn overnight() -> ExchangeCalendarSpec {
        ExchangeCalendarSpec::builder("OVERNIGHT", New_York)
            .open_time(LocalTime::hm(20, 1))
            .open_offset(-1)
            .close_time(LocalTime::hm(18, 0))
            .special_close(LocalTime::hm(13, 0), mlk())
            .build()
            .unwrap()
    }

    #[test]
    fn one_session_per_weekday() {
        let sessions = build_sessions(&overnight(), date(2024, 1, 8), date(2024, 1, 21)).unwrap();
        assert_eq!(sessions.len(), 10);
        assert!(sessions.iter().all(|s| !s.session_date.is_weekend()));
    }

    #[test]
    fn previous_day_open_and_special_close() {
        let sessions = build_sessions(&overnight(), date(2024, 1, 15), date(2024, 1, 16)).unwrap();
        let mlk = sessions[0];
        assert_eq!(mlk.session_date, date(2024, 1, 15));
        assert_eq!(mlk.open_utc, Utc.with_ymd_and_hms(2024, 1, 15, 1, 1, 0).unwrap());
        assert_eq!(mlk.close_utc, Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap());
        assert_eq!(sessions[1].close_utc, Utc.with_ymd_and_hms(2024, 1, 16, 23, 0, 0).unwrap());
    }

    #[test]
    fn schedule_exposes_intermediates() {
        let spec = ExchangeCalendarSpec::builder("X", New_York)
            .open_time(LocalTime::hm(9, 30))
            .close_time(LocalTime::hm(16, 0))
            .regular_holidays(mlk())
            .build()
            .unwrap();
        let schedule = SessionScheduleBuilder::new(&spec, date(2024, 1, 1), date(2024, 1, 31))
            .build()
            .unwrap();
        assert!(schedule.holidays().contains(date(2024, 1, 15)));
        assert_eq!(schedule.len(), 22);
        assert!(schedule.special_closes().is_empty());
    }

    #[test]
    fn unmatched_window_is_fatal() {
        let spec = ExchangeCalendarSpec::builder("X", London)
            .open_times(
                TimeSchedule::from_start_dates(&[(Some(date(2020, 1, 1)), LocalTime::hm(8, 0))])
                    .unwrap(),
            )
            .close_time(LocalTime::hm(16, 30))
            .build()
            .unwrap();
        let err = build_sessions(&spec, date(2019, 12, 30), date(2020, 1, 3)).unwrap_err();
        assert_eq!(
            err,
            Error::UnmatchedScheduleWindow {
                date: "2019-12-30".into()
            }
        );
    }

    #[test]
    fn special_close_at_open_is_inconsistent() {
        let spec = ExchangeCalendarSpec::builder("X", New_York)
            .open_time(LocalTime::hm(9, 30))
            .close_time(LocalTime::hm(16, 0))
            .special_close_adhoc(LocalTime::hm(9, 30), vec![date(2024, 7, 3)])
            .build()
            .unwrap();
        let err = build_sessions(&spec, date(2024, 7, 1), date(2024, 7, 5)).unwrap_err();
        assert!(matches!(err, Error::InconsistentSchedule { date, .. } if date == "2024-07-03"));
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(matches!(
            build_sessions(&overnight(), date(2024, 2, 1), date(2024, 1, 1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn previous_day_open_at_first_supported_date() {
        let sessions = build_sessions(&overnight(), Date::MIN, date(1800, 1, 31)).unwrap();
        assert_eq!(sessions[0].session_date, Date::MIN);
        // 20:01 New York mean time (-4:56:02) on 1799-12-31.
        assert_eq!(sessions[0].open_utc, Utc.with_ymd_and_hms(1800, 1, 1, 0, 57, 2).unwrap());
        assert_eq!(sessions.len(), 23);
    }
}
