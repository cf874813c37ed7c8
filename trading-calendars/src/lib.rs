//! # trading-calendars
//!
//! Exchange trading calendars: which dates are sessions, and exactly when
//! each session opens and closes, across holidays, early closes, overnight
//! sessions, and daylight-saving transitions.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than on the individual `tc-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use trading_calendars::exchanges::iepa;
//! use trading_calendars::sessions::ExchangeCalendar;
//! use trading_calendars::time::Date;
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 12, 31).unwrap();
//! let iepa = ExchangeCalendar::new(iepa::spec().unwrap(), start, end).unwrap();
//!
//! let good_friday = Date::from_ymd(2024, 3, 29).unwrap();
//! assert!(!iepa.is_session(good_friday).unwrap());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error type and the swappable snapshot handle.
pub use tc_core as core;

/// Dates, wall-clock times, and holiday rules.
pub use tc_time as time;

/// Session generation, query index, and the calendar engine.
pub use tc_sessions as sessions;

/// Bundled exchange configurations.
pub use tc_exchanges as exchanges;

pub use tc_core::{Error, Result};
pub use tc_sessions::{CalendarRegistry, Direction, ExchangeCalendar, ExchangeCalendarSpec, Session};
