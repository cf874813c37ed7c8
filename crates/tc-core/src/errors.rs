//! Error types for trading-calendars.
//!
//! Every failure the engine can report is a variant of a single
//! `thiserror`-derived enum. Configuration-time failures (`InvalidRule`,
//! `UnmatchedScheduleWindow`, `InconsistentSchedule`) surface when a schedule
//! is built; `OutOfRange` is the only query-time failure and is recoverable by
//! extending the built range and retrying.

use thiserror::Error;

/// The top-level error type used throughout trading-calendars.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A holiday recurrence rule is malformed or impossible
    /// (e.g. the 6th Monday of a month, or 30 February).
    #[error("invalid holiday rule: {0}")]
    InvalidRule(String),

    /// A business date matched none of the open/close validity windows.
    #[error("no open/close schedule window covers {date}")]
    UnmatchedScheduleWindow {
        /// The business date that was not covered.
        date: String,
    },

    /// After all overrides and timezone conversion the close is not after
    /// the open.
    #[error("inconsistent session on {date}: close {close} is not after open {open}")]
    InconsistentSchedule {
        /// The session date.
        date: String,
        /// The resolved open instant (UTC).
        open: String,
        /// The resolved close instant (UTC).
        close: String,
    },

    /// A query touched dates outside the range the calendar was built for.
    #[error("requested [{start}, {end}] is outside the built range [{built_start}, {built_end}]")]
    OutOfRange {
        /// First requested date.
        start: String,
        /// Last requested date.
        end: String,
        /// First date of the built range.
        built_start: String,
        /// Last date of the built range.
        built_end: String,
    },

    /// Date construction or arithmetic error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The timezone name is not in the IANA database.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Declarative configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Precondition violated (raised by [`ensure!`](crate::ensure)).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// General runtime error (raised by [`fail!`](crate::fail)).
    #[error("{0}")]
    Runtime(String),
}

impl Error {
    /// Return `true` for errors a caller can recover from by widening the
    /// built range and retrying the query.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}

/// Shorthand `Result` type used throughout trading-calendars.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tc_core::{ensure, errors::Error};
/// fn positive(x: i32) -> tc_core::errors::Result<i32> {
///     ensure!(x > 0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1).is_ok());
/// assert!(matches!(positive(-1), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use tc_core::{fail, errors::Error};
/// fn always_err() -> tc_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
