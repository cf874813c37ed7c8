//! # tc-time
//!
//! Civil dates, wall-clock times, validity windows, recurring holiday rules,
//! and the merge step that turns several rule sets plus ad-hoc closures into
//! one canonical holiday set.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Holiday calendars (named rule sets) and the holiday merge step.
pub mod calendar;

/// `Date` type.
pub mod date;

/// Western Easter computation.
pub mod easter;

/// Recurring holiday rules, observance shifts, and `Holiday`.
pub mod holiday;

/// `LocalTime` — a wall-clock time of day.
pub mod local_time;

/// `Month` — month of the year.
pub mod month;

/// `Weekday` — day of the week.
pub mod weekday;

/// `DateWindow` — half-open validity window over dates.
pub mod window;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendar::{merged_holidays, HolidayCalendar, HolidaySet};
pub use date::{Date, DateRange};
pub use easter::easter_sunday;
pub use holiday::{dates_in_range, Holiday, HolidayRule, Observance};
pub use local_time::LocalTime;
pub use month::Month;
pub use weekday::Weekday;
pub use window::DateWindow;
