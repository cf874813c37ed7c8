//! # tc-sessions
//!
//! The session-generation engine. An [`ExchangeCalendarSpec`] describes an
//! exchange declaratively; [`SessionScheduleBuilder`] turns it into the
//! ordered, timezone-correct [`Session`] sequence for a date range; and
//! [`CalendarIndex`] answers membership, navigation, and minute-lookup
//! queries over that sequence. [`ExchangeCalendar`] ties the three together
//! behind a cache that grows monotonically as wider ranges are requested.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// The engine: cached, extendable calendar built from a spec.
pub mod calendar;

/// `CalendarIndex` — lookup structures over a built schedule.
pub mod index;

/// `CalendarRegistry` — caller-owned name → calendar lookup table.
pub mod registry;

/// `SessionScheduleBuilder` — the session-generation algorithm.
pub mod schedule;

/// `Session` — one trading session with absolute open/close instants.
pub mod session;

/// Special early/late closes and late/early opens.
pub mod special;

/// `ExchangeCalendarSpec` and its builder.
pub mod spec;

/// Local wall-clock → UTC resolution.
pub mod tz;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendar::ExchangeCalendar;
pub use index::{CalendarIndex, Direction};
pub use registry::CalendarRegistry;
pub use schedule::{build_sessions, SessionSchedule, SessionScheduleBuilder};
pub use session::Session;
pub use special::{SpecialKind, SpecialSessionResolver, SpecialSessionRule};
pub use spec::{ExchangeCalendarSpec, ExchangeCalendarSpecBuilder, TimeSchedule, TimeWindow};
pub use tz::{anchor_day, resolve_local, timezone_from_name};
