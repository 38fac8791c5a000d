//! # wallclock-engine
//!
//! Timezone-aware date/time and recurrence resolution for event scheduling.
//!
//! The engine turns what a person means ("May 29 at 5 PM in New York, every
//! Wednesday") into what a server stores (a UTC instant and an RFC 5545
//! recurrence rule) without the off-by-one-day and off-by-one-hour bugs that
//! naive timestamp math produces across DST transitions and the
//! international date line. All functions take explicit inputs (no system
//! clock access) — the caller provides the "now" anchor when needed, keeping
//! the engine deterministic and testable.
//!
//! ## Modules
//!
//! - [`timeofday`] — free-form time input ("6p", "16:30") → canonical time of day
//! - [`wallclock`] — wall-clock date/time + IANA zone ⇄ UTC instant, with explicit DST policies
//! - [`editor`] — edit-isolated date/time field pair behind a single instant
//! - [`recurrence`] — recurrence rule derivation anchored on the timezone-local start
//! - [`error`] — error types

pub mod editor;
pub mod error;
pub mod recurrence;
pub mod timeofday;
pub mod wallclock;

pub use editor::{DateFieldEditor, FieldState, TimezoneSwitch};
pub use error::WallclockError;
pub use recurrence::{
    day_code, EndCondition, Frequency, MonthlyPattern, RecurrenceResolver, RecurrenceRule,
};
pub use timeofday::{parse_time_of_day, Meridiem, TimeOfDay};
pub use wallclock::{
    compose, decompose, format_instant, parse_instant, parse_timezone, weekday_in_zone,
    CalendarDate, WallClockDateTime,
};
