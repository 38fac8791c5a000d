//! Composition and decomposition of wall-clock date/times against the IANA
//! timezone database.
//!
//! A wall clock ("May 29, 5:00 PM in America/New_York") is human-meaningful
//! but not an instant; an instant (a UTC point in time) is what gets
//! persisted. [`compose`] resolves a wall clock to an instant using the
//! zone's transition table, and [`decompose`] is the pure inverse read.
//!
//! # DST policy
//!
//! - **Fall back** (a local time that occurs twice): [`compose`] picks the
//!   **earlier**, pre-transition occurrence.
//! - **Spring forward** (a local time that never occurs): [`compose`]
//!   normalizes **forward past the gap by the gap size** — 2:30 AM inside a
//!   one-hour gap resolves to 3:30 AM. This is documented behavior, not an
//!   error.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, WallclockError};
use crate::timeofday::TimeOfDay;

// ── CalendarDate ────────────────────────────────────────────────────────────

/// A calendar date with no time and no timezone.
///
/// Always a real date: month 1-12, day valid for the month and year
/// (leap years accounted for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31 and valid for `year`/`month`.
    pub day: u32,
}

impl CalendarDate {
    /// Create a calendar date, rejecting impossible dates (e.g. Feb 30).
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::DateParse`] if the triple is not a real date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|_| Self { year, month, day })
            .ok_or_else(|| {
                WallclockError::DateParse(format!("{year:04}-{month:02}-{day:02}"))
            })
    }

    /// Parse a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::DateParse`] for malformed input or an
    /// impossible date.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| WallclockError::DateParse(format!("'{s}'")))?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        })
    }

    pub(crate) fn to_naive(self) -> NaiveDate {
        // Validated at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ── WallClockDateTime ───────────────────────────────────────────────────────

/// What the clock reads, in a specific place. Not an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClockDateTime {
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub tz: Tz,
}

impl WallClockDateTime {
    /// Read the wall clock a given instant shows in `tz`.
    pub fn of_instant(instant: DateTime<Utc>, tz: Tz) -> Self {
        let (date, time) = decompose(instant, tz);
        Self { date, time, tz }
    }

    /// Resolve this wall clock to a UTC instant. See [`compose`].
    pub fn resolve(&self) -> Result<DateTime<Utc>> {
        compose(self.date, self.time, self.tz)
    }
}

// ── Parsing and formatting primitives ───────────────────────────────────────

/// Parse an IANA timezone id into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| WallclockError::InvalidTimezone(format!("'{s}'")))
}

/// Parse an ISO-8601 instant string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 input (`"2025-05-29T21:00:00Z"`, explicit-offset forms)
/// as well as designator-less timestamps (`"2025-05-29T21:00:00"`), which
/// are read as UTC. Output formatting always carries the designator; only
/// input is lenient.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| WallclockError::InvalidDatetime(format!("'{s}': {e}")))
}

/// Format an instant as RFC 3339 with the `Z` designator.
///
/// Emitted instants always carry an explicit UTC designator, never a bare
/// local timestamp.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ── compose / decompose ─────────────────────────────────────────────────────

/// Resolve a wall-clock date and time in `tz` to a UTC instant.
///
/// Uses the offset rule in effect at that local date/time. For an ambiguous
/// fall-back time the earlier occurrence wins; a nonexistent spring-forward
/// time is shifted forward past the gap (see module docs).
///
/// # Errors
///
/// Returns [`WallclockError::InvalidDatetime`] only if the zone's transition
/// table cannot resolve the wall clock at all, which does not happen for
/// real IANA zones.
///
/// # Examples
///
/// ```
/// use wallclock_engine::timeofday::TimeOfDay;
/// use wallclock_engine::wallclock::{compose, format_instant, CalendarDate};
///
/// let date = CalendarDate::new(2025, 5, 29).unwrap();
/// let time = TimeOfDay::new(17, 0).unwrap();
/// let tz: chrono_tz::Tz = "America/New_York".parse().unwrap();
///
/// let instant = compose(date, time, tz).unwrap();
/// // May 29 2025 is EDT (UTC-4), so 5:00 PM local = 21:00 UTC
/// assert_eq!(format_instant(instant), "2025-05-29T21:00:00Z");
/// ```
pub fn compose(date: CalendarDate, time: TimeOfDay, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = date
        .to_naive()
        .and_hms_opt(time.hour, time.minute, 0)
        .ok_or_else(|| {
            WallclockError::InvalidDatetime(format!("{} {}", date.to_iso(), time))
        })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Inside a spring-forward gap. Resolve a nearby pre-gap wall
            // clock with its (pre-transition) offset, then add the probe
            // distance back in absolute time; the result's local reading is
            // the requested time shifted forward by exactly the gap size.
            for half_hours in 1..=48i64 {
                let delta = Duration::minutes(30 * half_hours);
                if let Some(dt) = tz.from_local_datetime(&(naive - delta)).earliest() {
                    return Ok((dt + delta).with_timezone(&Utc));
                }
            }
            Err(WallclockError::InvalidDatetime(format!(
                "unresolvable local time {} {} in {}",
                date.to_iso(),
                time,
                tz
            )))
        }
    }
}

/// Read the calendar date and time of day an instant shows in `tz`.
///
/// Pure: never mutates caller state, never fails for a valid `Tz`.
pub fn decompose(instant: DateTime<Utc>, tz: Tz) -> (CalendarDate, TimeOfDay) {
    let local = instant.with_timezone(&tz);
    (
        CalendarDate {
            year: local.year(),
            month: local.month(),
            day: local.day(),
        },
        TimeOfDay {
            hour: local.hour(),
            minute: local.minute(),
        },
    )
}

/// The weekday an instant falls on in `tz`.
///
/// Recurrence derivation must use this, never the UTC weekday: an instant
/// near local midnight can fall on a different weekday locally than in UTC.
pub fn weekday_in_zone(instant: DateTime<Utc>, tz: Tz) -> Weekday {
    instant.with_timezone(&tz).weekday()
}

// ── Tests ───────────────────────────────────────────────────────────────────
