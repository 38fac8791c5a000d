//! Parsing of loosely-formatted human time input into a canonical time of day.
//!
//! Calendar text fields accept things like `"6"`, `"6p"`, `"6:30 pm"`, and
//! `"13:00"`. [`parse_time_of_day`] resolves all of them to a [`TimeOfDay`]
//! (a 24-hour hour/minute pair with no date and no timezone) or returns a
//! typed error. Parsing is pure and total over the accepted grammar; it never
//! guesses outside the documented ambiguity rule.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, WallclockError};

// ── TimeOfDay ───────────────────────────────────────────────────────────────

/// A normalized time of day on the 24-hour clock.
///
/// Carries no date and no timezone. The [`Display`](fmt::Display) form is the
/// canonical 12-hour rendering used by the date/time fields, e.g. `"4:30 PM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDay {
    /// Hour on the 24-hour clock (0-23).
    pub hour: u32,
    /// Minute (0-59).
    pub minute: u32,
}

impl TimeOfDay {
    /// Create a time of day, validating the 24-hour ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::TimeParse`] if `hour` is not 0-23 or
    /// `minute` is not 0-59.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 {
            return Err(WallclockError::TimeParse(format!(
                "hour out of range: {hour}"
            )));
        }
        if minute > 59 {
            return Err(WallclockError::TimeParse(format!(
                "minute out of range: {minute}"
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meridiem = if self.hour < 12 { "AM" } else { "PM" };
        let hour12 = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", hour12, self.minute, meridiem)
    }
}

/// An AM/PM marker, either parsed from input or remembered from a previous
/// committed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Meridiem {
    Am,
    Pm,
}

// ── parse_time_of_day ───────────────────────────────────────────────────────

/// Parse a free-form time string into a [`TimeOfDay`].
///
/// # Accepted grammar
///
/// Case-insensitive, with an optional space before the meridiem marker:
///
/// - Bare hour: `"6"`, `"13"` (minute defaults to 0)
/// - Hour with meridiem letter: `"6a"`, `"6p"`, `"6am"`, `"6pm"`
/// - Hour and minute, optionally with meridiem: `"6:30"`, `"6:30p"`, `"6:30 pm"`
/// - 24-hour values: `"0"`-`"23"` and `"13:00"`-style input with no marker
///   are read on the 24-hour clock directly
///
/// Values 1-12 with no marker are ambiguous. `previous_meridiem` resolves
/// them when supplied (so re-editing `"9:30 PM"` to `"10"` stays in the
/// evening); otherwise hours 1-11 default to AM and hour 12 to PM, matching
/// calendar-app convention.
///
/// # Errors
///
/// Returns [`WallclockError::TimeParse`] for unrecognized text, hours outside
/// 1-12 when a meridiem marker is present, hours outside 0-23 otherwise, or
/// minutes outside 0-59.
///
/// # Examples
///
/// ```
/// use wallclock_engine::timeofday::{parse_time_of_day, Meridiem};
///
/// let t = parse_time_of_day("6:30 pm", None).unwrap();
/// assert_eq!(t.to_string(), "6:30 PM");
///
/// // A remembered meridiem keeps a re-typed bare hour in the evening.
/// let t = parse_time_of_day("10", Some(Meridiem::Pm)).unwrap();
/// assert_eq!((t.hour, t.minute), (22, 0));
/// ```
pub fn parse_time_of_day(raw: &str, previous_meridiem: Option<Meridiem>) -> Result<TimeOfDay> {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(WallclockError::TimeParse("empty input".to_string()));
    }

    let (digits, marker) = split_meridiem(&trimmed);
    let digits = digits.trim_end();

    let (hour_str, minute_str) = match digits.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (digits, None),
    };

    let hour: u32 = parse_component(hour_str, raw)?;
    let minute: u32 = match minute_str {
        Some(m) => parse_component(m, raw)?,
        None => 0,
    };

    if minute > 59 {
        return Err(WallclockError::TimeParse(format!(
            "minute out of range in '{}'",
            raw.trim()
        )));
    }

    let hour24 = match marker {
        Some(meridiem) => {
            // 12-hour form: the hour must be 1-12.
            if !(1..=12).contains(&hour) {
                return Err(WallclockError::TimeParse(format!(
                    "hour must be 1-12 with an AM/PM marker: '{}'",
                    raw.trim()
                )));
            }
            apply_meridiem(hour, meridiem)
        }
        None => {
            if hour > 23 {
                return Err(WallclockError::TimeParse(format!(
                    "hour out of range in '{}'",
                    raw.trim()
                )));
            }
            if hour == 0 || hour >= 13 {
                // Unambiguously 24-hour.
                hour
            } else {
                let meridiem = previous_meridiem.unwrap_or(if hour == 12 {
                    Meridiem::Pm
                } else {
                    Meridiem::Am
                });
                apply_meridiem(hour, meridiem)
            }
        }
    };

    TimeOfDay::new(hour24, minute)
}

/// Split a trailing meridiem marker off an already-lowercased string.
fn split_meridiem(s: &str) -> (&str, Option<Meridiem>) {
    for (suffix, meridiem) in [
        ("am", Meridiem::Am),
        ("pm", Meridiem::Pm),
        ("a", Meridiem::Am),
        ("p", Meridiem::Pm),
    ] {
        if let Some(rest) = s.strip_suffix(suffix) {
            return (rest, Some(meridiem));
        }
    }
    (s, None)
}

/// Parse a numeric hour/minute component, limited to two digits.
fn parse_component(s: &str, raw: &str) -> Result<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WallclockError::TimeParse(format!(
            "unrecognized format: '{}'",
            raw.trim()
        )));
    }
    s.parse().map_err(|_| {
        WallclockError::TimeParse(format!("unrecognized format: '{}'", raw.trim()))
    })
}

/// Map a 1-12 hour and a meridiem to the 24-hour clock.
fn apply_meridiem(hour12: u32, meridiem: Meridiem) -> u32 {
    match (hour12, meridiem) {
        (12, Meridiem::Am) => 0,
        (12, Meridiem::Pm) => 12,
        (h, Meridiem::Am) => h,
        (h, Meridiem::Pm) => h + 12,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
