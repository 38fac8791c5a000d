//! Stateful controller behind a paired date input and time input.
//!
//! The editor owns the draft text for each field and the committed wall-clock
//! state behind them. Its contract is edit isolation: committing the date
//! field recomposes the instant with the already-committed time of day, and
//! committing the time field recomposes with the already-committed calendar
//! day — so editing one field never perturbs the other, even when timezone
//! math moves the UTC instant across a local midnight.
//!
//! A naive implementation that re-derives both fields from a single timestamp
//! on every change violates this: entering a date, tabbing to the time field,
//! and blurring would silently decrement the day in zones west of UTC. The
//! explicit field states here are what prevent that class of bug.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::Result;
use crate::timeofday::{parse_time_of_day, Meridiem, TimeOfDay};
use crate::wallclock::{
    compose, decompose, format_instant, parse_instant, parse_timezone, CalendarDate,
};

/// Hour used when a brand-new editor has no seed instant: 5:00 PM local.
const DEFAULT_HOUR: u32 = 17;

// ── Field state ─────────────────────────────────────────────────────────────

/// Lifecycle of a single input field.
///
/// Construction always seeds both fields (from the incoming instant, or the
/// "now" default), so a field is never without a value: it is either
/// committed or carrying a draft on top of its committed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldState {
    /// A draft is being typed; the committed value is still authoritative.
    Editing,
    /// The field holds a validated, committed value.
    Committed,
}

/// What a timezone switch should preserve.
///
/// Clock-preserving keeps the displayed calendar day and time of day and
/// recomputes the instant; instant-preserving keeps the instant and
/// re-derives the displayed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneSwitch {
    ClockPreserving,
    InstantPreserving,
}

// ── DateFieldEditor ─────────────────────────────────────────────────────────

/// Controller for an independently-editable date field and time field that
/// together denote one instant in an active timezone.
#[derive(Debug, Clone)]
pub struct DateFieldEditor {
    tz: Tz,
    instant: DateTime<Utc>,
    date: CalendarDate,
    time: TimeOfDay,
    date_state: FieldState,
    time_state: FieldState,
    draft_date: Option<String>,
    draft_time: Option<String>,
    /// True once the user has committed any explicit edit since construction.
    edited: bool,
}

impl DateFieldEditor {
    /// Seed the editor from an ISO-8601 instant, displayed in `timezone`.
    ///
    /// Both fields start committed to the instant's wall clock in that zone.
    /// A designator-less timestamp is read as UTC, per [`parse_instant`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wallclock_engine::DateFieldEditor;
    ///
    /// let editor =
    ///     DateFieldEditor::from_instant("2025-05-29T21:00:00Z", "America/New_York").unwrap();
    /// // May 29 2025 is EDT (UTC-4), so 21:00 UTC reads as 5:00 PM
    /// assert_eq!(editor.local_date().to_iso(), "2025-05-29");
    /// assert_eq!(editor.local_time().to_string(), "5:00 PM");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::WallclockError::InvalidDatetime`] or
    /// [`crate::WallclockError::InvalidTimezone`] for unparseable input.
    pub fn from_instant(instant: &str, timezone: &str) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        let instant = parse_instant(instant)?;
        let (date, time) = decompose(instant, tz);
        Ok(Self {
            tz,
            instant,
            date,
            time,
            date_state: FieldState::Committed,
            time_state: FieldState::Committed,
            draft_date: None,
            draft_time: None,
            edited: false,
        })
    }

    /// Seed the editor with no incoming instant: today's date in `timezone`
    /// (as of the caller-supplied `now`) at 5:00 PM local.
    ///
    /// The "now" anchor is an argument, not a system-clock read, so the
    /// default is deterministic and testable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WallclockError::InvalidTimezone`] for an unknown
    /// zone id.
    pub fn with_default(now: DateTime<Utc>, timezone: &str) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        let (date, _) = decompose(now, tz);
        let time = TimeOfDay {
            hour: DEFAULT_HOUR,
            minute: 0,
        };
        let instant = compose(date, time, tz)?;
        Ok(Self {
            tz,
            instant,
            date,
            time,
            date_state: FieldState::Committed,
            time_state: FieldState::Committed,
            draft_date: None,
            draft_time: None,
            edited: false,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The committed instant, RFC 3339 with `Z`.
    pub fn instant(&self) -> String {
        format_instant(self.instant)
    }

    /// The committed calendar day as displayed in the active timezone.
    pub fn local_date(&self) -> CalendarDate {
        self.date
    }

    /// The committed time of day as displayed in the active timezone.
    pub fn local_time(&self) -> TimeOfDay {
        self.time
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn date_state(&self) -> FieldState {
        self.date_state
    }

    pub fn time_state(&self) -> FieldState {
        self.time_state
    }

    // ── Date field ──────────────────────────────────────────────────────

    /// Start (or continue) editing the date field with the given draft text.
    ///
    /// The committed value stays authoritative until [`commit_date`]
    /// succeeds.
    ///
    /// [`commit_date`]: Self::commit_date
    pub fn begin_date_edit(&mut self, raw: &str) {
        self.draft_date = Some(raw.to_string());
        self.date_state = FieldState::Editing;
    }

    /// Commit the date draft (blur / explicit confirm).
    ///
    /// On success the instant is recomposed from the **new** date and the
    /// **already-committed** time of day; the time field is untouched.
    /// Returns the new instant.
    ///
    /// # Errors
    ///
    /// A malformed or impossible date blocks the commit: the draft and
    /// `Editing` state are kept so the caller can surface a field-scoped
    /// error, and the previously committed values stay in effect.
    pub fn commit_date(&mut self) -> Result<String> {
        let draft = match self.draft_date.as_deref() {
            Some(d) => d,
            // Nothing being edited; the commit is a no-op.
            None => return Ok(self.instant()),
        };
        let date = CalendarDate::parse(draft)?;
        self.instant = compose(date, self.time, self.tz)?;
        self.date = date;
        self.date_state = FieldState::Committed;
        self.draft_date = None;
        self.edited = true;
        Ok(self.instant())
    }

    // ── Time field ──────────────────────────────────────────────────────

    /// Start (or continue) editing the time field with the given draft text.
    pub fn begin_time_edit(&mut self, raw: &str) {
        self.draft_time = Some(raw.to_string());
        self.time_state = FieldState::Editing;
    }

    /// Commit the time draft (blur / explicit confirm).
    ///
    /// The draft is parsed with the committed value's meridiem as the
    /// ambiguity fallback, then the instant is recomposed from the
    /// **already-committed** calendar day and the **new** time of day. The
    /// date field's local day does not change, whatever the new UTC day is.
    /// Returns the new instant.
    ///
    /// # Errors
    ///
    /// An unparseable time blocks the commit exactly as for
    /// [`commit_date`](Self::commit_date).
    pub fn commit_time(&mut self) -> Result<String> {
        let draft = match self.draft_time.as_deref() {
            Some(d) => d,
            None => return Ok(self.instant()),
        };
        let previous = if self.time.hour < 12 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        let time = parse_time_of_day(draft, Some(previous))?;
        self.instant = compose(self.date, time, self.tz)?;
        self.time = time;
        self.time_state = FieldState::Committed;
        self.draft_time = None;
        self.edited = true;
        Ok(self.instant())
    }

    // ── Timezone switching ──────────────────────────────────────────────

    /// Switch the active timezone using the default policy.
    ///
    /// Before any explicit edit the displayed fields are a pure projection of
    /// the seed instant, so the switch is instant-preserving. After the user
    /// has committed an edit, the wall clock they typed is intent, so the
    /// switch is clock-preserving: the displayed day and time of day are
    /// kept and the instant is recomputed in the new zone. Callers wanting
    /// one behavior unconditionally use [`set_timezone_with`].
    ///
    /// Returns the (possibly changed) instant.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WallclockError::InvalidTimezone`] for an unknown
    /// zone id; the editor is left unchanged.
    ///
    /// [`set_timezone_with`]: Self::set_timezone_with
    pub fn set_timezone(&mut self, timezone: &str) -> Result<String> {
        let policy = if self.edited {
            TimezoneSwitch::ClockPreserving
        } else {
            TimezoneSwitch::InstantPreserving
        };
        self.set_timezone_with(timezone, policy)
    }

    /// Switch the active timezone with an explicit policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WallclockError::InvalidTimezone`] for an unknown
    /// zone id; the editor is left unchanged.
    pub fn set_timezone_with(&mut self, timezone: &str, policy: TimezoneSwitch) -> Result<String> {
        let tz = parse_timezone(timezone)?;
        match policy {
            TimezoneSwitch::ClockPreserving => {
                self.instant = compose(self.date, self.time, tz)?;
            }
            TimezoneSwitch::InstantPreserving => {
                let (date, time) = decompose(self.instant, tz);
                self.date = date;
                self.time = time;
            }
        }
        self.tz = tz;
        Ok(self.instant())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
