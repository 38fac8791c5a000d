//! Derivation of recurrence-rule parameters from a wall-clock start.
//!
//! The resolver owns the recurrence form state (frequency, weekday selection,
//! monthly pattern) and derives rule fields from the event's start instant
//! **as read in the event's timezone** — never from the UTC calendar day. An
//! instant near local midnight falls on a different weekday locally than in
//! UTC, and deriving from the UTC day is exactly the off-by-one-day bug this
//! module exists to prevent.
//!
//! Auto-derived fields (the weekly weekday seeded from the start date, the
//! monthly "2nd Wednesday" weekday/ordinal pair) track start-date and
//! timezone changes only until the user makes an explicit selection; from
//! then on the selection is sticky and is never silently overwritten.

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;
use serde::Serialize;

use crate::error::{Result, WallclockError};
use crate::wallclock::{decompose, format_instant, parse_instant, parse_timezone, weekday_in_zone};

// ── Vocabulary types ────────────────────────────────────────────────────────

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    fn period_noun(self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        }
    }
}

/// How a monthly recurrence repeats: on the same day number, or on the Nth
/// weekday of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthlyPattern {
    DayOfMonth,
    DayOfWeek,
}

/// When the recurrence stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    Never,
    /// Stop after N occurrences.
    Count(u32),
    /// Stop at an instant (inclusive, per RFC 5545 UNTIL).
    Until(DateTime<Utc>),
}

/// The two-letter recurrence-rule code for a weekday (`MO`, `TU`, ...).
pub fn day_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn ordinal_label(ordinal: i32) -> String {
    match ordinal {
        -1 => "last".to_string(),
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

// ── Emitted rule object ─────────────────────────────────────────────────────

/// The recurrence-rule object emitted to the persistence layer.
///
/// Shape mirrors the RFC 5545 field names used on the wire: `byweekday`
/// lists exactly the currently-selected codes, `bysetpos` carries the
/// monthly ordinal, and the timezone is always present so the server can
/// expand occurrences with the same wall-clock anchor the client used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceRule {
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub byweekday: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bymonthday: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bysetpos: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    pub time_zone: String,
}

// ── RecurrenceResolver ──────────────────────────────────────────────────────

/// Stateful resolver behind the recurrence form.
#[derive(Debug, Clone)]
pub struct RecurrenceResolver {
    frequency: Frequency,
    interval: u16,
    start: DateTime<Utc>,
    tz: Tz,
    selected_days: Vec<Weekday>,
    days_user_selected: bool,
    monthly_pattern: MonthlyPattern,
    monthly_weekday: Weekday,
    monthly_ordinal: i32,
    monthly_user_selected: bool,
    end: EndCondition,
}

impl RecurrenceResolver {
    /// Create a resolver anchored on a start instant and timezone.
    ///
    /// A weekly resolver seeds its weekday selection with the start date's
    /// timezone-local weekday; the monthly weekday/ordinal pair is derived
    /// the same way. Both remain auto-derived (re-derived on start or
    /// timezone changes) until the user makes an explicit selection.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::InvalidDatetime`] or
    /// [`WallclockError::InvalidTimezone`] for unparseable input.
    pub fn new(start: &str, timezone: &str, frequency: Frequency) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        let start = parse_instant(start)?;
        let mut resolver = Self {
            frequency,
            interval: 1,
            start,
            tz,
            selected_days: Vec::new(),
            days_user_selected: false,
            monthly_pattern: MonthlyPattern::DayOfMonth,
            monthly_weekday: Weekday::Mon,
            monthly_ordinal: 1,
            monthly_user_selected: false,
            end: EndCondition::Never,
        };
        resolver.reseed();
        Ok(resolver)
    }

    // ── Anchor changes ──────────────────────────────────────────────────

    /// Move the recurrence anchor to a new start instant.
    ///
    /// Auto-derived selections follow the new start; explicit user
    /// selections are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::InvalidDatetime`] for an unparseable
    /// instant; the resolver is left unchanged.
    pub fn set_start(&mut self, start: &str) -> Result<()> {
        self.start = parse_instant(start)?;
        self.reseed();
        Ok(())
    }

    /// Switch the timezone the anchor is read in.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::InvalidTimezone`] for an unknown zone id;
    /// the resolver is left unchanged.
    pub fn set_timezone(&mut self, timezone: &str) -> Result<()> {
        self.tz = parse_timezone(timezone)?;
        self.reseed();
        Ok(())
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        self.reseed();
    }

    /// Repeat every `interval` periods (clamped to at least 1).
    pub fn set_interval(&mut self, interval: u16) {
        self.interval = interval.max(1);
    }

    pub fn set_end(&mut self, end: EndCondition) {
        self.end = end;
    }

    /// Switch the monthly pattern. Moving to [`MonthlyPattern::DayOfWeek`]
    /// re-derives the weekday and ordinal from the start date unless the
    /// user has already picked them.
    pub fn set_monthly_pattern(&mut self, pattern: MonthlyPattern) {
        self.monthly_pattern = pattern;
        self.reseed();
    }

    // ── Explicit user selections ────────────────────────────────────────

    /// Toggle a weekday in the weekly/daily selection.
    ///
    /// Adds the code if absent, removes it if present. The first call makes
    /// the selection user-owned: later start-date or timezone changes will
    /// no longer overwrite it. Removing the start date's own weekday is
    /// permitted — the start date anchors the first occurrence, it does not
    /// constrain which weekdays are selectable.
    pub fn toggle_day(&mut self, weekday: Weekday) {
        self.days_user_selected = true;
        if let Some(pos) = self.selected_days.iter().position(|d| *d == weekday) {
            self.selected_days.remove(pos);
        } else {
            self.selected_days.push(weekday);
        }
    }

    /// Explicitly pick the monthly Nth-weekday pattern values.
    ///
    /// `ordinal` is 1-5, or -1 for "last". Marks the pair user-owned, so it
    /// survives start-date and timezone changes.
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::InvalidRule`] for an ordinal outside the
    /// valid range.
    pub fn set_monthly_weekday(&mut self, weekday: Weekday, ordinal: i32) -> Result<()> {
        if !(1..=5).contains(&ordinal) && ordinal != -1 {
            return Err(WallclockError::InvalidRule(format!(
                "monthly ordinal must be 1-5 or -1, got {ordinal}"
            )));
        }
        self.monthly_weekday = weekday;
        self.monthly_ordinal = ordinal;
        self.monthly_user_selected = true;
        self.monthly_pattern = MonthlyPattern::DayOfWeek;
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The currently selected weekday codes, in selection order.
    pub fn selected_weekdays(&self) -> Vec<&'static str> {
        self.selected_days.iter().map(|d| day_code(*d)).collect()
    }

    /// The start date's weekday as read in the active timezone.
    pub fn anchor_weekday(&self) -> Weekday {
        weekday_in_zone(self.start, self.tz)
    }

    // ── Derivation ──────────────────────────────────────────────────────

    /// Re-derive every field the user has not explicitly set from the
    /// current start instant and timezone.
    fn reseed(&mut self) {
        let weekday = self.anchor_weekday();
        let (date, _) = decompose(self.start, self.tz);

        if self.frequency == Frequency::Weekly && !self.days_user_selected {
            self.selected_days = vec![weekday];
        }
        if !self.monthly_user_selected {
            self.monthly_weekday = weekday;
            // Which occurrence of this weekday the start date is: day 14 is
            // the 2nd Wednesday, day 29-31 the 5th.
            self.monthly_ordinal = ((date.day + 6) / 7) as i32;
        }
    }

    /// The rule object for the current state.
    ///
    /// Side-effect free, and exact: `byweekday` lists all currently-selected
    /// codes, no more, no fewer. A weekly rule whose selection has been
    /// emptied falls back to the start date's local weekday at emission so
    /// the emitted rule always has at least one day.
    pub fn rule(&self) -> RecurrenceRule {
        let mut rule = RecurrenceRule {
            frequency: self.frequency.as_str().to_string(),
            interval: (self.interval > 1).then_some(self.interval),
            byweekday: Vec::new(),
            bymonthday: None,
            bysetpos: None,
            count: None,
            until: None,
            time_zone: self.tz.to_string(),
        };

        match self.frequency {
            Frequency::Daily | Frequency::Weekly => {
                rule.byweekday = self.selected_weekdays().iter().map(|c| c.to_string()).collect();
                if self.frequency == Frequency::Weekly && rule.byweekday.is_empty() {
                    rule.byweekday = vec![day_code(self.anchor_weekday()).to_string()];
                }
            }
            Frequency::Monthly => match self.monthly_pattern {
                MonthlyPattern::DayOfMonth => {
                    let (date, _) = decompose(self.start, self.tz);
                    rule.bymonthday = Some(vec![date.day]);
                }
                MonthlyPattern::DayOfWeek => {
                    rule.byweekday = vec![day_code(self.monthly_weekday).to_string()];
                    rule.bysetpos = Some(vec![self.monthly_ordinal]);
                }
            },
            Frequency::Yearly => {}
        }

        match self.end {
            EndCondition::Never => {}
            EndCondition::Count(n) => rule.count = Some(n),
            EndCondition::Until(at) => rule.until = Some(format_instant(at)),
        }

        rule
    }

    /// The `RRULE` property value for the current state, e.g.
    /// `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE`.
    pub fn rrule_property(&self) -> String {
        let rule = self.rule();
        let mut parts = vec![format!("FREQ={}", rule.frequency)];
        if let Some(interval) = rule.interval {
            parts.push(format!("INTERVAL={interval}"));
        }
        if !rule.byweekday.is_empty() {
            parts.push(format!("BYDAY={}", rule.byweekday.join(",")));
        }
        if let Some(days) = &rule.bymonthday {
            let days: Vec<String> = days.iter().map(|d| d.to_string()).collect();
            parts.push(format!("BYMONTHDAY={}", days.join(",")));
        }
        if let Some(positions) = &rule.bysetpos {
            let positions: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
            parts.push(format!("BYSETPOS={}", positions.join(",")));
        }
        if let Some(count) = rule.count {
            parts.push(format!("COUNT={count}"));
        }
        if let EndCondition::Until(at) = self.end {
            parts.push(format!("UNTIL={}", at.format("%Y%m%dT%H%M%SZ")));
        }
        parts.join(";")
    }

    /// Build an expandable rule set (`DTSTART` anchored on the start's wall
    /// clock in the event timezone, plus the `RRULE` line).
    ///
    /// # Errors
    ///
    /// Returns [`WallclockError::InvalidRule`] if the rrule parser rejects
    /// the combination.
    pub fn rule_set(&self) -> Result<RRuleSet> {
        let local = self.start.with_timezone(&self.tz);
        let ics = format!(
            "DTSTART;TZID={}:{}\nRRULE:{}",
            self.tz,
            local.format("%Y%m%dT%H%M%S"),
            self.rrule_property()
        );
        ics.parse()
            .map_err(|e| WallclockError::InvalidRule(format!("{e}")))
    }

    /// Expand the first `limit` occurrences as RFC 3339 UTC instants.
    ///
    /// # Errors
    ///
    /// Propagates [`WallclockError::InvalidRule`] from [`rule_set`].
    ///
    /// [`rule_set`]: Self::rule_set
    pub fn occurrences(&self, limit: u16) -> Result<Vec<String>> {
        let result = self.rule_set()?.all(limit);
        Ok(result
            .dates
            .iter()
            .map(|dt| format_instant(dt.with_timezone(&Utc)))
            .collect())
    }

    /// A human-readable description of the pattern, e.g.
    /// `"every 2 weeks on Monday, Wednesday"`.
    pub fn describe(&self) -> String {
        let mut text = if self.interval > 1 {
            format!("every {} {}s", self.interval, self.frequency.period_noun())
        } else {
            format!("every {}", self.frequency.period_noun())
        };

        let rule = self.rule();
        match self.frequency {
            Frequency::Daily | Frequency::Weekly => {
                if !rule.byweekday.is_empty() {
                    let names: Vec<&str> = self
                        .selected_days
                        .iter()
                        .map(|d| day_name(*d))
                        .collect();
                    let names = if names.is_empty() {
                        vec![day_name(self.anchor_weekday())]
                    } else {
                        names
                    };
                    text.push_str(&format!(" on {}", names.join(", ")));
                }
            }
            Frequency::Monthly => match self.monthly_pattern {
                MonthlyPattern::DayOfMonth => {
                    let (date, _) = decompose(self.start, self.tz);
                    text.push_str(&format!(" on day {}", date.day));
                }
                MonthlyPattern::DayOfWeek => {
                    text.push_str(&format!(
                        " on the {} {}",
                        ordinal_label(self.monthly_ordinal),
                        day_name(self.monthly_weekday)
                    ));
                }
            },
            Frequency::Yearly => {}
        }

        match self.end {
            EndCondition::Never => {}
            EndCondition::Count(n) => text.push_str(&format!(", {n} times")),
            EndCondition::Until(at) => {
                text.push_str(&format!(", until {}", at.format("%Y-%m-%d")));
            }
        }
        text
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc, Weekday};

    fn weekly(start: &str, tz: &str) -> RecurrenceResolver {
        RecurrenceResolver::new(start, tz, Frequency::Weekly).unwrap()
    }

    #[test]
    fn test_weekly_seeds_local_weekday() {
        // 22:00Z Wed May 28 is Wednesday evening in New York.
        let resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        assert_eq!(resolver.selected_weekdays(), vec!["WE"]);
        assert_eq!(resolver.rule().byweekday, vec!["WE"]);
    }

    #[test]
    fn test_weekly_seeds_from_zone_not_utc() {
        // 09:15Z Thu in Novosibirsk (UTC+7) is Thursday afternoon.
        let resolver = weekly("2025-05-29T09:15:00Z", "Asia/Novosibirsk");
        assert_eq!(resolver.selected_weekdays(), vec!["TH"]);

        // 22:00Z Wednesday is already Thursday in Sydney; the UTC weekday
        // would be wrong here.
        let resolver = weekly("2025-05-28T22:00:00Z", "Australia/Sydney");
        assert_eq!(resolver.selected_weekdays(), vec!["TH"]);
    }

    #[test]
    fn test_auto_derived_selection_follows_start_changes() {
        // Monday-anchored start...
        let mut resolver = weekly("2025-05-26T15:00:00Z", "UTC");
        assert_eq!(resolver.selected_weekdays(), vec!["MO"]);

        // ...moved to a Friday before any toggle: selection re-derives.
        resolver.set_start("2025-05-30T15:00:00Z").unwrap();
        assert_eq!(resolver.selected_weekdays(), vec!["FR"]);
    }

    #[test]
    fn test_auto_derived_selection_follows_timezone_changes() {
        // 22:00Z Wednesday: Wednesday in New York, Thursday in Sydney.
        let mut resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        assert_eq!(resolver.selected_weekdays(), vec!["WE"]);

        resolver.set_timezone("Australia/Sydney").unwrap();
        assert_eq!(resolver.selected_weekdays(), vec!["TH"]);
    }

    #[test]
    fn test_user_selection_is_sticky() {
        let mut resolver = weekly("2025-05-26T15:00:00Z", "UTC"); // Monday
        resolver.toggle_day(Weekday::Wed);
        assert_eq!(resolver.selected_weekdays(), vec!["MO", "WE"]);

        // Start moves to a Friday; the explicit selection must survive.
        resolver.set_start("2025-05-30T15:00:00Z").unwrap();
        assert_eq!(resolver.selected_weekdays(), vec!["MO", "WE"]);

        // And a timezone change must not overwrite it either.
        resolver.set_timezone("Pacific/Auckland").unwrap();
        assert_eq!(resolver.selected_weekdays(), vec!["MO", "WE"]);
    }

    #[test]
    fn test_toggle_removes_present_day() {
        let mut resolver = weekly("2025-05-26T15:00:00Z", "UTC"); // Monday
        resolver.toggle_day(Weekday::Wed);
        resolver.toggle_day(Weekday::Wed);
        assert_eq!(resolver.selected_weekdays(), vec!["MO"]);
    }

    #[test]
    fn test_removing_anchor_day_is_permitted() {
        let mut resolver = weekly("2025-05-26T15:00:00Z", "UTC"); // Monday
        resolver.toggle_day(Weekday::Mon);
        assert!(resolver.selected_weekdays().is_empty());

        // The emitted weekly rule still anchors on the start date's weekday
        // so it never goes out with an empty day list.
        assert_eq!(resolver.rule().byweekday, vec!["MO"]);
    }

    #[test]
    fn test_daily_has_no_seeded_selection() {
        let resolver =
            RecurrenceResolver::new("2025-05-26T15:00:00Z", "UTC", Frequency::Daily).unwrap();
        assert!(resolver.selected_weekdays().is_empty());
        assert!(resolver.rule().byweekday.is_empty());
    }

    #[test]
    fn test_switching_to_weekly_seeds_selection() {
        let mut resolver =
            RecurrenceResolver::new("2025-05-30T15:00:00Z", "UTC", Frequency::Daily).unwrap();
        resolver.set_frequency(Frequency::Weekly);
        assert_eq!(resolver.selected_weekdays(), vec!["FR"]);
    }

    #[test]
    fn test_monthly_day_of_month_uses_local_day() {
        // 02:00Z May 29 is still May 28 in Los Angeles.
        let mut resolver =
            RecurrenceResolver::new("2025-05-29T02:00:00Z", "America/Los_Angeles", Frequency::Monthly)
                .unwrap();
        resolver.set_monthly_pattern(MonthlyPattern::DayOfMonth);
        let rule = resolver.rule();
        assert_eq!(rule.bymonthday, Some(vec![28]));
        assert!(rule.byweekday.is_empty());
    }

    #[test]
    fn test_monthly_day_of_week_derives_ordinal() {
        // May 14 2025 is the 2nd Wednesday of the month.
        let mut resolver =
            RecurrenceResolver::new("2025-05-14T21:00:00Z", "America/New_York", Frequency::Monthly)
                .unwrap();
        resolver.set_monthly_pattern(MonthlyPattern::DayOfWeek);
        let rule = resolver.rule();
        assert_eq!(rule.byweekday, vec!["WE"]);
        assert_eq!(rule.bysetpos, Some(vec![2]));
        assert_eq!(rule.bymonthday, None);
    }

    #[test]
    fn test_monthly_fifth_occurrence() {
        // May 30 2025 is the 5th Friday.
        let mut resolver =
            RecurrenceResolver::new("2025-05-30T15:00:00Z", "UTC", Frequency::Monthly).unwrap();
        resolver.set_monthly_pattern(MonthlyPattern::DayOfWeek);
        let rule = resolver.rule();
        assert_eq!(rule.byweekday, vec!["FR"]);
        assert_eq!(rule.bysetpos, Some(vec![5]));
    }

    #[test]
    fn test_monthly_user_selection_is_sticky() {
        let mut resolver =
            RecurrenceResolver::new("2025-05-14T21:00:00Z", "America/New_York", Frequency::Monthly)
                .unwrap();
        resolver.set_monthly_weekday(Weekday::Fri, -1).unwrap();

        // Start moves to a 2nd-Wednesday date; the explicit "last Friday"
        // must survive.
        resolver.set_start("2025-06-11T21:00:00Z").unwrap();
        let rule = resolver.rule();
        assert_eq!(rule.byweekday, vec!["FR"]);
        assert_eq!(rule.bysetpos, Some(vec![-1]));
    }

    #[test]
    fn test_monthly_ordinal_validation() {
        let mut resolver =
            RecurrenceResolver::new("2025-05-14T21:00:00Z", "UTC", Frequency::Monthly).unwrap();
        assert!(resolver.set_monthly_weekday(Weekday::Fri, 0).is_err());
        assert!(resolver.set_monthly_weekday(Weekday::Fri, 6).is_err());
        assert!(resolver.set_monthly_weekday(Weekday::Fri, -2).is_err());
        assert!(resolver.set_monthly_weekday(Weekday::Fri, -1).is_ok());
    }

    #[test]
    fn test_rule_object_wire_shape() {
        let mut resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        resolver.set_interval(2);
        resolver.set_end(EndCondition::Count(10));

        let json = serde_json::to_value(resolver.rule()).unwrap();
        assert_eq!(json["frequency"], "WEEKLY");
        assert_eq!(json["interval"], 2);
        assert_eq!(json["byweekday"], serde_json::json!(["WE"]));
        assert_eq!(json["count"], 10);
        assert_eq!(json["time_zone"], "America/New_York");
        // Absent fields stay off the wire entirely.
        assert!(json.get("bymonthday").is_none());
        assert!(json.get("until").is_none());
    }

    #[test]
    fn test_interval_of_one_is_omitted() {
        let resolver = weekly("2025-05-28T22:00:00Z", "UTC");
        let json = serde_json::to_value(resolver.rule()).unwrap();
        assert!(json.get("interval").is_none());
    }

    #[test]
    fn test_rrule_property_strings() {
        let mut resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        assert_eq!(resolver.rrule_property(), "FREQ=WEEKLY;BYDAY=WE");

        resolver.set_interval(2);
        resolver.toggle_day(Weekday::Mon);
        assert_eq!(resolver.rrule_property(), "FREQ=WEEKLY;INTERVAL=2;BYDAY=WE,MO");

        let mut monthly =
            RecurrenceResolver::new("2025-05-14T21:00:00Z", "America/New_York", Frequency::Monthly)
                .unwrap();
        monthly.set_monthly_pattern(MonthlyPattern::DayOfWeek);
        assert_eq!(monthly.rrule_property(), "FREQ=MONTHLY;BYDAY=WE;BYSETPOS=2");

        monthly.set_monthly_pattern(MonthlyPattern::DayOfMonth);
        assert_eq!(monthly.rrule_property(), "FREQ=MONTHLY;BYMONTHDAY=14");
    }

    #[test]
    fn test_until_formats_as_utc_basic_form() {
        let mut resolver = weekly("2025-05-28T22:00:00Z", "UTC");
        let until = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        resolver.set_end(EndCondition::Until(until));
        assert!(resolver.rrule_property().ends_with("UNTIL=20251231T235959Z"));
        assert_eq!(resolver.rule().until.as_deref(), Some("2025-12-31T23:59:59Z"));
    }

    #[test]
    fn test_occurrence_expansion() {
        // Weekly Wednesdays at 6:00 PM Eastern, starting Wed May 28.
        let resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        let occurrences = resolver.occurrences(3).unwrap();
        assert_eq!(
            occurrences,
            vec![
                "2025-05-28T22:00:00Z",
                "2025-06-04T22:00:00Z",
                "2025-06-11T22:00:00Z",
            ]
        );
    }

    #[test]
    fn test_occurrence_expansion_preserves_wall_clock_across_dst() {
        // Weekly Wednesdays at 6:00 PM Eastern, starting Wed Oct 29. The
        // Nov 2 fall-back moves the UTC offset but not the wall clock.
        let resolver = weekly("2025-10-29T22:00:00Z", "America/New_York");
        let occurrences = resolver.occurrences(2).unwrap();
        // Oct 29 is EDT (22:00Z); Nov 5 is EST (23:00Z) at the same 6:00 PM.
        assert_eq!(
            occurrences,
            vec!["2025-10-29T22:00:00Z", "2025-11-05T23:00:00Z"]
        );
    }

    #[test]
    fn test_describe() {
        let mut resolver = weekly("2025-05-28T22:00:00Z", "America/New_York");
        assert_eq!(resolver.describe(), "every week on Wednesday");

        resolver.set_interval(2);
        resolver.toggle_day(Weekday::Mon);
        assert_eq!(resolver.describe(), "every 2 weeks on Wednesday, Monday");

        let mut monthly =
            RecurrenceResolver::new("2025-05-14T21:00:00Z", "America/New_York", Frequency::Monthly)
                .unwrap();
        monthly.set_monthly_pattern(MonthlyPattern::DayOfWeek);
        assert_eq!(monthly.describe(), "every month on the 2nd Wednesday");

        monthly.set_end(EndCondition::Count(6));
        monthly.set_monthly_pattern(MonthlyPattern::DayOfMonth);
        assert_eq!(monthly.describe(), "every month on day 14, 6 times");
    }
}
