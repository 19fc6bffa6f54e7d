//! Timezone-aware day boundaries.
//!
//! A reporting day is a calendar day in the business timezone, not a UTC day.
//! The functions here turn a [`NaiveDate`] plus an IANA zone into the UTC
//! instants that open and close that day.
//!
//! # End of day
//!
//! Dashboards historically closed a day at local `23:59:00`, leaving the last
//! minute out of `<=` predicates. That cut-off is preserved as
//! [`EndOfDay::LastMinute`] (the default); [`EndOfDay::LastInstant`] closes the
//! day at `23:59:59.999` instead.
//!
//! # DST
//!
//! Ambiguous local times resolve to the earliest instant. A nonexistent start
//! of day (zones whose DST gap starts at midnight) moves forward to the first
//! valid local instant after the gap. A nonexistent end of day moves backward
//! to the last valid millisecond before the gap.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};
use crate::range::DateRange;

/// Half-width of the UTC window searched for a gap's transition. Wider than
/// any UTC offset plus any gap.
const GAP_SEARCH_SECONDS: i64 = 86_400;

/// Accepted naive date-time layouts, tried after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Where a reporting day ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfDay {
    /// Local `23:59:00.000`.
    #[default]
    LastMinute,
    /// Local `23:59:59.999`.
    LastInstant,
}

impl EndOfDay {
    fn local_time(self) -> Option<NaiveTime> {
        match self {
            EndOfDay::LastMinute => NaiveTime::from_hms_opt(23, 59, 0),
            EndOfDay::LastInstant => NaiveTime::from_hms_milli_opt(23, 59, 59, 999),
        }
    }

    /// Config spelling of the policy.
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfDay::LastMinute => "last_minute",
            EndOfDay::LastInstant => "last_instant",
        }
    }
}

impl fmt::Display for EndOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndOfDay {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_minute" | "minute" => Ok(EndOfDay::LastMinute),
            "last_instant" | "instant" => Ok(EndOfDay::LastInstant),
            other => Err(PeriodError::InvalidConfig(format!(
                "unknown end-of-day policy '{other}'"
            ))),
        }
    }
}

/// The first instant of `date` in `tz`, as UTC.
///
/// Returns `None` only if the whole local day is missing from the zone (for
/// example, Pacific/Apia skipped 2011-12-30) or the date is out of range.
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    resolve_local(tz, naive, GapDirection::Forward)
}

/// The closing instant of `date` in `tz` under `policy`, as UTC.
pub fn end_of_day(date: NaiveDate, tz: &Tz, policy: EndOfDay) -> Option<DateTime<Utc>> {
    let naive = date.and_time(policy.local_time()?);
    resolve_local(tz, naive, GapDirection::Backward)
}

/// Both boundaries of `date` as one range.
pub fn day_range(date: NaiveDate, tz: &Tz, policy: EndOfDay) -> Option<DateRange> {
    let start = start_of_day(date, tz)?;
    let end = end_of_day(date, tz, policy)?;
    DateRange::new(start, end).ok()
}

/// String-level entry point: parse `input` as a calendar date in `timezone`
/// and return that day's boundaries.
///
/// Any failure (unknown zone, unparseable date) yields `None`; callers fall
/// back to their own default range.
///
/// # Examples
///
/// ```
/// use period_engine::boundary::{day_bounds, EndOfDay};
///
/// let day = day_bounds("2024-06-15", "America/Sao_Paulo", EndOfDay::LastMinute).unwrap();
/// assert_eq!(day.start().to_rfc3339(), "2024-06-15T03:00:00+00:00");
/// assert_eq!(day.end().to_rfc3339(), "2024-06-16T02:59:00+00:00");
///
/// assert!(day_bounds("2024-06-15", "Mars/Olympus", EndOfDay::LastMinute).is_none());
/// ```
pub fn day_bounds(input: &str, timezone: &str, policy: EndOfDay) -> Option<DateRange> {
    let tz = parse_timezone(timezone).ok()?;
    let date = parse_calendar_date(input, &tz)?;
    day_range(date, &tz, policy)
}

/// Parse an IANA timezone name.
///
/// # Errors
///
/// Returns [`PeriodError::InvalidTimezone`] if the name is not in the tz database.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| PeriodError::InvalidTimezone(format!("'{}'", s)))
}

/// Read the calendar date a date-like string names, as seen in `tz`.
///
/// RFC 3339 inputs carry an absolute instant and are converted to `tz` first;
/// naive date-times and plain `YYYY-MM-DD` dates are taken at face value.
pub fn parse_calendar_date(input: &str, tz: &Tz) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.date())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Parse an RFC 3339 string into a UTC instant.
///
/// # Errors
///
/// Returns [`PeriodError::InvalidDatetime`] if the string is not RFC 3339.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PeriodError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Render `instant` as RFC 3339 with the local offset of `tz`.
pub fn format_local(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).to_rfc3339()
}

#[derive(Debug, Clone, Copy)]
enum GapDirection {
    Forward,
    Backward,
}

fn resolve_local(tz: &Tz, naive: NaiveDateTime, direction: GapDirection) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    let transition = gap_transition(tz, naive)?;
    let edge = match direction {
        GapDirection::Forward => transition,
        GapDirection::Backward => transition - Duration::milliseconds(1),
    };
    // Never land in a neighbouring day.
    (edge.with_timezone(tz).date_naive() == naive.date()).then_some(edge)
}

/// The UTC instant at which local time jumps over the nonexistent `naive`.
///
/// Binary search for the first whole second whose local reading is at or past
/// `naive`; tz transitions always fall on whole seconds.
fn gap_transition(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    let local_at = |secs: i64| {
        DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(tz).naive_local())
    };

    let target = naive.and_utc().timestamp();
    let mut lo = target.checked_sub(GAP_SEARCH_SECONDS)?;
    let mut hi = target.checked_add(GAP_SEARCH_SECONDS)?;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if local_at(mid)? >= naive {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    DateTime::from_timestamp(hi, 0)
}
