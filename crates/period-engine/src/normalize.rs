//! Reconciling user-supplied `dateFrom`/`dateTo` with preset defaults.
//!
//! Each side is handled independently: a parseable value becomes the matching
//! day boundary in the business timezone, anything else takes the boundary of
//! the fallback period. If the explicit day lies beyond the fallback's opposite
//! edge, the range is widened to cover both calendar days. Malformed input
//! never errors.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::boundary::{end_of_day, parse_calendar_date, start_of_day, EndOfDay};
use crate::range::DateRange;
use crate::view_mode::{view_period, ViewMode};

/// View mode whose period fills in missing sides by default.
pub const DEFAULT_FALLBACK_MODE: ViewMode = ViewMode::Month;

/// One raw date field from the query string, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// The parameter was not sent.
    Absent,
    /// The parameter was sent but empty or whitespace.
    Blank,
    /// The parameter could not be read as a date.
    Unparsed(String),
    /// The calendar date the parameter names, in the business timezone.
    Resolved(NaiveDate),
}

impl DateInput {
    /// Classify a raw query value, reading dates in `tz`.
    pub fn classify(raw: Option<&str>, tz: &Tz) -> Self {
        match raw {
            None => DateInput::Absent,
            Some(s) if s.trim().is_empty() => DateInput::Blank,
            Some(s) => match parse_calendar_date(s, tz) {
                Some(date) => DateInput::Resolved(date),
                None => DateInput::Unparsed(s.to_string()),
            },
        }
    }

    /// The resolved calendar date, if any.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateInput::Resolved(date) => Some(*date),
            _ => None,
        }
    }

    /// Whether the value named a usable date.
    pub fn is_resolved(&self) -> bool {
        matches!(self, DateInput::Resolved(_))
    }
}

/// Which day boundary a side of the range takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    fn field(self) -> &'static str {
        match self {
            Side::Start => "dateFrom",
            Side::End => "dateTo",
        }
    }
}

/// A query range with possibly-unbounded sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl NormalizedRange {
    /// The bounded range, if both sides are known. Reversed sides are swapped.
    pub fn to_range(&self) -> Option<DateRange> {
        let (start, end) = (self.start?, self.end?);
        if start > end {
            tracing::warn!(
                start = %start.to_rfc3339(),
                end = %end.to_rfc3339(),
                "normalized range is reversed, swapping"
            );
        }
        Some(DateRange::ordered(start, end))
    }
}

/// Normalize `dateFrom`/`dateTo` against the `month` preset as of `now`.
///
/// With both sides omitted the result is exactly the `month` period.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use period_engine::boundary::EndOfDay;
/// use period_engine::normalize::normalize_date_range;
///
/// let tz: chrono_tz::Tz = "America/Sao_Paulo".parse().unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 6, 15, 13, 0, 0).unwrap();
///
/// let range = normalize_date_range(Some("2024-06-10"), None, now, &tz, EndOfDay::LastMinute);
/// assert_eq!(range.start.unwrap().to_rfc3339(), "2024-06-10T03:00:00+00:00");
/// // `dateTo` falls back to the end of today.
/// assert_eq!(range.end.unwrap().to_rfc3339(), "2024-06-16T02:59:00+00:00");
/// ```
pub fn normalize_date_range(
    date_from: Option<&str>,
    date_to: Option<&str>,
    now: DateTime<Utc>,
    tz: &Tz,
    policy: EndOfDay,
) -> NormalizedRange {
    let fallback = match view_period(DEFAULT_FALLBACK_MODE, now, tz, policy) {
        Ok(view) => Some(view.period),
        Err(e) => {
            tracing::debug!(error = %e, "no default period available");
            None
        }
    };
    normalize_with_fallback(
        &DateInput::classify(date_from, tz),
        &DateInput::classify(date_to, tz),
        fallback.as_ref(),
        tz,
        policy,
    )
}

/// Normalize already-classified inputs against an explicit fallback.
///
/// A side with neither a usable input nor a fallback stays `None`, meaning
/// the query is unbounded on that side.
pub fn normalize_with_fallback(
    from: &DateInput,
    to: &DateInput,
    fallback: Option<&DateRange>,
    tz: &Tz,
    policy: EndOfDay,
) -> NormalizedRange {
    let (from, to) = match (from, to) {
        (DateInput::Resolved(a), DateInput::Resolved(b)) if a > b => {
            tracing::warn!(date_from = %a, date_to = %b, "dateFrom is after dateTo, swapping");
            (to, from)
        }
        _ => (from, to),
    };
    let mut range = NormalizedRange {
        start: resolve_side(from, Side::Start, fallback.map(DateRange::start), tz, policy),
        end: resolve_side(to, Side::End, fallback.map(DateRange::end), tz, policy),
    };

    // One explicit side landed beyond the fallback's opposite edge: span both
    // calendar days instead of swapping finished boundaries.
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            let first = end.with_timezone(tz).date_naive();
            let last = start.with_timezone(tz).date_naive();
            tracing::warn!(%first, %last, "date lies outside the default period, widening");
            if let (Some(s), Some(e)) = (start_of_day(first, tz), end_of_day(last, tz, policy)) {
                range.start = Some(s);
                range.end = Some(e);
            }
        }
    }
    range
}

fn resolve_side(
    input: &DateInput,
    side: Side,
    fallback: Option<DateTime<Utc>>,
    tz: &Tz,
    policy: EndOfDay,
) -> Option<DateTime<Utc>> {
    match input {
        DateInput::Resolved(date) => {
            let boundary = match side {
                Side::Start => start_of_day(*date, tz),
                Side::End => end_of_day(*date, tz, policy),
            };
            if boundary.is_none() {
                tracing::debug!(field = side.field(), %date, "date has no boundary in zone, using default");
            }
            boundary.or(fallback)
        }
        DateInput::Unparsed(raw) => {
            tracing::debug!(field = side.field(), raw = raw.as_str(), "unparseable date, using default");
            fallback
        }
        DateInput::Blank => {
            tracing::debug!(field = side.field(), "blank date, using default");
            fallback
        }
        DateInput::Absent => fallback,
    }
}
