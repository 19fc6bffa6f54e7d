//! View-mode presets and their comparison periods.
//!
//! A view mode names a default reporting period relative to "now". Each preset
//! also carries the period it is compared against, so dashboard cards can show
//! a delta without the caller doing calendar arithmetic.
//!
//! | mode        | period                          | previous period                              |
//! |-------------|---------------------------------|----------------------------------------------|
//! | `today`     | today                           | yesterday                                    |
//! | `yesterday` | yesterday                       | the day before yesterday                     |
//! | `week`      | today − 6 days .. end of today  | today − 12 days .. start of (today − 6 days) |
//! | `month`     | 1st of month .. end of today    | whole prior calendar month                   |
//! | `year`      | Jan 1 .. end of today           | whole prior calendar year                    |
//!
//! `custom` has no preset of its own and uses the `today` rule.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::boundary::{end_of_day, start_of_day, EndOfDay};
use crate::error::{PeriodError, Result};
use crate::range::DateRange;

/// Named reporting-period preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Today,
    Yesterday,
    Week,
    Month,
    Year,
    /// Explicit `dateFrom`/`dateTo` drive the period.
    Custom,
}

impl ViewMode {
    /// Every mode, presets first.
    pub const ALL: [ViewMode; 6] = [
        ViewMode::Today,
        ViewMode::Yesterday,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Year,
        ViewMode::Custom,
    ];

    /// Query-string spelling of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Today => "today",
            ViewMode::Yesterday => "yesterday",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
            ViewMode::Year => "year",
            ViewMode::Custom => "custom",
        }
    }

    /// Parse a query-string value, mapping anything unrecognized to `today`.
    pub fn from_query(raw: &str) -> ViewMode {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(view_mode = raw, "unrecognized view mode, using today");
            ViewMode::Today
        })
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| PeriodError::InvalidViewMode(format!("'{}'", s.trim())))
    }
}

/// A preset's period together with the period it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewPeriod {
    pub period: DateRange,
    pub previous_period: DateRange,
}

/// Compute the period and previous period for `mode` as of `now`.
///
/// "Today" is the calendar date of `now` in `tz`. The result depends on
/// nothing but the arguments, so two calls on the same local day agree.
///
/// # Errors
///
/// Returns [`PeriodError::Unresolvable`] when a boundary falls outside the
/// supported calendar or inside a day the zone skipped entirely.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use period_engine::boundary::EndOfDay;
/// use period_engine::view_mode::{view_period, ViewMode};
///
/// let tz: chrono_tz::Tz = "America/Sao_Paulo".parse().unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 6, 15, 13, 0, 0).unwrap();
/// let view = view_period(ViewMode::Month, now, &tz, EndOfDay::LastMinute).unwrap();
/// assert_eq!(view.period.start().to_rfc3339(), "2024-06-01T03:00:00+00:00");
/// assert_eq!(view.previous_period.end().to_rfc3339(), "2024-06-01T02:59:00+00:00");
/// ```
pub fn view_period(
    mode: ViewMode,
    now: DateTime<Utc>,
    tz: &Tz,
    policy: EndOfDay,
) -> Result<ViewPeriod> {
    let today = now.with_timezone(tz).date_naive();
    preset(mode, today, tz, policy).ok_or_else(|| {
        PeriodError::Unresolvable(format!("{mode} period for {today} in {}", tz.name()))
    })
}

fn preset(mode: ViewMode, today: NaiveDate, tz: &Tz, policy: EndOfDay) -> Option<ViewPeriod> {
    let sod = |d: NaiveDate| start_of_day(d, tz);
    let eod = |d: NaiveDate| end_of_day(d, tz, policy);

    match mode {
        ViewMode::Today | ViewMode::Custom => {
            let yesterday = today.pred_opt()?;
            pair(
                (sod(today)?, eod(today)?),
                (sod(yesterday)?, eod(yesterday)?),
            )
        }
        ViewMode::Yesterday => {
            let yesterday = today.pred_opt()?;
            let before = yesterday.pred_opt()?;
            pair(
                (sod(yesterday)?, eod(yesterday)?),
                (sod(before)?, eod(before)?),
            )
        }
        ViewMode::Week => {
            let week_start = today.checked_sub_days(Days::new(6))?;
            let prev_start = today.checked_sub_days(Days::new(12))?;
            // The previous week closes on the instant the current one opens.
            pair(
                (sod(week_start)?, eod(today)?),
                (sod(prev_start)?, sod(week_start)?),
            )
        }
        ViewMode::Month => {
            let first = today.with_day(1)?;
            let prev_last = first.pred_opt()?;
            let prev_first = prev_last.with_day(1)?;
            pair(
                (sod(first)?, eod(today)?),
                (sod(prev_first)?, eod(prev_last)?),
            )
        }
        ViewMode::Year => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
            let prev_last = first.pred_opt()?;
            let prev_first = NaiveDate::from_ymd_opt(prev_last.year(), 1, 1)?;
            pair(
                (sod(first)?, eod(today)?),
                (sod(prev_first)?, eod(prev_last)?),
            )
        }
    }
}

fn pair(
    period: (DateTime<Utc>, DateTime<Utc>),
    previous: (DateTime<Utc>, DateTime<Utc>),
) -> Option<ViewPeriod> {
    Some(ViewPeriod {
        period: DateRange::new(period.0, period.1).ok()?,
        previous_period: DateRange::new(previous.0, previous.1).ok()?,
    })
}
