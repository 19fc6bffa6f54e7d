//! One-call resolution of a dashboard request into current and previous periods.
//!
//! The flow mirrors how a page handler uses the lower-level pieces:
//!
//! 1. the view mode (or the configured default) picks a preset;
//! 2. with no usable `dateFrom`/`dateTo`, the preset and its own previous
//!    period are the answer;
//! 3. otherwise the explicit dates are normalized against the preset period
//!    and the previous period is derived from the result.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::boundary::{day_range, format_local, parse_calendar_date, parse_timezone};
use crate::config::ResolverConfig;
use crate::error::{PeriodError, Result};
use crate::normalize::{normalize_with_fallback, DateInput, NormalizedRange};
use crate::range::DateRange;
use crate::view_mode::{view_period, ViewMode, ViewPeriod};

/// Raw reporting parameters as they arrive from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub view_mode: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl PeriodQuery {
    /// An empty query: default view mode, no dates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `viewMode`.
    pub fn view_mode(mut self, mode: impl Into<String>) -> Self {
        self.view_mode = Some(mode.into());
        self
    }

    /// Set `dateFrom`.
    pub fn date_from(mut self, date: impl Into<String>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    /// Set `dateTo`.
    pub fn date_to(mut self, date: impl Into<String>) -> Self {
        self.date_to = Some(date.into());
        self
    }
}

/// Where the current period came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    /// A view-mode preset, previous period from the same preset.
    Preset,
    /// Explicit dates (or a `custom` request), previous period derived.
    Custom,
}

/// The current period of a request and the period it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPeriod {
    pub current: DateRange,
    /// `None` when no comparison period could be built; skip delta metrics.
    pub previous: Option<DateRange>,
    pub view_mode: ViewMode,
    pub source: PeriodSource,
}

/// A validated [`ResolverConfig`] with its timezone parsed.
#[derive(Debug, Clone)]
pub struct Resolver {
    tz: Tz,
    config: ResolverConfig,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::Sao_Paulo,
            config: ResolverConfig::default(),
        }
    }
}

impl Resolver {
    /// Validate `config` and parse its timezone.
    ///
    /// # Errors
    ///
    /// Returns the error [`ResolverConfig::validate`] reports.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let tz = parse_timezone(&config.timezone)?;
        Ok(Self { tz, config })
    }

    /// The business timezone.
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Boundaries of one calendar day in the business timezone.
    pub fn day(&self, date: NaiveDate) -> Option<DateRange> {
        day_range(date, &self.tz, self.config.end_of_day)
    }

    /// Boundaries of the day a date-like string names; `None` if unparseable.
    pub fn day_bounds(&self, input: &str) -> Option<DateRange> {
        self.day(parse_calendar_date(input, &self.tz)?)
    }

    /// The preset period for `mode` as of `now`, with its own previous period.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Unresolvable`] if a boundary cannot be built.
    pub fn view(&self, mode: ViewMode, now: DateTime<Utc>) -> Result<ViewPeriod> {
        view_period(mode, now, &self.tz, self.config.end_of_day)
    }

    /// Normalize raw `dateFrom`/`dateTo` against the configured default preset.
    pub fn normalize(
        &self,
        date_from: Option<&str>,
        date_to: Option<&str>,
        now: DateTime<Utc>,
    ) -> NormalizedRange {
        let fallback = self.view(self.config.default_view_mode, now).ok();
        normalize_with_fallback(
            &DateInput::classify(date_from, &self.tz),
            &DateInput::classify(date_to, &self.tz),
            fallback.as_ref().map(|v| &v.period),
            &self.tz,
            self.config.end_of_day,
        )
    }

    /// Resolve a request into its current and previous periods as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Unresolvable`] only when calendar arithmetic
    /// leaves the supported date range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use period_engine::{PeriodQuery, PeriodSource, Resolver};
    ///
    /// let resolver = Resolver::default();
    /// let now = Utc.with_ymd_and_hms(2024, 6, 15, 13, 0, 0).unwrap();
    ///
    /// let week = resolver.resolve(&PeriodQuery::new().view_mode("week"), now).unwrap();
    /// assert_eq!(week.source, PeriodSource::Preset);
    /// assert_eq!(week.current.start().to_rfc3339(), "2024-06-09T03:00:00+00:00");
    ///
    /// let custom = resolver
    ///     .resolve(&PeriodQuery::new().date_from("2024-06-01").date_to("2024-06-07"), now)
    ///     .unwrap();
    /// assert_eq!(custom.source, PeriodSource::Custom);
    /// assert!(custom.previous.unwrap().end() < custom.current.start());
    /// ```
    pub fn resolve(&self, query: &PeriodQuery, now: DateTime<Utc>) -> Result<ResolvedPeriod> {
        let requested = match query.view_mode.as_deref().map(str::trim) {
            None | Some("") => self.config.default_view_mode,
            Some(raw) => ViewMode::from_query(raw),
        };

        let from = DateInput::classify(query.date_from.as_deref(), &self.tz);
        let to = DateInput::classify(query.date_to.as_deref(), &self.tz);
        let explicit = from.is_resolved() || to.is_resolved();

        if !explicit && requested != ViewMode::Custom {
            let view = self.view(requested, now)?;
            tracing::debug!(view_mode = %requested, "resolved preset period");
            return Ok(ResolvedPeriod {
                current: view.period,
                previous: Some(view.previous_period),
                view_mode: requested,
                source: PeriodSource::Preset,
            });
        }

        let preset = if requested == ViewMode::Custom {
            self.config.default_view_mode
        } else {
            requested
        };
        let fallback = self.view(preset, now)?.period;
        let normalized =
            normalize_with_fallback(&from, &to, Some(&fallback), &self.tz, self.config.end_of_day);
        let current = normalized.to_range().ok_or_else(|| {
            PeriodError::Unresolvable(format!(
                "custom range from {:?} to {:?}",
                query.date_from, query.date_to
            ))
        })?;
        let previous = current.previous_period();
        if previous.is_none() {
            tracing::debug!("no previous period for custom range");
        }

        tracing::debug!(fallback_mode = %preset, "resolved custom period");
        Ok(ResolvedPeriod {
            current,
            previous,
            view_mode: ViewMode::Custom,
            source: PeriodSource::Custom,
        })
    }

    /// Render a resolution with business-local timestamps.
    pub fn report(&self, resolved: &ResolvedPeriod) -> PeriodReport {
        PeriodReport {
            timezone: self.tz.name().to_string(),
            view_mode: resolved.view_mode,
            source: resolved.source,
            current: RangeReport::new(&resolved.current, &self.tz),
            previous: resolved.previous.map(|r| RangeReport::new(&r, &self.tz)),
        }
    }
}

/// Serializable view of a [`ResolvedPeriod`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub timezone: String,
    pub view_mode: ViewMode,
    pub source: PeriodSource,
    pub current: RangeReport,
    pub previous: Option<RangeReport>,
}

/// One range, in UTC and in the business timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeReport {
    /// Start in UTC (RFC 3339).
    pub from_utc: String,
    /// End in UTC (RFC 3339).
    pub to_utc: String,
    /// Start with the business-local offset (RFC 3339).
    pub from_local: String,
    /// End with the business-local offset (RFC 3339).
    pub to_local: String,
    pub duration_seconds: i64,
}

impl RangeReport {
    /// Render `range` in UTC and in `tz`.
    pub fn new(range: &DateRange, tz: &Tz) -> Self {
        Self {
            from_utc: range.start().to_rfc3339(),
            to_utc: range.end().to_rfc3339(),
            from_local: format_local(range.start(), tz),
            to_local: format_local(range.end(), tz),
            duration_seconds: range.duration().num_seconds(),
        }
    }
}
