//! # period-engine
//!
//! Deterministic reporting-period resolution for dashboards.
//!
//! Given a view mode ("today", "week", "month", ...) or explicit
//! `dateFrom`/`dateTo` strings, the engine produces the absolute UTC range a
//! report covers and the range it is compared against, both aligned to
//! calendar days in a fixed business timezone. Every function takes "now" as
//! an argument; nothing reads the system clock.
//!
//! ## Modules
//!
//! - [`boundary`] — Start/end of a calendar day in an IANA timezone
//! - [`view_mode`] — View-mode presets and their previous periods
//! - [`normalize`] — Explicit `dateFrom`/`dateTo` reconciled with preset defaults
//! - [`previous`] — Equal-length comparison period for an explicit range
//! - [`resolver`] — One-call resolution of a request, plus serializable reports
//! - [`comparison`] — Percentage deltas between current and previous metrics
//! - [`config`] — Business timezone, default view mode, end-of-day policy
//! - [`range`] — The inclusive instant range
//! - [`error`] — Error types

pub mod boundary;
pub mod comparison;
pub mod config;
pub mod error;
pub mod normalize;
pub mod previous;
pub mod range;
pub mod resolver;
pub mod view_mode;

pub use boundary::{day_bounds, end_of_day, start_of_day, EndOfDay};
pub use comparison::{percent_change, PeriodComparison};
pub use config::ResolverConfig;
pub use error::PeriodError;
pub use normalize::{normalize_date_range, normalize_with_fallback, DateInput, NormalizedRange};
pub use previous::derive_previous_period;
pub use range::DateRange;
pub use resolver::{
    PeriodQuery, PeriodReport, PeriodSource, RangeReport, ResolvedPeriod, Resolver,
};
pub use view_mode::{view_period, ViewMode, ViewPeriod};
