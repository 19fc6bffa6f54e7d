//! The inclusive instant range every reporting query is bounded by.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{PeriodError, Result};

/// An inclusive `[from, to]` pair of UTC instants.
///
/// Both ends are meant for `>=` / `<=` query predicates. The only way to build
/// one is through [`DateRange::new`], which keeps `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    /// Build a range, rejecting one whose start is after its end.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidRange`] if `from > to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(PeriodError::InvalidRange(format!(
                "start {} is after end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(Self { from, to })
    }

    /// Build a range from two instants in either order.
    pub fn ordered(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// Inclusive start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.from
    }

    /// Inclusive end instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.to
    }

    /// Elapsed time between the two ends.
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    /// Whether `instant` falls inside the range, both ends included.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }
}
