//! Percentage deltas between a period's metric and its previous period's.

use serde::Serialize;

use crate::resolver::ResolvedPeriod;

/// Percentage change from `previous` to `current`.
///
/// `None` when `previous` is zero or either value is not finite: there is no
/// meaningful base to compare against. A negative base is taken by magnitude,
/// so moving from −100 to −50 reads as +50%.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

/// A metric for the current period next to its comparison value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current: f64,
    pub previous: Option<f64>,
    pub delta_percent: Option<f64>,
}

impl PeriodComparison {
    pub fn new(current: f64, previous: Option<f64>) -> Self {
        Self {
            current,
            previous,
            delta_percent: previous.and_then(|p| percent_change(current, p)),
        }
    }
}

impl ResolvedPeriod {
    /// Pair a metric with its previous-period value.
    ///
    /// `previous` is ignored when this resolution has no previous period, so
    /// a stale value can't produce a delta.
    pub fn compare(&self, current: f64, previous: Option<f64>) -> PeriodComparison {
        PeriodComparison::new(current, self.previous.and(previous))
    }
}
