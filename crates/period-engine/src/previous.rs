//! Comparison periods for explicit ranges.
//!
//! Presets carry their own previous period (see [`crate::view_mode`]); a
//! custom range gets one here: same elapsed duration, ending one millisecond
//! before the current range starts.

use chrono::{DateTime, Duration, Utc};

use crate::range::DateRange;

/// Milliseconds between the end of the previous period and the start of the
/// current one.
pub const ADJACENCY_GAP_MS: i64 = 1;

/// The period immediately before `[from, to]` with the same duration.
///
/// Returns `None` when either side is missing; callers skip the comparison
/// instead of comparing against nothing.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use period_engine::previous::derive_previous_period;
///
/// let from = Utc.with_ymd_and_hms(2024, 6, 10, 3, 0, 0).unwrap();
/// let to = Utc.with_ymd_and_hms(2024, 6, 13, 2, 59, 0).unwrap();
/// let prev = derive_previous_period(Some(from), Some(to)).unwrap();
///
/// assert_eq!(prev.end(), from - Duration::milliseconds(1));
/// assert_eq!(prev.duration(), to - from);
/// ```
pub fn derive_previous_period(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Option<DateRange> {
    let (from, to) = (from?, to?);
    let span = to - from;
    let prev_to = from.checked_sub_signed(Duration::milliseconds(ADJACENCY_GAP_MS))?;
    let prev_from = prev_to.checked_sub_signed(span)?;
    DateRange::new(prev_from, prev_to).ok()
}

impl DateRange {
    /// See [`derive_previous_period`].
    pub fn previous_period(&self) -> Option<DateRange> {
        derive_previous_period(Some(self.start()), Some(self.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_previous_is_adjacent_and_same_length() {
        let (from, to) = (at(10, 3, 0), at(16, 2, 59));
        let prev = derive_previous_period(Some(from), Some(to)).unwrap();
        assert_eq!(prev.end(), from - Duration::milliseconds(1));
        assert_eq!(prev.duration(), to - from);
        assert!(prev.end() < from);
    }

    #[test]
    fn test_previous_concrete_values() {
        let prev = derive_previous_period(Some(at(10, 3, 0)), Some(at(16, 2, 59))).unwrap();
        assert_eq!(prev.start().to_rfc3339(), "2024-06-04T03:00:59.999+00:00");
        assert_eq!(prev.end().to_rfc3339(), "2024-06-10T02:59:59.999+00:00");
    }

    #[test]
    fn test_zero_length_range() {
        let from = at(10, 3, 0);
        let prev = derive_previous_period(Some(from), Some(from)).unwrap();
        assert_eq!(prev.start(), prev.end());
        assert_eq!(prev.end(), from - Duration::milliseconds(ADJACENCY_GAP_MS));
    }

    #[test]
    fn test_missing_side_yields_none() {
        assert!(derive_previous_period(None, Some(at(10, 0, 0))).is_none());
        assert!(derive_previous_period(Some(at(10, 0, 0)), None).is_none());
        assert!(derive_previous_period(None, None).is_none());
    }

    #[test]
    fn test_method_matches_free_function() {
        let range = DateRange::new(at(1, 0, 0), at(3, 12, 0)).unwrap();
        assert_eq!(
            range.previous_period(),
            derive_previous_period(Some(range.start()), Some(range.end()))
        );
    }
}
