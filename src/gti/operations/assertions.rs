//! Well-formedness checks for interval lists.

use crate::gti::{GtiError, Interval};
use qtty::Unit;

/// Returns true if `intervals` is canonical: each interval has start <= end,
/// intervals are sorted by start, and they do not overlap (previous end <= next start).
/// Touching intervals are allowed.
pub fn is_canonical<U: Unit>(intervals: &[Interval<U>]) -> bool {
    validate(intervals).is_ok()
}

/// Checks that every interval is well formed and that consecutive intervals
/// do not overlap.
pub fn validate<U: Unit>(intervals: &[Interval<U>]) -> Result<(), GtiError> {
    for (index, iv) in intervals.iter().enumerate() {
        let (start, end) = (iv.start().value(), iv.end().value());
        if start.is_nan() || end.is_nan() {
            return Err(GtiError::MalformedIntervals {
                index,
                reason: "bound is NaN".to_string(),
            });
        }
        if start > end {
            return Err(GtiError::MalformedIntervals {
                index,
                reason: format!("start {start} is after end {end}"),
            });
        }
    }
    for (offset, w) in intervals.windows(2).enumerate() {
        if w[1].start().value() < w[0].end().value() {
            return Err(GtiError::MalformedIntervals {
                index: offset + 1,
                reason: format!(
                    "starts at {} before the previous interval ends at {}",
                    w[1].start().value(),
                    w[0].end().value()
                ),
            });
        }
    }
    Ok(())
}
