use crate::gti::Interval;
use qtty::Unit;

/// Merges consecutive intervals where one ends exactly where the next starts.
///
/// Input must be sorted; overlapping input is left as-is. Idempotent.
pub fn join_touching<U: Unit>(intervals: &[Interval<U>]) -> Vec<Interval<U>> {
    let mut result: Vec<Interval<U>> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        if let Some(last) = result.last_mut() {
            if last.touches(iv) {
                *last = Interval::new(last.start(), iv.end());
                continue;
            }
        }
        result.push(*iv);
    }
    result
}
