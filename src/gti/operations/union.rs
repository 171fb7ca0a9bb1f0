use super::endpoints::{sort_by_time, tag, Edge};
use super::join::join_touching;
use crate::gti::Interval;
use qtty::Unit;

/// Returns true iff the overall spans of `a` and `b` do not interleave.
///
/// Touching spans are separate. An empty set is separate from anything.
pub fn are_disjoint<U: Unit>(a: &[Interval<U>], b: &[Interval<U>]) -> bool {
    let (Some(a_first), Some(a_last), Some(b_first), Some(b_last)) =
        (a.first(), a.last(), b.first(), b.last())
    else {
        return true;
    };
    a_last.end().value() <= b_first.start().value()
        || b_last.end().value() <= a_first.start().value()
}

/// Union of two mutually exclusive sets: merge by start, then join touching.
fn append<U: Unit>(a: &[Interval<U>], b: &[Interval<U>]) -> Vec<Interval<U>> {
    let mut merged: Vec<Interval<U>> = Vec::with_capacity(a.len() + b.len());
    let key = |iv: &Interval<U>| (iv.start().value(), iv.end().value());
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        // Ties on start only happen with zero-length intervals; shorter first.
        if key(&a[i]) <= key(&b[j]) {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    join_touching(&merged)
}

/// Computes the union of two sorted, non-overlapping interval sets.
///
/// Mutually exclusive inputs are simply merged. Otherwise every start is
/// tagged `-1` and every stop `+1`; sweeping the tags in time order, each
/// point where the running sum returns to zero closes a merged interval and
/// the next point opens the following one. Openings are swept before closings
/// at equal times, so intervals that touch across the inputs are merged.
///
/// # Arguments
///
/// * `a` - First set of sorted, non-overlapping intervals
/// * `b` - Second set of sorted, non-overlapping intervals
///
/// # Returns
///
/// A vector of intervals representing the union, sorted and non-overlapping.
pub fn compute_union<U: Unit>(a: &[Interval<U>], b: &[Interval<U>]) -> Vec<Interval<U>> {
    // assert a and b are canonical (debug-only)
    debug_assert!(super::assertions::is_canonical(a));
    debug_assert!(super::assertions::is_canonical(b));

    if are_disjoint(a, b) {
        return append(a, b);
    }

    let mut endpoints = tag(a, 0);
    endpoints.extend(tag(b, 1));
    sort_by_time(&mut endpoints, Edge::Open);

    let mut result: Vec<Interval<U>> = Vec::new();
    let mut running = 0i64;
    let mut opened_at: Option<f64> = None;
    for endpoint in endpoints {
        let start = *opened_at.get_or_insert(endpoint.time);
        running += match endpoint.edge {
            Edge::Open => -1,
            Edge::Close => 1,
        };
        if running == 0 {
            result.push(Interval::from_f64(start, endpoint.time));
            opened_at = None;
        }
    }

    join_touching(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Second;

    fn iv(start: f64, end: f64) -> Interval<Second> {
        Interval::from_f64(start, end)
    }

    #[test]
    fn test_compute_union_simple() {
        let a = vec![iv(0.0, 50.0)];
        let b = vec![iv(100.0, 150.0)];
        assert_eq!(compute_union(&a, &b), vec![iv(0.0, 50.0), iv(100.0, 150.0)]);
    }

    #[test]
    fn test_compute_union_overlapping() {
        let a = vec![iv(0.0, 100.0)];
        let b = vec![iv(50.0, 150.0)];
        assert_eq!(compute_union(&a, &b), vec![iv(0.0, 150.0)]);
    }

    #[test]
    fn test_compute_union_adjacent() {
        let a = vec![iv(0.0, 1.0)];
        let b = vec![iv(1.0, 3.0)];
        assert_eq!(compute_union(&a, &b), vec![iv(0.0, 3.0)]);
    }

    #[test]
    fn test_compute_union_interleaved() {
        // A |-----|   |--------|  |-----|
        // B    |-------|  |---------|
        let a = vec![iv(0.0, 10.0), iv(15.0, 30.0), iv(40.0, 50.0)];
        let b = vec![iv(5.0, 12.0), iv(20.0, 42.0)];
        assert_eq!(compute_union(&a, &b), vec![iv(0.0, 12.0), iv(15.0, 50.0)]);
    }

    #[test]
    fn test_compute_union_touching_inside_overlap_path() {
        // Spans interleave, and [10, 20] touches [20, 30] across inputs.
        let a = vec![iv(0.0, 10.0), iv(20.0, 30.0)];
        let b = vec![iv(5.0, 20.0)];
        assert_eq!(compute_union(&a, &b), vec![iv(0.0, 30.0)]);
    }

    #[test]
    fn test_compute_union_with_empty() {
        let a = vec![iv(0.0, 10.0)];
        let b: Vec<Interval<Second>> = vec![];
        assert_eq!(compute_union(&a, &b), a);
    }

    #[test]
    fn test_are_disjoint() {
        assert!(are_disjoint(&[iv(0.0, 1.0)], &[iv(1.0, 2.0)]));
        assert!(are_disjoint(&[iv(5.0, 6.0)], &[iv(0.0, 2.0)]));
        assert!(!are_disjoint(&[iv(0.0, 1.0), iv(5.0, 6.0)], &[iv(2.0, 3.0)]));
    }
}
