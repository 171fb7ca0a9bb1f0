use super::endpoints::{sort_by_time, tag, Edge};
use super::join::join_touching;
use crate::gti::Interval;
use qtty::Unit;

/// Computes the exact intersection of two sorted, non-overlapping interval sets.
///
/// Every endpoint is tagged with its source set and the merged endpoint list
/// is swept in time order while counting the open intervals of each source.
/// An output interval opens when both sources have an open interval and
/// closes at the first endpoint that closes either of them. Closing edges are
/// swept before opening edges at equal times, so a boundary shared between
/// the inputs never yields a zero-length interval.
///
/// # Arguments
///
/// * `a` - First set of sorted, non-overlapping intervals
/// * `b` - Second set of sorted, non-overlapping intervals
///
/// # Returns
///
/// A vector of intervals representing the intersection, sorted, non-overlapping
/// and with touching intervals joined.
pub fn compute_intersection<U: Unit>(a: &[Interval<U>], b: &[Interval<U>]) -> Vec<Interval<U>> {
    // assert a and b are canonical (debug-only)
    debug_assert!(super::assertions::is_canonical(a));
    debug_assert!(super::assertions::is_canonical(b));

    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    // Zero-length intervals cannot contribute a positive-length overlap.
    let a: Vec<_> = join_touching(a)
        .into_iter()
        .filter(|iv| iv.duration().value() > 0.0)
        .collect();
    let b: Vec<_> = join_touching(b)
        .into_iter()
        .filter(|iv| iv.duration().value() > 0.0)
        .collect();

    let mut endpoints = tag(&a, 0);
    endpoints.extend(tag(&b, 1));
    sort_by_time(&mut endpoints, Edge::Close);

    let mut open = [0u32; 2];
    let mut opened_at: Option<f64> = None;
    let mut result: Vec<Interval<U>> = Vec::with_capacity(a.len().min(b.len()));

    for endpoint in endpoints {
        match endpoint.edge {
            Edge::Open => {
                open[endpoint.source] += 1;
                if open[0] > 0 && open[1] > 0 {
                    opened_at = Some(endpoint.time);
                }
            }
            Edge::Close => {
                if let Some(start) = opened_at.take() {
                    if endpoint.time > start {
                        result.push(Interval::from_f64(start, endpoint.time));
                    }
                }
                open[endpoint.source] = open[endpoint.source].saturating_sub(1);
            }
        }
    }

    join_touching(&result)
}

/// Left-folds [`compute_intersection`] over any number of interval sets.
///
/// Returns an empty vector when `sets` is empty.
pub fn compute_intersection_all<U: Unit>(sets: &[&[Interval<U>]]) -> Vec<Interval<U>> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .fold(join_touching(first), |acc, set| compute_intersection(&acc, set))
}
