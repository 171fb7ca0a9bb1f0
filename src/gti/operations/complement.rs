use crate::gti::Interval;
use qtty::Unit;

/// Returns the gaps of a canonical interval set within `bounds`.
///
/// Gaps are the stretches between `bounds.start()` and the first interval,
/// between consecutive intervals, and between the last interval and
/// `bounds.end()`. Zero-length gaps (touching intervals) are not reported.
pub fn compute_complement<U: Unit>(
    canonical: &[Interval<U>],
    bounds: Interval<U>,
) -> Vec<Interval<U>> {
    debug_assert!(super::assertions::is_canonical(canonical));

    let mut result = Vec::new();
    let mut cursor = bounds.start();
    for iv in canonical {
        if iv.start().value() >= bounds.end().value() {
            break;
        }
        if iv.start().value() > cursor.value() {
            result.push(Interval::new(cursor, iv.start()));
        }
        if iv.end().value() > cursor.value() {
            cursor = iv.end();
        }
    }

    if cursor.value() < bounds.end().value() {
        result.push(Interval::new(cursor, bounds.end()));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Second;

    fn iv(start: f64, end: f64) -> Interval<Second> {
        Interval::from_f64(start, end)
    }

    #[test]
    fn complement_of_empty_is_bounds() {
        assert_eq!(compute_complement(&[], iv(0.0, 10.0)), vec![iv(0.0, 10.0)]);
    }

    #[test]
    fn complement_reports_leading_inner_and_trailing_gaps() {
        let set = vec![iv(2.0, 4.0), iv(6.0, 8.0)];
        assert_eq!(
            compute_complement(&set, iv(0.0, 10.0)),
            vec![iv(0.0, 2.0), iv(4.0, 6.0), iv(8.0, 10.0)]
        );
    }

    #[test]
    fn complement_over_own_span_has_only_inner_gaps() {
        let set = vec![iv(2.0, 4.0), iv(6.0, 8.0)];
        assert_eq!(compute_complement(&set, iv(2.0, 8.0)), vec![iv(4.0, 6.0)]);
    }

    #[test]
    fn complement_skips_touching_boundaries() {
        let set = vec![iv(0.0, 1.0), iv(1.0, 2.0)];
        assert!(compute_complement(&set, iv(0.0, 2.0)).is_empty());
    }

    #[test]
    fn complement_clips_to_bounds() {
        let set = vec![iv(0.0, 5.0), iv(20.0, 30.0)];
        assert_eq!(compute_complement(&set, iv(3.0, 25.0)), vec![iv(5.0, 20.0)]);
    }
}
