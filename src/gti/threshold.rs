//! Good-time intervals derived from a thresholded time series.

use qtty::{Quantity, Unit};

use super::error::GtiError;
use super::interval::Interval;
use super::interval_set::IntervalSet;

impl<U: Unit> IntervalSet<U> {
    /// Builds intervals from the runs of a time-ordered series where
    /// `is_good` holds.
    ///
    /// Each maximal run of consecutive good rows yields the interval from the
    /// first to the last time of the run. A single good row yields a
    /// zero-length interval.
    ///
    /// # Errors
    ///
    /// [`GtiError::MalformedIntervals`] if the times are not sorted.
    pub fn from_runs<T, F, G>(rows: &[T], time_of: F, is_good: G) -> Result<Self, GtiError>
    where
        F: Fn(&T) -> f64,
        G: Fn(&T) -> bool,
    {
        let mut intervals: Vec<Interval<U>> = Vec::new();
        let mut run: Option<(f64, f64)> = None;
        for row in rows {
            let time = time_of(row);
            if is_good(row) {
                run = match run {
                    Some((first, _)) => Some((first, time)),
                    None => Some((time, time)),
                };
            } else if let Some((first, last)) = run.take() {
                intervals.push(Interval::try_new(Quantity::new(first), Quantity::new(last))?);
            }
        }
        if let Some((first, last)) = run {
            intervals.push(Interval::try_new(Quantity::new(first), Quantity::new(last))?);
        }
        Self::try_from_vec(intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Second;

    #[test]
    fn runs_above_threshold_become_intervals() {
        let rows = [
            (0.0, 10.0),
            (1.0, 50.0),
            (2.0, 60.0),
            (3.0, 20.0),
            (4.0, 70.0),
            (5.0, 80.0),
        ];
        let set = IntervalSet::<Second>::from_runs(&rows, |r| r.0, |r| r.1 > 45.0).unwrap();
        assert_eq!(set.to_pairs(), vec![(1.0, 2.0), (4.0, 5.0)]);
    }

    #[test]
    fn no_good_rows_gives_empty_set() {
        let rows = [(0.0, 1.0), (1.0, 2.0)];
        let set = IntervalSet::<Second>::from_runs(&rows, |r| r.0, |r| r.1 > 45.0).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn unsorted_times_are_rejected() {
        let rows = [(5.0, 50.0), (1.0, 50.0)];
        assert!(IntervalSet::<Second>::from_runs(&rows, |r| r.0, |r| r.1 > 45.0).is_err());
    }
}
