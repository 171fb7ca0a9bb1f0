//! Equal-length chunks laid out inside good-time intervals.

use qtty::{Quantity, Unit};

use super::error::GtiError;
use super::interval::Interval;
use super::interval_set::IntervalSet;

/// Tolerance applied when deciding whether a chunk still fits.
pub const CHUNK_EPSILON: f64 = 1e-5;

impl<U: Unit> IntervalSet<U> {
    /// Lays out chunks of `chunk_length` starting at the beginning of every
    /// interval, advancing by `chunk_length * fraction_step`, and never
    /// crossing the end of the interval.
    ///
    /// With `fraction_step < 1` consecutive chunks overlap, so the result is a
    /// plain list rather than an [`IntervalSet`].
    ///
    /// # Errors
    ///
    /// * [`GtiError::InvalidChunking`] if `chunk_length` or `fraction_step`
    ///   is not strictly positive.
    /// * [`GtiError::NoQualifyingIntervals`] if no interval is at least
    ///   `chunk_length` long.
    pub fn chunks(
        &self,
        chunk_length: Quantity<U>,
        fraction_step: f64,
    ) -> Result<Vec<Interval<U>>, GtiError> {
        let length = chunk_length.value();
        if !(length > 0.0) {
            return Err(GtiError::InvalidChunking(format!(
                "chunk length must be positive, got {length}"
            )));
        }
        if !(fraction_step > 0.0) {
            return Err(GtiError::InvalidChunking(format!(
                "fraction step must be positive, got {fraction_step}"
            )));
        }

        let step = length * fraction_step;
        let mut chunks = Vec::new();
        for gti in self.iter() {
            let (start, end) = (gti.start().value(), gti.end().value());
            if end - start + CHUNK_EPSILON < length {
                continue;
            }
            let last_start = end - length + CHUNK_EPSILON;
            let mut k = 0u64;
            loop {
                let chunk_start = start + k as f64 * step;
                if chunk_start >= last_start {
                    break;
                }
                chunks.push(Interval::from_f64(chunk_start, chunk_start + length));
                k += 1;
            }
        }

        if chunks.is_empty() {
            return Err(GtiError::NoQualifyingIntervals {
                chunk_length: length,
            });
        }
        log::debug!(
            "Laid out {} chunks of length {} over {} intervals",
            chunks.len(),
            length,
            self.len()
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Second;

    fn set(pairs: &[(f64, f64)]) -> IntervalSet<Second> {
        IntervalSet::from_pairs(pairs).unwrap()
    }

    fn starts(chunks: &[Interval<Second>]) -> Vec<f64> {
        chunks.iter().map(|c| c.start().value()).collect()
    }

    #[test]
    fn chunks_fill_each_interval() {
        let gtis = set(&[(0.0, 5.0), (6.0, 8.0)]);
        let chunks = gtis.chunks(Quantity::new(2.0), 1.0).unwrap();
        assert_eq!(starts(&chunks), vec![0.0, 2.0, 6.0]);
        assert!(chunks.iter().all(|c| (c.duration().value() - 2.0).abs() < 1e-12));
    }

    #[test]
    fn half_step_produces_overlapping_chunks() {
        let gtis = set(&[(0.0, 4.0)]);
        let chunks = gtis.chunks(Quantity::new(2.0), 0.5).unwrap();
        assert_eq!(starts(&chunks), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn exact_fit_is_kept() {
        let gtis = set(&[(10.0, 12.0)]);
        let chunks = gtis.chunks(Quantity::new(2.0), 1.0).unwrap();
        assert_eq!(starts(&chunks), vec![10.0]);
    }

    #[test]
    fn too_short_intervals_fail() {
        let gtis = set(&[(0.0, 1.0), (3.0, 4.5)]);
        assert_eq!(
            gtis.chunks(Quantity::new(2.0), 1.0),
            Err(GtiError::NoQualifyingIntervals { chunk_length: 2.0 })
        );
    }

    #[test]
    fn non_positive_parameters_are_rejected() {
        let gtis = set(&[(0.0, 10.0)]);
        assert!(matches!(
            gtis.chunks(Quantity::new(0.0), 1.0),
            Err(GtiError::InvalidChunking(_))
        ));
        assert!(matches!(
            gtis.chunks(Quantity::new(1.0), 0.0),
            Err(GtiError::InvalidChunking(_))
        ));
    }
}
