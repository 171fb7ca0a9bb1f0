//! Read-out cadence statistics.

use crate::units::Seconds;

/// Summary of the spacing between consecutive sample times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CadenceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Steps that were counted.
    pub steps: usize,
    /// Steps longer than the gap threshold, excluded from the statistics.
    pub gaps: usize,
}

/// Cadence of a sorted time axis, ignoring steps longer than `gap_threshold`.
///
/// Returns `None` when no step is shorter than the threshold.
pub fn cadence(times: &[f64], gap_threshold: Seconds) -> Option<CadenceStats> {
    let threshold = gap_threshold.value();
    let (steps, gaps): (Vec<f64>, Vec<f64>) = times
        .windows(2)
        .map(|w| w[1] - w[0])
        .partition(|dt| *dt <= threshold);
    if steps.is_empty() {
        return None;
    }
    let n = steps.len() as f64;
    let mean = steps.iter().sum::<f64>() / n;
    let variance = steps.iter().map(|dt| (dt - mean).powi(2)).sum::<f64>() / n;
    Some(CadenceStats {
        min: steps.iter().copied().fold(f64::INFINITY, f64::min),
        max: steps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean,
        std_dev: variance.sqrt(),
        steps: steps.len(),
        gaps: gaps.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn regular_cadence() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let stats = cadence(&times, Seconds::new(10.0)).unwrap();
        assert_relative_eq!(stats.mean, 1.0);
        assert_relative_eq!(stats.std_dev, 0.0);
        assert_eq!((stats.steps, stats.gaps), (3, 0));
    }

    #[test]
    fn gaps_are_counted_but_not_averaged() {
        let times = [0.0, 1.0, 3.0, 100.0, 101.0];
        let stats = cadence(&times, Seconds::new(5.0)).unwrap();
        assert_eq!((stats.steps, stats.gaps), (3, 1));
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 2.0);
        assert_relative_eq!(stats.mean, 4.0 / 3.0);
        assert_relative_eq!(stats.std_dev, (2.0f64 / 9.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn too_few_samples() {
        assert!(cadence(&[1.0], Seconds::new(1.0)).is_none());
        assert!(cadence(&[0.0, 50.0], Seconds::new(1.0)).is_none());
    }
}
