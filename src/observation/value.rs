//! Per-sample observation values.

use super::sample::Sample;
use crate::config::{InstrumentConfig, ValueKind};

/// Background-corrected, mode-adjusted value of one sample.
///
/// Each channel contributes `counts - background` when that exceeds
/// `min_counts`, otherwise nothing. For [`ValueKind::Energy`] the
/// contribution is converted to an energy rate with the channel energy and
/// the integration time. The sum is scaled by the mode factor; samples in an
/// unsupported mode are worth 0. Channels are paired with the instrument
/// tables by position; [`SampleSeries::check_channels`] verifies the widths.
///
/// [`SampleSeries::check_channels`]: super::SampleSeries::check_channels
pub fn sample_value(sample: &Sample, instrument: &InstrumentConfig, kind: ValueKind) -> f64 {
    let Some(factor) = sample.mode.factor(instrument) else {
        return 0.0;
    };
    let integration = instrument.integration_time.value();
    let total: f64 = sample
        .channel_counts
        .iter()
        .zip(&instrument.background)
        .zip(&instrument.channel_energies)
        .filter_map(|((counts, background), energy)| {
            let corrected = counts - background;
            if !(corrected > instrument.min_counts) {
                return None;
            }
            Some(match kind {
                ValueKind::Energy => corrected * energy / integration,
                ValueKind::Counts => corrected,
            })
        })
        .sum();
    total * factor
}

/// Mean counts of every channel over `samples`.
///
/// Usable as a background table for [`InstrumentConfig::background`].
/// Returns `None` when there are no samples.
pub fn channel_means<'a, I>(samples: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut iter = samples.into_iter();
    let first = iter.next()?;
    let mut sums = first.channel_counts.clone();
    let mut n = 1usize;
    for sample in iter {
        for (sum, counts) in sums.iter_mut().zip(&sample.channel_counts) {
            *sum += counts;
        }
        n += 1;
    }
    Some(sums.into_iter().map(|s| s / n as f64).collect())
}
