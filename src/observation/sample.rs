use qtty::Quantity;

use super::error::SampleError;
use crate::config::InstrumentConfig;
use crate::units::Seconds;

/// Read-out mode of a sample, decoded from its raw flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    Normal,
    Extended,
    /// Any other flag; such samples contribute nothing.
    Other,
}

impl SampleMode {
    pub fn from_flag(flag: u32, instrument: &InstrumentConfig) -> Self {
        if flag == instrument.normal_mode_flag {
            SampleMode::Normal
        } else if flag == instrument.extended_mode_flag {
            SampleMode::Extended
        } else {
            SampleMode::Other
        }
    }

    /// Value multiplier for this mode, `None` when the mode is unsupported.
    pub fn factor(self, instrument: &InstrumentConfig) -> Option<f64> {
        match self {
            SampleMode::Normal => Some(instrument.normal_mode_factor),
            SampleMode::Extended => Some(instrument.extended_mode_factor),
            SampleMode::Other => None,
        }
    }
}

/// One detector read-out.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: Seconds,
    pub mode: SampleMode,
    /// Raw counts, one entry per energy channel.
    pub channel_counts: Vec<f64>,
}

impl Sample {
    pub fn new(time: Seconds, mode: SampleMode, channel_counts: Vec<f64>) -> Self {
        Self {
            time,
            mode,
            channel_counts,
        }
    }
}

/// Samples ordered by non-decreasing time.
///
/// The time axis is kept as a plain `f64` slice alongside the samples so that
/// lookups can binary-search it directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
    times: Vec<f64>,
}

impl SampleSeries {
    /// Wraps `samples` after checking that their times are finite and sorted
    /// and that they all carry the same number of channels.
    pub fn new(samples: Vec<Sample>) -> Result<Self, SampleError> {
        if let Some(first) = samples.first() {
            let expected = first.channel_counts.len();
            if let Some(index) = samples
                .iter()
                .position(|s| s.channel_counts.len() != expected)
            {
                return Err(SampleError::ChannelCount {
                    index,
                    expected,
                    found: samples[index].channel_counts.len(),
                });
            }
        }
        let times: Vec<f64> = samples.iter().map(|s| s.time.value()).collect();
        for (index, time) in times.iter().enumerate() {
            if !time.is_finite() {
                return Err(SampleError::InvalidTime { index });
            }
            if index > 0 && *time < times[index - 1] {
                return Err(SampleError::Unsorted { index });
            }
        }
        Ok(Self { samples, times })
    }

    /// Parses rows of `(time, mode flag, channel_0 .. channel_{N-1})`.
    pub fn from_rows<R: AsRef<[f64]>>(
        rows: &[R],
        instrument: &InstrumentConfig,
    ) -> Result<Self, SampleError> {
        let expected = 2 + instrument.channel_count();
        let samples = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let row = row.as_ref();
                if row.len() != expected {
                    return Err(SampleError::RowLength {
                        index,
                        expected,
                        found: row.len(),
                    });
                }
                // Flags are small integers stored in a float column.
                let mode = SampleMode::from_flag(row[1] as u32, instrument);
                Ok(Sample::new(Quantity::new(row[0]), mode, row[2..].to_vec()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(samples)
    }

    /// Channels per sample, `None` for an empty series.
    pub fn channel_count(&self) -> Option<usize> {
        self.samples.first().map(|s| s.channel_counts.len())
    }

    /// Checks that the samples match the channel tables of `instrument`.
    pub fn check_channels(&self, instrument: &InstrumentConfig) -> Result<(), SampleError> {
        match self.channel_count() {
            Some(found) if found != instrument.channel_count() => Err(SampleError::ChannelCount {
                index: 0,
                expected: instrument.channel_count(),
                found,
            }),
            _ => Ok(()),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
