//! Detector read-outs and their selection by good-time intervals.
//!
//! A [`SampleSeries`] holds time-ordered [`Sample`]s. It can be narrowed to
//! the samples inside an [`IntervalSet`](crate::gti::IntervalSet), turned
//! into per-sample observation values, and summarised by its read-out
//! cadence.

mod cadence;
mod error;
mod filter;
mod sample;
mod track;
mod value;

pub use cadence::{cadence, CadenceStats};
pub use error::SampleError;
pub use filter::sample_ranges;
pub use sample::{Sample, SampleMode, SampleSeries};
pub use track::TrackPoint;
pub use value::{channel_means, sample_value};
