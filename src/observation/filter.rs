//! Selection of samples by good-time intervals.

use std::ops::RangeInclusive;

use log::debug;

use super::sample::{Sample, SampleSeries};
use crate::gti::IntervalSet;
use crate::search::{bracket, Side};
use crate::units::Second;

/// Inclusive index ranges of `times` that fall inside each interval of `gtis`.
///
/// For every interval the first sample at or after its start and the last
/// sample at or before its end are located with [`bracket`]. Intervals that
/// contain no sample are skipped. Ranges come out in time order and never
/// share an index, so a sample sitting on the boundary of two touching
/// intervals is reported once, and repeated time stamps on an interval end
/// are all kept.
pub fn sample_ranges(times: &[f64], gtis: &IntervalSet<Second>) -> Vec<RangeInclusive<usize>> {
    let mut ranges = Vec::with_capacity(gtis.len());
    let mut next_free = 0usize;
    for gti in gtis {
        let (lo, hi) = (gti.start().value(), gti.end().value());
        let (Some(first), Some(last)) = (
            bracket(times, lo, Side::AtOrAfter),
            bracket(times, hi, Side::AtOrBefore),
        ) else {
            break;
        };
        if times[first] < lo || times[last] > hi {
            continue;
        }
        // The bracket stops on the first of several equal times.
        let last = times.partition_point(|&t| t <= hi) - 1;
        let first = first.max(next_free);
        if first > last {
            continue;
        }
        ranges.push(first..=last);
        next_free = last + 1;
    }
    ranges
}

impl SampleSeries {
    /// Samples inside `gtis`, in their original order and without duplicates.
    pub fn filter(&self, gtis: &IntervalSet<Second>) -> Vec<&Sample> {
        let ranges = sample_ranges(self.times(), gtis);
        let kept: Vec<&Sample> = ranges
            .into_iter()
            .flat_map(|range| &self.samples()[range])
            .collect();
        debug!(
            "GTI filter kept {} of {} samples across {} intervals",
            kept.len(),
            self.len(),
            gtis.len()
        );
        kept
    }
}
