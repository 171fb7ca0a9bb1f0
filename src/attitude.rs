//! Spacecraft pointing as a function of time.
//!
//! An [`AttitudePath`] stores a strictly time-ordered list of pointings and
//! answers [`AttitudePath::position_at`] by piecewise-linear interpolation.
//! Queries outside the recorded span are not errors: before the first
//! sample the first pointing is returned, after the last sample the last
//! pointing is returned.

use log::warn;
use qtty::{HourAngle, Quantity};
use thiserror::Error;

use crate::search::{bracket, Side};
use crate::units::{convert, Degrees, Seconds};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttitudeError {
    #[error("Attitude path has no samples")]
    Empty,

    #[error("Attitude sample {index} is not later than the sample before it")]
    NonIncreasingTime { index: usize },

    #[error("Attitude row {index} has {found} columns, expected 3")]
    RowLength { index: usize, found: usize },
}

/// A point on the sky in equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    pub ra: Degrees,
    pub dec: Degrees,
}

impl SkyPosition {
    pub fn new(ra: Degrees, dec: Degrees) -> Self {
        Self { ra, dec }
    }
}

/// Pointing of the instrument at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSample {
    pub time: Seconds,
    pub position: SkyPosition,
}

impl AttitudeSample {
    pub fn new(time: Seconds, ra: Degrees, dec: Degrees) -> Self {
        Self {
            time,
            position: SkyPosition::new(ra, dec),
        }
    }

    /// Pointing whose right ascension is given as an hour angle.
    pub fn from_hour_angle(time: Seconds, ra: Quantity<HourAngle>, dec: Degrees) -> Self {
        Self::new(time, convert(ra), dec)
    }
}

/// Interpolated attitude timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudePath {
    samples: Vec<AttitudeSample>,
    times: Vec<f64>,
}

impl AttitudePath {
    /// Builds a path from samples with strictly increasing times.
    pub fn new(samples: Vec<AttitudeSample>) -> Result<Self, AttitudeError> {
        if samples.is_empty() {
            return Err(AttitudeError::Empty);
        }
        let times: Vec<f64> = samples.iter().map(|s| s.time.value()).collect();
        if let Some(index) = (1..times.len()).find(|&i| !(times[i] > times[i - 1])) {
            return Err(AttitudeError::NonIncreasingTime { index });
        }
        Ok(Self { samples, times })
    }

    /// Parses `(time, ra, dec)` rows after skipping `header_rows`.
    pub fn from_rows<R: AsRef<[f64]>>(
        rows: &[R],
        header_rows: usize,
    ) -> Result<Self, AttitudeError> {
        let samples = rows
            .iter()
            .enumerate()
            .skip(header_rows)
            .map(|(index, row)| match row.as_ref() {
                &[time, ra, dec] => Ok(AttitudeSample::new(
                    Seconds::new(time),
                    Degrees::new(ra),
                    Degrees::new(dec),
                )),
                other => Err(AttitudeError::RowLength {
                    index,
                    found: other.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(samples)
    }

    pub fn samples(&self) -> &[AttitudeSample] {
        &self.samples
    }

    /// Time span covered by the recorded samples.
    pub fn span(&self) -> (Seconds, Seconds) {
        let first = self.times[0];
        let last = self.times[self.times.len() - 1];
        (Seconds::new(first), Seconds::new(last))
    }

    /// Pointing at `time`.
    ///
    /// Right ascension is interpolated along the shorter arc, so a path
    /// crossing the 0/360 degree seam stays continuous. Interpolated values
    /// are normalized into `[0, 360)`, including inputs recorded outside that
    /// range; exact sample hits are returned as recorded.
    pub fn position_at(&self, time: Seconds) -> SkyPosition {
        let t = time.value();
        let Some(idx) = bracket(&self.times, t, Side::AtOrBefore) else {
            return self.samples[0].position;
        };
        let here = &self.samples[idx];
        if t < self.times[idx] {
            warn!(
                "Attitude query at {:.3} s precedes the first sample at {:.3} s",
                t, self.times[idx]
            );
            return here.position;
        }
        let Some(next) = self.samples.get(idx + 1) else {
            return here.position;
        };
        let t0 = self.times[idx];
        let fraction = (t - t0) / (self.times[idx + 1] - t0);
        if fraction <= 0.0 {
            return here.position;
        }

        let ra0 = here.position.ra.value();
        let dec0 = here.position.dec.value();
        let mut dra = next.position.ra.value() - ra0;
        if dra > 180.0 {
            dra -= 360.0;
        } else if dra < -180.0 {
            dra += 360.0;
        }
        let ra = (ra0 + fraction * dra).rem_euclid(360.0);
        let dec = dec0 + fraction * (next.position.dec.value() - dec0);
        SkyPosition::new(Degrees::new(ra), Degrees::new(dec))
    }
}
