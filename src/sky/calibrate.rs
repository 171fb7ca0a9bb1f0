//! Flux derivation from the accumulated rasters.

use log::{debug, warn};
use ndarray::{Array2, Zip};

use super::equalize::equalize;
use super::raster::Accumulator;
use crate::config::{NormalizationPolicy, SkyMapConfig};

/// Weighted average `signal / exposure` per cell.
///
/// Cells with less than `min_exposure` (or no exposure at all) are 0.
pub fn reduce(acc: &Accumulator, min_exposure: f64) -> Array2<f64> {
    Zip::from(&acc.signal)
        .and(&acc.exposure)
        .map_collect(|&signal, &exposure| {
            if exposure >= min_exposure && exposure > 0.0 {
                signal / exposure
            } else {
                0.0
            }
        })
}

/// Smallest and largest finite values, `None` if there are none.
pub fn finite_extent(raster: &Array2<f64>) -> Option<(f64, f64)> {
    raster
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |extent, &v| match extent {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Maps a flux raster onto `0..=color_max`.
///
/// With [`NormalizationPolicy::PositiveOnly`] strictly positive cells become
/// `floor(flux / max * color_max)` and every other cell 0. With
/// [`NormalizationPolicy::ShiftByMinimum`] every cell becomes
/// `floor((flux - min) / (max - min) * color_max)`. In both cases the cell
/// holding the maximum maps to `color_max`. A raster without a usable range
/// (no positive maximum, or a constant raster) is all zeros.
pub fn normalize(flux: &Array2<f64>, color_max: u8, policy: NormalizationPolicy) -> Array2<u8> {
    let Some((min, max)) = finite_extent(flux) else {
        warn!("Flux raster has no finite values; leaving it empty");
        return Array2::zeros(flux.dim());
    };
    let (offset, range) = match policy {
        NormalizationPolicy::PositiveOnly => (0.0, max),
        NormalizationPolicy::ShiftByMinimum => (min, max - min),
    };
    if !(range > 0.0) {
        warn!("Flux raster has no signal range (min {min}, max {max}); leaving it empty");
        return Array2::zeros(flux.dim());
    }
    debug!("Normalizing flux range [{min:.4}, {max:.4}] to 0..={color_max} ({policy:?})");

    let top = f64::from(color_max);
    flux.mapv(|v| {
        let skip = match policy {
            NormalizationPolicy::PositiveOnly => !(v > 0.0),
            NormalizationPolicy::ShiftByMinimum => !v.is_finite(),
        };
        if skip {
            0
        } else {
            ((v - offset) / range * top).floor().clamp(0.0, top) as u8
        }
    })
}

/// Reduction, normalization and optional equalization with one set of settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxCalibrator {
    pub min_exposure: f64,
    pub color_max: u8,
    pub policy: NormalizationPolicy,
    pub equalize: bool,
}

impl FluxCalibrator {
    pub fn from_config(config: &SkyMapConfig) -> Self {
        Self {
            min_exposure: config.min_exposure,
            color_max: config.color_max,
            policy: config.normalization,
            equalize: config.equalize,
        }
    }

    /// Flux raster before normalization.
    pub fn flux(&self, acc: &Accumulator) -> Array2<f64> {
        reduce(acc, self.min_exposure)
    }

    /// Normalized, optionally equalized image of a flux raster.
    pub fn image(&self, flux: &Array2<f64>) -> Array2<u8> {
        let image = normalize(flux, self.color_max, self.policy);
        if self.equalize {
            equalize(&image, self.color_max)
        } else {
            image
        }
    }

    /// Final image from the accumulated rasters.
    pub fn calibrate(&self, acc: &Accumulator) -> Array2<u8> {
        self.image(&self.flux(acc))
    }
}
