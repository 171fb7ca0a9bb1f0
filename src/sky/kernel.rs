//! Instrument response kernel.
//!
//! Weights are stored in percent of the peak response; rows are declination
//! offsets and columns right-ascension offsets from the center cell.

use log::debug;
use ndarray::Array2;

use crate::config::{validate_kernel, ConfigError};
use crate::units::Degrees;

/// A kernel offset and its fractional weight (`weight / 100`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub d_row: isize,
    pub d_col: isize,
    pub weight: f64,
}

/// Odd-sized square weight matrix with an exact center cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Builds a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Fails unless the rows form an odd-sized square of finite,
    /// non-negative weights.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        validate_kernel(rows)?;
        let n = rows.len();
        Ok(Self {
            weights: Array2::from_shape_fn((n, n), |(r, c)| rows[r][c]),
        })
    }

    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn center(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Non-zero cells as offsets from the center.
    pub fn taps(&self) -> Vec<Tap> {
        let center = self.center() as isize;
        self.weights
            .indexed_iter()
            .filter(|(_, &w)| w != 0.0)
            .map(|((r, c), &w)| Tap {
                d_row: r as isize - center,
                d_col: c as isize - center,
                weight: w / 100.0,
            })
            .collect()
    }

    /// Resamples the kernel to cover `field_of_view` at `scale` pixels per degree.
    pub fn for_raster(&self, field_of_view: Degrees, scale: usize) -> Self {
        let factor = field_of_view.value() / self.size() as f64 * scale as f64;
        self.rescaled(factor)
    }

    /// Bilinear resampling by `factor`.
    ///
    /// The new size is `round(size * factor)`, bumped to the next odd number
    /// when even, so the center stays on a cell. Corner cells keep their
    /// values and the peak stays at the center.
    pub fn rescaled(&self, factor: f64) -> Self {
        let n = self.size();
        let mut m = ((n as f64 * factor).round() as usize).max(1);
        if m % 2 == 0 {
            m += 1;
        }
        if m == n {
            return self.clone();
        }
        debug!("Resampling {n}x{n} kernel to {m}x{m} (factor {factor:.3})");

        let step = if m > 1 {
            (n - 1) as f64 / (m - 1) as f64
        } else {
            0.0
        };
        let origin = if m > 1 { 0.0 } else { (n - 1) as f64 / 2.0 };
        let source = &self.weights;
        let sample = |x: f64| {
            let lo = (x.floor() as usize).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            (lo, hi, x - lo as f64)
        };
        let weights = Array2::from_shape_fn((m, m), |(r, c)| {
            let (r0, r1, fr) = sample(origin + r as f64 * step);
            let (c0, c1, fc) = sample(origin + c as f64 * step);
            let top = source[[r0, c0]] * (1.0 - fc) + source[[r0, c1]] * fc;
            let bottom = source[[r1, c0]] * (1.0 - fc) + source[[r1, c1]] * fc;
            top * (1.0 - fr) + bottom * fr
        });
        Self { weights }
    }
}

impl Default for Kernel {
    /// The 11x11 collimator response table.
    fn default() -> Self {
        let rows = crate::config::default_kernel();
        let n = rows.len();
        Self {
            weights: Array2::from_shape_fn((n, n), |(r, c)| rows[r][c]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cross() -> Kernel {
        Kernel::from_rows(&[
            vec![0.0, 50.0, 0.0],
            vec![50.0, 100.0, 50.0],
            vec![0.0, 50.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn default_kernel_peaks_at_center() {
        let k = Kernel::default();
        assert_eq!(k.size(), 11);
        assert_eq!(k.center(), 5);
        assert_eq!(k.weights()[[5, 5]], 100.0);
    }

    #[test]
    fn taps_skip_zero_weights() {
        let taps = cross().taps();
        assert_eq!(taps.len(), 5);
        assert!(taps.contains(&Tap {
            d_row: 0,
            d_col: 0,
            weight: 1.0
        }));
        assert!(taps.contains(&Tap {
            d_row: -1,
            d_col: 0,
            weight: 0.5
        }));
    }

    #[test]
    fn even_kernel_is_rejected() {
        assert_eq!(
            Kernel::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]),
            Err(ConfigError::KernelEvenSize(2))
        );
    }

    #[test]
    fn upscaling_keeps_odd_size_and_peak() {
        let k = cross().rescaled(2.0);
        // round(3 * 2) = 6, bumped to 7
        assert_eq!(k.size(), 7);
        assert_relative_eq!(k.weights()[[3, 3]], 100.0, epsilon = 1e-9);
        assert_relative_eq!(k.weights()[[0, 0]], 0.0);
        // A third of the way from the center towards an edge midpoint.
        assert_relative_eq!(k.weights()[[3, 4]], 250.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn unit_factor_is_identity() {
        let k = cross();
        assert_eq!(k.rescaled(1.0), k);
    }

    #[test]
    fn tiny_factor_collapses_to_center() {
        let k = cross().rescaled(0.1);
        assert_eq!(k.size(), 1);
        assert_relative_eq!(k.weights()[[0, 0]], 100.0);
    }

    #[test]
    fn default_kernel_for_default_raster() {
        let k = Kernel::default().for_raster(Degrees::new(30.0), 3);
        // 30 / 11 * 3 * 11 = 90, bumped to 91
        assert_eq!(k.size(), 91);
        assert_relative_eq!(k.weights()[[45, 45]], 100.0, epsilon = 1e-9);
    }
}
