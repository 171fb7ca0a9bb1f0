//! Toroidal sky rasters.
//!
//! Rows run along declination (`dec + 90` degrees, so row 0 is the south
//! pole) and columns along right ascension. Both axes wrap: every index
//! computation goes through [`wrap_index`].

use ndarray::{Array2, Zip};

use crate::attitude::SkyPosition;

/// `(base + offset) mod len`, always in `0..len`.
#[inline]
pub fn wrap_index(base: usize, offset: isize, len: usize) -> usize {
    (base as isize + offset).rem_euclid(len as isize) as usize
}

/// Pixel grid of an all-sky raster at `scale` pixels per degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyGrid {
    scale: usize,
}

impl SkyGrid {
    pub fn new(scale: usize) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn height(&self) -> usize {
        180 * self.scale
    }

    pub fn width(&self) -> usize {
        360 * self.scale
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// `(row, col)` of the pixel containing `position`, wrapped onto the grid.
    pub fn pixel_of(&self, position: &SkyPosition) -> (usize, usize) {
        let scale = self.scale as f64;
        let row = ((position.dec.value() + 90.0) * scale).floor() as isize;
        let col = (position.ra.value() * scale).floor() as isize;
        (
            wrap_index(0, row, self.height()),
            wrap_index(0, col, self.width()),
        )
    }
}

/// Signal and exposure rasters accumulated in lock-step.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub signal: Array2<f64>,
    pub exposure: Array2<f64>,
}

impl Accumulator {
    pub fn zeros(dim: (usize, usize)) -> Self {
        Self {
            signal: Array2::zeros(dim),
            exposure: Array2::zeros(dim),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.signal.dim()
    }

    /// Adds `other` element-wise. Both accumulators must share a shape.
    pub fn merge(mut self, other: &Accumulator) -> Self {
        Zip::from(&mut self.signal)
            .and(&other.signal)
            .for_each(|a, &b| *a += b);
        Zip::from(&mut self.exposure)
            .and(&other.exposure)
            .for_each(|a, &b| *a += b);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Degrees;

    #[test]
    fn wrap_index_handles_both_directions() {
        assert_eq!(wrap_index(0, -1, 10), 9);
        assert_eq!(wrap_index(9, 1, 10), 0);
        assert_eq!(wrap_index(9, 3, 10), 2);
        assert_eq!(wrap_index(4, -25, 10), 9);
        assert_eq!(wrap_index(5, 0, 10), 5);
    }

    #[test]
    fn grid_dimensions() {
        assert_eq!(SkyGrid::new(3).dim(), (540, 1080));
    }

    #[test]
    fn pixel_of_maps_degrees_to_cells() {
        let grid = SkyGrid::new(2);
        let pos = SkyPosition::new(Degrees::new(10.3), Degrees::new(-89.9));
        assert_eq!(grid.pixel_of(&pos), (0, 20));
        let seam = SkyPosition::new(Degrees::new(360.0), Degrees::new(0.0));
        assert_eq!(grid.pixel_of(&seam), (180, 0));
        let negative = SkyPosition::new(Degrees::new(-0.25), Degrees::new(0.0));
        assert_eq!(grid.pixel_of(&negative), (180, 719));
    }

    #[test]
    fn merge_adds_elementwise() {
        let mut a = Accumulator::zeros((2, 2));
        a.signal[[0, 1]] = 1.5;
        let mut b = Accumulator::zeros((2, 2));
        b.signal[[0, 1]] = 2.0;
        b.exposure[[1, 0]] = 3.0;
        let c = a.merge(&b);
        assert_eq!(c.signal[[0, 1]], 3.5);
        assert_eq!(c.exposure[[1, 0]], 3.0);
    }
}
