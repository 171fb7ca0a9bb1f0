//! Scatter-add of per-sample values through the kernel.

use log::debug;
use rayon::prelude::*;

use super::kernel::{Kernel, Tap};
use super::raster::{wrap_index, Accumulator, SkyGrid};
use crate::attitude::SkyPosition;

/// Projects observations onto a toroidal [`SkyGrid`].
///
/// For every non-zero kernel cell with weight `w` (percent), a projection at
/// `(row, col)` adds `value * w / 100` to the signal raster and `w / 100` to
/// the exposure raster at the wrapped offset cell.
#[derive(Debug, Clone)]
pub struct KernelProjector {
    grid: SkyGrid,
    taps: Vec<Tap>,
}

impl KernelProjector {
    /// The kernel is used as given; resample it beforehand with
    /// [`Kernel::for_raster`] to match the grid resolution.
    pub fn new(kernel: &Kernel, grid: SkyGrid) -> Self {
        Self {
            grid,
            taps: kernel.taps(),
        }
    }

    pub fn grid(&self) -> SkyGrid {
        self.grid
    }

    pub fn empty_accumulator(&self) -> Accumulator {
        Accumulator::zeros(self.grid.dim())
    }

    /// Adds one observation centered on pixel `(row, col)`.
    pub fn project(&self, acc: &mut Accumulator, row: usize, col: usize, value: f64) {
        let (height, width) = self.grid.dim();
        for tap in &self.taps {
            let target = [
                wrap_index(row, tap.d_row, height),
                wrap_index(col, tap.d_col, width),
            ];
            acc.signal[target] += value * tap.weight;
            acc.exposure[target] += tap.weight;
        }
    }

    /// Adds one observation centered on the pixel containing `position`.
    pub fn project_at(&self, acc: &mut Accumulator, position: &SkyPosition, value: f64) {
        let (row, col) = self.grid.pixel_of(position);
        self.project(acc, row, col, value);
    }

    /// Accumulates all observations sequentially.
    pub fn accumulate(&self, observations: &[(SkyPosition, f64)]) -> Accumulator {
        let mut acc = self.empty_accumulator();
        for (position, value) in observations {
            self.project_at(&mut acc, position, *value);
        }
        acc
    }

    /// Accumulates on the rayon pool.
    ///
    /// Observations are split into one chunk per worker; each chunk fills its
    /// own accumulator and the partial rasters are summed.
    pub fn accumulate_parallel(&self, observations: &[(SkyPosition, f64)]) -> Accumulator {
        let workers = rayon::current_num_threads().max(1);
        let chunk = observations.len().div_ceil(workers).max(1);
        debug!(
            "Projecting {} observations in chunks of {chunk} over {workers} workers",
            observations.len()
        );
        observations
            .par_chunks(chunk)
            .map(|part| self.accumulate(part))
            .reduce(|| self.empty_accumulator(), |a, b| a.merge(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Degrees;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn flat_kernel(size: usize) -> Kernel {
        Kernel::from_rows(&vec![vec![100.0; size]; size]).unwrap()
    }

    fn at(ra: f64, dec: f64) -> SkyPosition {
        SkyPosition::new(Degrees::new(ra), Degrees::new(dec))
    }

    #[test]
    fn single_projection_deposits_kernel() {
        let kernel = Kernel::from_rows(&[
            vec![0.0, 50.0, 0.0],
            vec![50.0, 100.0, 50.0],
            vec![0.0, 50.0, 0.0],
        ])
        .unwrap();
        let projector = KernelProjector::new(&kernel, SkyGrid::new(1));
        let mut acc = projector.empty_accumulator();
        projector.project(&mut acc, 90, 100, 4.0);
        assert_relative_eq!(acc.signal[[90, 100]], 4.0);
        assert_relative_eq!(acc.exposure[[90, 100]], 1.0);
        assert_relative_eq!(acc.signal[[89, 100]], 2.0);
        assert_relative_eq!(acc.exposure[[90, 101]], 0.5);
        assert_eq!(acc.exposure[[89, 99]], 0.0);
        assert_relative_eq!(acc.exposure.sum(), 3.0);
    }

    #[test]
    fn projection_wraps_across_the_ra_seam() {
        let projector = KernelProjector::new(&flat_kernel(5), SkyGrid::new(1));
        let width = projector.grid().width();
        let mut acc = projector.empty_accumulator();
        projector.project(&mut acc, 90, width - 1, 1.0);
        for col in [width - 3, width - 2, width - 1, 0, 1] {
            assert_relative_eq!(acc.exposure[[90, col]], 1.0);
        }
        assert_eq!(acc.exposure[[90, 2]], 0.0);
        assert_eq!(acc.exposure[[90, width - 4]], 0.0);
    }

    #[test]
    fn projection_wraps_across_the_poles() {
        let projector = KernelProjector::new(&flat_kernel(3), SkyGrid::new(1));
        let height = projector.grid().height();
        let mut acc = projector.empty_accumulator();
        projector.project_at(&mut acc, &at(10.0, -89.5), 1.0);
        assert_relative_eq!(acc.exposure[[0, 10]], 1.0);
        assert_relative_eq!(acc.exposure[[height - 1, 10]], 1.0);
        assert_relative_eq!(acc.exposure[[1, 10]], 1.0);
    }

    #[test]
    fn zero_value_adds_exposure_only() {
        let projector = KernelProjector::new(&flat_kernel(3), SkyGrid::new(1));
        let acc = projector.accumulate(&[(at(50.0, 0.0), 0.0)]);
        assert_relative_eq!(acc.exposure.sum(), 9.0);
        assert_eq!(acc.signal.sum(), 0.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let observations: Vec<(SkyPosition, f64)> = (0..500)
            .map(|_| {
                (
                    at(rng.gen_range(0.0..360.0), rng.gen_range(-90.0..90.0)),
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect();
        let projector = KernelProjector::new(&Kernel::default(), SkyGrid::new(1));
        let sequential = projector.accumulate(&observations);
        let parallel = projector.accumulate_parallel(&observations);
        for (a, b) in sequential.signal.iter().zip(parallel.signal.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
        for (a, b) in sequential.exposure.iter().zip(parallel.exposure.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn parallel_with_no_observations_is_empty() {
        let projector = KernelProjector::new(&flat_kernel(3), SkyGrid::new(1));
        let acc = projector.accumulate_parallel(&[]);
        assert_eq!(acc.dim(), (180, 360));
        assert_eq!(acc.exposure.sum(), 0.0);
    }
}
