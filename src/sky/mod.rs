//! All-sky raster engine.
//!
//! Observations are scattered through a [`Kernel`] onto a toroidal
//! [`SkyGrid`] by the [`KernelProjector`], reduced to an 8-bit image by the
//! [`FluxCalibrator`] and cut into tiles by [`export_tiles`].

mod calibrate;
mod equalize;
mod kernel;
mod projector;
mod raster;
mod tiles;
mod variability;

pub use calibrate::{finite_extent, normalize, reduce, FluxCalibrator};
pub use equalize::equalize;
pub use kernel::{Kernel, Tap};
pub use projector::KernelProjector;
pub use raster::{wrap_index, Accumulator, SkyGrid};
pub use tiles::{export_tiles, TileDescriptor, TileStats};
pub use variability::{pixel_variability, CellSeries, VariabilityMap};
