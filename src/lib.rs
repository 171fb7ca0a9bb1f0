//! allsky - All-sky X-ray flux maps from scanning detector read-outs
//!
//! Time-tagged channel counts are selected by good-time intervals, tagged
//! with the interpolated spacecraft pointing, scattered through the
//! instrument response onto a wraparound sky raster and calibrated into an
//! 8-bit image that is exported as fixed-size tiles.

pub mod attitude;
pub mod config;
pub mod error;
pub mod gti;
pub mod observation;
pub mod pipeline;
pub mod search;
pub mod sky;
pub mod units;

pub use config::PipelineConfig;
pub use error::{AllSkyError, AllSkyResult};
pub use pipeline::{MapPipeline, SkyMap};

// Re-export unit conversion traits for ergonomic use
pub use units::{convert, SameDim};
