//! End-to-end all-sky map generation.
//!
//! ```text
//! solar angles ─▶ GTIs ─┐
//! samples ──────────────┴▶ filter ─▶ values ─▶ positions ─▶ project ─▶ calibrate ─▶ tiles
//! attitude ─────────────────────────────────────┘
//! ```

use log::{debug, info, warn};
use ndarray::Array2;

use crate::attitude::AttitudePath;
use crate::config::{GtiConfig, PipelineConfig};
use crate::error::AllSkyResult;
use crate::gti::{GtiError, IntervalSet};
use crate::observation::{sample_value, Sample, SampleSeries, TrackPoint};
use crate::sky::{export_tiles, FluxCalibrator, Kernel, KernelProjector, TileDescriptor};
use crate::units::{Degrees, Second, Seconds};


/// Sun direction in instrument coordinates at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAngleSample {
    pub time: Seconds,
    pub theta: Degrees,
    pub phi: Degrees,
}

impl SolarAngleSample {
    pub fn new(time: Seconds, theta: Degrees, phi: Degrees) -> Self {
        Self { time, theta, phi }
    }
}

/// Intervals where the Sun stays beyond `threshold` in `theta`.
pub fn solar_gtis(
    rows: &[SolarAngleSample],
    threshold: Degrees,
) -> Result<IntervalSet<Second>, GtiError> {
    IntervalSet::from_runs(rows, |r| r.time.value(), |r| {
        r.theta.value() > threshold.value()
    })
}

/// Solar GTIs intersected with any fixed intervals from `config`.
pub fn good_time_intervals(
    rows: &[SolarAngleSample],
    config: &GtiConfig,
) -> Result<IntervalSet<Second>, GtiError> {
    let solar = solar_gtis(rows, config.sun_theta_threshold)?;
    if config.fixed.is_empty() {
        return Ok(solar);
    }
    let fixed = IntervalSet::from_pairs(&config.fixed)?;
    Ok(IntervalSet::intersect_all([&solar, &fixed]))
}

/// Products of one pipeline run.
#[derive(Debug, Clone)]
pub struct SkyMap {
    pub gtis: IntervalSet<Second>,
    /// Every retained sample with its value and pointing.
    pub track: Vec<TrackPoint>,
    pub flux: Array2<f64>,
    pub exposure: Array2<f64>,
    /// Normalized (and optionally equalized) image.
    pub image: Array2<u8>,
    pub tiles: Vec<TileDescriptor>,
}

/// A configured map generator.
///
/// Construction validates the configuration and resamples the kernel once;
/// [`MapPipeline::run`] can then be called for any number of data sets.
#[derive(Debug, Clone)]
pub struct MapPipeline {
    config: PipelineConfig,
    projector: KernelProjector,
    calibrator: FluxCalibrator,
}

impl MapPipeline {
    pub fn new(config: PipelineConfig) -> AllSkyResult<Self> {
        config.validate()?;
        let grid = config.sky_map.grid();
        let mut kernel = Kernel::from_rows(&config.sky_map.kernel)?;
        if config.sky_map.rescale_kernel {
            kernel = kernel.for_raster(config.instrument.field_of_view, grid.scale());
        }
        debug!(
            "Kernel {}x{} on a {}x{} raster",
            kernel.size(),
            kernel.size(),
            grid.height(),
            grid.width()
        );
        Ok(Self {
            projector: KernelProjector::new(&kernel, grid),
            calibrator: FluxCalibrator::from_config(&config.sky_map),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Value and pointing of each sample.
    pub fn track<'a, I>(&self, samples: I, attitude: &AttitudePath) -> Vec<TrackPoint>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let instrument = &self.config.instrument;
        let kind = self.config.sky_map.value_kind;
        samples
            .into_iter()
            .map(|sample| TrackPoint {
                time: sample.time,
                value: sample_value(sample, instrument, kind),
                position: attitude.position_at(sample.time),
            })
            .collect()
    }

    /// Builds the map from samples filtered by solar-avoidance GTIs.
    pub fn run(
        &self,
        samples: &SampleSeries,
        attitude: &AttitudePath,
        solar: &[SolarAngleSample],
    ) -> AllSkyResult<SkyMap> {
        let gtis = good_time_intervals(solar, &self.config.gti)?;
        info!(
            "{} good time intervals, {:.1} s in total",
            gtis.len(),
            gtis.total_duration().value()
        );
        self.run_with_gtis(samples, attitude, gtis)
    }

    /// Builds the map from samples inside `gtis`.
    ///
    /// # Errors
    ///
    /// [`SampleError::ChannelCount`] if the samples do not carry one value per
    /// configured channel.
    ///
    /// [`SampleError::ChannelCount`]: crate::observation::SampleError::ChannelCount
    pub fn run_with_gtis(
        &self,
        samples: &SampleSeries,
        attitude: &AttitudePath,
        gtis: IntervalSet<Second>,
    ) -> AllSkyResult<SkyMap> {
        samples.check_channels(&self.config.instrument)?;
        let kept = samples.filter(&gtis);
        info!("Retained {} of {} samples", kept.len(), samples.len());
        if kept.is_empty() {
            warn!("No samples inside the good time intervals; the map will be empty");
        }

        let track = self.track(kept, attitude);
        let observations: Vec<_> = track
            .iter()
            .filter(|p| self.config.sky_map.project_empty_samples || p.value > 0.0)
            .map(|p| (p.position, p.value))
            .collect();
        debug!("Projecting {} of {} track points", observations.len(), track.len());

        let acc = if self.config.sky_map.parallel {
            self.projector.accumulate_parallel(&observations)
        } else {
            self.projector.accumulate(&observations)
        };
        let flux = self.calibrator.flux(&acc);
        let image = self.calibrator.image(&flux);
        let grid = self.projector.grid();
        info!("Calibrated {}x{} sky image", grid.height(), grid.width());

        let tiles = export_tiles(&image, grid, &self.config.tiles);
        info!("Exported {} tiles", tiles.len());

        Ok(SkyMap {
            gtis,
            track,
            flux,
            exposure: acc.exposure,
            image,
            tiles,
        })
    }
}
