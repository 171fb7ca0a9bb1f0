//! Pipeline configuration.
//!
//! All tables and thresholds live in one immutable [`PipelineConfig`] value
//! that is passed explicitly to every stage. [`PipelineConfig::energy`] and
//! [`PipelineConfig::counts`] reproduce the two map products: an energy-rate
//! flux map and a background-subtracted counts map.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sky::SkyGrid;
use crate::units::{Degrees, Seconds};

/// Errors detected while validating a configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Channel tables differ: {energies} energies, {background} background values")]
    ChannelTableMismatch { energies: usize, background: usize },

    #[error("At least one energy channel is required")]
    NoChannels,

    #[error("Kernel must be non-empty and square, got {rows} rows and a row of {cols}")]
    KernelNotSquare { rows: usize, cols: usize },

    #[error("Kernel size {0} is even; a centered kernel needs an odd size")]
    KernelEvenSize(usize),

    #[error("Kernel weight at ({row}, {col}) is negative or not finite")]
    KernelInvalidWeight { row: usize, col: usize },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Which per-sample quantity is projected onto the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    /// Background-subtracted counts converted to an energy rate.
    Energy,
    /// Background-subtracted counts.
    Counts,
}

/// How the flux raster is mapped onto the output color range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormalizationPolicy {
    /// `floor(flux / max * color_max)` on strictly positive cells; other cells stay 0.
    PositiveOnly,
    /// `floor((flux - min) / (max - min) * color_max)` on every cell.
    ///
    /// Divides by the range rather than by `max` so that the maximum still
    /// maps to `color_max` when `min` is not 0; with `min == 0` both agree.
    ShiftByMinimum,
}

/// Detector description and per-channel tables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentConfig {
    /// Characteristic energy of each channel, in keV.
    pub channel_energies: Vec<f64>,
    /// Background counts subtracted from each channel.
    pub background: Vec<f64>,
    /// Raw mode flag of the normal read-out mode.
    pub normal_mode_flag: u32,
    /// Raw mode flag of the extended read-out mode.
    pub extended_mode_flag: u32,
    /// Multiplier applied to values read out in normal mode.
    pub normal_mode_factor: f64,
    /// Multiplier applied to values read out in extended mode.
    pub extended_mode_factor: f64,
    /// Integration duration of a single read-out.
    pub integration_time: Seconds,
    /// Corrected channel signals at or below this are discarded.
    pub min_counts: f64,
    /// Angular span covered by the kernel.
    pub field_of_view: Degrees,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            channel_energies: vec![0.90, 1.18, 1.45, 1.75, 2.05, 2.32, 2.60, 3.10],
            background: vec![69.38, 20.14, 28.76, 35.45, 32.90, 36.42, 32.86, 139.92],
            normal_mode_flag: 16,
            extended_mode_flag: 144,
            normal_mode_factor: 1.0,
            extended_mode_factor: 2.0,
            integration_time: Seconds::new(1.0),
            min_counts: 0.0,
            field_of_view: Degrees::new(30.0),
        }
    }
}

impl InstrumentConfig {
    pub fn channel_count(&self) -> usize {
        self.channel_energies.len()
    }
}

/// Relative source contribution map of the collimator, in percent.
pub fn default_kernel() -> Vec<Vec<f64>> {
    const MRSC: [[u8; 11]; 11] = [
        [1, 1, 2, 6, 11, 17, 11, 6, 2, 1, 1],
        [1, 2, 4, 9, 15, 23, 15, 9, 4, 2, 1],
        [2, 4, 8, 15, 24, 34, 24, 15, 8, 4, 2],
        [6, 9, 15, 26, 40, 54, 40, 26, 15, 9, 6],
        [11, 15, 24, 40, 58, 77, 58, 40, 24, 15, 11],
        [17, 23, 34, 54, 77, 100, 77, 54, 34, 23, 17],
        [11, 15, 24, 40, 58, 77, 58, 40, 24, 15, 11],
        [6, 9, 15, 26, 40, 54, 40, 26, 15, 9, 6],
        [2, 4, 8, 15, 24, 34, 24, 15, 8, 4, 2],
        [1, 2, 4, 9, 15, 23, 15, 9, 4, 2, 1],
        [1, 1, 2, 6, 11, 17, 11, 6, 2, 1, 1],
    ];
    MRSC.iter()
        .map(|row| row.iter().map(|&w| f64::from(w)).collect())
        .collect()
}

/// Raster geometry and calibration settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkyMapConfig {
    /// Raster pixels per degree. The raster is `180 * scale` by `360 * scale`.
    pub scale: usize,
    /// Kernel weights, rows along declination and columns along right ascension.
    pub kernel: Vec<Vec<f64>>,
    /// Resample the kernel to the raster resolution before projecting.
    pub rescale_kernel: bool,
    /// Cells with less accumulated exposure are left at zero flux.
    pub min_exposure: f64,
    /// Largest output color value.
    pub color_max: u8,
    pub normalization: NormalizationPolicy,
    /// Apply histogram equalization after normalization.
    pub equalize: bool,
    /// Project samples whose value is zero (they still add exposure).
    pub project_empty_samples: bool,
    pub value_kind: ValueKind,
    /// Accumulate with thread-local partial rasters.
    pub parallel: bool,
}

impl Default for SkyMapConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            kernel: default_kernel(),
            rescale_kernel: true,
            min_exposure: 0.0,
            color_max: u8::MAX,
            normalization: NormalizationPolicy::PositiveOnly,
            equalize: true,
            project_empty_samples: true,
            value_kind: ValueKind::Energy,
            parallel: true,
        }
    }
}

impl SkyMapConfig {
    pub fn grid(&self) -> SkyGrid {
        SkyGrid::new(self.scale)
    }
}

/// Tile slicing of the final raster.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileConfig {
    /// Edge length of a tile, in whole degrees.
    pub tile_degrees: usize,
    /// Extra fraction added to the degrees-per-pixel ratio so adjacent tiles
    /// overlap when displayed.
    pub pixel_margin: f64,
    /// Raise pixels below 1 to 1, keeping 0 free as a transparency sentinel.
    pub floor_to_one: bool,
    /// Extract tiles on the rayon thread pool.
    pub parallel: bool,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_degrees: 8,
            pixel_margin: 0.1,
            floor_to_one: true,
            parallel: true,
        }
    }
}

/// Good-time-interval selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GtiConfig {
    /// Times are good while the solar angle `theta` exceeds this.
    pub sun_theta_threshold: Degrees,
    /// Additional fixed `(start, end)` intervals intersected with the solar GTIs.
    pub fixed: Vec<(f64, f64)>,
}

impl Default for GtiConfig {
    fn default() -> Self {
        Self {
            sun_theta_threshold: Degrees::new(15.0),
            fixed: Vec::new(),
        }
    }
}

/// Complete, immutable configuration of an all-sky map run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    pub instrument: InstrumentConfig,
    pub sky_map: SkyMapConfig,
    pub tiles: TileConfig,
    pub gti: GtiConfig,
}

impl PipelineConfig {
    /// Energy-rate flux map, normalized against the global maximum.
    pub fn energy() -> Self {
        Self::default()
    }

    /// Counts map: empty samples are skipped and normalization starts at the minimum.
    pub fn counts() -> Self {
        let mut config = Self::default();
        config.sky_map.value_kind = ValueKind::Counts;
        config.sky_map.normalization = NormalizationPolicy::ShiftByMinimum;
        config.sky_map.project_empty_samples = false;
        config
    }

    /// Checks table lengths, kernel shape and numeric ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let instrument = &self.instrument;
        if instrument.channel_energies.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if instrument.channel_energies.len() != instrument.background.len() {
            return Err(ConfigError::ChannelTableMismatch {
                energies: instrument.channel_energies.len(),
                background: instrument.background.len(),
            });
        }
        if !(instrument.integration_time.value() > 0.0) {
            return Err(invalid("integration_time", "must be positive"));
        }
        if !(instrument.field_of_view.value() > 0.0) {
            return Err(invalid("field_of_view", "must be positive"));
        }

        let sky = &self.sky_map;
        if sky.scale == 0 {
            return Err(invalid("scale", "must be at least 1"));
        }
        if sky.color_max == 0 {
            return Err(invalid("color_max", "must be at least 1"));
        }
        if sky.min_exposure.is_nan() || sky.min_exposure < 0.0 {
            return Err(invalid("min_exposure", "must be non-negative"));
        }
        validate_kernel(&sky.kernel)?;

        let tiles = &self.tiles;
        if tiles.tile_degrees == 0 || tiles.tile_degrees > 180 {
            return Err(invalid("tile_degrees", "must be between 1 and 180"));
        }
        if tiles.pixel_margin.is_nan() || tiles.pixel_margin < 0.0 {
            return Err(invalid("pixel_margin", "must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.to_string(),
    }
}

/// Checks that `kernel` is an odd-sized square of finite, non-negative weights.
pub fn validate_kernel(kernel: &[Vec<f64>]) -> Result<(), ConfigError> {
    let rows = kernel.len();
    if rows == 0 {
        return Err(ConfigError::KernelNotSquare { rows: 0, cols: 0 });
    }
    if let Some(row) = kernel.iter().find(|row| row.len() != rows) {
        return Err(ConfigError::KernelNotSquare {
            rows,
            cols: row.len(),
        });
    }
    if rows % 2 == 0 {
        return Err(ConfigError::KernelEvenSize(rows));
    }
    for (row, weights) in kernel.iter().enumerate() {
        if let Some(col) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::KernelInvalidWeight { row, col });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PipelineConfig::energy().validate().is_ok());
        assert!(PipelineConfig::counts().validate().is_ok());
    }

    #[test]
    fn counts_preset_differs_in_policy() {
        let counts = PipelineConfig::counts();
        assert_eq!(counts.sky_map.value_kind, ValueKind::Counts);
        assert_eq!(
            counts.sky_map.normalization,
            NormalizationPolicy::ShiftByMinimum
        );
        assert!(!counts.sky_map.project_empty_samples);
    }

    #[test]
    fn raster_dimensions_follow_scale() {
        let config = SkyMapConfig {
            scale: 2,
            ..SkyMapConfig::default()
        };
        assert_eq!(config.grid().dim(), (360, 720));
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let mut config = PipelineConfig::energy();
        config.instrument.background.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::ChannelTableMismatch {
                energies: 8,
                background: 7
            })
        );
    }

    #[test]
    fn even_kernel_is_rejected() {
        let mut config = PipelineConfig::energy();
        config.sky_map.kernel = vec![vec![1.0; 4]; 4];
        assert_eq!(config.validate(), Err(ConfigError::KernelEvenSize(4)));
    }

    #[test]
    fn ragged_kernel_is_rejected() {
        let kernel = vec![vec![1.0; 3], vec![1.0; 2], vec![1.0; 3]];
        assert!(matches!(
            validate_kernel(&kernel),
            Err(ConfigError::KernelNotSquare { rows: 3, cols: 2 })
        ));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let kernel = vec![vec![1.0, 1.0, 1.0], vec![1.0, -1.0, 1.0], vec![1.0, 1.0, 1.0]];
        assert_eq!(
            validate_kernel(&kernel),
            Err(ConfigError::KernelInvalidWeight { row: 1, col: 1 })
        );
    }

    #[test]
    fn zero_scale_is_rejected() {
        let mut config = PipelineConfig::energy();
        config.sky_map.scale = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { name: "scale", .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_json_round_trip() {
        let config = PipelineConfig::counts();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("shift_by_minimum"));
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
