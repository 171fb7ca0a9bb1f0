//! Slicing of the final image into fixed-size sky tiles.

use log::{debug, warn};
use ndarray::{s, Array2};
use rayon::prelude::*;

use super::raster::SkyGrid;
use crate::config::TileConfig;

/// Pixel summary of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStats {
    /// Truncated mean.
    pub average: u8,
    pub min: u8,
    pub max: u8,
}

impl TileStats {
    fn of(pixels: &Array2<u8>) -> Self {
        let (mut min, mut max, mut sum) = (u8::MAX, u8::MIN, 0u64);
        for &v in pixels {
            min = min.min(v);
            max = max.max(v);
            sum += u64::from(v);
        }
        let n = pixels.len() as u64;
        if n == 0 {
            return Self {
                average: 0,
                min: 0,
                max: 0,
            };
        }
        Self {
            average: (sum / n) as u8,
            min,
            max,
        }
    }
}

/// One exported tile with the metadata a FITS writer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    /// Declination of the tile's first row, in degrees (`-90..90`).
    pub dec_origin: i32,
    /// Right ascension of the tile's first column, in degrees (`0..360`).
    pub ra_origin: u32,
    pub degrees_per_pixel: f64,
    pub stats: TileStats,
    pub pixels: Array2<u8>,
}

impl TileDescriptor {
    /// Deterministic output name built from origin and statistics.
    pub fn file_stem(&self) -> String {
        format!(
            "fits_{}_{}_{}_{}_{}",
            self.dec_origin, self.ra_origin, self.stats.average, self.stats.min, self.stats.max
        )
    }
}

/// Top-left `(row, col)` pixel of every tile, row-major.
fn tile_origins(grid: SkyGrid, tile_degrees: usize) -> Vec<(usize, usize)> {
    let step = tile_degrees * grid.scale();
    let (height, width) = grid.dim();
    (0..height)
        .step_by(step)
        .flat_map(|row| (0..width).step_by(step).map(move |col| (row, col)))
        .collect()
}

/// Cuts `image` into tiles of `config.tile_degrees` on a regular grid.
///
/// Tiles do not overlap; those on the last row or column are cut short at
/// the image edge when the tile size does not divide the sky. A zero tile
/// size or grid scale yields no tiles.
pub fn export_tiles(
    image: &Array2<u8>,
    grid: SkyGrid,
    config: &TileConfig,
) -> Vec<TileDescriptor> {
    let step = config.tile_degrees * grid.scale();
    if step == 0 {
        warn!(
            "Tile size {} degrees at scale {} is empty; no tiles exported",
            config.tile_degrees,
            grid.scale()
        );
        return Vec::new();
    }
    let origins = tile_origins(grid, config.tile_degrees);
    let degrees_per_pixel = (1.0 + config.pixel_margin) / grid.scale() as f64;
    let (height, width) = image.dim();

    let cut = |&(row, col): &(usize, usize)| {
        let rows = row..(row + step).min(height);
        let cols = col..(col + step).min(width);
        let view = image.slice(s![rows, cols]);
        let pixels = if config.floor_to_one {
            view.mapv(|v| v.max(1))
        } else {
            view.to_owned()
        };
        TileDescriptor {
            dec_origin: (row / grid.scale()) as i32 - 90,
            ra_origin: (col / grid.scale()) as u32,
            degrees_per_pixel,
            stats: TileStats::of(&pixels),
            pixels,
        }
    };

    debug!(
        "Exporting {} tiles of {} degrees ({} px)",
        origins.len(),
        config.tile_degrees,
        step
    );
    if config.parallel {
        origins.par_iter().map(cut).collect()
    } else {
        origins.iter().map(cut).collect()
    }
}
