//! Per-cell time series on a coarse sky grid.

use std::collections::BTreeMap;

use crate::observation::TrackPoint;

/// Values recorded in one coarse cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellSeries {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    /// Every track point that fell in the cell, including rejected ones.
    pub observations: usize,
}

impl CellSeries {
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation of the recorded values.
    pub fn std_dev(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / self.values.len() as f64;
        var.sqrt()
    }
}

/// Coarse grid of cell series keyed by `(row, col)`, row 0 at the south pole.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityMap {
    pub cell_degrees: f64,
    pub cells: BTreeMap<(usize, usize), CellSeries>,
}

impl VariabilityMap {
    /// Sky coordinates `(ra, dec)` of a cell's lower corner, in degrees.
    pub fn cell_origin(&self, (row, col): (usize, usize)) -> (f64, f64) {
        (
            col as f64 * self.cell_degrees,
            row as f64 * self.cell_degrees - 90.0,
        )
    }
}

/// Groups track values by coarse cell.
///
/// Values above `min_value` are appended to their cell's series; every point
/// is counted as an observation. Cells whose mean stays below `min_value`
/// are dropped.
pub fn pixel_variability(
    track: &[TrackPoint],
    cell_degrees: f64,
    min_value: f64,
) -> VariabilityMap {
    let rows = (180.0 / cell_degrees).ceil().max(1.0) as usize;
    let cols = (360.0 / cell_degrees).ceil().max(1.0) as usize;
    let mut cells: BTreeMap<(usize, usize), CellSeries> = BTreeMap::new();
    for point in track {
        let dec = point.position.dec.value() + 90.0;
        let ra = point.position.ra.value().rem_euclid(360.0);
        let row = ((dec / cell_degrees).floor().max(0.0) as usize).min(rows - 1);
        let col = ((ra / cell_degrees).floor() as usize).min(cols - 1);
        let cell = cells.entry((row, col)).or_default();
        cell.observations += 1;
        if point.value > min_value {
            cell.times.push(point.time.value());
            cell.values.push(point.value);
        }
    }
    cells.retain(|_, cell| !cell.values.is_empty() && cell.mean() >= min_value);
    VariabilityMap {
        cell_degrees,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attitude::SkyPosition;
    use crate::units::{Degrees, Seconds};
    use approx::assert_relative_eq;

    fn point(time: f64, value: f64, ra: f64, dec: f64) -> TrackPoint {
        TrackPoint {
            time: Seconds::new(time),
            value,
            position: SkyPosition::new(Degrees::new(ra), Degrees::new(dec)),
        }
    }

    #[test]
    fn values_are_grouped_by_cell() {
        let track = [
            point(0.0, 4.0, 1.0, -89.0),
            point(1.0, 6.0, 4.0, -86.0),
            point(2.0, 0.5, 2.0, -88.0),
            point(3.0, 9.0, 12.0, 0.0),
        ];
        let map = pixel_variability(&track, 5.0, 1.0);
        assert_eq!(map.cells.len(), 2);
        let polar = &map.cells[&(0, 0)];
        assert_eq!(polar.values, vec![4.0, 6.0]);
        assert_eq!(polar.times, vec![0.0, 1.0]);
        assert_eq!(polar.observations, 3);
        assert_relative_eq!(polar.mean(), 5.0);
        assert_relative_eq!(polar.std_dev(), 1.0);
        assert!(map.cells.contains_key(&(18, 2)));
        assert_eq!(map.cell_origin((18, 2)), (10.0, 0.0));
    }

    #[test]
    fn cells_without_signal_are_dropped() {
        let track = [point(0.0, 0.0, 100.0, 10.0), point(1.0, 0.2, 100.5, 10.5)];
        let map = pixel_variability(&track, 5.0, 1.0);
        assert!(map.cells.is_empty());
    }

    #[test]
    fn edge_coordinates_stay_on_grid() {
        let track = [point(0.0, 5.0, 360.0, 90.0), point(1.0, 5.0, -1.0, -90.0)];
        let map = pixel_variability(&track, 10.0, 1.0);
        assert!(map.cells.contains_key(&(17, 0)));
        assert!(map.cells.contains_key(&(0, 35)));
    }
}
