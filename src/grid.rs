//! Geographic binning of listings into a fixed-resolution grid.

use serde::{Deserialize, Serialize};

/// Geographic rectangle used to map coordinates onto grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Area covered by the New York listings map.
    pub const NEW_YORK: BoundingBox = BoundingBox {
        min_lat: 40.49279,
        min_lon: -74.26442,
        max_lat: 40.91906,
        max_lon: -73.68299,
    };

    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Both spans are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let lat = self.lat_range();
        let lon = self.lon_range();
        lat.is_finite() && lon.is_finite() && lat > 0.0 && lon > 0.0
    }

    /// Check if a point lies inside the box, edges included.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::NEW_YORK
    }
}

/// Index of the bin holding `value` on an axis split into `bins` equal parts.
///
/// A value exactly at `max` lands in the last bin. Values outside `[min, max]`
/// (and NaN) have no bin.
fn axis_bin(value: f64, min: f64, max: f64, bins: usize) -> Option<usize> {
    if !(value >= min && value <= max) {
        return None;
    }
    let idx = ((value - min) / (max - min) * bins as f64).floor() as usize;
    Some(idx.min(bins - 1))
}

/// Dense `resolution × resolution` matrix, row-major, row = latitude bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    resolution: usize,
    values: Vec<f64>,
}

impl Grid {
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.resolution + col]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest cell value, or 0 for an all-zero grid.
    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }

    /// Iterate `(row, col, value)` over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.resolution;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / n, i % n, v))
    }
}

/// Per-cell sum and count of a metric over a bounding box.
#[derive(Debug, Clone)]
pub struct GridAccumulator {
    bbox: BoundingBox,
    resolution: usize,
    sums: Vec<f64>,
    counts: Vec<u64>,
    skipped: usize,
}

impl GridAccumulator {
    pub fn new(bbox: BoundingBox, resolution: usize) -> Self {
        debug_assert!(resolution > 0, "grid resolution must be non-zero");
        let resolution = resolution.max(1);
        Self {
            bbox,
            resolution,
            sums: vec![0.0; resolution * resolution],
            counts: vec![0; resolution * resolution],
            skipped: 0,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Grid cell `(row, col)` for a coordinate; row follows latitude, col longitude.
    pub fn cell_of(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let col = axis_bin(lon, self.bbox.min_lon, self.bbox.max_lon, self.resolution)?;
        let row = axis_bin(lat, self.bbox.min_lat, self.bbox.max_lat, self.resolution)?;
        Some((row, col))
    }

    /// Add one record. Returns false when the coordinate is outside the box.
    pub fn add(&mut self, lon: f64, lat: f64, value: f64) -> bool {
        match self.cell_of(lon, lat) {
            Some((row, col)) => {
                let idx = row * self.resolution + col;
                self.sums[idx] += value;
                self.counts[idx] += 1;
                true
            }
            None => {
                self.skipped += 1;
                false
            }
        }
    }

    pub fn sum(&self, row: usize, col: usize) -> f64 {
        self.sums[row * self.resolution + col]
    }

    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.resolution + col]
    }

    /// Records rejected because they fell outside the box.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of records accumulated into some cell.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Cell averages with the count clamped to at least 1; empty cells read 0.
    pub fn averages(&self) -> Grid {
        let values = self
            .sums
            .iter()
            .zip(&self.counts)
            .map(|(&sum, &count)| sum / count.max(1) as f64)
            .collect();
        Grid {
            resolution: self.resolution,
            values,
        }
    }

    /// Record counts per cell.
    pub fn counts(&self) -> Grid {
        Grid {
            resolution: self.resolution,
            values: self.counts.iter().map(|&c| c as f64).collect(),
        }
    }
}

/// Accumulate `metric` over parallel coordinate columns in one pass.
///
/// With `cap` set, only records whose metric is strictly below it are kept.
pub fn accumulate<I>(
    bbox: BoundingBox,
    resolution: usize,
    longitudes: &[f64],
    latitudes: &[f64],
    metric: I,
    cap: Option<f64>,
) -> GridAccumulator
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = GridAccumulator::new(bbox, resolution);
    for ((&lon, &lat), value) in longitudes.iter().zip(latitudes).zip(metric) {
        if cap.is_some_and(|cap| value >= cap) {
            continue;
        }
        acc.add(lon, lat, value);
    }
    acc
}
