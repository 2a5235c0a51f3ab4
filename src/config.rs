use crate::grid::BoundingBox;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Equal-width binning for a histogram chart.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HistogramSpec {
    pub bins: usize,
    pub range: (f64, f64),
}

/// Analysis parameters. Every field has a default, so an empty JSON object is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Prices at or above this are left out of the price heatmap.
    #[serde(default = "default_price_cap")]
    pub price_cap: f64,
    #[serde(default = "default_price_histogram")]
    pub price_histogram: HistogramSpec,
    #[serde(default = "default_minimum_nights_histogram")]
    pub minimum_nights_histogram: HistogramSpec,
}

fn default_grid_resolution() -> usize { 150 }
fn default_top_k() -> usize { 20 }
fn default_price_cap() -> f64 { 500.0 }
fn default_price_histogram() -> HistogramSpec { HistogramSpec { bins: 25, range: (0.0, 500.0) } }
fn default_minimum_nights_histogram() -> HistogramSpec { HistogramSpec { bins: 20, range: (1.0, 21.0) } }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::default(),
            grid_resolution: default_grid_resolution(),
            top_k: default_top_k(),
            price_cap: default_price_cap(),
            price_histogram: default_price_histogram(),
            minimum_nights_histogram: default_minimum_nights_histogram(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).context("Invalid configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bbox.is_valid() {
            bail!("Bounding box must have a positive latitude and longitude span");
        }
        if self.grid_resolution == 0 {
            bail!("grid_resolution must be at least 1");
        }
        if self.top_k == 0 {
            bail!("top_k must be at least 1");
        }
        check_histogram("price_histogram", &self.price_histogram)?;
        check_histogram("minimum_nights_histogram", &self.minimum_nights_histogram)?;
        Ok(())
    }
}

fn check_histogram(name: &str, spec: &HistogramSpec) -> Result<()> {
    if spec.bins == 0 {
        bail!("{}: bins must be at least 1", name);
    }
    let (lo, hi) = spec.range;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        bail!("{}: range ({}, {}) is empty", name, lo, hi);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.grid_resolution, 150);
        assert_eq!(config.top_k, 20);
        assert_eq!(config.price_histogram.range, (0.0, 500.0));
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_json_str(
            r#"{"grid_resolution": 50, "price_histogram": {"bins": 10, "range": [0, 250]}}"#,
        )
        .unwrap();
        assert_eq!(config.grid_resolution, 50);
        assert_eq!(config.price_histogram.bins, 10);
        assert_eq!(config.price_histogram.range, (0.0, 250.0));
        assert_eq!(config.top_k, 20);
    }

    #[test]
    fn test_bbox_override() {
        let config = AnalysisConfig::from_json_str(
            r#"{"bbox": {"min_lat": 0.0, "min_lon": 0.0, "max_lat": 1.0, "max_lon": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(config.bbox.lon_range(), 2.0);
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let err = AnalysisConfig::from_json_str(r#"{"grid_resolution": 0}"#).unwrap_err();
        assert!(err.to_string().contains("grid_resolution"));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = AnalysisConfig::from_json_str(
            r#"{"minimum_nights_histogram": {"bins": 5, "range": [10, 1]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_rejects_degenerate_bbox() {
        let err = AnalysisConfig::from_json_str(
            r#"{"bbox": {"min_lat": 1.0, "min_lon": 0.0, "max_lat": 1.0, "max_lon": 2.0}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Bounding box"));
    }

    #[test]
    fn test_malformed_json() {
        let err = AnalysisConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration JSON"));
    }
}
