// Library exports for listingviz

pub mod analysis;
pub mod config;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod grid;
pub mod palette;
pub mod runtime;
pub mod transform;

pub use analysis::{analyze, Analysis};
pub use config::AnalysisConfig;
pub use csv_reader::{load_listings, read_listings};
pub use data::Table;
pub use error::IngestError;

/// Pixel size of every rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
        }
    }
}
