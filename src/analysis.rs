//! All chart inputs derived from one listings table.

use crate::config::AnalysisConfig;
use crate::data::{field, Table};
use crate::error::Result;
use crate::grid::{self, Grid};
use crate::transform::{self, CategoryCount, RankedCategory};
use tracing::debug;

/// Values of one neighbourhood group, in group order.
pub type Grouped<T> = Vec<(String, Vec<T>)>;

/// Derived views backing every chart plus the printed summary.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub record_count: usize,
    /// `None` when the table has no rows.
    pub average_price: Option<f64>,
    pub room_types: Vec<CategoryCount>,
    pub neighbourhood_groups: Vec<CategoryCount>,
    pub popular_neighbourhoods: Vec<RankedCategory>,
    pub prices_by_group: Grouped<f64>,
    pub minimum_nights_by_group: Grouped<f64>,
    /// `(longitude, latitude)` points per group.
    pub locations_by_group: Grouped<(f64, f64)>,
    pub price_heatmap: Grid,
    pub density_heatmap: Grid,
    pub reviews_heatmap: Grid,
}

/// Compute every derived view in a read-only pass over `table`.
pub fn analyze(table: &Table, config: &AnalysisConfig) -> Result<Analysis> {
    let groups = table.str_column(field::NEIGHBOURHOOD_GROUP)?;
    let neighbourhoods = table.str_column(field::NEIGHBOURHOOD)?;
    let room_types = table.str_column(field::ROOM_TYPE)?;
    let latitudes = table.float_column(field::LATITUDE)?;
    let longitudes = table.float_column(field::LONGITUDE)?;
    let prices = transform::to_f64(table.int_column(field::PRICE)?);
    let minimum_nights = transform::to_f64(table.int_column(field::MINIMUM_NIGHTS)?);
    let reviews = transform::to_f64(table.int_column(field::NUMBER_OF_REVIEWS)?);

    let locations: Vec<(f64, f64)> = longitudes.iter().copied().zip(latitudes.iter().copied()).collect();

    let price_acc = grid::accumulate(
        config.bbox,
        config.grid_resolution,
        longitudes,
        latitudes,
        prices.iter().copied(),
        Some(config.price_cap),
    );
    let density_acc = grid::accumulate(
        config.bbox,
        config.grid_resolution,
        longitudes,
        latitudes,
        std::iter::repeat(1.0),
        None,
    );
    let reviews_acc = grid::accumulate(
        config.bbox,
        config.grid_resolution,
        longitudes,
        latitudes,
        reviews.iter().copied(),
        None,
    );
    debug!(
        binned = density_acc.total(),
        outside_bbox = density_acc.skipped(),
        priced = price_acc.total(),
        "accumulated heatmap grids"
    );

    Ok(Analysis {
        record_count: table.len(),
        average_price: transform::mean(&prices),
        room_types: transform::frequency_count(room_types),
        neighbourhood_groups: transform::frequency_count(groups),
        popular_neighbourhoods: transform::top_k_with_average(neighbourhoods, &prices, config.top_k),
        prices_by_group: transform::group_values(groups, &prices),
        minimum_nights_by_group: transform::group_values(groups, &minimum_nights),
        locations_by_group: transform::group_values(groups, &locations),
        price_heatmap: price_acc.averages(),
        density_heatmap: density_acc.counts(),
        reviews_heatmap: reviews_acc.averages(),
    })
}

impl Analysis {
    /// Console line for the average nightly price.
    pub fn summary(&self) -> String {
        match self.average_price {
            Some(avg) => format!("Average price: ${:.2} per night", avg),
            None => "Average price: n/a (no listings)".to_string(),
        }
    }
}
