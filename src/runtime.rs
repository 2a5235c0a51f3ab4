// Runtime executor: load listings, derive chart data, render every chart

use crate::analysis::{self, Analysis};
use crate::config::AnalysisConfig;
use crate::csv_reader;
use crate::graph::Canvas;
use crate::palette::ColorPalette;
use crate::transform;
use crate::RenderOptions;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Slice pulled out of the neighbourhood group pie chart.
const HIGHLIGHTED_GROUP: &str = "Manhattan";

/// Charts produced by a run, in drawing order, with their file names.
pub const CHARTS: [Chart; 9] = [
    Chart::RoomTypes,
    Chart::NeighbourhoodGroups,
    Chart::PopularNeighbourhoods,
    Chart::PriceHistogram,
    Chart::PriceHeatmap,
    Chart::Locations,
    Chart::DensityHeatmap,
    Chart::MinimumNights,
    Chart::ReviewsHeatmap,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    RoomTypes,
    NeighbourhoodGroups,
    PopularNeighbourhoods,
    PriceHistogram,
    PriceHeatmap,
    Locations,
    DensityHeatmap,
    MinimumNights,
    ReviewsHeatmap,
}

impl Chart {
    pub fn file_name(self) -> &'static str {
        match self {
            Chart::RoomTypes => "room_types.png",
            Chart::NeighbourhoodGroups => "neighbourhood_groups.png",
            Chart::PopularNeighbourhoods => "popular_neighbourhoods.png",
            Chart::PriceHistogram => "price_histogram.png",
            Chart::PriceHeatmap => "price_heatmap.png",
            Chart::Locations => "locations.png",
            Chart::DensityHeatmap => "density_heatmap.png",
            Chart::MinimumNights => "minimum_nights.png",
            Chart::ReviewsHeatmap => "reviews_heatmap.png",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Chart::RoomTypes => "Distribution of Room Types",
            Chart::NeighbourhoodGroups => "Distribution of Neighbourhood Groups",
            Chart::PopularNeighbourhoods => "Most Popular Neighbourhoods and Average Price",
            Chart::PriceHistogram => "Distribution of Price per Night",
            Chart::PriceHeatmap => "Average Price per Night Heatmap",
            Chart::Locations => "Plot of Housing Locations",
            Chart::DensityHeatmap => "Heatmap of Housing Locations",
            Chart::MinimumNights => "Minimum Number of Nights Required",
            Chart::ReviewsHeatmap => "Average Number of Reviews Heatmap",
        }
    }
}

/// Load the listings at `input` and write every chart into `output_dir`.
///
/// Returns the computed analysis so the caller can report the summary.
pub fn run(input: &Path, output_dir: &Path, config: &AnalysisConfig) -> Result<Analysis> {
    let table = csv_reader::load_listings(input)
        .with_context(|| format!("Failed to load listings from '{}'", input.display()))?;
    info!(rows = table.len(), path = %input.display(), "loaded listings");

    if table.is_empty() {
        anyhow::bail!("Listings file must contain at least one data row");
    }

    let analysis = analysis::analyze(&table, config).context("Failed to analyze listings")?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory '{}'", output_dir.display())
    })?;
    let written = render_charts(&analysis, config, &RenderOptions::default(), output_dir)?;
    info!(charts = written.len(), dir = %output_dir.display(), "wrote charts");

    Ok(analysis)
}

/// Render every chart in [`CHARTS`] and write them as PNG files.
pub fn render_charts(
    analysis: &Analysis,
    config: &AnalysisConfig,
    options: &RenderOptions,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(CHARTS.len());
    for chart in CHARTS {
        let png = render_chart(chart, analysis, config, options)
            .with_context(|| format!("Failed to render '{}'", chart.title()))?;
        let path = output_dir.join(chart.file_name());
        fs::write(&path, &png)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        debug!(path = %path.display(), bytes = png.len(), "wrote chart");
        written.push(path);
    }
    Ok(written)
}

/// Render one chart to PNG bytes.
pub fn render_chart(
    chart: Chart,
    analysis: &Analysis,
    config: &AnalysisConfig,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(options.width, options.height, chart.title());
    let groups = ColorPalette::groups();

    match chart {
        Chart::RoomTypes => {
            let names = category_names(&analysis.room_types);
            canvas.draw_share_bars(&names, &transform::shares(&analysis.room_types))?;
        }
        Chart::NeighbourhoodGroups => {
            let names = category_names(&analysis.neighbourhood_groups);
            let sizes: Vec<f64> = analysis
                .neighbourhood_groups
                .iter()
                .map(|c| c.count as f64)
                .collect();
            canvas.draw_pie(&names, &sizes, &explode_offsets(&names), &groups)?;
        }
        Chart::PopularNeighbourhoods => {
            let ranked = &analysis.popular_neighbourhoods;
            let names: Vec<String> = ranked.iter().map(|r| r.category.clone()).collect();
            let counts: Vec<f64> = ranked.iter().map(|r| r.count as f64).collect();
            let averages: Vec<f64> = ranked.iter().map(|r| r.average).collect();
            canvas.draw_dual_bars(
                &names,
                ("Number of places (blue)", counts.as_slice()),
                ("Average price (orange)", averages.as_slice()),
                "Neighbourhood",
            )?;
        }
        Chart::PriceHistogram => {
            canvas.draw_stacked_histogram(
                &analysis.prices_by_group,
                &config.price_histogram,
                &groups,
                "Price range (USD)",
                "Number of places",
            )?;
        }
        Chart::MinimumNights => {
            canvas.draw_stacked_histogram(
                &analysis.minimum_nights_by_group,
                &config.minimum_nights_histogram,
                &groups,
                "Minimum Nights",
                "Number of Places",
            )?;
        }
        Chart::Locations => {
            canvas.draw_scatter(&analysis.locations_by_group, &config.bbox, &groups)?;
        }
        Chart::PriceHeatmap => canvas.draw_heatmap(&analysis.price_heatmap, &config.bbox)?,
        Chart::DensityHeatmap => canvas.draw_heatmap(&analysis.density_heatmap, &config.bbox)?,
        Chart::ReviewsHeatmap => canvas.draw_heatmap(&analysis.reviews_heatmap, &config.bbox)?,
    }

    canvas.render()
}

fn category_names(counts: &[transform::CategoryCount]) -> Vec<String> {
    counts.iter().map(|c| c.category.clone()).collect()
}

/// Pie offsets: the highlighted group is pulled out, the rest stay in place.
fn explode_offsets(names: &[String]) -> Vec<f64> {
    names
        .iter()
        .map(|n| if n == HIGHLIGHTED_GROUP { 0.1 } else { 0.0 })
        .collect()
}
