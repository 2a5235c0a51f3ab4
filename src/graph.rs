use crate::config::HistogramSpec;
use crate::grid::{BoundingBox, Grid};
use crate::palette::{self, ColorPalette};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::f64::consts::PI;

/// Labelled values of one chart series.
pub type Series<'a, T> = (&'a str, &'a [T]);

/// Counts per equal-width bin over `spec.range`.
///
/// The last bin includes the upper edge; values outside the range are dropped.
pub fn histogram_counts(values: &[f64], spec: &HistogramSpec) -> Vec<usize> {
    let (lo, hi) = spec.range;
    let mut counts = vec![0usize; spec.bins];
    if spec.bins == 0 || !(hi > lo) {
        return counts;
    }
    let width = (hi - lo) / spec.bins as f64;
    for &v in values {
        if !(v >= lo && v <= hi) {
            continue;
        }
        let idx = (((v - lo) / width).floor() as usize).min(spec.bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Polygon outline of a pie wedge, angles in radians counter-clockwise from 3 o'clock.
pub fn wedge_points(center: (i32, i32), radius: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = (((end - start).abs() / (2.0 * PI)) * 180.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let angle = start + (end - start) * i as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

fn padded_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn category_label(categories: &[String], v: f64) -> String {
    if (v - v.round()).abs() > 1e-6 || v < -0.5 {
        return String::new();
    }
    categories.get(v.round() as usize).cloned().unwrap_or_default()
}

/// Single-chart drawing surface backed by an RGB buffer.
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    title: String,
}

impl Canvas {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            buffer: vec![0u8; (width * height * 3) as usize],
            width,
            height,
            title: title.into(),
        }
    }

    /// Horizontal bars of fractions, x axis formatted as percentages.
    pub fn draw_share_bars(&mut self, categories: &[String], shares: &[f64]) -> Result<()> {
        if categories.len() != shares.len() {
            anyhow::bail!(
                "Categories and values must have the same length (categories: {}, values: {})",
                categories.len(),
                shares.len()
            );
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let n = categories.len();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(140)
            .build_cartesian_2d(0.0..padded_max(shares.iter().copied()), -0.5..(n as f64 - 0.5))
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n.max(1))
            .y_label_formatter(&|y| category_label(categories, *y))
            .x_label_formatter(&|x| format!("{:.0}%", x * 100.0))
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(shares.iter().enumerate().map(|(idx, &share)| {
                let y = idx as f64;
                Rectangle::new([(0.0, y - 0.4), (share, y + 0.4)], palette::PRIMARY.filled())
            }))
            .context("Failed to draw bars")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Pie chart with percentage labels; `explode` offsets slices by a fraction of the radius.
    pub fn draw_pie(
        &mut self,
        labels: &[String],
        sizes: &[f64],
        explode: &[f64],
        colors: &ColorPalette,
    ) -> Result<()> {
        if labels.len() != sizes.len() || explode.len() != sizes.len() {
            anyhow::bail!("Pie labels, sizes and offsets must have the same length");
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        let area = root
            .titled(&self.title, ("sans-serif", 20))
            .context("Failed to draw title")?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.35;
        let total: f64 = sizes.iter().sum();
        if total <= 0.0 {
            anyhow::bail!("Cannot draw a pie chart with no data");
        }

        let centered = Pos::new(HPos::Center, VPos::Center);
        let label_style = TextStyle::from(("sans-serif", 15).into_font()).pos(centered);

        let mut start = 0.0;
        for (idx, (&size, &offset)) in sizes.iter().zip(explode).enumerate() {
            let sweep = size / total * 2.0 * PI;
            let mid = start + sweep / 2.0;
            let slice_center = polar(center, offset * radius, mid);

            area.draw(&Polygon::new(
                wedge_points(slice_center, radius, start, start + sweep),
                colors.get(idx).filled(),
            ))
            .context("Failed to draw pie slice")?;

            let pct = format!("{:.1}%", size / total * 100.0);
            area.draw(&Text::new(pct, polar(slice_center, radius * 0.8, mid), label_style.clone()))
                .context("Failed to draw slice percentage")?;
            area.draw(&Text::new(
                labels[idx].clone(),
                polar(slice_center, radius * 1.15, mid),
                label_style.clone(),
            ))
            .context("Failed to draw slice label")?;

            start += sweep;
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Two bars per category, each series on its own y axis (left and right).
    pub fn draw_dual_bars(
        &mut self,
        categories: &[String],
        left: Series<'_, f64>,
        right: Series<'_, f64>,
        x_desc: &str,
    ) -> Result<()> {
        if categories.len() != left.1.len() || categories.len() != right.1.len() {
            anyhow::bail!("Each series needs one value per category");
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let n = categories.len();
        let x_range = -0.5..(n as f64 - 0.5);
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(160)
            .y_label_area_size(60)
            .right_y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), 0.0..padded_max(left.1.iter().copied()))
            .context("Failed to build chart")?
            .set_secondary_coord(x_range, 0.0..padded_max(right.1.iter().copied()));

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|x| category_label(categories, *x))
            .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
            .x_desc(x_desc)
            .y_desc(left.0)
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .configure_secondary_axes()
            .y_desc(right.0)
            .draw()
            .context("Failed to draw secondary axis")?;

        chart
            .draw_series(left.1.iter().enumerate().map(|(idx, &v)| {
                let x = idx as f64;
                Rectangle::new([(x - 0.2, 0.0), (x, v)], palette::PRIMARY.filled())
            }))
            .context("Failed to draw left series")?;

        chart
            .draw_secondary_series(right.1.iter().enumerate().map(|(idx, &v)| {
                let x = idx as f64;
                Rectangle::new([(x, 0.0), (x + 0.2, v)], palette::SECONDARY.filled())
            }))
            .context("Failed to draw right series")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Histogram with one stacked layer per group.
    pub fn draw_stacked_histogram(
        &mut self,
        groups: &[(String, Vec<f64>)],
        spec: &HistogramSpec,
        colors: &ColorPalette,
        x_desc: &str,
        y_desc: &str,
    ) -> Result<()> {
        let counts: Vec<Vec<usize>> = groups
            .iter()
            .map(|(_, values)| histogram_counts(values, spec))
            .collect();
        let stack_heights: Vec<f64> = (0..spec.bins)
            .map(|b| counts.iter().map(|c| c[b] as f64).sum())
            .collect();

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let (lo, hi) = spec.range;
        let width = (hi - lo) / spec.bins as f64;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0.0..padded_max(stack_heights.iter().copied()))
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .context("Failed to draw mesh")?;

        let mut base = vec![0.0; spec.bins];
        for (idx, ((name, _), group_counts)) in groups.iter().zip(&counts).enumerate() {
            let color = colors.get(idx);
            let mut bars = Vec::with_capacity(spec.bins);
            for (b, &count) in group_counts.iter().enumerate() {
                let x0 = lo + b as f64 * width;
                let top = base[b] + count as f64;
                bars.push(Rectangle::new([(x0, base[b]), (x0 + width, top)], color.filled()));
                base[b] = top;
            }
            chart
                .draw_series(bars)
                .context("Failed to draw histogram layer")?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .context("Failed to draw legend")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Scatter of `(longitude, latitude)` points, one color per group.
    pub fn draw_scatter(
        &mut self,
        groups: &[(String, Vec<(f64, f64)>)],
        bbox: &BoundingBox,
        colors: &ColorPalette,
    ) -> Result<()> {
        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(bbox.min_lon..bbox.max_lon, bbox.min_lat..bbox.max_lat)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .context("Failed to draw mesh")?;

        for (idx, (name, points)) in groups.iter().enumerate() {
            let color = colors.get(idx);
            chart
                .draw_series(
                    points
                        .iter()
                        .filter(|&&(lon, lat)| bbox.contains(lon, lat))
                        .map(|&(lon, lat)| Circle::new((lon, lat), 1, color.filled())),
                )
                .context("Failed to draw point series")?
                .label(name.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .context("Failed to draw legend")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Grid cells over the bounding box colored by value, with a color bar.
    pub fn draw_heatmap(&mut self, grid: &Grid, bbox: &BoundingBox) -> Result<()> {
        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        let area = root
            .titled(&self.title, ("sans-serif", 20))
            .context("Failed to draw title")?;
        let (map_area, bar_area) = area.split_horizontally(self.width.saturating_sub(100));

        let max = grid.max();
        let scale = if max > 0.0 { max } else { 1.0 };
        let n = grid.resolution() as f64;
        let dlon = bbox.lon_range() / n;
        let dlat = bbox.lat_range() / n;

        let mut chart = ChartBuilder::on(&map_area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(bbox.min_lon..bbox.max_lon, bbox.min_lat..bbox.max_lat)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(grid.cells().map(|(row, col, v)| {
                let lon = bbox.min_lon + col as f64 * dlon;
                let lat = bbox.min_lat + row as f64 * dlat;
                Rectangle::new(
                    [(lon, lat), (lon + dlon, lat + dlat)],
                    palette::heat_color(v / scale).filled(),
                )
            }))
            .context("Failed to draw heatmap cells")?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(10)
            .margin_top(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..1.0, 0.0..scale)
            .context("Failed to build color bar")?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .draw()
            .context("Failed to draw color bar axis")?;

        let steps = 64;
        bar.draw_series((0..steps).map(|i| {
            let y0 = scale * i as f64 / steps as f64;
            let y1 = scale * (i + 1) as f64 / steps as f64;
            Rectangle::new(
                [(0.0, y0), (1.0, y1)],
                palette::heat_color(i as f64 / (steps - 1) as f64).filled(),
            )
        }))
        .context("Failed to draw color bar")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Finalize and encode the canvas as PNG
    pub fn render(self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(
                    &self.buffer,
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                )
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_edges() {
        let spec = HistogramSpec { bins: 5, range: (0.0, 500.0) };
        let counts = histogram_counts(&[0.0, 99.9, 100.0, 499.0, 500.0, 501.0, -1.0], &spec);
        assert_eq!(counts, vec![2, 1, 0, 0, 2]);
    }

    #[test]
    fn test_histogram_counts_total_within_range() {
        let spec = HistogramSpec { bins: 20, range: (1.0, 21.0) };
        let values: Vec<f64> = (0..40).map(|v| v as f64).collect();
        let counts = histogram_counts(&values, &spec);
        assert_eq!(counts.iter().sum::<usize>(), 21);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[19], 2);
    }

    #[test]
    fn test_wedge_points_quarter() {
        let points = wedge_points((100, 100), 50.0, 0.0, PI / 2.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (100, 50));
    }

    #[test]
    fn test_category_label() {
        let cats = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&cats, 1.0), "b");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn test_padded_max() {
        assert_eq!(padded_max(vec![0.0, 0.0]), 1.0);
        assert!((padded_max(vec![10.0, 20.0]) - 21.0).abs() < 1e-9);
    }
}
