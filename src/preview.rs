//! Raster/vector preview of a plot specification.
//!
//! This is not the production renderer: it draws enough of a specification
//! (one panel per axis pair, markers, binned density) to eyeball a result
//! from the command line.

use crate::color::parse_hex_color;
use crate::ir::{Layout, PlotSpec, Trace};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Bins per axis of the density heat map.
pub const DENSITY_BINS: usize = 20;

/// Largest preview side, in pixels.
pub const MAX_PREVIEW_SIDE: u32 = 8192;

/// Render `spec` in the requested format. The layout's pinned size wins
/// over `options`.
pub fn render_preview(spec: &PlotSpec, options: &RenderOptions) -> Result<Vec<u8>> {
    let width = spec.layout.width.unwrap_or(options.width);
    let height = spec.layout.height.unwrap_or(options.height);
    if width == 0 || height == 0 {
        anyhow::bail!("Cannot render a {}x{} preview", width, height);
    }
    if width > MAX_PREVIEW_SIDE || height > MAX_PREVIEW_SIDE {
        anyhow::bail!(
            "Preview of {}x{} exceeds the {}x{} limit",
            width,
            height,
            MAX_PREVIEW_SIDE,
            MAX_PREVIEW_SIDE
        );
    }

    match options.format {
        OutputFormat::Png => render_png(spec, width, height),
        OutputFormat::Svg => render_svg(spec, width, height),
    }
}

fn render_png(spec: &PlotSpec, width: u32, height: u32) -> Result<Vec<u8>> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Preview of {}x{} is too large", width, height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_spec(root, spec)?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(spec: &PlotSpec, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_spec(root, spec)?;
    }
    Ok(svg.into_bytes())
}

fn draw_spec<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, spec: &PlotSpec) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let background = to_rgb(&spec.layout.paper_bgcolor, WHITE);
    root.fill(&background).context("Failed to fill background")?;

    let grid = &spec.layout.grid;
    if grid.rows > 0 && grid.columns > 0 && !spec.data.is_empty() {
        let areas = root.split_evenly((grid.rows, grid.columns));
        for (cell, area) in areas.iter().enumerate() {
            let traces: Vec<&Trace> = spec
                .data
                .iter()
                .filter(|t| panel_index(t.axes().0) == Some(cell))
                .collect();
            if !traces.is_empty() {
                draw_panel(area, &traces, &spec.layout)?;
            }
        }
    }

    root.present().context("Failed to present drawing")?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, traces: &[&Trace], layout: &Layout) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let all_points: Vec<(f64, f64)> = traces.iter().flat_map(|t| numeric_points(t)).collect();
    let Some((x_range, y_range)) = data_ranges(&all_points) else {
        return Ok(());
    };

    let text = to_rgb(&layout.font.color, BLACK);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_desc(layout.xaxis.title.text.clone())
        .y_desc(layout.yaxis.title.text.clone())
        .label_style(("sans-serif", 12).into_font().color(&text))
        .axis_desc_style(("sans-serif", 12).into_font().color(&text))
        .axis_style(&text)
        .draw()
        .context("Failed to draw mesh")?;

    for trace in traces {
        let points = numeric_points(trace);
        match trace {
            Trace::Contour(_) => {
                let bins = density_bins(&points, &x_range, &y_range, DENSITY_BINS);
                let max = bins.iter().flatten().copied().max().unwrap_or(0);
                if max == 0 {
                    continue;
                }
                let (x_start, y_start) = (x_range.start, y_range.start);
                let bin_w = (x_range.end - x_start) / DENSITY_BINS as f64;
                let bin_h = (y_range.end - y_start) / DENSITY_BINS as f64;
                let cells = bins.iter().enumerate().flat_map(|(bx, column)| {
                    column.iter().enumerate().filter(|&(_, &count)| count > 0).map(move |(by, &count)| {
                        let x0 = x_start + bx as f64 * bin_w;
                        let y0 = y_start + by as f64 * bin_h;
                        let color = hot_reversed(count as f64 / max as f64);
                        Rectangle::new([(x0, y0), (x0 + bin_w, y0 + bin_h)], color.mix(0.8).filled())
                    })
                });
                chart.draw_series(cells).context("Failed to draw density")?;
            }
            Trace::Scatter(s) => {
                let color = to_rgb(&s.marker.color, BLUE);
                let radius = (s.marker.size / 2).max(1) as i32;
                let opacity = s.marker.opacity;
                chart
                    .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), radius, color.mix(opacity).filled())))
                    .context("Failed to draw point series")?;
            }
        }
    }

    Ok(())
}

/// Grid cell of an axis id: `x` is cell 0, `x{n}` is cell `n - 1`.
fn panel_index(axis: &str) -> Option<usize> {
    let suffix = axis.strip_prefix('x')?;
    if suffix.is_empty() {
        return Some(0);
    }
    match suffix.parse::<usize>() {
        Ok(n) if n >= 2 => Some(n - 1),
        _ => None,
    }
}

/// Pairs where both coordinates are numbers.
fn numeric_points(trace: &Trace) -> Vec<(f64, f64)> {
    trace
        .x()
        .iter()
        .zip(trace.y())
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect()
}

/// Padded x and y ranges of `points`, or `None` when there are none.
fn data_ranges(points: &[(f64, f64)]) -> Option<(Range<f64>, Range<f64>)> {
    if points.is_empty() {
        return None;
    }
    let (x_min, x_max) = extent(points.iter().map(|p| p.0));
    let (y_min, y_max) = extent(points.iter().map(|p| p.1));
    Some((pad(x_min, x_max), pad(y_min, y_max)))
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn pad(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Count points into `n x n` bins, indexed `[x_bin][y_bin]`.
fn density_bins(points: &[(f64, f64)], x_range: &Range<f64>, y_range: &Range<f64>, n: usize) -> Vec<Vec<usize>> {
    let mut bins = vec![vec![0usize; n]; n];
    let bin_of = |v: f64, range: &Range<f64>| {
        let t = (v - range.start) / (range.end - range.start);
        ((t * n as f64).floor().max(0.0) as usize).min(n - 1)
    };
    for &(x, y) in points {
        bins[bin_of(x, x_range)][bin_of(y, y_range)] += 1;
    }
    bins
}

/// Reversed "Hot" colorscale: sparse is pale, dense is dark.
fn hot_reversed(t: f64) -> RGBColor {
    const STOPS: [(f64, (f64, f64, f64)); 4] = [
        (0.0, (0.0, 0.0, 0.0)),
        (0.3, (230.0, 0.0, 0.0)),
        (0.6, (255.0, 210.0, 0.0)),
        (1.0, (255.0, 255.0, 255.0)),
    ];
    let v = (1.0 - t).clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (lo, c0) = pair[0];
        let (hi, c1) = pair[1];
        if v <= hi {
            let f = (v - lo) / (hi - lo);
            let lerp = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    WHITE
}

fn to_rgb(color: &str, fallback: RGBColor) -> RGBColor {
    parse_hex_color(color)
        .map(|c| RGBColor(c.r, c.g, c.b))
        .unwrap_or(fallback)
}
