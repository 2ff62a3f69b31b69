//! Chart export to PNG (plotters bitmap backend).

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::{Path, PathBuf};

use crate::chart::{format_axis_label, ChartSpec, SERIES_RGB};
use crate::cli::ChartType;

/// Slice colors of the pie export, cycled per column.
const PIE_RGB: [(u8, u8, u8); 8] = [
    (220, 38, 38),
    (234, 88, 12),
    (239, 68, 68),
    (245, 101, 101),
    (153, 27, 27),
    (251, 146, 60),
    (185, 28, 28),
    (254, 202, 202),
];

/// `<dir>/thinkboard_chart_<timestamp>.png`
pub fn export_file_name(dir: &Path, now: chrono::DateTime<chrono::Local>) -> PathBuf {
    dir.join(format!(
        "thinkboard_chart_{}.png",
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Write the chart to a PNG of `(width, height)` pixels.
pub fn write_chart_png(path: &Path, spec: &ChartSpec, (width, height): (u32, u32)) -> Result<()> {
    if spec.is_empty() {
        return Err(eyre!("No data to export"));
    }

    match spec.chart_type {
        ChartType::Pie => write_pie_png(path, spec, (width, height)),
        ChartType::Bar | ChartType::Line => write_xy_png(path, spec, (width, height)),
    }
}

fn write_xy_png(path: &Path, spec: &ChartSpec, (width, height): (u32, u32)) -> Result<()> {
    use plotters::prelude::*;

    let (y_min, y_max) = spec
        .value_bounds()
        .ok_or_else(|| eyre!("No data to export"))?;
    let n = spec.labels.len() as f64;
    let (x_min, x_max) = (0.5, n + 0.5);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(spec.title.as_str(), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let labels = spec.labels.clone();
    let x_formatter = move |v: &f64| {
        let idx = v.round() as i64 - 1;
        if (v - v.round()).abs() < 1e-6 && idx >= 0 {
            labels.get(idx as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };
    let y_formatter = |v: &f64| format_axis_label(*v);
    chart
        .configure_mesh()
        .x_labels(spec.labels.len().min(20))
        .x_desc(spec.x_title.as_str())
        .y_desc(spec.y_title.as_str())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()?;

    let n_series = spec.series.len().max(1) as f64;
    let group_width = 0.8;
    let bar_width = group_width / n_series;

    for (idx, series) in spec.series.iter().enumerate() {
        let (r, g, b) = SERIES_RGB[idx % SERIES_RGB.len()];
        let color = RGBColor(r, g, b);
        let points = spec.points(idx);
        if points.is_empty() {
            continue;
        }
        match spec.chart_type {
            ChartType::Line => {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            _ => {
                // grouped bars: series side by side within each label slot
                let offset = -group_width / 2.0 + bar_width * idx as f64;
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        let x0 = x + offset;
                        let x1 = x0 + bar_width * 0.9;
                        Rectangle::new([(x0, 0.0_f64.max(y_min)), (x1, y)], color.filled())
                    }))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Polygon approximating the annulus sector between `inner` and `outer` radius.
pub(crate) fn ring_sector(
    center: (i32, i32),
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
) -> Vec<(i32, i32)> {
    let steps = (((end - start).abs() / std::f64::consts::TAU) * 90.0).ceil().max(2.0) as usize;
    let at = |radius: f64, angle: f64| {
        (
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        )
    };
    let mut points: Vec<(i32, i32)> = (0..=steps)
        .map(|i| at(outer, start + (end - start) * i as f64 / steps as f64))
        .collect();
    points.extend((0..=steps).rev().map(|i| at(inner, start + (end - start) * i as f64 / steps as f64)));
    points
}

/// One ring per series (outermost = first), one slice per column.
fn write_pie_png(path: &Path, spec: &ChartSpec, (width, height): (u32, u32)) -> Result<()> {
    use plotters::prelude::*;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title_style = ("sans-serif", 20).into_font();
    root.draw(&Text::new(
        spec.title.clone(),
        (30, 15),
        title_style,
    ))?;

    let legend_width = 220;
    let plot_w = width.saturating_sub(legend_width) as i32;
    let center = (plot_w / 2, height as i32 / 2 + 15);
    let outer = (plot_w.min(height as i32 - 60) as f64 / 2.0 - 10.0).max(10.0);
    let n_rings = spec.series.len().max(1) as f64;
    let ring = outer / (n_rings + 1.0);

    for (idx, _) in spec.series.iter().enumerate() {
        let r_out = outer - ring * idx as f64;
        let r_in = r_out - ring * 0.9;
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (slice, fraction) in spec.pie_fractions(idx).into_iter().enumerate() {
            if fraction <= 0.0 {
                continue;
            }
            let end = angle + fraction * std::f64::consts::TAU;
            let (r, g, b) = PIE_RGB[slice % PIE_RGB.len()];
            root.draw(&Polygon::new(
                ring_sector(center, r_in, r_out, angle, end),
                RGBColor(r, g, b).filled(),
            ))?;
            angle = end;
        }
    }

    let legend_x = plot_w + 10;
    let font = ("sans-serif", 14).into_font();
    let mut y = 60;
    root.draw(&Text::new(
        "Rings (outer to inner):".to_string(),
        (legend_x, y),
        font.clone(),
    ))?;
    for series in &spec.series {
        y += 18;
        root.draw(&Text::new(format!("  {}", series.name), (legend_x, y), font.clone()))?;
    }
    y += 30;
    for (slice, label) in spec.labels.iter().enumerate() {
        let (r, g, b) = PIE_RGB[slice % PIE_RGB.len()];
        root.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 12, y + 12)],
            RGBColor(r, g, b).filled(),
        ))?;
        root.draw(&Text::new(label.clone(), (legend_x + 18, y), font.clone()))?;
        y += 18;
    }

    root.present()?;
    Ok(())
}
