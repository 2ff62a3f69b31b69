//! Chart panel: type pills plus the live chart instance drawn with ratatui's
//! `Chart` (bar, line) or `Canvas` (pie rings).

use crate::chart::{format_axis_label, ChartHost, ChartSource, ChartSpec};
use crate::cli::ChartType;
use crate::render::context::RenderContext;
use crate::render::dashboard::panel_block;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{
    Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget, Wrap,
};

/// Share of each label slot taken by a bar group.
const GROUP_WIDTH: f64 = 0.8;
/// Most category labels drawn under the x axis; the rest are left blank.
const MAX_X_LABELS: usize = 10;

pub fn render(
    area: Rect,
    buf: &mut Buffer,
    host: &ChartHost,
    chart_type: ChartType,
    active: bool,
    ctx: &RenderContext,
) {
    let title = host
        .spec()
        .map(|s| s.title.as_str())
        .unwrap_or(crate::chart::SUMMARY_TITLE);
    let block = panel_block(title, active, ctx);
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(inner);
    render_pills(rows[0], buf, chart_type, ctx);

    let Some(spec) = host.spec() else {
        Paragraph::new("Upload a CSV file to visualize its statistics.")
            .style(Style::default().fg(ctx.text_secondary))
            .centered()
            .wrap(Wrap { trim: true })
            .render(rows[1], buf);
        return;
    };
    if spec.is_empty() {
        Paragraph::new("No numeric data to chart.")
            .style(Style::default().fg(ctx.text_secondary))
            .centered()
            .render(rows[1], buf);
        return;
    }

    match spec.chart_type {
        ChartType::Pie => render_pie(rows[1], buf, spec, ctx),
        ChartType::Bar | ChartType::Line => render_xy(rows[1], buf, spec, ctx),
    }
}

fn render_pills(area: Rect, buf: &mut Buffer, current: ChartType, ctx: &RenderContext) {
    let mut spans = Vec::new();
    for (chart_type, key) in ChartType::ALL.iter().zip(["b", "n", "p"]) {
        let style = if *chart_type == current {
            Style::default()
                .fg(ctx.text_inverse)
                .bg(ctx.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ctx.text_secondary).bg(ctx.surface)
        };
        spans.push(Span::styled(format!(" {} ", chart_type.label()), style));
        spans.push(Span::styled(format!("{} ", key), Style::default().fg(ctx.keybind_hints)));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// Category labels for x bounds `[0, n + 1]`: blanks at both ends so label i
/// sits over x = i. Labels are thinned to at most `max` visible entries.
pub fn category_axis_labels(labels: &[String], max: usize) -> Vec<String> {
    let step = labels.len().div_ceil(max.max(1)).max(1);
    let mut out = Vec::with_capacity(labels.len() + 2);
    out.push(String::new());
    out.extend(labels.iter().enumerate().map(|(i, l)| {
        if i % step == 0 {
            l.clone()
        } else {
            String::new()
        }
    }));
    out.push(String::new());
    out
}

/// Points of one series, shifted inside its label slot when bars are grouped.
pub fn series_points(spec: &ChartSpec, idx: usize) -> Vec<(f64, f64)> {
    let points = spec.points(idx);
    if spec.chart_type != ChartType::Bar {
        return points;
    }
    let n = spec.series.len().max(1) as f64;
    let bar = GROUP_WIDTH / n;
    let offset = -GROUP_WIDTH / 2.0 + bar * (idx as f64 + 0.5);
    points.into_iter().map(|(x, y)| (x + offset, y)).collect()
}

fn render_xy(area: Rect, buf: &mut Buffer, spec: &ChartSpec, ctx: &RenderContext) {
    let Some((y_min, y_max)) = spec.value_bounds() else {
        return;
    };
    let n = spec.labels.len();
    let label_style = Style::default().fg(ctx.text_primary);

    let (x_bounds, x_labels): ([f64; 2], Vec<String>) = match spec.source {
        ChartSource::Summary => (
            [0.0, n as f64 + 1.0],
            category_axis_labels(&spec.labels, MAX_X_LABELS),
        ),
        ChartSource::Gradient { .. } => {
            let last = (n as f64).max(2.0);
            (
                [1.0, last],
                vec![
                    "1".to_string(),
                    format!("{}", ((1.0 + last) / 2.0).round()),
                    format!("{}", last),
                ],
            )
        }
    };

    let points: Vec<Vec<(f64, f64)>> = (0..spec.series.len())
        .map(|i| series_points(spec, i))
        .collect();
    let (graph_type, marker) = match spec.chart_type {
        ChartType::Bar => (GraphType::Bar, symbols::Marker::HalfBlock),
        _ => (GraphType::Line, symbols::Marker::Braille),
    };
    let datasets: Vec<Dataset> = spec
        .series
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(i, (series, pts))| {
            Dataset::default()
                .name(series.name.as_str())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(ctx.series_color(i)))
                .data(pts)
        })
        .collect();

    let x_axis = Axis::default()
        .title(spec.x_title.as_str())
        .bounds(x_bounds)
        .style(label_style)
        .labels(x_labels.into_iter().map(|l| Span::styled(l, label_style)));
    let y_axis = Axis::default()
        .title(spec.y_title.as_str())
        .bounds([y_min, y_max])
        .style(label_style)
        .labels(
            [y_min, (y_min + y_max) / 2.0, y_max]
                .map(|v| Span::styled(format_axis_label(v), label_style)),
        );

    Chart::new(datasets)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .render(area, buf);
}

/// Canvas points of each slice of one ring, within a unit circle. Slices
/// start at twelve o'clock and run clockwise. `resolution` is the sample
/// spacing in canvas units.
pub fn ring_slice_points(
    fractions: &[f64],
    inner: f64,
    outer: f64,
    resolution: f64,
) -> Vec<Vec<(f64, f64)>> {
    let mut slices = vec![Vec::new(); fractions.len()];
    let total: f64 = fractions.iter().sum();
    if total <= 0.0 || resolution <= 0.0 {
        return slices;
    }
    let bounds: Vec<f64> = fractions
        .iter()
        .scan(0.0, |acc, f| {
            *acc += f / total;
            Some(*acc)
        })
        .collect();

    let steps_around = ((std::f64::consts::TAU * outer) / resolution).ceil().max(8.0) as usize;
    let mut r = inner;
    while r <= outer {
        for step in 0..steps_around {
            let t = (step as f64 + 0.5) / steps_around as f64;
            let slice = bounds
                .iter()
                .position(|b| t < *b)
                .unwrap_or(fractions.len() - 1);
            let angle = std::f64::consts::FRAC_PI_2 - t * std::f64::consts::TAU;
            slices[slice].push((r * angle.cos(), r * angle.sin()));
        }
        r += resolution;
    }
    slices
}

fn render_pie(area: Rect, buf: &mut Buffer, spec: &ChartSpec, ctx: &RenderContext) {
    let legend_width = spec
        .labels
        .iter()
        .chain(spec.series.iter().map(|s| &s.name))
        .map(|l| l.chars().count() as u16 + 4)
        .max()
        .unwrap_or(10)
        .clamp(12, 30);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(legend_width)])
        .split(area);

    // cells are about twice as tall as wide
    let side = cols[0].height.min(cols[0].width / 2);
    let pie_area = Rect {
        x: cols[0].x + (cols[0].width.saturating_sub(side * 2)) / 2,
        y: cols[0].y,
        width: side * 2,
        height: side,
    };
    let resolution = 1.0 / (side.max(1) as f64 * 2.0);

    let rings = spec.series.len().max(1) as f64;
    let ring = 1.0 / (rings + 1.0);
    let ring_points: Vec<Vec<Vec<(f64, f64)>>> = (0..spec.series.len())
        .map(|idx| {
            let outer = 1.0 - ring * idx as f64;
            ring_slice_points(&spec.pie_fractions(idx), outer - ring * 0.85, outer, resolution)
        })
        .collect();

    Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|painter| {
            for slices in &ring_points {
                for (slice, coords) in slices.iter().enumerate() {
                    painter.draw(&Points {
                        coords,
                        color: ctx.series_color(slice),
                    });
                }
            }
        })
        .render(pie_area, buf);

    let mut lines = vec![Line::from(Span::styled(
        "Rings, outer first:",
        Style::default().fg(ctx.text_secondary),
    ))];
    lines.extend(
        spec.series
            .iter()
            .map(|s| Line::from(Span::styled(format!(" {}", s.name), Style::default().fg(ctx.text_primary)))),
    );
    lines.push(Line::raw(""));
    lines.extend(spec.labels.iter().enumerate().map(|(i, label)| {
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(ctx.series_color(i))),
            Span::styled(label.as_str(), Style::default().fg(ctx.text_primary)),
        ])
    }));
    Paragraph::new(lines).render(cols[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_category_labels_padded() {
        let out = category_axis_labels(&labels(&["age", "income"]), 10);
        assert_eq!(out, vec!["", "age", "income", ""]);
    }

    #[test]
    fn test_category_labels_thinned() {
        let names: Vec<String> = (0..25).map(|i| format!("c{}", i)).collect();
        let out = category_axis_labels(&names, 10);
        assert_eq!(out.len(), 27);
        let shown: Vec<&String> = out.iter().filter(|l| !l.is_empty()).collect();
        assert_eq!(shown.len(), 9);
        assert_eq!(out[1], "c0");
        assert_eq!(out[2], "");
    }

    #[test]
    fn test_bar_points_grouped_inside_slot() {
        let spec = ChartSpec::gradient("x", &[Some(2.0)]);
        assert_eq!(series_points(&spec, 0), vec![(1.0, 2.0)]);

        let mut bar = spec.clone();
        bar.chart_type = ChartType::Bar;
        bar.series.push(bar.series[0].clone());
        let first = series_points(&bar, 0);
        let second = series_points(&bar, 1);
        assert!((first[0].0 - 0.8).abs() < 1e-9);
        assert!((second[0].0 - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_ring_slices_split_by_fraction() {
        let slices = ring_slice_points(&[0.25, 0.75], 0.5, 0.5, 0.05);
        let total: usize = slices.iter().map(Vec::len).sum();
        assert!(total > 0);
        // quarter slice covers the upper-right quadrant
        assert!(slices[0].iter().all(|(x, y)| *x >= -1e-9 && *y >= -1e-9));
        assert!(slices[1].len() > slices[0].len() * 2);
    }

    #[test]
    fn test_ring_slices_empty_when_all_zero() {
        let slices = ring_slice_points(&[0.0, 0.0], 0.2, 0.5, 0.05);
        assert!(slices.iter().all(Vec::is_empty));
    }
}
