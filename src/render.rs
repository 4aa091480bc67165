//! Draws figures to inline SVG with plotters.

use std::error::Error;
use std::ops::Range;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use polars::export::chrono::{Datelike, NaiveDate};

use crate::charts::{Figure, FigureKind, PointGroup};
use crate::error::{DashboardError, Result};
use crate::stats::BoxStats;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), Box<dyn Error>>;

const SIZE: (u32, u32) = (900, 540);
const TALL: (u32, u32) = (900, 760);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const MISSING: RGBColor = RGBColor(220, 220, 220);

pub fn draw_figure(figure: &Figure) -> Result<String> {
    let size = match &figure.kind {
        FigureKind::Heatmap { .. } | FigureKind::HorizontalBar { .. } => TALL,
        _ => SIZE,
    };
    let caption = figure.caption.as_deref().unwrap_or("");
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_on(&root, caption, &figure.kind).map_err(|e| DashboardError::Draw(e.to_string()))?;
        root.present()
            .map_err(|e| DashboardError::Draw(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_on(root: &Area, caption: &str, kind: &FigureKind) -> DrawResult {
    root.fill(&WHITE)?;
    match kind {
        FigureKind::Heatmap { labels, matrix } => draw_heatmap(root, caption, labels, matrix),
        FigureKind::Scatter {
            x_label,
            y_label,
            groups,
        } => draw_scatter(root, caption, x_label, y_label, groups),
        FigureKind::Pie { slices } => draw_pie(root, caption, slices),
        FigureKind::Line {
            x_label,
            y_label,
            points,
        } => draw_line(root, caption, x_label, y_label, points),
        FigureKind::HorizontalBar { value_label, bars } => {
            draw_horizontal_bars(root, caption, value_label, bars)
        }
        FigureKind::Box {
            x_label,
            y_label,
            groups,
        } => draw_boxes(root, caption, x_label, y_label, groups),
    }
}

/// Data range with a little headroom. Degenerate ranges are widened.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn segment_label(labels: &[String], v: &SegmentValue<i32>) -> String {
    match v {
        SegmentValue::CenterOf(i) if *i >= 0 => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Blue for -1, white for 0, red for 1.
fn coolwarm(r: f64) -> RGBColor {
    let r = r.clamp(-1.0, 1.0);
    let blend = |from: (u8, u8, u8), to: (u8, u8, u8), t: f64| {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    };
    let white = (247, 247, 247);
    if r < 0.0 {
        blend(white, (59, 76, 192), -r)
    } else {
        blend(white, (180, 4, 38), r)
    }
}

fn draw_heatmap(
    root: &Area,
    caption: &str,
    labels: &[String],
    matrix: &[Vec<Option<f64>>],
) -> DrawResult {
    let n = labels.len() as i32;
    if n == 0 {
        return Err("no columns to draw".into());
    }
    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(140)
        .y_label_area_size(160)
        .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(labels.len())
        .y_labels(labels.len())
        .x_label_formatter(&|v| segment_label(labels, v))
        .y_label_formatter(&|v| segment_label(labels, v))
        .x_label_style(
            ("sans-serif", 11)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()?;

    chart.draw_series(matrix.iter().enumerate().flat_map(|(i, row)| {
        row.iter().enumerate().map(move |(j, r)| {
            let (i, j) = (i as i32, j as i32);
            let color = r.map(coolwarm).unwrap_or(MISSING);
            Rectangle::new(
                [
                    (SegmentValue::Exact(j), SegmentValue::Exact(i)),
                    (SegmentValue::Exact(j + 1), SegmentValue::Exact(i + 1)),
                ],
                color.filled(),
            )
        })
    }))?;
    Ok(())
}

fn draw_scatter(
    root: &Area,
    caption: &str,
    x_label: &str,
    y_label: &str,
    groups: &[PointGroup],
) -> DrawResult {
    let points = || groups.iter().flat_map(|g| g.points.iter());
    let x_range = padded_range(points().map(|p| p.0));
    let y_range = padded_range(points().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().x_desc(x_label).y_desc(y_label).draw()?;

    for (i, group) in groups.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.7);
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(move |p| Circle::new(*p, 3, color.filled())),
            )?
            .label(group.name.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }
    if !groups.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_pie(root: &Area, caption: &str, slices: &[(String, usize)]) -> DrawResult {
    let area = root.titled(caption, ("sans-serif", 20))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.38;
    let sizes: Vec<f64> = slices.iter().map(|s| s.1 as f64).collect();
    let labels: Vec<&str> = slices.iter().map(|s| s.0.as_str()).collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| {
            let (r, g, b) = Palette99::pick(i).rgb();
            RGBColor(r, g, b)
        })
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 15).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 13).into_font().color(&WHITE));
    area.draw(&pie)?;
    Ok(())
}

fn draw_line(
    root: &Area,
    caption: &str,
    x_label: &str,
    y_label: &str,
    points: &[(NaiveDate, f64)],
) -> DrawResult {
    let days: Vec<(i32, f64)> = points
        .iter()
        .map(|(d, v)| (d.num_days_from_ce(), *v))
        .collect();
    let x_range = match (days.first(), days.last()) {
        (Some(first), Some(last)) => first.0..(last.0 + 1),
        _ => 0..1,
    };
    let y_range = padded_range(days.iter().map(|p| p.1));
    let format_day = |d: &i32| {
        NaiveDate::from_num_days_from_ce_opt(*d)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&format_day)
        .x_label_style(
            ("sans-serif", 11)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;
    chart.draw_series(LineSeries::new(days, &BLUE))?;
    Ok(())
}

fn draw_horizontal_bars(
    root: &Area,
    caption: &str,
    value_label: &str,
    bars: &[(String, f64)],
) -> DrawResult {
    let n = bars.len() as i32;
    if n == 0 {
        return Err("no bars to draw".into());
    }
    // first bar at the top
    let labels: Vec<String> = bars.iter().rev().map(|b| b.0.clone()).collect();
    let x_range = padded_range(bars.iter().map(|b| b.1).chain(std::iter::once(0.0)));

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(170)
        .build_cartesian_2d(x_range, (0..n).into_segmented())?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(value_label)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(k, (_, value))| {
        let slot = n - 1 - k as i32;
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(slot)),
                (*value, SegmentValue::Exact(slot + 1)),
            ],
            SKY_BLUE.filled(),
        );
        bar.set_margin(2, 2, 0, 0);
        bar
    }))?;
    Ok(())
}

fn draw_boxes(
    root: &Area,
    caption: &str,
    x_label: &str,
    y_label: &str,
    groups: &[(String, BoxStats)],
) -> DrawResult {
    let n = groups.len() as i32;
    if n == 0 {
        return Err("no groups to draw".into());
    }
    let labels: Vec<String> = groups.iter().map(|g| g.0.clone()).collect();
    let y_range = padded_range(groups.iter().flat_map(|(_, s)| {
        [s.lower_whisker, s.upper_whisker]
            .into_iter()
            .chain(s.outliers.iter().copied())
    }));

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), y_range)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    let inset = chart.plotting_area().dim_in_pixel().0 / (n as u32 * 5);
    for (i, (_, s)) in groups.iter().enumerate() {
        let i = i as i32;
        let color = Palette99::pick(i as usize);
        let span = |y: f64| [(SegmentValue::Exact(i), y), (SegmentValue::Exact(i + 1), y)];

        let mut body = Rectangle::new(
            [(SegmentValue::Exact(i), s.q1), (SegmentValue::Exact(i + 1), s.q3)],
            color.mix(0.6).filled(),
        );
        body.set_margin(0, 0, inset, inset);
        let mut median = Rectangle::new(span(s.median), BLACK.stroke_width(2));
        median.set_margin(0, 0, inset, inset);
        chart.draw_series([body, median])?;

        chart.draw_series([
            PathElement::new(
                vec![(SegmentValue::CenterOf(i), s.lower_whisker), (SegmentValue::CenterOf(i), s.q1)],
                BLACK,
            ),
            PathElement::new(
                vec![(SegmentValue::CenterOf(i), s.q3), (SegmentValue::CenterOf(i), s.upper_whisker)],
                BLACK,
            ),
        ])?;
        chart.draw_series(
            s.outliers
                .iter()
                .map(|v| Circle::new((SegmentValue::CenterOf(i), *v), 3, BLACK)),
        )?;
    }
    Ok(())
}
