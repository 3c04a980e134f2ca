//! # Charts Module
//!
//! Renders the dashboard's PNG charts with plotters.

use anyhow::Result;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

use crate::stats::{Ranked, Summary, WEEKDAYS};

const CHART_SIZE: (u32, u32) = (900, 480);
const PIE_SIZE: (u32, u32) = (640, 520);
const TITLE_FONT: (&str, i32) = ("sans-serif", 30);
const BAR_COLOR: RGBColor = RGBColor(52, 110, 183);
const PALETTE: [RGBColor; 6] = [
    RGBColor(52, 110, 183),
    RGBColor(214, 96, 77),
    RGBColor(84, 163, 112),
    RGBColor(230, 171, 63),
    RGBColor(128, 100, 162),
    RGBColor(96, 170, 191),
];

/// Draw every chart the report references into `img_dir`.
pub fn render_all(summary: &Summary, img_dir: &Path) -> Result<()> {
    if let Err(e) = render_all_inner(summary, img_dir) {
        log::error!("failed to render charts in {}: {e:#}", img_dir.display());
        return Err(e);
    }
    Ok(())
}

fn render_all_inner(summary: &Summary, img_dir: &Path) -> Result<()> {
    let weekdays: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
    let dow: Vec<f64> = summary.sessions_by_weekday.iter().map(|&v| v as f64).collect();

    bar_chart(
        &img_dir.join("sessions_dow.png"),
        "Sessions per Weekday",
        &weekdays,
        &dow,
        "Sessions",
    )?;
    bar_chart(
        &img_dir.join("avg_len_dow.png"),
        "Avg Session Length by Weekday",
        &weekdays,
        &summary.avg_duration_by_weekday,
        "Avg Duration (min)",
    )?;
    line_chart(
        &img_dir.join("sessions_by_hour.png"),
        "Sessions by Hour of Day",
        &summary.sessions_by_hour,
        "Hour of Day",
        "Sessions",
    )?;
    hbar_chart(
        &img_dir.join("top5_pages.png"),
        "Top Landing Pages",
        &summary.top_landing_pages,
        "Sessions",
    )?;
    pie_chart(
        &img_dir.join("top5_countries.png"),
        "Top Visitor Countries",
        &summary.top_countries,
    )?;
    Ok(())
}

fn y_ceiling(values: &[f64]) -> f64 {
    values.iter().cloned().fold(1.0f64, f64::max) * 1.1
}

/// Vertical bar chart with one bar per label.
pub fn bar_chart(
    path: &Path,
    title: &str,
    labels: &[String],
    values: &[f64],
    y_desc: &str,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = values.len().max(1) as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, TITLE_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..n, 0f64..y_ceiling(values))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(values.len())
        .x_label_formatter(&|x| labels.get(*x as usize).cloned().unwrap_or_default())
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        Rectangle::new([(i as i32, 0.0), (i as i32 + 1, v)], BAR_COLOR.mix(0.8).filled())
    }))?;
    root.present()?;
    Ok(())
}

/// Horizontal bar chart for a top-N ranking; bar per row, label on the y axis.
pub fn hbar_chart(path: &Path, title: &str, rows: &[Ranked], x_desc: &str) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = rows.len().max(1) as i32;
    let x_max = rows.iter().map(|r| r.sessions).max().unwrap_or(1).max(1) as f64 * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, TITLE_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..x_max, 0..n)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len())
        .y_label_formatter(&|y| {
            rows.get(*y as usize)
                .map(|r| r.label.clone())
                .unwrap_or_default()
        })
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
        Rectangle::new(
            [(0.0, i as i32), (r.sessions as f64, i as i32 + 1)],
            BAR_COLOR.mix(0.8).filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}

/// Line chart over the 24 hours of the day.
pub fn line_chart(
    path: &Path,
    title: &str,
    values: &[u64],
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let series: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, TITLE_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..values.len().max(1) as i32, 0f64..y_ceiling(&series))?;
    chart
        .configure_mesh()
        .x_labels(12)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(
        series.iter().enumerate().map(|(i, &v)| (i as i32, v)),
        &BAR_COLOR,
    ))?;
    chart.draw_series(
        series
            .iter()
            .enumerate()
            .map(|(i, &v)| Circle::new((i as i32, v), 3, BAR_COLOR.filled())),
    )?;
    root.present()?;
    Ok(())
}

/// Pie chart for a top-N ranking.
pub fn pie_chart(path: &Path, title: &str, rows: &[Ranked]) -> Result<()> {
    let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, TITLE_FONT)?;
    if rows.is_empty() {
        root.present()?;
        return Ok(());
    }

    let sizes: Vec<f64> = rows.iter().map(|r| r.sessions as f64).collect();
    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
    let colors: Vec<RGBColor> = (0..rows.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

    let center = (PIE_SIZE.0 as i32 / 2, PIE_SIZE.1 as i32 / 2);
    let radius = 160.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font());
    root.draw(&pie)?;
    root.present()?;
    Ok(())
}
