//! Inline SVG chart rendering for reports.

use chrono::NaiveDate;

use crate::domain::analysis::{AnalysisReport, PerformanceRow};
use crate::domain::returns::ReturnPoint;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 50.0;

pub const INSTRUMENT_COLOR: &str = "#2563eb";
pub const BENCHMARK_COLOR: &str = "#f97316";

/// One plotted line.
pub struct LineSeries<'a> {
    pub label: &'a str,
    pub points: Vec<(NaiveDate, f64)>,
    pub color: &'a str,
    pub dashed: bool,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn legend(entries: &[(&str, &str, bool)]) -> String {
    let mut out = String::new();
    for (i, (label, color, dashed)) in entries.iter().enumerate() {
        let x = PADDING + i as f64 * 180.0;
        let dash = if *dashed { r#" stroke-dasharray="6,4""# } else { "" };
        out.push_str(&format!(
            r#"<line x1="{:.1}" y1="18" x2="{:.1}" y2="18" stroke="{}" stroke-width="2"{}/><text x="{:.1}" y="22" font-size="12">{}</text>"#,
            x,
            x + 24.0,
            color,
            dash,
            x + 30.0,
            escape(label)
        ));
    }
    out
}

/// Multi-series line chart with a date x-axis.
///
/// Series are positioned by calendar date, so lines with different trading
/// calendars still share one axis. Returns an empty string when there is
/// nothing to plot.
pub fn line_chart_svg(title: &str, y_label: &str, series: &[LineSeries]) -> String {
    let all_points = || series.iter().flat_map(|s| s.points.iter());
    let Some(first_date) = all_points().map(|p| p.0).min() else {
        return String::new();
    };
    let last_date = all_points().map(|p| p.0).max().unwrap_or(first_date);

    let min_y = all_points().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = all_points().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let span_days = (last_date - first_date).num_days();
    let scale_x = if span_days > 0 {
        plot_width / span_days as f64
    } else {
        0.0
    };
    let range = max_y - min_y;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="{t}">"#,
        w = WIDTH,
        h = HEIGHT,
        t = escape(title)
    );
    svg.push_str(&format!(
        r##"<line x1="{p}" y1="{p}" x2="{p}" y2="{b}" stroke="#999"/><line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="#999"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    ));

    for s in series.iter().filter(|s| !s.points.is_empty()) {
        let points: Vec<String> = s
            .points
            .iter()
            .map(|(date, value)| {
                let x = PADDING + (*date - first_date).num_days() as f64 * scale_x;
                let y = HEIGHT - PADDING - (value - min_y) * scale_y;
                format!("{:.1},{:.1}", x, y)
            })
            .collect();
        let dash = if s.dashed { r#" stroke-dasharray="6,4""# } else { "" };
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5"{} points="{}"/>"#,
            s.color,
            dash,
            points.join(" ")
        ));
    }

    svg.push_str(&format!(
        r#"<text x="4" y="{:.1}" font-size="11">{:.2}</text><text x="4" y="{:.1}" font-size="11">{:.2}</text>"#,
        PADDING + 4.0,
        max_y,
        HEIGHT - PADDING,
        min_y
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text><text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
        PADDING,
        HEIGHT - PADDING + 16.0,
        first_date,
        WIDTH - PADDING,
        HEIGHT - PADDING + 16.0,
        last_date
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        HEIGHT - 8.0,
        escape(y_label)
    ));

    let entries: Vec<(&str, &str, bool)> = series.iter().map(|s| (s.label, s.color, s.dashed)).collect();
    svg.push_str(&legend(&entries));
    svg.push_str("</svg>");
    svg
}

fn to_points(points: &[ReturnPoint]) -> Vec<(NaiveDate, f64)> {
    points.iter().map(|p| (p.date, p.value)).collect()
}

/// Adjusted close of the instrument against the benchmark.
pub fn price_comparison_svg(report: &AnalysisReport) -> String {
    let instrument_label = format!("{} adjusted close", report.instrument.symbol());
    let benchmark_label = format!("{} adjusted close", report.benchmark.symbol());
    line_chart_svg(
        "Adjusted price comparison",
        "Price ($)",
        &[
            LineSeries {
                label: &instrument_label,
                points: report.instrument.prices.adjusted_closes().collect(),
                color: INSTRUMENT_COLOR,
                dashed: false,
            },
            LineSeries {
                label: &benchmark_label,
                points: report.benchmark.prices.adjusted_closes().collect(),
                color: BENCHMARK_COLOR,
                dashed: true,
            },
        ],
    )
}

/// Cumulative return factor of the instrument against the benchmark.
pub fn cumulative_comparison_svg(report: &AnalysisReport) -> String {
    let instrument_label = format!("{} cumulative return", report.instrument.symbol());
    let benchmark_label = format!("{} cumulative return", report.benchmark.symbol());
    line_chart_svg(
        "Cumulative return comparison",
        "Growth of 1",
        &[
            LineSeries {
                label: &instrument_label,
                points: to_points(&report.instrument.cumulative),
                color: INSTRUMENT_COLOR,
                dashed: false,
            },
            LineSeries {
                label: &benchmark_label,
                points: to_points(&report.benchmark.cumulative),
                color: BENCHMARK_COLOR,
                dashed: true,
            },
        ],
    )
}

/// Grouped bars of annualized mean return (%) per window.
///
/// Windows with no observations leave an empty slot.
pub fn performance_bar_svg(rows: &[PerformanceRow], instrument: &str, benchmark: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let values: Vec<(f64, f64)> = rows
        .iter()
        .map(|r| (r.instrument.mean_annual * 100.0, r.benchmark.mean_annual * 100.0))
        .collect();
    let finite = values
        .iter()
        .flat_map(|&(a, b)| [a, b])
        .filter(|v| v.is_finite());
    let max_y = finite.clone().fold(0.0_f64, f64::max);
    let min_y = finite.fold(0.0_f64, f64::min);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max_y - min_y;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let zero_y = HEIGHT - PADDING - (0.0 - min_y) * scale_y;
    let group_width = plot_width / rows.len() as f64;
    let bar_width = group_width * 0.35;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="Annualized return by period">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r##"<line x1="{p}" y1="{z:.1}" x2="{r}" y2="{z:.1}" stroke="#999"/>"##,
        p = PADDING,
        z = zero_y,
        r = WIDTH - PADDING
    ));

    for (i, (row, (inst, bench))) in rows.iter().zip(values.iter()).enumerate() {
        let group_x = PADDING + i as f64 * group_width;
        for (offset, value, color) in [
            (0.1, *inst, INSTRUMENT_COLOR),
            (0.1 + 0.35 + 0.05, *bench, BENCHMARK_COLOR),
        ] {
            if !value.is_finite() {
                continue;
            }
            let bar_height = value.abs() * scale_y;
            let y = if value >= 0.0 { zero_y - bar_height } else { zero_y };
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {:.2}%</title></rect>"#,
                group_x + group_width * offset,
                y,
                bar_width,
                bar_height,
                color,
                escape(&row.window.label),
                value
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            group_x + group_width / 2.0,
            HEIGHT - PADDING + 16.0,
            escape(&row.window.label)
        ));
    }

    svg.push_str(&format!(
        r#"<text x="4" y="{:.1}" font-size="11">{:.1}%</text><text x="4" y="{:.1}" font-size="11">{:.1}%</text>"#,
        PADDING + 4.0,
        max_y,
        HEIGHT - PADDING,
        min_y
    ));
    svg.push_str(&legend(&[
        (instrument, INSTRUMENT_COLOR, false),
        (benchmark, BENCHMARK_COLOR, false),
    ]));
    svg.push_str("</svg>");
    svg
}
