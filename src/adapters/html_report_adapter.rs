//! HTML report adapter implementing ReportPort.
//!
//! Generates standalone HTML reports using Askama templates with inline SVG
//! charts. The same [`ReportView`] feeds the web dashboard.

use std::fs;
use std::path::Path;

use askama::Template;

use super::chart_svg;
use crate::domain::analysis::AnalysisReport;
use crate::domain::error::EtfLensError;
use crate::domain::returns::Performance;
use crate::ports::report_port::ReportPort;

pub struct PriceRowView {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub adj_close: String,
    pub volume: String,
}

pub struct PerformanceRowView {
    pub label: String,
    pub days: usize,
    pub instrument_return: String,
    pub instrument_vol: String,
    pub benchmark_return: String,
    pub benchmark_vol: String,
}

/// Display-ready projection of an [`AnalysisReport`].
pub struct ReportView {
    pub symbol: String,
    pub benchmark: String,
    pub start_date: String,
    pub end_date: String,
    pub instrument_total: String,
    pub benchmark_total: String,
    pub recent_rows: Vec<PriceRowView>,
    pub performance: Vec<PerformanceRowView>,
    pub price_svg: String,
    pub cumulative_svg: String,
    pub bar_svg: String,
    /// Empty when both series were used in full.
    pub alignment_note: String,
    pub window_note: String,
}

/// Percent with two decimals, or "n/a" for an undefined figure.
pub fn format_pct(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value * 100.0)
    } else {
        "n/a".to_string()
    }
}

fn performance_cells(perf: &Performance) -> (String, String) {
    if perf.is_defined() {
        (format_pct(perf.mean_annual), format_pct(perf.vol_annual))
    } else {
        ("n/a".to_string(), "n/a".to_string())
    }
}

impl ReportView {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let symbol = report.request.symbol.clone();
        let benchmark = report.request.benchmark().to_string();

        let recent_rows = report
            .recent_rows
            .iter()
            .map(|bar| PriceRowView {
                date: bar.date.to_string(),
                open: format!("{:.2}", bar.open),
                high: format!("{:.2}", bar.high),
                low: format!("{:.2}", bar.low),
                close: format!("{:.2}", bar.close),
                adj_close: format!("{:.2}", bar.adj_close),
                volume: bar.volume.to_string(),
            })
            .collect();

        let performance = report
            .performance
            .iter()
            .map(|row| {
                let (instrument_return, instrument_vol) = performance_cells(&row.instrument);
                let (benchmark_return, benchmark_vol) = performance_cells(&row.benchmark);
                PerformanceRowView {
                    label: row.window.label.clone(),
                    days: row.window.count,
                    instrument_return,
                    instrument_vol,
                    benchmark_return,
                    benchmark_vol,
                }
            })
            .collect();

        let alignment_note = if report.dropped_instrument_rows > 0
            || report.dropped_benchmark_rows > 0
        {
            format!(
                "Compared on common trading days only: dropped {} {} row(s) and {} {} row(s).",
                report.dropped_instrument_rows, symbol, report.dropped_benchmark_rows, benchmark
            )
        } else {
            String::new()
        };

        Self {
            start_date: report.request.start_date.to_string(),
            end_date: report.request.end_date.to_string(),
            instrument_total: format_pct(report.instrument.total_return()),
            benchmark_total: format_pct(report.benchmark.total_return()),
            recent_rows,
            performance,
            price_svg: chart_svg::price_comparison_svg(report),
            cumulative_svg: chart_svg::cumulative_comparison_svg(report),
            bar_svg: chart_svg::performance_bar_svg(&report.performance, &symbol, &benchmark),
            alignment_note,
            window_note: report.empty_window_note().unwrap_or_default(),
            symbol,
            benchmark,
        }
    }
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    view: &'a ReportView,
}

#[derive(Template)]
#[template(path = "report_body.html")]
struct ReportBodyTemplate<'a> {
    view: &'a ReportView,
}

fn report_error(e: askama::Error) -> EtfLensError {
    EtfLensError::Report {
        reason: e.to_string(),
    }
}

/// Standalone HTML document.
pub fn render_report(report: &AnalysisReport) -> Result<String, EtfLensError> {
    let view = ReportView::from_report(report);
    ReportTemplate { view: &view }.render().map_err(report_error)
}

/// The report section alone, for embedding in the dashboard page.
pub fn render_report_body(report: &AnalysisReport) -> Result<String, EtfLensError> {
    let view = ReportView::from_report(report);
    ReportBodyTemplate { view: &view }
        .render()
        .map_err(report_error)
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, report: &AnalysisReport, output_path: &str) -> Result<(), EtfLensError> {
        let html = render_report(report)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
