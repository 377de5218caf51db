//! Plain-text summary of an analysis for the terminal.

use std::fmt::Write;

use super::html_report_adapter::format_pct;
use crate::domain::analysis::AnalysisReport;
use crate::domain::returns::Performance;

fn cell(value: f64, defined: bool) -> String {
    if defined {
        format!("{}%", format_pct(value))
    } else {
        "n/a".to_string()
    }
}

fn perf_cells(perf: &Performance) -> (String, String) {
    let defined = perf.is_defined();
    (cell(perf.mean_annual, defined), cell(perf.vol_annual, defined))
}

pub fn render_summary(report: &AnalysisReport) -> String {
    let symbol = report.request.symbol.as_str();
    let benchmark = report.request.benchmark();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== {} vs {} ({} to {}) ===",
        symbol, benchmark, report.request.start_date, report.request.end_date
    );
    let _ = writeln!(
        out,
        "Total Return:     {} {}%, {} {}%",
        symbol,
        format_pct(report.instrument.total_return()),
        benchmark,
        format_pct(report.benchmark.total_return())
    );
    if report.dropped_instrument_rows > 0 || report.dropped_benchmark_rows > 0 {
        let _ = writeln!(
            out,
            "Aligned:          dropped {} {} row(s), {} {} row(s)",
            report.dropped_instrument_rows, symbol, report.dropped_benchmark_rows, benchmark
        );
    }

    let _ = writeln!(out, "\n=== Recent Prices ({}) ===", symbol);
    let _ = writeln!(
        out,
        "{:<12}{:>10}{:>10}{:>10}{:>10}{:>10}{:>14}",
        "Date", "Open", "High", "Low", "Close", "Adj", "Volume"
    );
    for bar in &report.recent_rows {
        let _ = writeln!(
            out,
            "{:<12}{:>10.2}{:>10.2}{:>10.2}{:>10.2}{:>10.2}{:>14}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.adj_close,
            bar.volume
        );
    }

    let _ = writeln!(out, "\n=== Annualized Return / Volatility ===");
    let _ = writeln!(
        out,
        "{:<16}{:>12}{:>12}{:>12}{:>12}",
        "Period",
        format!("{} ret", symbol),
        format!("{} vol", symbol),
        format!("{} ret", benchmark),
        format!("{} vol", benchmark)
    );
    for row in &report.performance {
        let (ir, iv) = perf_cells(&row.instrument);
        let (br, bv) = perf_cells(&row.benchmark);
        let _ = writeln!(
            out,
            "{:<16}{:>12}{:>12}{:>12}{:>12}",
            row.window.to_string(),
            ir,
            iv,
            br,
            bv
        );
    }
    if let Some(note) = report.empty_window_note() {
        let _ = writeln!(out, "Note:             {}", note);
    }
    out
}
