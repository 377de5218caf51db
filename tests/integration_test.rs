//! Integration tests.
//!
//! Tests cover:
//! - Full analysis over CSV files on disk, through to the HTML report
//! - Known return figures and window clamping
//! - Independent processing when date alignment is disabled
//! - Properties of daily and cumulative returns (proptest)

mod common;

use approx::assert_relative_eq;
use common::*;
use etflens::adapters::console_summary::render_summary;
use etflens::adapters::csv_adapter::CsvAdapter;
use etflens::adapters::html_report_adapter::HtmlReportAdapter;
use etflens::domain::analysis::{run_analysis, AnalysisOptions, AnalysisRequest};
use etflens::domain::error::EtfLensError;
use etflens::domain::price::PriceSeries;
use etflens::domain::returns::{annualized_performance, cumulative_returns, daily_returns};
use etflens::ports::report_port::ReportPort;

mod csv_pipeline {
    use super::*;

    #[test]
    fn full_pipeline_from_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "VOO", &generate_bars("2023-06-01", 300, 350.0, 0.4));
        write_csv(dir.path(), "SPY", &generate_bars("2023-06-01", 300, 420.0, 0.5));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let request = AnalysisRequest::new("voo", date(2023, 6, 1), date(2024, 6, 1)).unwrap();
        let report = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();

        assert_eq!(report.request.symbol, "VOO");
        assert_eq!(report.instrument.prices.len(), 300);
        assert_eq!(report.instrument.returns.len(), 299);
        assert_eq!(report.performance.len(), 8);

        let labels: Vec<&str> = report
            .performance
            .iter()
            .map(|r| r.window.label.as_str())
            .collect();
        assert_eq!(labels, ["1M", "3M", "6M", "1Y", "YTD", "3Y", "5Y", "10Y"]);

        // 2023-06-01 + 299 days = 2024-03-26; 86 rows fall in 2024.
        let ytd = &report.performance[4];
        assert_eq!(ytd.window.count, 86);
        assert_eq!(ytd.instrument.observations, 86);

        let out = dir.path().join("report.html");
        HtmlReportAdapter::new()
            .write(&report, out.to_str().unwrap())
            .unwrap();
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("VOO vs SPY"));
        assert!(html.contains("10Y"));

        let summary = render_summary(&report);
        assert!(summary.contains("VOO vs SPY"));
    }

    #[test]
    fn missing_benchmark_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "QQQ", &generate_bars("2024-01-01", 10, 400.0, 1.0));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let request = AnalysisRequest::new("QQQ", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let err = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, EtfLensError::NoData { ref symbol, .. } if symbol == "SPY"));
    }
}

mod known_values {
    use super::*;

    #[test]
    fn three_price_example() {
        let port = MockDataPort::new()
            .with_bars(
                "QQQ",
                vec![
                    make_bar("2024-01-02", 100.0),
                    make_bar("2024-01-03", 110.0),
                    make_bar("2024-01-04", 99.0),
                ],
            )
            .with_bars(
                "SPY",
                vec![
                    make_bar("2024-01-02", 200.0),
                    make_bar("2024-01-03", 200.0),
                    make_bar("2024-01-04", 200.0),
                ],
            );
        let request = AnalysisRequest::new("QQQ", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let report = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();

        let returns: Vec<f64> = report.instrument.returns.iter().map(|p| p.value).collect();
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.10, epsilon = 1e-12);

        let cumulative: Vec<f64> = report.instrument.cumulative.iter().map(|p| p.value).collect();
        assert_relative_eq!(cumulative[0], 1.10, epsilon = 1e-12);
        assert_relative_eq!(cumulative[1], 0.99, epsilon = 1e-12);
    }

    #[test]
    fn long_windows_clamp_to_available_history() {
        let port = MockDataPort::new()
            .with_bars("QQQ", generate_bars("2024-01-01", 101, 100.0, 0.3))
            .with_bars("SPY", generate_bars("2024-01-01", 101, 100.0, 0.2));
        let request = AnalysisRequest::new("QQQ", date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let report = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();

        let ten_year = report
            .performance
            .iter()
            .find(|r| r.window.label == "10Y")
            .unwrap();
        let whole = annualized_performance(&report.instrument.returns, 252.0);
        assert_eq!(ten_year.instrument.observations, 100);
        assert_eq!(ten_year.instrument, whole);
    }

    #[test]
    fn ytd_without_rows_in_end_year_is_undefined() {
        let port = MockDataPort::new()
            .with_bars("QQQ", generate_bars("2023-01-01", 100, 100.0, 0.3))
            .with_bars("SPY", generate_bars("2023-01-01", 100, 100.0, 0.2));
        let request = AnalysisRequest::new("QQQ", date(2023, 1, 1), date(2024, 2, 1)).unwrap();
        let report = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();

        let ytd = &report.performance[4];
        assert_eq!(ytd.window.count, 0);
        assert!(!ytd.instrument.is_defined());
        assert!(report.performance[0].instrument.is_defined());
    }

    #[test]
    fn unaligned_series_are_processed_independently() {
        let mut spy = generate_bars("2024-01-01", 30, 470.0, 1.0);
        spy.truncate(20);
        let port = MockDataPort::new()
            .with_bars("QQQ", generate_bars("2024-01-01", 30, 400.0, 2.0))
            .with_bars("SPY", spy);
        let request = AnalysisRequest::new("QQQ", date(2024, 1, 1), date(2024, 3, 1)).unwrap();
        let options = AnalysisOptions {
            align_dates: false,
            ..AnalysisOptions::default()
        };
        let report = run_analysis(&port, &request, &options).unwrap();

        assert!(!report.aligned);
        assert_eq!(report.instrument.returns.len(), 29);
        assert_eq!(report.benchmark.returns.len(), 19);
        assert_eq!(report.dropped_benchmark_rows, 0);
    }

    #[test]
    fn recomputation_is_identical() {
        let port = MockDataPort::new()
            .with_bars("ARKK", generate_bars("2024-01-01", 80, 50.0, -0.2))
            .with_bars("SPY", generate_bars("2024-01-01", 80, 470.0, 0.5));
        let request = AnalysisRequest::new("ARKK", date(2024, 1, 1), date(2024, 6, 1)).unwrap();

        let first = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();
        let second = run_analysis(&port, &request, &AnalysisOptions::default()).unwrap();
        assert_eq!(first.instrument.returns, second.instrument.returns);
        assert_eq!(first.instrument.cumulative, second.instrument.cumulative);
        assert_eq!(first.performance, second.performance);
    }
}

mod return_properties {
    use super::*;
    use proptest::prelude::*;

    fn series_from(prices: &[f64]) -> PriceSeries {
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut bar = make_bar("2020-01-01", p);
                bar.date = date(2020, 1, 1) + chrono::Duration::days(i as i64);
                bar
            })
            .collect();
        PriceSeries::new("QQQ", bars).unwrap()
    }

    proptest! {
        #[test]
        fn daily_returns_has_one_fewer_point(prices in prop::collection::vec(1.0f64..1000.0, 2..200)) {
            let series = series_from(&prices);
            prop_assert_eq!(daily_returns(&series).len(), prices.len() - 1);
        }

        #[test]
        fn cumulative_matches_length_and_first_value(prices in prop::collection::vec(1.0f64..1000.0, 2..200)) {
            let returns = daily_returns(&series_from(&prices));
            let cumulative = cumulative_returns(&returns);
            prop_assert_eq!(cumulative.len(), returns.len());
            prop_assert!((cumulative[0].value - (1.0 + returns[0].value)).abs() < 1e-12);
        }

        #[test]
        fn cumulative_tracks_price_ratio(prices in prop::collection::vec(1.0f64..1000.0, 2..100)) {
            let returns = daily_returns(&series_from(&prices));
            let last = cumulative_returns(&returns).last().unwrap().value;
            let ratio = prices[prices.len() - 1] / prices[0];
            prop_assert!((last - ratio).abs() <= 1e-9 * ratio.max(1.0));
        }

        #[test]
        fn volatility_is_never_negative(prices in prop::collection::vec(1.0f64..1000.0, 2..100)) {
            let returns = daily_returns(&series_from(&prices));
            let perf = annualized_performance(&returns, 252.0);
            prop_assert!(perf.vol_annual >= 0.0);
            prop_assert_eq!(perf.observations, returns.len());
        }
    }
}
