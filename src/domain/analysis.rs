//! The fetch-then-compute pipeline behind every user query.
//!
//! A query is an explicit [`AnalysisRequest`]; nothing is read from ambient
//! session state. The pipeline fetches the instrument and the fixed
//! benchmark, optionally aligns their calendars, derives return series, and
//! builds one [`PerformanceRow`] per look-back window.

use chrono::{Datelike, NaiveDate};
use std::time::Instant;

use super::error::EtfLensError;
use super::period::{standard_windows, PeriodWindow};
use super::price::{PriceBar, PriceSeries};
use super::returns::{
    cumulative_returns, daily_returns, windowed_performance, Performance, ReturnPoint,
    TRADING_DAYS_PER_YEAR,
};
use super::timeline::align_on_common_dates;
use crate::ports::data_port::DataPort;

/// Reference instrument every query is compared against.
pub const BENCHMARK_SYMBOL: &str = "SPY";
pub const DEFAULT_SYMBOL: &str = "QQQ";
pub const DEFAULT_RECENT_ROWS: usize = 5;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// One user query: instrument symbol and date range.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AnalysisRequest {
    /// Normalizes the symbol (trimmed, upper-cased) and checks the range.
    pub fn new(symbol: &str, start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, EtfLensError> {
        let symbol = normalize_symbol(symbol)?;
        if start_date >= end_date {
            return Err(EtfLensError::invalid_request(format!(
                "start date {} must be before end date {}",
                start_date, end_date
            )));
        }
        Ok(Self {
            symbol,
            start_date,
            end_date,
        })
    }

    pub fn benchmark(&self) -> &'static str {
        BENCHMARK_SYMBOL
    }
}

pub fn normalize_symbol(raw: &str) -> Result<String, EtfLensError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(EtfLensError::invalid_request("symbol is empty"));
    }
    if symbol
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '?' || c == '#')
    {
        return Err(EtfLensError::invalid_request(format!(
            "symbol {:?} contains invalid characters",
            symbol
        )));
    }
    Ok(symbol)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub periods_per_year: f64,
    /// Intersect instrument and benchmark on shared trading days.
    pub align_dates: bool,
    pub recent_rows: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            align_dates: true,
            recent_rows: DEFAULT_RECENT_ROWS,
        }
    }
}

/// Prices and the series derived from them for one symbol.
#[derive(Debug, Clone)]
pub struct SeriesAnalysis {
    pub prices: PriceSeries,
    pub returns: Vec<ReturnPoint>,
    pub cumulative: Vec<ReturnPoint>,
}

impl SeriesAnalysis {
    pub fn from_prices(prices: PriceSeries) -> Self {
        let returns = daily_returns(&prices);
        let cumulative = cumulative_returns(&returns);
        Self {
            prices,
            returns,
            cumulative,
        }
    }

    pub fn symbol(&self) -> &str {
        self.prices.symbol()
    }

    /// Final cumulative factor minus one, or 0 with fewer than two prices.
    pub fn total_return(&self) -> f64 {
        self.cumulative.last().map(|p| p.value - 1.0).unwrap_or(0.0)
    }
}

/// Instrument vs. benchmark figures for one look-back window.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub window: PeriodWindow,
    pub instrument: Performance,
    pub benchmark: Performance,
}

pub fn performance_table(
    instrument: &[ReturnPoint],
    benchmark: &[ReturnPoint],
    windows: &[PeriodWindow],
    periods_per_year: f64,
) -> Vec<PerformanceRow> {
    windows
        .iter()
        .map(|window| PerformanceRow {
            window: window.clone(),
            instrument: windowed_performance(instrument, window, periods_per_year),
            benchmark: windowed_performance(benchmark, window, periods_per_year),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    pub instrument: SeriesAnalysis,
    pub benchmark: SeriesAnalysis,
    pub performance: Vec<PerformanceRow>,
    /// Most recent raw rows of the instrument, oldest first.
    pub recent_rows: Vec<PriceBar>,
    pub aligned: bool,
    pub dropped_instrument_rows: usize,
    pub dropped_benchmark_rows: usize,
}

impl AnalysisReport {
    /// Explains windows with no observations, which render as "n/a".
    ///
    /// Only YTD can be empty: it happens when no instrument row falls in the
    /// end date's calendar year.
    pub fn empty_window_note(&self) -> Option<String> {
        let labels: Vec<&str> = self
            .performance
            .iter()
            .filter(|row| row.window.count == 0)
            .map(|row| row.window.label.as_str())
            .collect();
        if labels.is_empty() {
            return None;
        }
        Some(format!(
            "{}: no {} trading days in {} before {}, shown as n/a.",
            labels.join(", "),
            self.request.symbol,
            self.request.end_date.year(),
            self.request.end_date
        ))
    }
}

fn fetch_non_empty(
    data_port: &dyn DataPort,
    symbol: &str,
    request: &AnalysisRequest,
) -> Result<PriceSeries, EtfLensError> {
    let started = Instant::now();
    let series = data_port.fetch_prices(symbol, request.start_date, request.end_date)?;
    tracing::info!(
        symbol,
        rows = series.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "fetched price series"
    );
    if series.is_empty() {
        return Err(EtfLensError::NoData {
            symbol: symbol.to_string(),
            start: request.start_date,
            end: request.end_date,
        });
    }
    Ok(series)
}

/// Fetch both series and compute every derived output.
///
/// The first failed or empty fetch aborts the query; nothing is computed
/// from partial data.
pub fn run_analysis(
    data_port: &dyn DataPort,
    request: &AnalysisRequest,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, EtfLensError> {
    let instrument = fetch_non_empty(data_port, &request.symbol, request)?;
    let benchmark = fetch_non_empty(data_port, request.benchmark(), request)?;

    let recent_rows = instrument.tail(options.recent_rows).to_vec();

    let (instrument, benchmark, dropped_instrument_rows, dropped_benchmark_rows) =
        if options.align_dates {
            let aligned = align_on_common_dates(&instrument, &benchmark);
            if aligned.instrument.is_empty() {
                return Err(EtfLensError::invalid_request(format!(
                    "{} and {} have no trading days in common",
                    request.symbol,
                    request.benchmark()
                )));
            }
            if aligned.dropped_instrument > 0 || aligned.dropped_benchmark > 0 {
                tracing::warn!(
                    instrument = aligned.dropped_instrument,
                    benchmark = aligned.dropped_benchmark,
                    "dropped rows without a counterpart date"
                );
            }
            (
                aligned.instrument,
                aligned.benchmark,
                aligned.dropped_instrument,
                aligned.dropped_benchmark,
            )
        } else {
            (instrument, benchmark, 0, 0)
        };

    let windows = standard_windows(&instrument, request.end_date.year());
    let instrument = SeriesAnalysis::from_prices(instrument);
    let benchmark = SeriesAnalysis::from_prices(benchmark);
    let performance = performance_table(
        &instrument.returns,
        &benchmark.returns,
        &windows,
        options.periods_per_year,
    );

    tracing::debug!(
        windows = performance.len(),
        returns = instrument.returns.len(),
        "computed performance table"
    );

    Ok(AnalysisReport {
        request: request.clone(),
        instrument,
        benchmark,
        performance,
        recent_rows,
        aligned: options.align_dates,
        dropped_instrument_rows,
        dropped_benchmark_rows,
    })
}
