//! Yahoo Finance chart API adapter.
//!
//! Fetches daily bars from the v8 chart endpoint with a blocking HTTP client.
//! A request timeout bounds how long a slow provider can stall a query.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::error::EtfLensError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("etflens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn value_at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decode a chart response body into a price series.
///
/// Rows whose close is null are skipped; a missing adjusted close falls back
/// to the raw close. Only dates in `[start, end)` are kept.
pub fn parse_chart_response(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    body: &str,
) -> Result<PriceSeries, EtfLensError> {
    let no_data = || EtfLensError::NoData {
        symbol: symbol.to_string(),
        start,
        end,
    };

    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| EtfLensError::provider(symbol, format!("invalid chart response: {}", e)))?;

    if let Some(err) = envelope.chart.error {
        if err.code.eq_ignore_ascii_case("Not Found") {
            return Err(no_data());
        }
        return Err(EtfLensError::provider(
            symbol,
            format!(
                "{}: {}",
                err.code,
                err.description.unwrap_or_default()
            ),
        ));
    }

    let result = match envelope.chart.result.and_then(|r| r.into_iter().next()) {
        Some(r) => r,
        None => return Err(no_data()),
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, i) else {
            continue;
        };
        let Some(moment) = ts
            .checked_add(result.meta.gmtoffset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
        else {
            return Err(EtfLensError::provider(
                symbol,
                format!("timestamp {} out of range", ts),
            ));
        };
        let date = moment.date_naive();
        if date < start || date >= end {
            continue;
        }

        bars.push(PriceBar {
            date,
            open: value_at(&quote.open, i).unwrap_or(close),
            high: value_at(&quote.high, i).unwrap_or(close),
            low: value_at(&quote.low, i).unwrap_or(close),
            close,
            adj_close: value_at(&adjclose, i).unwrap_or(close),
            volume: value_at(&quote.volume, i).unwrap_or(0),
        });
    }

    if bars.is_empty() {
        return Err(no_data());
    }
    PriceSeries::new(symbol, bars)
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EtfLensError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| EtfLensError::provider("-", format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EtfLensError> {
        let base_url = config
            .get_string("provider", "base_url")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = config.get_int("provider", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        let timeout = Duration::from_secs(timeout.max(1) as u64);
        Self::new(&base_url, timeout)
    }

    pub fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

impl DataPort for YahooAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, EtfLensError> {
        let url = self.chart_url(symbol);
        let period1 = unix_seconds(start).to_string();
        let period2 = unix_seconds(end).to_string();
        tracing::debug!(%url, symbol, %start, %end, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "div,split"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .map_err(|e| EtfLensError::provider(symbol, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| EtfLensError::provider(symbol, format!("failed to read body: {}", e)))?;

        // Unknown symbols come back as 404 with a chart error payload.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(EtfLensError::provider(
                symbol,
                format!("HTTP {}", status),
            ));
        }

        parse_chart_response(symbol, start, end, &body)
    }
}
