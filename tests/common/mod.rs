#![allow(dead_code)]

use chrono::NaiveDate;
use etflens::domain::error::EtfLensError;
use etflens::domain::price::{PriceBar, PriceSeries};
use etflens::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory `DataPort`. Symbols without bars yield an empty series, which
/// the analysis turns into `NoData`.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, EtfLensError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(EtfLensError::provider(symbol, reason.clone()));
        }
        let bars = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(symbol, bars)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, adj_close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: adj_close - 1.0,
        high: adj_close + 1.0,
        low: adj_close - 2.0,
        close: adj_close,
        adj_close,
        volume: 1000,
    }
}

/// `count` consecutive calendar days of bars, rising by `step` per day.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64, step: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let price = start_price + step * i as f64;
            PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: price,
                high: price + 1.0,
                low: price - 1.0,
                close: price,
                adj_close: price,
                volume: 1000 + i as i64,
            }
        })
        .collect()
}

/// Write `{symbol}.csv` in the CSV adapter's format.
pub fn write_csv(dir: &std::path::Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,adj_close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.adj_close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
