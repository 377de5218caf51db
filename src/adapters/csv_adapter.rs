//! CSV file data adapter.
//!
//! Reads `{data_dir}/{SYMBOL}.csv` with the header
//! `date,open,high,low,close,adj_close,volume`.

use crate::domain::error::EtfLensError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::config_port::DATE_FORMAT;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<&'r str, EtfLensError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| EtfLensError::provider(symbol, format!("missing {} column", name)))
}

fn number<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, EtfLensError>
where
    T::Err: std::fmt::Display,
{
    let raw = column(record, index, name, symbol)?;
    raw.parse().map_err(|e| {
        EtfLensError::provider(symbol, format!("invalid {} value {:?}: {}", name, raw, e))
    })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, EtfLensError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(EtfLensError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            EtfLensError::provider(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| EtfLensError::provider(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = column(&record, 0, "date", symbol)?;
            let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
                EtfLensError::provider(symbol, format!("invalid date {:?}: {}", date_str, e))
            })?;

            if date < start || date >= end {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: number(&record, 1, "open", symbol)?,
                high: number(&record, 2, "high", symbol)?,
                low: number(&record, 3, "low", symbol)?,
                close: number(&record, 4, "close", symbol)?,
                adj_close: number(&record, 5, "adj_close", symbol)?,
                volume: number(&record, 6, "volume", symbol)?,
            });
        }

        if bars.is_empty() {
            return Err(EtfLensError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        tracing::debug!(symbol, rows = bars.len(), path = %path.display(), "loaded CSV prices");
        PriceSeries::new(symbol, bars)
    }
}
