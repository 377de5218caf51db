//! Daily price bars and the per-symbol price series.

use chrono::{Datelike, NaiveDate};

use super::error::EtfLensError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close adjusted for dividends and splits.
    pub adj_close: f64,
    pub volume: i64,
}

/// Date-ordered price history for one symbol.
///
/// Dates are strictly increasing; construction sorts the input and rejects
/// duplicated trading days. Every close and adjusted close is finite and
/// positive, so returns computed from the series are always defined.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self, EtfLensError> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.date);
        if let Some(w) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(EtfLensError::provider(
                &symbol,
                format!("duplicate price row for {}", w[0].date),
            ));
        }
        if let Some(b) = bars
            .iter()
            .find(|b| !is_valid_price(b.close) || !is_valid_price(b.adj_close))
        {
            return Err(EtfLensError::provider(
                &symbol,
                format!(
                    "invalid price on {} (close {}, adjusted close {})",
                    b.date, b.close, b.adj_close
                ),
            ));
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn adjusted_closes(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.bars.iter().map(|b| (b.date, b.adj_close))
    }

    /// The `n` most recent bars, oldest first.
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Number of bars dated in the given calendar year.
    pub fn rows_in_year(&self, year: i32) -> usize {
        self.bars.iter().filter(|b| b.date.year() == year).count()
    }

    /// Keep only the bars whose date satisfies `keep`.
    pub fn retain_dates<F>(&self, mut keep: F) -> PriceSeries
    where
        F: FnMut(NaiveDate) -> bool,
    {
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars.iter().filter(|b| keep(b.date)).cloned().collect(),
        }
    }
}

fn is_valid_price(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, adj_close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: adj_close,
            high: adj_close + 1.0,
            low: adj_close - 1.0,
            close: adj_close,
            adj_close,
            volume: 1_000,
        }
    }

    #[test]
    fn new_sorts_bars_by_date() {
        let series = PriceSeries::new(
            "QQQ",
            vec![bar("2024-01-03", 3.0), bar("2024-01-01", 1.0), bar("2024-01-02", 2.0)],
        )
        .unwrap();
        let closes: Vec<f64> = series.adjusted_closes().map(|(_, p)| p).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let err = PriceSeries::new("QQQ", vec![bar("2024-01-02", 1.0), bar("2024-01-02", 2.0)])
            .unwrap_err();
        assert!(matches!(err, EtfLensError::Provider { .. }));
    }

    #[test]
    fn new_rejects_non_positive_or_non_finite_prices() {
        for price in [0.0, -3.5, f64::NAN, f64::INFINITY] {
            let bars = vec![bar("2024-01-02", 1.0), bar("2024-01-03", price)];
            let err = PriceSeries::new("QQQ", bars).unwrap_err();
            assert!(
                matches!(err, EtfLensError::Provider { ref reason, .. } if reason.contains("2024-01-03")),
                "price {price} accepted"
            );
        }

        let mut raw_only = bar("2024-01-02", 10.0);
        raw_only.close = 0.0;
        assert!(PriceSeries::new("QQQ", vec![raw_only]).is_err());
    }

    #[test]
    fn tail_returns_most_recent_rows() {
        let series = PriceSeries::new(
            "QQQ",
            vec![bar("2024-01-01", 1.0), bar("2024-01-02", 2.0), bar("2024-01-03", 3.0)],
        )
        .unwrap();
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].adj_close, 2.0);
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn rows_in_year_counts_calendar_year() {
        let series = PriceSeries::new(
            "QQQ",
            vec![bar("2023-12-29", 1.0), bar("2024-01-02", 2.0), bar("2024-01-03", 3.0)],
        )
        .unwrap();
        assert_eq!(series.rows_in_year(2024), 2);
        assert_eq!(series.rows_in_year(2023), 1);
        assert_eq!(series.rows_in_year(2022), 0);
    }

    #[test]
    fn first_and_last_dates() {
        let series =
            PriceSeries::new("SPY", vec![bar("2024-01-05", 1.0), bar("2024-01-02", 2.0)]).unwrap();
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(series.symbol(), "SPY");
    }
}
