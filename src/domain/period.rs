//! Named trailing look-back windows.

use std::fmt;

use super::price::PriceSeries;

/// A named trailing window counted in trading-day observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub label: String,
    pub count: usize,
}

impl PeriodWindow {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} days)", self.label, self.count)
    }
}

/// The fixed report windows: 1M, 3M, 6M, 1Y, YTD, 3Y, 5Y, 10Y.
///
/// YTD counts the instrument's price rows dated in `end_year`. A year with
/// no rows produces an empty window rather than the full history.
pub fn standard_windows(instrument: &PriceSeries, end_year: i32) -> Vec<PeriodWindow> {
    vec![
        PeriodWindow::new("1M", 21),
        PeriodWindow::new("3M", 63),
        PeriodWindow::new("6M", 126),
        PeriodWindow::new("1Y", 252),
        PeriodWindow::new("YTD", instrument.rows_in_year(end_year)),
        PeriodWindow::new("3Y", 252 * 3),
        PeriodWindow::new("5Y", 252 * 5),
        PeriodWindow::new("10Y", 252 * 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use chrono::NaiveDate;

    fn series(dates: &[&str]) -> PriceSeries {
        let bars = dates
            .iter()
            .map(|d| PriceBar {
                date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                adj_close: 1.0,
                volume: 0,
            })
            .collect();
        PriceSeries::new("QQQ", bars).unwrap()
    }

    #[test]
    fn standard_windows_are_ordered() {
        let windows = standard_windows(&series(&["2024-01-02"]), 2024);
        let labels: Vec<&str> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["1M", "3M", "6M", "1Y", "YTD", "3Y", "5Y", "10Y"]);
        assert_eq!(windows[7].count, 2520);
    }

    #[test]
    fn ytd_counts_rows_in_end_year() {
        let windows = standard_windows(
            &series(&["2023-12-28", "2023-12-29", "2024-01-02", "2024-01-03"]),
            2024,
        );
        assert_eq!(windows[4], PeriodWindow::new("YTD", 2));
    }

    #[test]
    fn ytd_without_rows_is_empty() {
        let windows = standard_windows(&series(&["2023-12-29"]), 2024);
        assert_eq!(windows[4].count, 0);
    }

    #[test]
    fn display_includes_day_count() {
        assert_eq!(PeriodWindow::new("1M", 21).to_string(), "1M (21 days)");
    }
}
