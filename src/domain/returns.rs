//! Return and risk calculations.
//!
//! Every function here is a pure, order-preserving transform: the same input
//! always yields bit-identical output.

use chrono::NaiveDate;

use super::period::PeriodWindow;
use super::price::PriceSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A dated value in a derived series (daily return or cumulative factor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Annualized mean return and volatility of a return window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub mean_annual: f64,
    pub vol_annual: f64,
    /// Number of daily returns the figures were computed from.
    pub observations: usize,
}

impl Performance {
    /// False for an empty window, whose figures are NaN.
    pub fn is_defined(&self) -> bool {
        self.observations > 0
    }
}

/// price[t] / price[t-1] - 1 over adjusted closes, dated at t.
///
/// The first observation has no prior reference and is dropped, so the
/// result is one shorter than the input.
pub fn daily_returns(series: &PriceSeries) -> Vec<ReturnPoint> {
    series
        .bars()
        .windows(2)
        .map(|w| {
            ReturnPoint {
                date: w[1].date,
                value: w[1].adj_close / w[0].adj_close - 1.0,
            }
        })
        .collect()
}

/// Running product of (1 + r).
pub fn cumulative_returns(returns: &[ReturnPoint]) -> Vec<ReturnPoint> {
    let mut factor = 1.0_f64;
    returns
        .iter()
        .map(|r| {
            factor *= 1.0 + r.value;
            ReturnPoint {
                date: r.date,
                value: factor,
            }
        })
        .collect()
}

/// Simple (non-compounded) annualization: mean x periods, population stdev x sqrt(periods).
pub fn annualized_performance(returns: &[ReturnPoint], periods_per_year: f64) -> Performance {
    if returns.is_empty() {
        return Performance {
            mean_annual: f64::NAN,
            vol_annual: f64::NAN,
            observations: 0,
        };
    }

    let n = returns.len() as f64;
    let mean = returns.iter().map(|r| r.value).sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| (r.value - mean).powi(2))
        .sum::<f64>()
        / n;

    Performance {
        mean_annual: mean * periods_per_year,
        vol_annual: variance.sqrt() * periods_per_year.sqrt(),
        observations: returns.len(),
    }
}

/// The trailing `count` entries, or all of them when fewer exist.
pub fn trailing(returns: &[ReturnPoint], count: usize) -> &[ReturnPoint] {
    &returns[returns.len().saturating_sub(count)..]
}

/// Annualized performance over the window's trailing observations.
///
/// A window longer than the available history silently uses everything there is.
pub fn windowed_performance(
    returns: &[ReturnPoint],
    window: &PeriodWindow,
    periods_per_year: f64,
) -> Performance {
    annualized_performance(trailing(returns, window.count), periods_per_year)
}
