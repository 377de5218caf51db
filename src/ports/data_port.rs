//! Market data access port.

use crate::domain::error::EtfLensError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

/// Source of daily price history.
///
/// `start` is inclusive and `end` exclusive. Implementations report an
/// unreachable or malformed source as [`EtfLensError::Provider`] and an
/// empty result as [`EtfLensError::NoData`].
pub trait DataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, EtfLensError>;
}
