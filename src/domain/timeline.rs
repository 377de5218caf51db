//! Calendar alignment between the instrument and the benchmark.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::price::PriceSeries;

/// Outcome of intersecting two series on their shared trading days.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    pub instrument: PriceSeries,
    pub benchmark: PriceSeries,
    /// Instrument rows without a benchmark counterpart.
    pub dropped_instrument: usize,
    /// Benchmark rows without an instrument counterpart.
    pub dropped_benchmark: usize,
}

pub fn common_dates(a: &PriceSeries, b: &PriceSeries) -> BTreeSet<NaiveDate> {
    let a_dates: BTreeSet<NaiveDate> = a.bars().iter().map(|bar| bar.date).collect();
    b.bars()
        .iter()
        .map(|bar| bar.date)
        .filter(|d| a_dates.contains(d))
        .collect()
}

/// Restrict both series to the dates present in both.
pub fn align_on_common_dates(instrument: &PriceSeries, benchmark: &PriceSeries) -> AlignedPair {
    let shared = common_dates(instrument, benchmark);
    let aligned_instrument = instrument.retain_dates(|d| shared.contains(&d));
    let aligned_benchmark = benchmark.retain_dates(|d| shared.contains(&d));

    AlignedPair {
        dropped_instrument: instrument.len() - aligned_instrument.len(),
        dropped_benchmark: benchmark.len() - aligned_benchmark.len(),
        instrument: aligned_instrument,
        benchmark: aligned_benchmark,
    }
}
