//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use std::str::FromStr;

use crate::domain::error::EtfLensError;
use crate::ports::config_port::{parse_bool, ConfigPort};

pub const PROVIDER_SOURCES: &[&str] = &["yahoo", "csv"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_periods_per_year(config)?;
    validate_recent_rows(config)?;
    validate_align_dates(config)?;
    Ok(())
}

pub fn validate_provider_config(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    validate_source(config)?;
    validate_timeout(config)?;
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    if let Some(symbol) = config.get_string("analysis", "symbol") {
        crate::domain::analysis::normalize_symbol(&symbol)
            .map_err(|e| EtfLensError::config_invalid("analysis", "symbol", e.to_string()))?;
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    let start = config.get_date("analysis", "start_date")?;
    let end = config.get_date("analysis", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(EtfLensError::config_invalid(
                "analysis",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// A present value must parse as `T`.
fn check_parses<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<(), EtfLensError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<T>().is_err() => Err(EtfLensError::config_invalid(
            section,
            key,
            format!("{:?} is not {}", raw, expected),
        )),
        _ => Ok(()),
    }
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    check_parses::<f64>(config, "analysis", "periods_per_year", "a number")?;
    let value = config.get_double("analysis", "periods_per_year", 252.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(EtfLensError::config_invalid(
            "analysis",
            "periods_per_year",
            "periods_per_year must be positive",
        ));
    }
    Ok(())
}

fn validate_recent_rows(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    check_parses::<i64>(config, "analysis", "recent_rows", "an integer")?;
    let value = config.get_int("analysis", "recent_rows", 5);
    if value < 1 {
        return Err(EtfLensError::config_invalid(
            "analysis",
            "recent_rows",
            "recent_rows must be at least 1",
        ));
    }
    Ok(())
}

fn validate_align_dates(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    match config.get_string("analysis", "align_dates") {
        Some(raw) if parse_bool(&raw).is_none() => Err(EtfLensError::config_invalid(
            "analysis",
            "align_dates",
            format!("{:?} is not a boolean (true/false, yes/no, on/off, 1/0)", raw),
        )),
        _ => Ok(()),
    }
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    let source = config
        .get_string("provider", "source")
        .unwrap_or_else(|| "yahoo".to_string())
        .trim()
        .to_lowercase();

    if !PROVIDER_SOURCES.contains(&source.as_str()) {
        return Err(EtfLensError::config_invalid(
            "provider",
            "source",
            format!("unknown source {:?} (expected one of: yahoo, csv)", source),
        ));
    }

    if source == "csv" {
        match config.get_string("provider", "data_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            _ => {
                return Err(EtfLensError::ConfigMissing {
                    section: "provider".to_string(),
                    key: "data_dir".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), EtfLensError> {
    check_parses::<i64>(config, "provider", "timeout_secs", "an integer")?;
    let value = config.get_int("provider", "timeout_secs", 30);
    if value < 1 {
        return Err(EtfLensError::config_invalid(
            "provider",
            "timeout_secs",
            "timeout_secs must be at least 1",
        ));
    }
    Ok(())
}
