//! Configuration access port trait.

use chrono::NaiveDate;

use crate::domain::error::EtfLensError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts true/yes/on/1 and false/no/off/0, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// A `YYYY-MM-DD` value; `Ok(None)` when the key is absent or blank.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, EtfLensError> {
        match self.get_string(section, key) {
            Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(Some)
                .map_err(|_| {
                    EtfLensError::config_invalid(
                        section,
                        key,
                        "invalid date format (expected YYYY-MM-DD)",
                    )
                }),
            _ => Ok(None),
        }
    }
}
