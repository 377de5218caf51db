//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod console_summary;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod yahoo_adapter;
#[cfg(feature = "web")]
pub mod web;
