//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod period;
pub mod price;
pub mod returns;
pub mod timeline;
