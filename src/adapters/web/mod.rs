//! Web dashboard adapter.
//!
//! Axum server with a single form page: submitting a symbol and date range
//! runs the analysis on a blocking worker and renders the report inline.

mod error;
mod handlers;
mod templates;

pub use error::{status_from_error, WebError};
pub use handlers::*;
pub use templates::*;

use axum::{routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::analysis::{default_start_date, AnalysisOptions, DEFAULT_SYMBOL};
use crate::ports::data_port::DataPort;

/// Values pre-filled in the form when the query string omits them.
#[derive(Debug, Clone)]
pub struct DashboardDefaults {
    pub symbol: String,
    pub start_date: NaiveDate,
    /// `None` means today.
    pub end_date: Option<NaiveDate>,
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            start_date: default_start_date(),
            end_date: None,
        }
    }
}

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub options: AnalysisOptions,
    pub defaults: DashboardDefaults,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
