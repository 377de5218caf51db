//! HTTP request handlers for web adapter.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::html_report_adapter::render_report_body;
use crate::domain::analysis::{run_analysis, AnalysisRequest, BENCHMARK_SYMBOL};
use crate::domain::error::EtfLensError;
use crate::ports::config_port::DATE_FORMAT;

use super::{status_from_error, AppState, DashboardTemplate, WebError};

/// Query string of `GET /`. A missing `symbol` means the form was not
/// submitted yet.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub symbol: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_date(field: &str, raw: Option<&str>, default: NaiveDate) -> Result<NaiveDate, EtfLensError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
            EtfLensError::invalid_request(format!(
                "invalid {} {:?} (expected YYYY-MM-DD)",
                field, s
            ))
        }),
        None => Ok(default),
    }
}

fn html_response(status: StatusCode, page: &DashboardTemplate) -> Result<Response, WebError> {
    Ok((status, Html(page.to_html()?)).into_response())
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Response, WebError> {
    let defaults = &state.defaults;
    let default_end = defaults.end_date.unwrap_or_else(|| Local::now().date_naive());

    let mut page = DashboardTemplate {
        symbol: query
            .symbol
            .clone()
            .unwrap_or_else(|| defaults.symbol.clone()),
        start_date: query
            .start_date
            .clone()
            .unwrap_or_else(|| defaults.start_date.to_string()),
        end_date: query
            .end_date
            .clone()
            .unwrap_or_else(|| default_end.to_string()),
        benchmark: BENCHMARK_SYMBOL.to_string(),
        ..Default::default()
    };

    if query.symbol.is_none() {
        return html_response(StatusCode::OK, &page);
    }

    match analyze(&state, &query, defaults.start_date, default_end).await {
        Ok(report_html) => {
            page.report_html = report_html;
            html_response(StatusCode::OK, &page)
        }
        Err(err) => {
            tracing::warn!(error = %err, "analysis failed");
            page.error = err.to_string();
            html_response(status_from_error(&err), &page)
        }
    }
}

async fn analyze(
    state: &Arc<AppState>,
    query: &AnalyzeQuery,
    default_start: NaiveDate,
    default_end: NaiveDate,
) -> Result<String, EtfLensError> {
    let start = parse_date("start date", query.start_date.as_deref(), default_start)?;
    let end = parse_date("end date", query.end_date.as_deref(), default_end)?;
    let request = AnalysisRequest::new(query.symbol.as_deref().unwrap_or_default(), start, end)?;

    let state = Arc::clone(state);
    let report = tokio::task::spawn_blocking(move || {
        run_analysis(state.data_port.as_ref(), &request, &state.options)
    })
    .await
    .map_err(|e| EtfLensError::Report {
        reason: format!("analysis task failed: {}", e),
    })??;

    render_report_body(&report)
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
