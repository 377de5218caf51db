//! HTTP error responses for web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::error::EtfLensError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &EtfLensError) -> StatusCode {
    match err {
        EtfLensError::InvalidRequest { .. }
        | EtfLensError::ConfigMissing { .. }
        | EtfLensError::ConfigInvalid { .. }
        | EtfLensError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        EtfLensError::NoData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EtfLensError::Provider { .. } => StatusCode::BAD_GATEWAY,
        EtfLensError::Report { .. } | EtfLensError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EtfLensError> for WebError {
    fn from(err: EtfLensError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
