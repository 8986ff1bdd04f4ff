// src/error.rs
//! Domain errors for both services and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised while turning a `/calculate` payload into a score.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A factor was present but is not a JSON number.
    #[error("invalid input for '{field}': expected a number, got {found}")]
    InvalidInput { field: &'static str, found: String },

    /// The float arithmetic left the finite range (`+inf` or `NaN`).
    #[error("score out of range for geofence_risk={geofence_risk}, anomalies={anomalies}")]
    OutOfRange { geofence_risk: f64, anomalies: f64 },
}

/// Errors raised while generating a case report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("pdf rendering failed: {0}")]
    Render(String),

    #[error("writing report failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoreError {
    fn code(&self) -> &'static str {
        match self {
            ScoreError::InvalidInput { .. } => "INVALID_INPUT",
            ScoreError::OutOfRange { .. } => "OUT_OF_RANGE",
        }
    }
}

impl ReportError {
    fn status(&self) -> StatusCode {
        match self {
            ReportError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::Render(_) | ReportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ReportError::MissingField(_) => "MISSING_FIELD",
            ReportError::Render(_) => "RENDER_ERROR",
            ReportError::Io(_) => "IO_ERROR",
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        error_body(StatusCode::UNPROCESSABLE_ENTITY, self.code(), self.to_string())
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        error_body(self.status(), self.code(), self.to_string())
    }
}
