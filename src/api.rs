// src/api.rs
//! Routers for the two services. Each binary builds exactly one of these.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::error::{ReportError, ScoreError};
use crate::metrics::outcome;
use crate::report::{self, ReportParams, ReportRequest, ReportResult};
use crate::scoring::{self, ScoreResponse};

pub const SCORE_HEALTH_MESSAGE: &str = "Safety Score API is running";
pub const REPORT_HEALTH_MESSAGE: &str = "Case Report API is running";

/* ----------------------------
Safety score service
---------------------------- */

pub fn score_router() -> Router {
    Router::new()
        .route("/", get(score_health))
        .route("/calculate", post(calculate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

async fn score_health() -> Json<Value> {
    Json(json!({ "message": SCORE_HEALTH_MESSAGE }))
}

async fn calculate(Json(payload): Json<Map<String, Value>>) -> Result<Json<ScoreResponse>, ScoreError> {
    let res = scoring::calculate(&payload);
    metrics::counter!("safety_score_requests_total", "outcome" => outcome(&res)).increment(1);

    match res {
        Ok(resp) => {
            info!(safety_score = ?resp.safety_score, "safety score computed");
            Ok(Json(resp))
        }
        Err(e) => {
            warn!(error = %e, "rejecting score payload");
            Err(e)
        }
    }
}

/* ----------------------------
Case report service
---------------------------- */

#[derive(Clone)]
pub struct ReportState {
    pub output_dir: Arc<PathBuf>,
}

impl ReportState {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Arc::new(output_dir.into()),
        }
    }
}

pub fn report_router(state: ReportState) -> Router {
    Router::new()
        .route("/", get(report_health))
        .route("/report", post(create_report))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn report_health() -> Json<Value> {
    Json(json!({ "message": REPORT_HEALTH_MESSAGE, "status": "healthy" }))
}

/// Query parameters first; a JSON object body may supply whatever the query lacks.
async fn create_report(
    State(state): State<ReportState>,
    Query(query): Query<ReportParams>,
    body: Bytes,
) -> Result<Json<ReportResult>, ReportError> {
    let params = if body.is_empty() {
        query
    } else {
        match serde_json::from_slice::<ReportParams>(&body) {
            Ok(from_body) => query.or(from_body),
            Err(_) => query,
        }
    };

    let res = match ReportRequest::from_params(params) {
        Ok(req) => report::generate(&req, &state.output_dir).await,
        Err(e) => {
            warn!(error = %e, "rejecting report request");
            Err(e)
        }
    };
    metrics::counter!("case_reports_total", "outcome" => outcome(&res)).increment(1);
    res.map(Json)
}
