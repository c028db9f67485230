use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bnpl_risk::assessment::{
    assessment_router, AssessmentView, BatchAssessor, BatchReport, BatchSummary,
    RiskAssessmentService,
};
use bnpl_risk::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    /// CSV export with the applicant header row.
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) summary: BatchSummary,
    pub(crate) rows: Vec<BatchRowView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRowView {
    pub(crate) line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) assessment: Option<AssessmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl BatchResponse {
    pub(crate) fn from_report(report: &BatchReport, assessed_at: DateTime<Utc>) -> Self {
        let rows = report
            .entries
            .iter()
            .map(|entry| match &entry.outcome {
                Ok(assessment) => BatchRowView {
                    line: entry.line,
                    assessment: Some(assessment.view(assessed_at)),
                    error: None,
                },
                Err(err) => BatchRowView {
                    line: entry.line,
                    assessment: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();

        Self {
            summary: report.summary(),
            rows,
        }
    }
}

pub(crate) fn with_assessment_routes(service: Arc<RiskAssessmentService>) -> axum::Router {
    let batch = axum::Router::new()
        .route(
            "/api/v1/bnpl/batch",
            axum::routing::post(batch_assessment_endpoint),
        )
        .with_state(service.clone());

    assessment_router(service)
        .merge(batch)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn batch_assessment_endpoint(
    State(service): State<Arc<RiskAssessmentService>>,
    Json(payload): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let report = BatchAssessor::new(&service).assess_reader(reader)?;
    Ok(Json(BatchResponse::from_report(&report, Utc::now())))
}
