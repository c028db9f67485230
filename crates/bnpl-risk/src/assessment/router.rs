use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use super::domain::ApplicantInput;
use super::service::{AssessmentError, RiskAssessmentService};

/// Router builder exposing the assessment and model metadata endpoints.
pub fn assessment_router(service: Arc<RiskAssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/bnpl/assessments", post(assess_handler))
        .route("/api/v1/bnpl/model", get(model_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<RiskAssessmentService>>,
    payload: Result<Json<ApplicantInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), Json(payload)).into_response();
        }
    };

    match service.assess(&input) {
        Ok(assessment) => (StatusCode::OK, Json(assessment.view(Utc::now()))).into_response(),
        Err(AssessmentError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "assessment aborted");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn model_handler(
    State(service): State<Arc<RiskAssessmentService>>,
) -> Response {
    (StatusCode::OK, Json(service.model_info())).into_response()
}
