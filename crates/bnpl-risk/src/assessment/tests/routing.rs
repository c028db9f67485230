use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::assessment_router;
use crate::assessment::router::assess_handler;

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(body).expect("serializable body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn assessment_route_returns_decision_view() {
    let router = assessment_router(Arc::new(reference_service()));
    let payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("decision"), Some(&json!("APPROVE")));
    assert_eq!(body.get("risk_level"), Some(&json!("LOW")));
    assert_eq!(
        body.get("reasons"),
        Some(&json!(["No major risk factors detected"]))
    );
    assert_eq!(
        body.get("attributions")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(6)
    );
    assert!(body
        .get("probability_pct")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .ends_with('%'));
}

#[tokio::test]
async fn assessment_route_accepts_wire_employment_labels() {
    let router = assessment_router(Arc::new(reference_service()));
    let payload = json!({
        "age": 30,
        "monthly_income": 30000.0,
        "purchase_amount": 15000.0,
        "installments": 6,
        "employment_status": "Self-Employed",
        "avg_overdue_days": 6.0,
        "missed_payments": 1.0,
        "previous_bnpl_loans": 2.0
    });

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("decision"), Some(&json!("CONDITIONAL")));
    assert_eq!(
        body.get("decision_label"),
        Some(&json!("CONDITIONAL APPROVAL"))
    );
}

#[tokio::test]
async fn out_of_domain_input_is_unprocessable() {
    let router = assessment_router(Arc::new(reference_service()));
    let mut payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");
    payload["age"] = json!(71);

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("age 71"));
}

#[tokio::test]
async fn missing_field_is_rejected_without_partial_result() {
    let router = assessment_router(Arc::new(reference_service()));
    let mut payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("missed_payments");

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("missed_payments"));
}

#[tokio::test]
async fn unsupported_installments_are_rejected() {
    let router = assessment_router(Arc::new(reference_service()));
    let mut payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");
    payload["installments"] = json!(5);

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn scorer_contract_violation_is_internal_error() {
    let service = Arc::new(service_with(seven_feature_schema(), 1.5, vec![0.0; 7]));

    let response = assess_handler(State(service), Ok(axum::Json(prime_applicant()))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("outside [0, 1]"));
}

#[tokio::test]
async fn model_route_describes_loaded_schema() {
    let router = assessment_router(Arc::new(reference_service()));

    let response = router
        .oneshot(
            Request::get("/api/v1/bnpl/model")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body.get("feature_names")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(13)
    );
    assert_eq!(body.get("cutoff"), Some(&json!(0.22)));
}

#[tokio::test]
async fn unparseable_body_keeps_json_error_shape() {
    let router = assessment_router(Arc::new(reference_service()));
    let mut payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");
    payload["age"] = json!(300);

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body.get("error").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn overflowing_ratio_is_unprocessable_not_internal() {
    let router = assessment_router(Arc::new(reference_service()));
    let mut payload = serde_json::to_value(prime_applicant()).expect("serializable applicant");
    payload["monthly_income"] = json!(1e303);
    payload["purchase_amount"] = json!(0.0);

    let response = router
        .oneshot(json_request("/api/v1/bnpl/assessments", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("income_purchase_ratio"));
}
