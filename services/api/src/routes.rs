use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use road_risk::assessment::{assessment_router, AssessmentRepository, AssessmentService};
use road_risk::risk::{
    apply_direct_override, FieldGuidance, LmhEngine, LmhInputs, LmhResult, RiskResult,
    ScorecardEngine, ScorecardInputs,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Scorecard preview: direct totals win over per-factor ratings when both totals are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScorecardPreviewRequest {
    #[serde(default)]
    pub(crate) hazard_score: Option<u32>,
    #[serde(default)]
    pub(crate) consequence_score: Option<u32>,
    #[serde(flatten)]
    pub(crate) factors: ScorecardInputs,
    #[serde(default, rename = "override")]
    pub(crate) override_preview: Option<OverridePreview>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LmhPreviewRequest {
    #[serde(flatten)]
    pub(crate) inputs: LmhInputs,
    #[serde(default, rename = "override")]
    pub(crate) override_preview: Option<OverridePreview>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OverridePreview {
    pub(crate) level: String,
    #[serde(default)]
    pub(crate) justification: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScorecardPreviewResponse {
    #[serde(flatten)]
    pub(crate) result: RiskResult,
    pub(crate) management_recommendations: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LmhPreviewResponse {
    #[serde(flatten)]
    pub(crate) result: LmhResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field_guidance: Option<FieldGuidance>,
}

pub(crate) fn with_assessment_routes<R>(service: Arc<AssessmentService<R>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/risk/scorecard",
            axum::routing::post(scorecard_preview_endpoint),
        )
        .route("/api/v1/risk/lmh", axum::routing::post(lmh_preview_endpoint))
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
        json!({ "status": "ready", "default_method": state.default_method.key() })
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

pub(crate) async fn scorecard_preview_endpoint(
    Json(payload): Json<ScorecardPreviewRequest>,
) -> Response {
    let engine = ScorecardEngine;
    let result = match (payload.hazard_score, payload.consequence_score) {
        (Some(hazard), Some(consequence)) => Some(engine.calculate_initial_risk(hazard, consequence)),
        _ => engine.calculate(&payload.factors),
    };

    let Some(result) = result else {
        return incomplete_response(payload.factors.missing());
    };

    let result = match with_override(result, payload.override_preview.as_ref()) {
        Ok(result) => result,
        Err(response) => return response,
    };

    let management_recommendations = engine.management_recommendations(result.overrides.final_risk);
    let body = ScorecardPreviewResponse {
        result,
        management_recommendations,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn lmh_preview_endpoint(Json(payload): Json<LmhPreviewRequest>) -> Response {
    let engine = LmhEngine;
    let Some(result) = engine.classify_inputs(&payload.inputs) else {
        return incomplete_response(payload.inputs.missing());
    };

    let result = match with_override(result, payload.override_preview.as_ref()) {
        Ok(result) => result,
        Err(response) => return response,
    };

    let field_guidance = engine.field_guidance(Some(result.likelihood), Some(result.consequence));
    (
        StatusCode::OK,
        Json(LmhPreviewResponse {
            result,
            field_guidance,
        }),
    )
        .into_response()
}

fn with_override<T>(result: T, preview: Option<&OverridePreview>) -> Result<T, Response>
where
    T: road_risk::risk::Overridable,
{
    let Some(preview) = preview else {
        return Ok(result);
    };

    apply_direct_override(&result, &preview.level, &preview.justification).map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
    })
}

fn incomplete_response(missing: Vec<String>) -> Response {
    let payload = json!({
        "status": "incomplete",
        "missing": missing,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
