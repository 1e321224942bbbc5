//! Insight, feedback and live-research handlers.

use super::error::{ApiError, ApiResultExt};
use super::AppState;
use crate::research::insights::{self, Feedback};
use crate::research::live::{self, ActionOutcome, ResearchAction};
use crate::research::projects;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

pub(super) async fn list_insights(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let insights = insights::list_for_project(&state.stores, &project_id)
        .api_context("Failed to get insights")?;
    Ok(Json(json!({ "insights": insights })))
}

pub(super) async fn generate_insights(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    insights::generate(&state.stores, &project_id).api_context("Failed to generate insights")?;
    Ok(Json(json!({ "message": "Insights generated successfully" })))
}

pub(super) async fn submit_feedback(
    Path(insight_id): Path<String>,
    body: Result<Json<Feedback>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(feedback) = body?;
    insights::submit_feedback(&insight_id, &feedback);
    Ok(Json(json!({ "message": "Feedback submitted successfully" })))
}

pub(super) async fn live_updates(Path(project_id): Path<String>) -> Json<Value> {
    Json(json!({ "updates": live::live_updates(&project_id) }))
}

pub(super) async fn start_live(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    projects::start_research(&state.stores, &project_id, true)
        .api_context("Failed to start live research")?;
    Ok(Json(json!({ "message": "Live research started successfully" })))
}

pub(super) async fn advanced_live(Path(project_id): Path<String>) -> Json<Value> {
    Json(live::advanced_live(&project_id))
}

pub(super) async fn research_action(
    Path(project_id): Path<String>,
    body: Result<Json<ResearchAction>, JsonRejection>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let Json(action) = body?;
    Ok(Json(live::handle_action(&project_id, &action)))
}

pub(super) async fn stream(Path(project_id): Path<String>) -> Json<Value> {
    Json(json!({ "updates": live::stream_updates(&project_id) }))
}
