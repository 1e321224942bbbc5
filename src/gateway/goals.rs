use super::error::{ApiError, ApiResultExt};
use super::AppState;
use crate::research::goals::{self, NewGoal};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Map, Value};

pub(super) async fn list_goals(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let goals = goals::list_for_project(&state.stores, &project_id).api_context("Failed to get goals")?;
    Ok(Json(json!({ "goals": goals })))
}

pub(super) async fn create_goal(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    body: Result<Json<NewGoal>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let goal = goals::create_goal(&state.stores, &project_id, request)
        .api_context("Failed to create goal")?;
    Ok((StatusCode::CREATED, Json(json!({ "goal": goal }))))
}

pub(super) async fn update_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(patch) = body?;
    let goal =
        goals::update_goal(&state.stores, &goal_id, &patch).api_context("Failed to update goal")?;
    Ok(Json(json!({ "goal": goal })))
}

pub(super) async fn delete_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    goals::delete_goal(&state.stores, &goal_id).api_context("Failed to delete goal")?;
    Ok(Json(json!({ "message": "Goal deleted successfully" })))
}
