use super::error::{ApiError, ApiResultExt};
use super::AppState;
use crate::research::projects::{self, NewProject};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

pub(super) async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let projects = projects::list_projects(&state.stores).api_context("Failed to get projects")?;
    Ok(Json(json!({ "projects": projects })))
}

pub(super) async fn create_project(
    State(state): State<AppState>,
    body: Result<Json<NewProject>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let project =
        projects::create_project(&state.stores, request).api_context("Failed to create project")?;
    Ok((StatusCode::CREATED, Json(json!({ "project": project }))))
}

pub(super) async fn start_research(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    projects::start_research(&state.stores, &project_id, false)
        .api_context("Failed to start research")?;
    Ok(Json(json!({ "message": "Research started successfully" })))
}
