use super::model::Goal;
use crate::error::{Error, Result};
use crate::store::Stores;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

pub const DEFAULT_PRIORITY: &str = "medium";
pub const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGoal {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

pub fn list_for_project(stores: &Stores, project_id: &str) -> Result<Vec<Goal>> {
    stores
        .goals
        .list_where(&|goal: &Goal| goal.project_id == project_id)
}

/// Create a goal under `project_id`. The project is not required to exist.
pub fn create_goal(stores: &Stores, project_id: &str, request: NewGoal) -> Result<Goal> {
    let title = request.title.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return Err(Error::validation("Goal title is required"));
    }

    let now = Utc::now();
    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        title,
        description: request
            .description
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string(),
        priority: request
            .priority
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        status: DEFAULT_STATUS.to_string(),
        project_id: project_id.to_string(),
        created_at: now,
        updated_at: now,
        progress: 0,
        extra: Map::new(),
    };
    stores.goals.put(goal.clone())?;

    tracing::info!(goal_id = %goal.id, project_id, "Created goal: {}", goal.title);
    Ok(goal)
}

/// Shallow-merge `patch` over `goal` and stamp `updated_at`.
///
/// Any field may be replaced except `id`, which stays tied to the storage key.
/// A value of the wrong type for a known field is a validation error.
pub fn merge_patch(goal: &Goal, patch: &Map<String, Value>, now: DateTime<Utc>) -> Result<Goal> {
    let Value::Object(mut fields) = serde_json::to_value(goal)? else {
        return Err(Error::Internal("goal did not serialize to an object".into()));
    };
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        fields.insert(key.clone(), value.clone());
    }
    fields.insert("updated_at".into(), serde_json::to_value(now)?);

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::validation(format!("Invalid goal update: {e}")))
}

pub fn update_goal(stores: &Stores, goal_id: &str, patch: &Map<String, Value>) -> Result<Goal> {
    let goal = stores
        .goals
        .update(goal_id, &mut |goal: &mut Goal| {
            *goal = merge_patch(goal, patch, Utc::now())?;
            Ok(())
        })?
        .ok_or_else(|| Error::not_found("Goal not found"))?;

    tracing::info!(goal_id, "Updated goal: {}", goal.title);
    Ok(goal)
}

pub fn delete_goal(stores: &Stores, goal_id: &str) -> Result<Goal> {
    let goal = stores
        .goals
        .delete(goal_id)?
        .ok_or_else(|| Error::not_found("Goal not found"))?;
    tracing::info!(goal_id, "Deleted goal: {}", goal.title);
    Ok(goal)
}
