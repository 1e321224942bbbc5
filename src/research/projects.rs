use super::model::{Project, ProjectStatus};
use crate::error::{Error, Result};
use crate::store::Stores;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn counts_by_project<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// Every project, with document/goal/insight counts derived from the other
/// collections at call time.
pub fn list_projects(stores: &Stores) -> Result<Vec<Project>> {
    let mut projects = stores.projects.list()?;
    let files = stores.files.list()?;
    let goals = stores.goals.list()?;
    let insights = stores.insights.list()?;

    let documents = counts_by_project(files.iter().map(|f| f.project_id.as_str()));
    let goal_counts = counts_by_project(goals.iter().map(|g| g.project_id.as_str()));
    let insight_counts = counts_by_project(insights.iter().map(|i| i.project_id.as_str()));

    for project in &mut projects {
        let id = project.id.as_str();
        project.documents_count = documents.get(id).copied().unwrap_or(0);
        project.goals_count = goal_counts.get(id).copied().unwrap_or(0);
        project.insights_count = insight_counts.get(id).copied().unwrap_or(0);
    }

    tracing::info!("Returning {} projects", projects.len());
    Ok(projects)
}

pub fn create_project(stores: &Stores, request: NewProject) -> Result<Project> {
    let name = request.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Project name is required"));
    }
    let description = request
        .description
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        status: ProjectStatus::Setup,
        created_at: now,
        updated_at: now,
        documents_count: 0,
        goals_count: 0,
        insights_count: 0,
        research_progress: 0,
        live_research_started: None,
    };
    stores.projects.put(project.clone())?;

    tracing::info!(project_id = %project.id, "Created project: {}", project.name);
    Ok(project)
}

/// Move a project into `researching` and reset its progress. `live` also
/// marks the project as running a live session.
pub fn start_research(stores: &Stores, project_id: &str, live: bool) -> Result<Project> {
    let project = stores
        .projects
        .update(project_id, &mut |project: &mut Project| {
            project.status = ProjectStatus::Researching;
            project.research_progress = 0;
            project.updated_at = Utc::now();
            if live {
                project.live_research_started = Some(true);
            }
            Ok(())
        })?
        .ok_or_else(|| Error::not_found("Project not found"))?;

    tracing::info!(
        project_id,
        live,
        "Started research for project: {}",
        project.name
    );
    Ok(project)
}

/// Raise research progress by `step`, capped at 100. Unknown projects are
/// left alone and yield `None`.
pub fn advance_progress(stores: &Stores, project_id: &str, step: u8) -> Result<Option<Project>> {
    stores.projects.update(project_id, &mut |project: &mut Project| {
        project.research_progress = project.research_progress.saturating_add(step).min(100);
        project.updated_at = Utc::now();
        Ok(())
    })
}
