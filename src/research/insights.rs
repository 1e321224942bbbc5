use super::fixtures::GENERATED_INSIGHTS;
use super::model::Insight;
use super::projects::advance_progress;
use crate::error::Result;
use crate::store::Stores;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

/// Progress credited to a project per "generate" call.
pub const GENERATE_PROGRESS_STEP: u8 = 25;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub feedback_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

pub fn list_for_project(stores: &Stores, project_id: &str) -> Result<Vec<Insight>> {
    stores
        .insights
        .list_where(&|insight: &Insight| insight.project_id == project_id)
}

/// Append the canned insight set for `project_id` and credit the project's
/// research progress. Insights are stored even when the project is unknown.
pub fn generate(stores: &Stores, project_id: &str) -> Result<Vec<Insight>> {
    let now = Utc::now();
    let insights: Vec<Insight> = GENERATED_INSIGHTS
        .iter()
        .map(|template| Insight {
            id: Uuid::new_v4().to_string(),
            content: template.content.to_string(),
            insight_type: template.insight_type,
            confidence_score: template.confidence_score,
            relevance_score: template.relevance_score,
            tags: template.tags.iter().map(|t| (*t).to_string()).collect(),
            project_id: project_id.to_string(),
            created_at: now,
        })
        .collect();
    stores.insights.put_many(insights.clone())?;

    if advance_progress(stores, project_id, GENERATE_PROGRESS_STEP)?.is_none() {
        tracing::debug!(project_id, "Generated insights for an unknown project");
    }

    tracing::info!(project_id, count = insights.len(), "Generated insights");
    Ok(insights)
}

/// Feedback is recorded in the log only.
pub fn submit_feedback(insight_id: &str, feedback: &Feedback) {
    tracing::info!(
        insight_id,
        feedback_type = feedback.feedback_type.as_deref().unwrap_or("unspecified"),
        has_content = feedback.content.is_some(),
        "Feedback submitted"
    );
}
