//! Simulated live-research feeds. See [`super::fixtures`].

use super::fixtures;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ResearchUpdate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub details: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamUpdate {
    /// `MM:SS` of the wall clock.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub progress: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchAction {
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub action_data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextUpdate {
    pub timestamp: String,
    pub content: String,
    pub ai_message: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchInfo {
    pub id: String,
    pub focus: String,
    pub estimated_duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub action_processed: bool,
    pub new_branch_created: bool,
    pub main_thread_updated: bool,
    pub next_update: NextUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_info: Option<BranchInfo>,
}

fn clock(now: DateTime<Utc>) -> String {
    now.format("%M:%S").to_string()
}

pub fn live_updates(project_id: &str) -> Vec<ResearchUpdate> {
    tracing::debug!(project_id, "Serving live research updates");
    let now = Utc::now();
    fixtures::live_update_entries()
        .into_iter()
        .map(|(kind, content, status, details)| ResearchUpdate {
            id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            content: content.to_string(),
            timestamp: now,
            status: status.to_string(),
            details,
        })
        .collect()
}

pub fn advanced_live(project_id: &str) -> Value {
    tracing::debug!(project_id, "Serving advanced research session");
    fixtures::advanced_session(Utc::now())
}

pub fn stream_updates(project_id: &str) -> Vec<StreamUpdate> {
    tracing::debug!(project_id, "Serving research stream");
    let stamp = clock(Utc::now());
    fixtures::STREAM_ENTRIES
        .iter()
        .map(|(kind, content, progress)| StreamUpdate {
            timestamp: stamp.clone(),
            kind: (*kind).to_string(),
            content: (*content).to_string(),
            progress: *progress,
        })
        .collect()
}

/// Acknowledge a user decision. A `pivot` opens a new branch whose focus is
/// `action_data.new_focus` when given.
pub fn handle_action(project_id: &str, action: &ResearchAction) -> ActionOutcome {
    let action_type = action.action_type.as_deref().unwrap_or_default();
    tracing::info!(project_id, action_type, "Research action");

    let pivot = action_type == "pivot";
    let branch_info = pivot.then(|| {
        let focus = action
            .action_data
            .get("new_focus")
            .and_then(Value::as_str)
            .unwrap_or("New research direction")
            .to_string();
        let short = Uuid::new_v4().simple().to_string();
        BranchInfo {
            id: format!("branch-{}", &short[..8]),
            focus,
            estimated_duration: "10-15 minutes".into(),
        }
    });

    ActionOutcome {
        action_processed: true,
        new_branch_created: pivot,
        main_thread_updated: true,
        next_update: NextUpdate {
            timestamp: clock(Utc::now()),
            content: format!("Action \"{action_type}\" processed. Research direction updated."),
            ai_message: true,
        },
        branch_info,
    }
}
