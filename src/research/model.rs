use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Setup,
    Researching,
}

/// Top-level research unit. The `*_count` fields are derived when projects
/// are listed and are not kept up to date in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub documents_count: usize,
    #[serde(default)]
    pub goals_count: usize,
    #[serde(default)]
    pub insights_count: usize,
    /// 0..=100
    #[serde(default)]
    pub research_progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_research_started: Option<bool>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A task or objective inside a project.
///
/// Priority and status are free text. Fields a client adds through an update
/// that the service does not know about are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: String,
    pub status: String,
    pub project_id: String,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Goal {
    const COLLECTION: &'static str = "goals";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Finding,
    Recommendation,
    Question,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub content: String,
    pub insight_type: InsightType,
    pub confidence_score: f64,
    pub relevance_score: f64,
    pub tags: Vec<String>,
    pub project_id: String,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Record for Insight {
    const COLLECTION: &'static str = "insights";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
