//! Projects, goals, insights and the simulated research feeds.

pub mod fixtures;
pub mod goals;
pub mod insights;
pub mod live;
pub mod model;
pub mod projects;

pub use model::{Goal, Insight, InsightType, Project, ProjectStatus};
