//! Canned research content.
//!
//! Nothing here is derived from uploaded documents. These payloads stand in
//! for a research pipeline so clients have realistic data to render; ids and
//! timestamps are generated fresh on each call.

use super::model::InsightType;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

pub struct InsightTemplate {
    pub content: &'static str,
    pub insight_type: InsightType,
    pub confidence_score: f64,
    pub relevance_score: f64,
    pub tags: &'static [&'static str],
}

/// The three insights appended by every "generate" call.
pub const GENERATED_INSIGHTS: [InsightTemplate; 3] = [
    InsightTemplate {
        content: "Based on the uploaded documents, there appears to be a strong correlation between market trends and consumer behavior patterns.",
        insight_type: InsightType::Finding,
        confidence_score: 0.85,
        relevance_score: 0.92,
        tags: &["market analysis", "consumer behavior", "trends"],
    },
    InsightTemplate {
        content: "The data suggests implementing a phased approach to the proposed strategy would minimize risk while maximizing potential returns.",
        insight_type: InsightType::Recommendation,
        confidence_score: 0.78,
        relevance_score: 0.88,
        tags: &["strategy", "risk management", "implementation"],
    },
    InsightTemplate {
        content: "Further investigation is needed to understand the underlying factors driving these observed patterns.",
        insight_type: InsightType::Question,
        confidence_score: 0.65,
        relevance_score: 0.75,
        tags: &["investigation", "patterns", "analysis"],
    },
];

/// `(type, content, status, details)` for the live-updates feed.
pub fn live_update_entries() -> Vec<(&'static str, &'static str, &'static str, Value)> {
    vec![
        (
            "web_search",
            "Searching for recent dark matter research papers on arXiv...",
            "completed",
            json!({
                "query": "dark matter research papers 2024",
                "sources_found": 12,
                "relevant_papers": 8
            }),
        ),
        (
            "analysis",
            "Analyzing document structure and extracting key concepts...",
            "in_progress",
            json!({
                "documents_processed": 3,
                "concepts_extracted": 45,
                "relationships_found": 23
            }),
        ),
        (
            "reasoning",
            "Identifying patterns in dark matter distribution models...",
            "in_progress",
            json!({
                "hypothesis": "Dark matter clustering shows fractal-like patterns",
                "confidence": 0.78,
                "supporting_evidence": 5
            }),
        ),
        (
            "web_search",
            "Fetching latest experimental data from CERN...",
            "completed",
            json!({
                "query": "CERN dark matter experiments 2024",
                "data_sources": ["ATLAS", "CMS", "LHCb"],
                "new_findings": 3
            }),
        ),
        (
            "insight_generation",
            "Generating insights based on cross-referenced data...",
            "in_progress",
            json!({
                "insights_generated": 2,
                "confidence_scores": [0.85, 0.72],
                "next_steps": ["Validate with additional datasets", "Compare with theoretical models"]
            }),
        ),
    ]
}

/// `(type, content, progress)` for the stream feed.
pub const STREAM_ENTRIES: [(&str, &str, u8); 3] = [
    (
        "analysis",
        "Processing document 4 of 6: \"Advanced Materials for Space Applications\"",
        67,
    ),
    (
        "web_search",
        "Found 3 new research papers on smart materials from 2024",
        75,
    ),
    (
        "insight",
        "Cross-referencing reveals potential for hybrid self-healing/impact materials",
        82,
    ),
];

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Branching research session: a main thread, one branch and a pending
/// decision.
pub fn advanced_session(now: DateTime<Utc>) -> Value {
    let started = now.to_rfc3339();
    json!({
        "main_thread": {
            "id": "main-001",
            "status": "active",
            "focus": "Self-healing polymer composites for space applications",
            "progress": 65,
            "start_time": started,
            "updates": main_thread_updates()
        },
        "branch_threads": [
            {
                "id": "branch-001",
                "parent_id": "main-001",
                "status": "active",
                "focus": "Smart foams for impact absorption",
                "progress": 40,
                "start_time": started,
                "trigger": "User selected pivot to rapid-response materials",
                "updates": branch_updates()
            }
        ],
        "completed_threads": [],
        "pending_actions": [
            {
                "id": fresh_id(),
                "type": "user_decision",
                "content": "Choose research direction for micrometeorite protection",
                "options": ["pivot", "continue", "discuss"],
                "deadline": null,
                "priority": "high"
            }
        ]
    })
}

fn main_thread_updates() -> Value {
    let analysis = json!({
        "id": fresh_id(),
        "timestamp": "0:00",
        "type": "analysis_start",
        "content": "Analyzing uploaded documents: 3 NASA whitepapers, 2 academic PDFs, 1 video lecture transcript.",
        "ai_message": true,
        "details": {
            "documents_analyzed": 6,
            "key_topics": ["self-healing materials", "space applications", "polymer composites"]
        }
    });
    let insight = json!({
        "id": fresh_id(),
        "timestamp": "0:03",
        "type": "insight",
        "content": "Self-healing polymer composites show micro-crack repair under vacuum. Most recent success: ESA 2024 test on ISS.",
        "ai_message": true,
        "confidence": 0.92,
        "references": ["ESA_2024_ISS_Report.pdf"],
        "details": {
            "key_limitations": ["slow healing at low temperatures"],
            "success_rate": "78%",
            "temperature_range": "-40°C to +60°C"
        }
    });
    let discovery = json!({
        "id": fresh_id(),
        "timestamp": "0:09",
        "type": "discovery",
        "content": "Detected missing data: No current solution for micrometeorite punctures in rigid modules.",
        "ai_message": true,
        "requires_action": true,
        "suggestions": [
            {"action": "pivot", "label": "Pivot to rapid-response materials", "confidence": 0.85},
            {"action": "continue", "label": "Keep original focus", "confidence": 0.60},
            {"action": "discuss", "label": "Discuss options", "confidence": 0.75}
        ]
    });
    Value::Array(vec![analysis, insight, discovery])
}

fn branch_updates() -> Value {
    let created = json!({
        "id": fresh_id(),
        "timestamp": "0:16",
        "type": "branch_created",
        "content": "Launching sub-research group: Smart foams for impact absorption",
        "ai_message": true,
        "details": {
            "documents_to_analyze": 4,
            "external_sources": ["SpaceX blog posts", "MIT research database"],
            "estimated_completion": "15 minutes"
        }
    });
    let live = json!({
        "id": fresh_id(),
        "timestamp": "0:22",
        "type": "live_update",
        "content": "Smart foam prototypes (MIT, 2023) demonstrated 40% faster sealing than traditional layers.",
        "ai_message": true,
        "details": {
            "researchers_identified": ["Dr. Sarah Chen", "Prof. Michael Rodriguez"],
            "suggested_action": "outreach",
            "contact_info_available": true
        }
    });
    Value::Array(vec![created, live])
}
