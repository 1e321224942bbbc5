//! HTTP gateway.
//!
//! Axum router over the research services. Handlers stay thin: extract,
//! call into [`crate::research`] or [`crate::files`], wrap the result in the
//! `{"<collection>": ...}` envelope clients expect, and let [`ApiError`] pick
//! the status code.

pub mod error;
mod files;
mod goals;
mod projects;
mod research;

pub use error::ApiError;

use crate::config::{Config, GatewayConfig};
use crate::files::FileStorage;
use crate::store::Stores;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// `(method, path, description)` for every route the gateway serves.
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Health check"),
    ("GET", "/api/projects", "List projects"),
    ("POST", "/api/projects", "Create project"),
    ("POST", "/api/projects/{id}/start-research", "Start research"),
    ("POST", "/api/upload", "Upload file"),
    ("GET", "/api/files", "List files"),
    ("DELETE", "/api/files/{id}", "Delete file"),
    ("GET", "/api/goals/project/{id}", "Get project goals"),
    ("POST", "/api/goals/project/{id}", "Create goal"),
    ("PUT", "/api/goals/{id}", "Update goal"),
    ("DELETE", "/api/goals/{id}", "Delete goal"),
    ("GET", "/api/insights/project/{id}", "Get project insights"),
    ("POST", "/api/insights/project/{id}/generate", "Generate insights"),
    ("POST", "/api/feedback/insight/{id}", "Submit insight feedback"),
    ("GET", "/api/research/project/{id}/live-updates", "Get live research updates"),
    ("POST", "/api/research/project/{id}/start-live", "Start live research"),
    ("GET", "/api/research/project/{id}/advanced-live", "Get advanced live research"),
    ("POST", "/api/research/project/{id}/action", "Handle research action"),
    ("GET", "/api/research/project/{id}/stream", "Stream research updates"),
];

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub storage: FileStorage,
    pub allowed_extensions: Arc<Vec<String>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        stores: Stores,
        storage: FileStorage,
        allowed_extensions: Vec<String>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            stores,
            storage,
            allowed_extensions: Arc::new(allowed_extensions),
            max_upload_bytes,
        }
    }

    /// Open the configured stores and upload directory.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let stores = Stores::open(config.storage.backend, &config.storage.data_dir)?;
        Ok(Self::new(
            stores,
            FileStorage::new(&config.storage.data_dir),
            config.uploads.allowed_extensions.clone(),
            config.gateway.max_upload_bytes,
        ))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "message": "CALEX Backend is running" }))
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

/// Build the full router with body limits, timeouts, CORS and request tracing.
pub fn build_router(state: AppState, gateway: &GatewayConfig) -> Router {
    let max_body = state.max_upload_bytes;
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}/start-research",
            post(projects::start_research),
        )
        .route("/api/upload", post(files::upload))
        .route("/api/files", get(files::list_files))
        .route("/api/files/{id}", axum::routing::delete(files::delete_file))
        .route(
            "/api/goals/project/{id}",
            get(goals::list_goals).post(goals::create_goal),
        )
        .route(
            "/api/goals/{id}",
            put(goals::update_goal).delete(goals::delete_goal),
        )
        .route("/api/insights/project/{id}", get(research::list_insights))
        .route(
            "/api/insights/project/{id}/generate",
            post(research::generate_insights),
        )
        .route(
            "/api/feedback/insight/{id}",
            post(research::submit_feedback),
        )
        .route(
            "/api/research/project/{id}/live-updates",
            get(research::live_updates),
        )
        .route(
            "/api/research/project/{id}/start-live",
            post(research::start_live),
        )
        .route(
            "/api/research/project/{id}/advanced-live",
            get(research::advanced_live),
        )
        .route(
            "/api/research/project/{id}/action",
            post(research::research_action),
        )
        .route(
            "/api/research/project/{id}/stream",
            get(research::stream),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ));

    let router = match cors_layer(&gateway.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: &Config) -> Result<()> {
    let state = AppState::from_config(config).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    let app = build_router(state, &config.gateway);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = %config.storage.data_dir.display(),
        "CALEX backend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;
    tracing::info!("CALEX backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
