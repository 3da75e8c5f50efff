//! API Server module
//!
//! This module provides the HTTP API server for the tasktrack service.

use std::net::SocketAddr;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::models::{
    IntakeRequest, NewProject, NewTask, ProjectId, Status, TaskId, TaskUpdate, TrackerError,
};
use crate::Core;

/// Origin allowed by default: the bundled web frontend's dev server
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: SocketAddr,
    /// Allowed CORS origins; a single `*` allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 8000).into(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    /// Parses a comma-separated origin list such as the `CORS_ORIGINS` variable
    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Query string accepted when listing tasks
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<Status>,
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { detail })).into_response()
}

/// Helper function to map Core results to Axum responses
fn map_core_result<T: Serialize>(result: Result<T, TrackerError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        // every core error is a missing project or task
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Builds the application router around `core`
pub fn router(core: Core, config: &ServerConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        // --- Projects --- //
        .route(
            "/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/projects/:id",
            get(get_project_handler).delete(delete_project_handler),
        )
        // --- Tasks --- //
        .route(
            "/api/projects/:id/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route(
            "/api/tasks/:id",
            get(get_task_handler).patch(update_task_handler),
        )
        // --- Intake --- //
        .route("/api/ai/intake", post(intake_handler))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(core)
}

/// Starts the API server
pub async fn serve(core: Core, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let app = router(core, &config);

    tracing::info!(
        "Starting server on {} (CORS origins: {})",
        config.address,
        config.cors_origins.join(", ")
    );
    let listener = TcpListener::bind(config.address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn healthz_handler() -> impl IntoResponse {
    Json(HealthResponse { ok: true })
}

// --- Project Handlers --- //

async fn list_projects_handler(State(core): State<Core>) -> impl IntoResponse {
    Json(core.list_projects())
}

async fn create_project_handler(
    State(core): State<Core>,
    Json(payload): Json<NewProject>,
) -> impl IntoResponse {
    Json(core.create_project(payload.name))
}

async fn get_project_handler(
    State(core): State<Core>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    map_core_result(core.get_project(id))
}

async fn delete_project_handler(
    State(core): State<Core>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    match core.delete_project(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_core_result::<()>(Err(e)),
    }
}

// --- Task Handlers --- //

async fn list_tasks_handler(
    State(core): State<Core>,
    Path(id): Path<ProjectId>,
    Query(query): Query<ListTasksQuery>,
) -> impl IntoResponse {
    map_core_result(core.list_tasks(id, query.status))
}

async fn create_task_handler(
    State(core): State<Core>,
    Path(id): Path<ProjectId>,
    Json(payload): Json<NewTask>,
) -> impl IntoResponse {
    map_core_result(core.create_task(id, payload))
}

async fn get_task_handler(State(core): State<Core>, Path(id): Path<TaskId>) -> impl IntoResponse {
    map_core_result(core.get_task(id))
}

async fn update_task_handler(
    State(core): State<Core>,
    Path(id): Path<TaskId>,
    Json(payload): Json<TaskUpdate>,
) -> impl IntoResponse {
    map_core_result(core.update_task(id, payload))
}

// --- Intake Handler --- //

async fn intake_handler(
    State(core): State<Core>,
    Json(payload): Json<IntakeRequest>,
) -> impl IntoResponse {
    Json(core.intake(&payload.input))
}
