//! REST API server for the timeline dashboard

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::error::Error;
use crate::source::RecordSource;
use crate::timeline::chart::{BreakdownChart, Series};
use crate::timeline::{Dimension, TimelineEngine, VersionSummary};

/// API server for timeline endpoints
pub struct TimelineApiServer {
    source: Arc<dyn RecordSource>,
    engine: TimelineEngine,
    release: String,
    static_dir: Option<PathBuf>,
}

impl TimelineApiServer {
    /// Create new API server
    pub fn new(source: Arc<dyn RecordSource>, engine: TimelineEngine) -> Self {
        Self {
            source,
            engine,
            release: String::new(),
            static_dir: None,
        }
    }

    /// Restrict fetched records to versions starting with `release`
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    /// Serve dashboard assets from `dir` for every non-API path
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Start the API server on `addr`
    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!(
            "Starting timeline API server on {} (source: {}, window: {})",
            listener.local_addr()?,
            self.source.name(),
            self.engine.window_size()
        );

        let app = self.build_router();
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Build API router
    pub fn build_router(self) -> Router {
        let static_dir = self.static_dir.clone();
        let shared_state = Arc::new(ApiState {
            source: self.source,
            engine: self.engine,
            release: self.release,
        });

        let router = Router::new()
            .route("/abs_timeline", get(absolute_timeline))
            .route("/rel_timeline", get(relative_timeline))
            .route("/by_platform", get(by_platform))
            .route("/by_priority", get(by_priority))
            .route("/api/v1/health", get(health_check))
            .route("/api/v1/timeline", get(timeline))
            .layer(CorsLayer::permissive())
            .with_state(shared_state);

        match static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router,
        }
    }
}

/// Shared API state
struct ApiState {
    source: Arc<dyn RecordSource>,
    engine: TimelineEngine,
    release: String,
}

impl ApiState {
    /// Engine for one request; `?window=0` would always chart nothing
    fn engine(&self, window: Option<usize>) -> Result<TimelineEngine, StatusCode> {
        match window {
            Some(0) => {
                warn!("Rejecting request with window=0");
                Err(StatusCode::BAD_REQUEST)
            }
            Some(size) => Ok(self.engine.with_window_size(size)),
            None => Ok(self.engine),
        }
    }

    /// Fresh snapshot of the release's documents
    async fn documents(&self) -> Result<Vec<Value>, Error> {
        self.source.fetch(&self.release).await
    }
}

/// Window override query parameter
#[derive(Debug, Deserialize)]
struct WindowQuery {
    window: Option<usize>,
}

/// Drill-down query parameters
#[derive(Debug, Deserialize)]
struct BreakdownQuery {
    build: String,
    window: Option<usize>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// API Handlers

async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Timeline API is healthy"))
}

async fn timeline(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<VersionSummary>>>, StatusCode> {
    let engine = state.engine(params.window)?;
    let result = state
        .documents()
        .await
        .and_then(|documents| engine.timeline(&documents));

    match result {
        Ok(summaries) => Ok(Json(ApiResponse::success(summaries))),
        Err(e) => {
            warn!("Failed to build timeline: {}", e);
            Ok(Json(ApiResponse::error(format!(
                "Failed to build timeline: {}",
                e
            ))))
        }
    }
}

async fn absolute_timeline(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<Series<f64>>>, StatusCode> {
    let engine = state.engine(params.window)?;
    let documents = state.documents().await.map_err(|e| {
        warn!("Failed to fetch records: {}", e);
        status_for(&e)
    })?;

    match engine.absolute_timeline(&documents) {
        Ok(series) => Ok(Json(series)),
        Err(e) => {
            warn!("Failed to build absolute timeline: {}", e);
            Err(status_for(&e))
        }
    }
}

async fn relative_timeline(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<Series<Option<f64>>>>, StatusCode> {
    let engine = state.engine(params.window)?;
    let documents = state.documents().await.map_err(|e| {
        warn!("Failed to fetch records: {}", e);
        status_for(&e)
    })?;

    match engine.relative_timeline(&documents) {
        Ok(series) => Ok(Json(series)),
        Err(e) => {
            warn!("Failed to build relative timeline: {}", e);
            Err(status_for(&e))
        }
    }
}

async fn by_platform(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<BreakdownQuery>,
) -> Result<Json<BreakdownChart>, StatusCode> {
    breakdown(&state, params, Dimension::Platform).await
}

async fn by_priority(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<BreakdownQuery>,
) -> Result<Json<BreakdownChart>, StatusCode> {
    breakdown(&state, params, Dimension::Priority).await
}

async fn breakdown(
    state: &ApiState,
    params: BreakdownQuery,
    dimension: Dimension,
) -> Result<Json<BreakdownChart>, StatusCode> {
    let engine = state.engine(params.window)?;
    let documents = state.documents().await.map_err(|e| {
        warn!("Failed to fetch records: {}", e);
        status_for(&e)
    })?;

    match engine.breakdown(&documents, &params.build, dimension) {
        Ok(chart) => Ok(Json(chart)),
        Err(e) => {
            warn!(
                "Failed to break down {} by {}: {}",
                params.build, dimension, e
            );
            Err(status_for(&e))
        }
    }
}
