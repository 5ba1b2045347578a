//! HTTP API for the explorer.
//!
//! Serves the graph, search, metrics, and source endpoints consumed by
//! the visualization client. All responses are JSON; failures use a
//! non-2xx status with an `{"error": ...}` body and no further structure.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::graph::metrics;
use crate::graph::store::GraphStore;
use crate::graph::traversal::{CallGraphTraversal, TraversalConfig};
use crate::observability::RequestMetrics;
use crate::types::{Direction, SourceFile};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared server state. The store sits behind an async mutex because
/// rusqlite connections are not `Sync`; queries are short and the lock is
/// never held across other awaits.
pub struct AppState {
    store: Mutex<GraphStore>,
    traversal: TraversalConfig,
    metrics: RequestMetrics,
}

impl AppState {
    pub fn new(store: GraphStore, traversal: TraversalConfig) -> Self {
        Self {
            store: Mutex::new(store),
            traversal,
            metrics: RequestMetrics::new(),
        }
    }

    pub fn request_metrics(&self) -> &RequestMetrics {
        &self.metrics
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn internal_error(err: ExplorerError) -> Response {
    tracing::warn!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Collapse a store result into a JSON response.
fn respond<T: serde::Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(err) => internal_error(err),
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

// Numeric parameters arrive as strings so unparsable values can fall back
// to defaults instead of rejecting the whole request.
#[derive(Deserialize)]
struct CallGraphParams {
    id: Option<String>,
    depth: Option<String>,
    direction: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

#[derive(Deserialize)]
struct IdParams {
    id: Option<String>,
}

#[derive(Deserialize)]
struct FileParams {
    file: Option<String>,
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, fallback: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    respond(store.stats())
}

async fn get_packages(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    respond(store.packages())
}

async fn get_package_graph(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    respond(store.package_graph())
}

async fn get_package_functions(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let store = state.store.lock().await;
    respond(store.functions_in_package(&name))
}

async fn get_callgraph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallGraphParams>,
) -> Response {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return bad_request("id parameter required");
    };
    let depth = parse_or(params.depth.as_deref(), state.traversal.default_depth);
    let direction = Direction::from_param(params.direction.as_deref().unwrap_or(""));

    let store = state.store.lock().await;
    let traversal = CallGraphTraversal::new(&store, state.traversal);
    match traversal.traverse(&id, direction, depth) {
        Ok(graph) => {
            state.metrics.record_traversal(graph.nodes.len());
            Json(graph).into_response()
        }
        Err(err) => internal_error(err),
    }
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.q {
        Some(q) if !q.is_empty() => q,
        _ => return Json(Vec::<crate::types::SearchResult>::new()).into_response(),
    };
    let limit: i64 = parse_or(params.limit.as_deref(), 50);

    state.metrics.record_query();
    let store = state.store.lock().await;
    respond(store.search(&query, limit))
}

async fn get_hotspots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit: i64 = parse_or(params.limit.as_deref(), 20);
    let store = state.store.lock().await;
    respond(metrics::hotspots(&store, limit))
}

async fn get_function_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> Response {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return bad_request("id parameter required");
    };
    let store = state.store.lock().await;
    match metrics::function_metrics(&store, &id) {
        Ok(Some(m)) => Json(m).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "function not found" })),
        )
            .into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_function_findings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> Response {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return bad_request("id parameter required");
    };
    let store = state.store.lock().await;
    respond(metrics::findings_for_function(&store, &id))
}

async fn get_function_source(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> Response {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return bad_request("id parameter required");
    };
    let store = state.store.lock().await;
    // A function whose source was not captured serves an empty string.
    match store.source_for_function(&id) {
        Ok(source) => Json(serde_json::json!({ "source": source.unwrap_or_default() }))
            .into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_source_by_file(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Response {
    let Some(file) = params.file.filter(|f| !f.is_empty()) else {
        return bad_request("file parameter required");
    };
    let store = state.store.lock().await;
    match store.source_for_file(&file) {
        Ok(source) => Json(SourceFile {
            source: source.unwrap_or_default(),
            file,
        })
        .into_response(),
        Err(err) => internal_error(err),
    }
}

// ---------------------------------------------------------------------------
// Router / entry point
// ---------------------------------------------------------------------------

/// Build the API router (extracted for testability).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(get_stats))
        .route("/api/packages", get(get_packages))
        .route("/api/packages/graph", get(get_package_graph))
        .route("/api/packages/{name}/functions", get(get_package_functions))
        .route("/api/callgraph", get(get_callgraph))
        .route("/api/search", get(search))
        .route("/api/hotspots", get(get_hotspots))
        .route("/api/function/metrics", get(get_function_metrics))
        .route("/api/function/findings", get(get_function_findings))
        .route("/api/function/source", get(get_function_source))
        .route("/api/source", get(get_source_by_file))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the explorer API server and block until shutdown.
pub async fn run_server(store: GraphStore, config: &Config) -> Result<()> {
    let state = Arc::new(AppState::new(store, config.traversal));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    let addr = listener.local_addr()?;
    tracing::info!("cpg-explorer API listening on http://{addr}/api");
    eprintln!("cpg-explorer API listening on http://{addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down API server");
        })
        .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
