//! Typed HTTP access to the explorer API.
//!
//! One method per endpoint, all GET + JSON. Transport failures and
//! non-2xx statuses surface as [`QueryError::Network`]; a body that does
//! not decode surfaces as [`QueryError::Parse`]. Cancellation is not an
//! error the transport produces — it exists in the taxonomy so the view
//! state machine can distinguish a superseded request from a broken one.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::types::{
    Finding, FunctionMetrics, Graph, Hotspot, Node, PackageSummary, SearchResult, SourceFile,
    Stats, TraversalRequest,
};

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

/// Failure taxonomy for client queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Connectivity failure, timeout, or a non-2xx response.
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered 2xx but the body did not decode.
    #[error("parse failure: {0}")]
    Parse(String),

    /// The request was superseded before it resolved. Never shown to the
    /// user as an error.
    #[error("request cancelled")]
    Cancelled,
}

impl QueryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("request timed out".to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GraphFetcher
// ---------------------------------------------------------------------------

/// The seam between the view state machine and the network.
///
/// [`ApiClient`] is the production implementation; tests substitute
/// scripted fetchers to control timing and outcomes.
#[async_trait]
pub trait GraphFetcher: Send + Sync {
    async fn fetch(&self, request: &TraversalRequest) -> Result<Graph, QueryError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for the explorer API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SourceOnly {
    source: String,
}

#[derive(Deserialize)]
struct HealthStatus {
    status: String,
}

impl ApiClient {
    /// Build a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Build a client with explicit request behavior.
    pub fn with_config(base_url: impl Into<String>, config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: normalize_base_url(base_url.into()),
            http,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, QueryError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Network(format!("HTTP {status} from {path}")));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| QueryError::Parse(e.to_string()))
    }

    // -------------------------------------------------------------------
    // Endpoints
    // -------------------------------------------------------------------

    /// Fetch a bounded call-graph expansion.
    ///
    /// The received graph is defensively filtered: any edge referencing a
    /// node absent from the response is dropped before the graph is
    /// returned.
    pub async fn call_graph(&self, request: &TraversalRequest) -> Result<Graph, QueryError> {
        let mut graph: Graph = self
            .get_json(
                "/api/callgraph",
                &[
                    ("id", request.root_id.clone()),
                    ("depth", request.depth.to_string()),
                    ("direction", request.direction.to_string()),
                ],
            )
            .await?;
        let dropped = graph.retain_valid_edges();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped edges with missing endpoints");
        }
        Ok(graph)
    }

    pub async fn search(&self, q: &str, limit: u32) -> Result<Vec<SearchResult>, QueryError> {
        self.get_json(
            "/api/search",
            &[("q", q.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn packages(&self) -> Result<Vec<PackageSummary>, QueryError> {
        self.get_json("/api/packages", &[]).await
    }

    pub async fn package_graph(&self) -> Result<Graph, QueryError> {
        self.get_json("/api/packages/graph", &[]).await
    }

    pub async fn package_functions(&self, pkg: &str) -> Result<Vec<Node>, QueryError> {
        let path = format!("/api/packages/{}/functions", urlencoding::encode(pkg));
        self.get_json(&path, &[]).await
    }

    pub async fn hotspots(&self, limit: u32) -> Result<Vec<Hotspot>, QueryError> {
        self.get_json("/api/hotspots", &[("limit", limit.to_string())])
            .await
    }

    pub async fn function_metrics(&self, id: &str) -> Result<FunctionMetrics, QueryError> {
        self.get_json("/api/function/metrics", &[("id", id.to_string())])
            .await
    }

    pub async fn function_findings(&self, id: &str) -> Result<Vec<Finding>, QueryError> {
        self.get_json("/api/function/findings", &[("id", id.to_string())])
            .await
    }

    pub async fn function_source(&self, id: &str) -> Result<String, QueryError> {
        let body: SourceOnly = self
            .get_json("/api/function/source", &[("id", id.to_string())])
            .await?;
        Ok(body.source)
    }

    pub async fn source_by_file(&self, file: &str) -> Result<SourceFile, QueryError> {
        self.get_json("/api/source", &[("file", file.to_string())])
            .await
    }

    pub async fn stats(&self) -> Result<Stats, QueryError> {
        self.get_json("/api/stats", &[]).await
    }

    pub async fn health(&self) -> Result<bool, QueryError> {
        let body: HealthStatus = self.get_json("/api/health", &[]).await?;
        Ok(body.status == "ok")
    }
}

#[async_trait]
impl GraphFetcher for ApiClient {
    async fn fetch(&self, request: &TraversalRequest) -> Result<Graph, QueryError> {
        self.call_graph(request).await
    }
}

/// Strip a trailing slash so path concatenation yields a single one.
fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
