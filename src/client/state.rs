//! Single-slot call-graph view state.
//!
//! One logical view owns one outstanding request and one committed graph.
//! Selection changes supersede the in-flight request (cooperative abort
//! plus a generation check at commit time, so a stale response can never
//! win regardless of arrival order), failures keep the last good graph
//! visible, and cancellation is silent.
//!
//! State machine per view: `Idle → Loading → {Committed, Cancelled,
//! Failed}`, where `Cancelled` reverts to whatever was current before.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::client::api::{GraphFetcher, QueryError};
use crate::client::render::{RenderContext, RenderSurface};
use crate::observability::RequestMetrics;
use crate::types::{Graph, TraversalRequest};

// ---------------------------------------------------------------------------
// Phases and snapshots
// ---------------------------------------------------------------------------

/// Observable phase of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No query issued yet (or the only query was cancelled).
    Idle,
    /// A request is in flight.
    Loading,
    /// The current graph is the result of the latest request.
    Committed,
    /// The latest request failed; the previous graph (if any) is still
    /// shown behind a non-blocking error indicator.
    Failed,
}

/// A read-only copy of the view state at one point in time.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub phase: ViewPhase,
    pub graph: Option<Graph>,
    pub error: Option<String>,
    pub generation: u64,
}

impl ViewSnapshot {
    /// Whether the UI should show the "no nodes to display" state: a
    /// committed response with zero nodes. A traversal rooted at an
    /// existing node always contains the root, so this only fires for
    /// genuinely empty responses.
    pub fn shows_empty_message(&self) -> bool {
        self.phase == ViewPhase::Committed
            && self.graph.as_ref().is_some_and(|g| g.is_empty())
    }
}

// ---------------------------------------------------------------------------
// CallGraphView
// ---------------------------------------------------------------------------

struct ViewInner {
    phase: ViewPhase,
    graph: Option<Graph>,
    error: Option<String>,
    generation: u64,
    /// Engine resources for the currently mounted graph. Always released
    /// before the next mount so engine memory stays bounded.
    context: Option<Box<dyn RenderContext>>,
    surface: Box<dyn RenderSurface>,
}

/// The single-slot call-graph view.
///
/// Owns the one outstanding-request slot; all mutation goes through
/// [`select`](Self::select) and [`cancel`](Self::cancel), and the render
/// surface only ever sees committed snapshots.
pub struct CallGraphView {
    fetcher: Arc<dyn GraphFetcher>,
    inner: Arc<Mutex<ViewInner>>,
    inflight: Mutex<Option<JoinHandle<()>>>,
    settled_tx: Arc<watch::Sender<u64>>,
    metrics: Arc<RequestMetrics>,
}

impl CallGraphView {
    pub fn new(fetcher: Arc<dyn GraphFetcher>, surface: Box<dyn RenderSurface>) -> Self {
        let (settled_tx, _) = watch::channel(0);
        Self {
            fetcher,
            inner: Arc::new(Mutex::new(ViewInner {
                phase: ViewPhase::Idle,
                graph: None,
                error: None,
                generation: 0,
                context: None,
                surface,
            })),
            inflight: Mutex::new(None),
            settled_tx: Arc::new(settled_tx),
            metrics: Arc::new(RequestMetrics::new()),
        }
    }

    /// Issue a query for a new selection, superseding any request still
    /// in flight. The newest selection always wins: the prior request is
    /// aborted and, belt and braces, its response would fail the
    /// generation check even if it slipped through.
    pub async fn select(&self, request: TraversalRequest) {
        {
            let mut inflight = self.inflight.lock().await;
            if let Some(handle) = inflight.take() {
                if !handle.is_finished() {
                    handle.abort();
                    self.metrics.record_cancellation();
                    tracing::debug!(root = %request.root_id, "superseded in-flight request");
                }
            }
        }

        let generation = {
            let mut view = self.inner.lock().await;
            view.generation += 1;
            view.phase = ViewPhase::Loading;
            view.error = None;
            view.generation
        };

        let fetcher = Arc::clone(&self.fetcher);
        let inner = Arc::clone(&self.inner);
        let tx = Arc::clone(&self.settled_tx);
        let handle = tokio::spawn(async move {
            let outcome = fetcher.fetch(&request).await;
            settle(&inner, generation, outcome).await;
            let _ = tx.send(generation);
        });

        *self.inflight.lock().await = Some(handle);
    }

    /// Cancel the in-flight request, if any. Not an error: no indicator
    /// is surfaced and the previously committed graph stays visible.
    pub async fn cancel(&self) {
        let aborted = {
            let mut inflight = self.inflight.lock().await;
            match inflight.take() {
                Some(handle) if !handle.is_finished() => {
                    handle.abort();
                    true
                }
                _ => false,
            }
        };
        if !aborted {
            return;
        }

        self.metrics.record_cancellation();
        let generation = {
            let mut view = self.inner.lock().await;
            // Any late settle from the aborted task is now stale.
            view.generation += 1;
            view.phase = if view.graph.is_some() {
                ViewPhase::Committed
            } else {
                ViewPhase::Idle
            };
            view.generation
        };
        let _ = self.settled_tx.send(generation);
        tracing::debug!("in-flight request cancelled");
    }

    /// Read the current state.
    pub async fn snapshot(&self) -> ViewSnapshot {
        let view = self.inner.lock().await;
        ViewSnapshot {
            phase: view.phase,
            graph: view.graph.clone(),
            error: view.error.clone(),
            generation: view.generation,
        }
    }

    /// A receiver that observes the generation of each settled request
    /// (including cancellations). Subscribe before calling `select` to
    /// wait for its outcome without polling.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.settled_tx.subscribe()
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.metrics
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// Apply a fetch outcome to the view iff its generation is still current.
async fn settle(inner: &Mutex<ViewInner>, generation: u64, outcome: Result<Graph, QueryError>) {
    let mut view = inner.lock().await;
    if view.generation != generation {
        tracing::debug!(
            generation,
            current = view.generation,
            "stale response discarded"
        );
        return;
    }

    match outcome {
        Ok(mut graph) => {
            let dropped = graph.retain_valid_edges();
            if dropped > 0 {
                tracing::debug!(dropped, "dropped dangling edges before render");
            }
            // Release the previous engine instance before mounting the
            // next one.
            view.context = None;
            let context = view.surface.mount(&graph);
            view.context = Some(context);
            view.graph = Some(graph);
            view.error = None;
            view.phase = ViewPhase::Committed;
        }
        Err(err) if err.is_cancelled() => {
            tracing::debug!("request cancelled, reverting to previous state");
            view.phase = if view.graph.is_some() {
                ViewPhase::Committed
            } else {
                ViewPhase::Idle
            };
        }
        Err(err) => {
            tracing::warn!(error = %err, "call-graph query failed");
            view.error = Some(err.to_string());
            view.phase = ViewPhase::Failed;
            // The last good graph is intentionally kept visible.
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
