//! Structured logging and request counters.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Initialize structured logging with `RUST_LOG` support.
///
/// Defaults to `cpg_explorer=info` when `RUST_LOG` is not set. Call once
/// at program startup — subsequent calls are silently ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cpg_explorer=info"));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Lightweight request counters for the running service.
///
/// All counters are monotonic and lock-free; relaxed ordering is enough
/// because they are only read for reporting.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    pub queries: AtomicU64,
    pub traversals: AtomicU64,
    pub nodes_returned: AtomicU64,
    pub cancellations: AtomicU64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_traversal(&self, nodes: usize) {
        self.traversals.fetch_add(1, Ordering::Relaxed);
        self.nodes_returned.fetch_add(nodes as u64, Ordering::Relaxed);
    }

    pub fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "queries": self.queries.load(Ordering::Relaxed),
            "traversals": self.traversals.load(Ordering::Relaxed),
            "nodes_returned": self.nodes_returned.load(Ordering::Relaxed),
            "cancellations": self.cancellations.load(Ordering::Relaxed),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
