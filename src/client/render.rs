//! Render-surface contract.
//!
//! The actual drawing engine (layout, scene graph, interaction) is host
//! state outside this crate. What the view state machine needs from it is
//! narrow: mount a committed graph snapshot and get back an opaque
//! context that owns whatever the engine retains. Dropping the context
//! releases the engine's resources; the view guarantees the previous
//! context is dropped before (or as) the next one is created, so engine
//! memory stays bounded across replacements.

use crate::types::Graph;

/// Opaque resources an engine retains for one mounted graph.
pub trait RenderContext: Send {}

/// A place committed graphs get drawn.
///
/// Implementations only ever see committed snapshots and must not hold
/// onto the `&Graph` beyond the call; anything the engine needs later
/// belongs in the returned context.
pub trait RenderSurface: Send {
    fn mount(&mut self, graph: &Graph) -> Box<dyn RenderContext>;
}

// ---------------------------------------------------------------------------
// NullSurface
// ---------------------------------------------------------------------------

/// A surface that draws nothing. Used by headless tools (the CLI `query`
/// command) where the committed graph is consumed as data.
#[derive(Debug, Default)]
pub struct NullSurface;

struct NullContext;

impl RenderContext for NullContext {}

impl RenderSurface for NullSurface {
    fn mount(&mut self, _graph: &Graph) -> Box<dyn RenderContext> {
        Box::new(NullContext)
    }
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// A surface that records mount/release events. Exists for tests that
/// assert the scoped acquire/release discipline.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: EventLog,
}

/// Shared, thread-safe event log: "mount:<n>" on mount (n = node count),
/// "release" when a context is dropped.
pub type EventLog = std::sync::Arc<std::sync::Mutex<Vec<String>>>;

struct RecordingContext {
    log: EventLog,
}

impl RenderContext for RecordingContext {}

impl Drop for RecordingContext {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.push("release".to_string());
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn mount(&mut self, graph: &Graph) -> Box<dyn RenderContext> {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("mount:{}", graph.nodes.len()));
        }
        Box::new(RecordingContext {
            log: self.log.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
