//! Client side of the explorer: typed API access, the single-slot
//! call-graph view state machine, and the render-surface contract.

pub mod api;
pub mod render;
pub mod state;

pub use api::{ApiClient, GraphFetcher, QueryError};
pub use render::{NullSurface, RenderContext, RenderSurface};
pub use state::{CallGraphView, ViewPhase, ViewSnapshot};
