//! CPG Explorer — serve and query a prebuilt code property graph.
//!
//! The server side exposes call-graph traversal, search, hotspot, and
//! source endpoints over HTTP; the client side provides typed API access
//! and the single-slot view state machine the visualization front end
//! builds on.

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod observability;
pub mod server;
pub mod types;
