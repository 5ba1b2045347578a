//! Crate-level error type.

use thiserror::Error;

/// Errors produced by the explorer's storage and server layers.
///
/// Client-side query failures have their own taxonomy
/// ([`crate::client::QueryError`]) because cancellation and staleness are
/// not errors in the same sense as a broken database.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
