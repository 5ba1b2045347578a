//! Configuration for the explorer service and client.
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables (`CPG_DB_PATH`, `PORT`), then by CLI flags. Every field has
//! a serde default so a partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::graph::traversal::TraversalConfig;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the prebuilt CPG database.
    pub db_path: PathBuf,
    /// Listen address for the HTTP service.
    pub listen: String,
    /// Traversal tuning knobs.
    pub traversal: TraversalConfig,
    /// Client-side request behavior.
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("/data/cpg.db"),
            listen: "0.0.0.0:8080".to_string(),
            traversal: TraversalConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

/// Client request behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds. Expiry surfaces as a network
    /// failure, never as a hung query.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    /// Load configuration: YAML file (if given) merged under environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                serde_yaml::from_str(&text)
                    .map_err(|e| ExplorerError::Config(format!("{}: {e}", p.display())))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides: `CPG_DB_PATH` and `PORT`.
    pub fn apply_env(&mut self) {
        if let Ok(db) = std::env::var("CPG_DB_PATH") {
            if !db.is_empty() {
                self.db_path = PathBuf::from(db);
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.listen = format!("0.0.0.0:{port}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
