//! Command-line interface for the explorer.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::client::{ApiClient, CallGraphView, NullSurface, ViewPhase};
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::graph::store::GraphStore;
use crate::server;
use crate::types::{Direction, TraversalRequest};

#[derive(Parser)]
#[command(name = "cpg-explorer")]
#[command(version)]
#[command(about = "Serve and query a prebuilt code property graph", long_about = None)]
pub struct Cli {
    /// Optional YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server.
    Serve {
        /// Path of the CPG database (overrides config and CPG_DB_PATH).
        #[arg(long)]
        db: Option<PathBuf>,

        /// Listen address, e.g. 127.0.0.1:8080 (overrides config and PORT).
        #[arg(long)]
        addr: Option<String>,
    },

    /// Run one call-graph query against a running server and print JSON.
    Query {
        /// Base URL of the server, e.g. http://localhost:8080
        #[arg(long, default_value = "http://localhost:8080")]
        url: String,

        /// Root function id.
        #[arg(long)]
        id: String,

        /// Expansion depth (server clamps to its maximum).
        #[arg(long, default_value_t = 2)]
        depth: u32,

        /// callees or callers.
        #[arg(long, default_value = "callees")]
        direction: String,
    },

    /// Print database statistics.
    Stats {
        /// Path of the CPG database.
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { db, addr } => {
            if let Some(db) = db {
                config.db_path = db;
            }
            if let Some(addr) = addr {
                config.listen = addr;
            }
            let store = GraphStore::open_readonly(&config.db_path)?;
            tracing::info!(db = %config.db_path.display(), "opened graph database");
            server::run_server(store, &config).await
        }

        Command::Query {
            url,
            id,
            depth,
            direction,
        } => {
            let client = ApiClient::with_config(url, config.client);
            let view = CallGraphView::new(Arc::new(client), Box::new(NullSurface));
            let mut settled = view.subscribe();

            let request =
                TraversalRequest::new(id, Direction::from_param(&direction), depth);
            view.select(request).await;
            settled
                .changed()
                .await
                .map_err(|_| ExplorerError::InvalidRequest("query never settled".into()))?;

            let snapshot = view.snapshot().await;
            match snapshot.phase {
                ViewPhase::Committed => {
                    let graph = snapshot.graph.unwrap_or_default();
                    println!("{}", serde_json::to_string_pretty(&graph)?);
                    Ok(())
                }
                _ => Err(ExplorerError::InvalidRequest(
                    snapshot
                        .error
                        .unwrap_or_else(|| "query did not complete".to_string()),
                )),
            }
        }

        Command::Stats { db } => {
            if let Some(db) = db {
                config.db_path = db;
            }
            let store = GraphStore::open_readonly(&config.db_path)?;
            let stats = store.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
