//! SQLite schema for the prebuilt code property graph.
//!
//! The explorer consumes a database produced by an external analysis
//! engine; this module creates the same schema so tests and offline
//! ingest can build compatible databases (including `:memory:` ones).

use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// DDL constants — separate strings so each statement can be executed
// individually, which keeps error reporting per-statement.
// ---------------------------------------------------------------------------

const CREATE_NODES: &str = "\
CREATE TABLE IF NOT EXISTS nodes (
  id TEXT PRIMARY KEY,
  kind TEXT NOT NULL,
  name TEXT NOT NULL,
  file TEXT,
  line INTEGER,
  package TEXT,
  type_info TEXT
)";

const CREATE_EDGES: &str = "\
CREATE TABLE IF NOT EXISTS edges (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  source TEXT NOT NULL,
  target TEXT NOT NULL,
  kind TEXT NOT NULL
)";

const CREATE_SOURCES: &str = "\
CREATE TABLE IF NOT EXISTS sources (
  file TEXT PRIMARY KEY,
  content TEXT NOT NULL
)";

const CREATE_METRICS: &str = "\
CREATE TABLE IF NOT EXISTS metrics (
  node_id TEXT PRIMARY KEY,
  complexity INTEGER NOT NULL DEFAULT 0,
  loc INTEGER NOT NULL DEFAULT 0,
  parameters INTEGER NOT NULL DEFAULT 0,
  returns INTEGER NOT NULL DEFAULT 0
)";

const CREATE_FINDINGS: &str = "\
CREATE TABLE IF NOT EXISTS findings (
  id TEXT PRIMARY KEY,
  node_id TEXT NOT NULL,
  category TEXT NOT NULL,
  severity TEXT NOT NULL,
  message TEXT NOT NULL,
  file TEXT NOT NULL,
  line INTEGER NOT NULL
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source)",
    "CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target)",
    "CREATE INDEX IF NOT EXISTS idx_edges_kind ON edges(kind)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_package ON nodes(package)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_kind ON nodes(kind)",
    "CREATE INDEX IF NOT EXISTS idx_findings_node ON findings(node_id)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (creating if needed) a database at `path` and apply the schema.
///
/// Accepts `:memory:` for tests.
pub fn initialize_database(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Apply the CPG schema to an already-open connection.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL")?;
    for ddl in [
        CREATE_NODES,
        CREATE_EDGES,
        CREATE_SOURCES,
        CREATE_METRICS,
        CREATE_FINDINGS,
    ] {
        conn.execute(ddl, [])?;
    }
    for ddl in CREATE_INDEXES {
        conn.execute(ddl, [])?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
