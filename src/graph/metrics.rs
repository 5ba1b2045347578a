//! Function metrics, hotspot ranking, and findings lookup.
//!
//! Complexity, size, and parameter counts are precomputed by the analysis
//! engine and stored in the `metrics` table; fan-in/fan-out are always
//! counted live from call edges so they stay consistent with the graph
//! actually being served.

use rusqlite::{params, OptionalExtension, Row};

use crate::error::Result;
use crate::graph::store::GraphStore;
use crate::types::{Finding, FunctionMetrics, Hotspot, Severity};

/// Default hotspot listing size.
const HOTSPOT_DEFAULT_LIMIT: u32 = 20;
/// Cap on hotspot listing size.
const HOTSPOT_MAX_LIMIT: u32 = 200;

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const FUNCTION_METRICS_SQL: &str = "\
SELECT
    COALESCE(m.complexity, 0),
    COALESCE(m.loc, 0),
    COALESCE(m.parameters, 0),
    COALESCE(m.returns, 0),
    (SELECT COUNT(DISTINCT e.source) FROM edges e
     WHERE e.target = n.id AND e.kind = 'call') AS fan_in,
    (SELECT COUNT(DISTINCT e.target) FROM edges e
     WHERE e.source = n.id AND e.kind = 'call') AS fan_out
FROM nodes n
LEFT JOIN metrics m ON m.node_id = n.id
WHERE n.id = ?1";

// Composite risk score: complexity dominates, size and coupling contribute.
// The inner select materializes fan counts once so the score expression can
// reference them.
const HOTSPOTS_SQL: &str = "\
SELECT
    id, name, package, file, line, complexity, loc, fan_in, fan_out,
    (2 * complexity + loc / 10 + fan_in + fan_out) AS score
FROM (
    SELECT
        n.id,
        n.name,
        COALESCE(n.package, '') AS package,
        COALESCE(n.file, '') AS file,
        COALESCE(n.line, 0) AS line,
        m.complexity,
        m.loc,
        (SELECT COUNT(DISTINCT e.source) FROM edges e
         WHERE e.target = n.id AND e.kind = 'call') AS fan_in,
        (SELECT COUNT(DISTINCT e.target) FROM edges e
         WHERE e.source = n.id AND e.kind = 'call') AS fan_out
    FROM nodes n
    JOIN metrics m ON m.node_id = n.id
    WHERE n.kind IN ('function', 'method')
)
ORDER BY score DESC, name ASC
LIMIT ?1";

const FINDINGS_SQL: &str = "\
SELECT id, category, severity, message, file, line
FROM findings
WHERE node_id = ?1
ORDER BY line ASC, id ASC";

const PUT_METRICS_SQL: &str = "\
INSERT INTO metrics (node_id, complexity, loc, parameters, returns)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(node_id) DO UPDATE SET
  complexity = excluded.complexity,
  loc = excluded.loc,
  parameters = excluded.parameters,
  returns = excluded.returns";

const PUT_FINDING_SQL: &str = "\
INSERT INTO findings (id, node_id, category, severity, message, file, line)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
  node_id = excluded.node_id,
  category = excluded.category,
  severity = excluded.severity,
  message = excluded.message,
  file = excluded.file,
  line = excluded.line";

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Metrics for one function, or `None` when the node does not exist.
///
/// A node without a stored metrics row still gets live fan-in/fan-out
/// with zeroed static metrics.
pub fn function_metrics(store: &GraphStore, id: &str) -> Result<Option<FunctionMetrics>> {
    let mut stmt = store.conn.prepare_cached(FUNCTION_METRICS_SQL)?;
    Ok(stmt
        .query_row(params![id], |row| {
            Ok(FunctionMetrics {
                complexity: row.get(0)?,
                loc: row.get(1)?,
                parameters: row.get(2)?,
                returns: row.get(3)?,
                fan_in: row.get(4)?,
                fan_out: row.get(5)?,
            })
        })
        .optional()?)
}

/// Functions ranked by composite risk score, highest first.
///
/// `limit <= 0` falls back to the default; requests above the maximum
/// are capped.
pub fn hotspots(store: &GraphStore, limit: i64) -> Result<Vec<Hotspot>> {
    let limit = if limit <= 0 {
        HOTSPOT_DEFAULT_LIMIT
    } else {
        (limit as u64).min(HOTSPOT_MAX_LIMIT as u64) as u32
    };

    let mut stmt = store.conn.prepare_cached(HOTSPOTS_SQL)?;
    let rows = stmt.query_map(params![limit], row_to_hotspot)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn row_to_hotspot(row: &Row<'_>) -> rusqlite::Result<Hotspot> {
    Ok(Hotspot {
        id: row.get(0)?,
        name: row.get(1)?,
        package: row.get(2)?,
        file: row.get(3)?,
        line: row.get(4)?,
        complexity: row.get(5)?,
        loc: row.get(6)?,
        fan_in: row.get(7)?,
        fan_out: row.get(8)?,
        score: row.get(9)?,
    })
}

/// Findings attributed to one function, in source order.
pub fn findings_for_function(store: &GraphStore, id: &str) -> Result<Vec<Finding>> {
    let mut stmt = store.conn.prepare_cached(FINDINGS_SQL)?;
    let rows = stmt.query_map(params![id], |row| {
        let severity: String = row.get(2)?;
        Ok(Finding {
            id: row.get(0)?,
            category: row.get(1)?,
            severity: Severity::from_str_loose(&severity),
            message: row.get(3)?,
            file: row.get(4)?,
            line: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

// ---------------------------------------------------------------------------
// Writes (tests and offline ingest only)
// ---------------------------------------------------------------------------

pub fn put_metrics(
    store: &GraphStore,
    node_id: &str,
    complexity: u32,
    loc: u32,
    parameters: u32,
    returns: u32,
) -> Result<()> {
    let mut stmt = store.conn.prepare_cached(PUT_METRICS_SQL)?;
    stmt.execute(params![node_id, complexity, loc, parameters, returns])?;
    Ok(())
}

pub fn put_finding(store: &GraphStore, finding: &Finding, node_id: &str) -> Result<()> {
    let mut stmt = store.conn.prepare_cached(PUT_FINDING_SQL)?;
    stmt.execute(params![
        finding.id,
        node_id,
        finding.category,
        finding.severity.as_str(),
        finding.message,
        finding.file,
        finding.line,
    ])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
