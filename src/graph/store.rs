//! Typed SQLite access to the code property graph.
//!
//! Every query goes through [`rusqlite::Connection::prepare_cached`], so
//! the first call compiles a statement and subsequent calls reuse it from
//! the connection's internal cache. Write methods exist for tests and
//! offline ingest; production servers open the database read-only and
//! never touch them.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db;
use crate::error::Result;
use crate::types::{
    Edge, Graph, Node, NodeKind, PackageSummary, SearchResult, Stats,
};

// ---------------------------------------------------------------------------
// Row caps
// ---------------------------------------------------------------------------

/// Largest package listing returned by [`GraphStore::packages`].
const PACKAGE_LIMIT: usize = 200;
/// Largest per-package function listing.
const PACKAGE_FUNCTION_LIMIT: usize = 100;
/// Cap on cross-package dependency edges in the package graph.
const PACKAGE_EDGE_LIMIT: usize = 500;
/// Default and maximum search result counts.
const SEARCH_DEFAULT_LIMIT: u32 = 50;
const SEARCH_MAX_LIMIT: u32 = 500;

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const GET_NODE_SQL: &str = "\
SELECT id, kind, name, file, line, package, type_info FROM nodes WHERE id = ?1";

// Neighbor queries feed the traversal; they are restricted to call edges
// between function-like nodes and ordered so traversal output is stable
// across identical queries.
const DIRECT_CALLEES_SQL: &str = "\
SELECT DISTINCT e.target
FROM edges e
JOIN nodes n ON e.target = n.id
WHERE e.source = ?1 AND e.kind = 'call' AND n.kind IN ('function', 'method')
ORDER BY e.target
LIMIT ?2";

const DIRECT_CALLERS_SQL: &str = "\
SELECT DISTINCT e.source
FROM edges e
JOIN nodes n ON e.source = n.id
WHERE e.target = ?1 AND e.kind = 'call' AND n.kind IN ('function', 'method')
ORDER BY e.source
LIMIT ?2";

const PACKAGES_SQL: &str = "\
SELECT
    package,
    COUNT(DISTINCT file) AS file_count,
    COUNT(CASE WHEN kind = 'function' THEN 1 END) AS func_count
FROM nodes
WHERE package IS NOT NULL AND package != ''
GROUP BY package
ORDER BY func_count DESC
LIMIT ?1";

const PACKAGE_NAMES_SQL: &str = "\
SELECT DISTINCT package
FROM nodes
WHERE package IS NOT NULL AND package != '' AND kind = 'function'
LIMIT ?1";

const PACKAGE_DEPS_SQL: &str = "\
SELECT DISTINCT src.package, tgt.package
FROM edges e
JOIN nodes src ON e.source = src.id
JOIN nodes tgt ON e.target = tgt.id
WHERE e.kind = 'call'
  AND src.package IS NOT NULL AND src.package != ''
  AND tgt.package IS NOT NULL AND tgt.package != ''
  AND src.package != tgt.package
LIMIT ?1";

const FUNCTIONS_IN_PACKAGE_SQL: &str = "\
SELECT id, kind, name, file, line, package, type_info
FROM nodes
WHERE package = ?1 AND kind = 'function'
ORDER BY name
LIMIT ?2";

// Exact match ranks first, then prefix match, then any substring; ties
// break toward shorter names so `Open` beats `OpenWithRetries`.
const SEARCH_SQL: &str = "\
SELECT id, kind, name, package, file, line
FROM nodes
WHERE name LIKE ?1 AND kind IN ('function', 'type', 'method')
ORDER BY
    CASE WHEN name = ?2 THEN 0
         WHEN name LIKE ?3 THEN 1
         ELSE 2
    END,
    length(name)
LIMIT ?4";

const SOURCE_FOR_FUNCTION_SQL: &str = "\
SELECT s.content
FROM sources s
JOIN nodes n ON s.file = n.file
WHERE n.id = ?1
LIMIT 1";

const SOURCE_FOR_FILE_SQL: &str = "SELECT content FROM sources WHERE file = ?1 LIMIT 1";

const UPSERT_NODE_SQL: &str = "\
INSERT INTO nodes (id, kind, name, file, line, package, type_info)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
  kind = excluded.kind,
  name = excluded.name,
  file = excluded.file,
  line = excluded.line,
  package = excluded.package,
  type_info = excluded.type_info";

const INSERT_EDGE_SQL: &str = "\
INSERT INTO edges (source, target, kind) VALUES (?1, ?2, ?3)";

const PUT_SOURCE_SQL: &str = "\
INSERT INTO sources (file, content) VALUES (?1, ?2)
ON CONFLICT(file) DO UPDATE SET content = excluded.content";

// ---------------------------------------------------------------------------
// Row converters
// ---------------------------------------------------------------------------

/// Treat NULL and empty-string descriptive columns the same way: absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn row_to_node(row: &Row<'_>) -> rusqlite::Result<Node> {
    let kind: String = row.get("kind")?;
    Ok(Node {
        id: row.get("id")?,
        kind: NodeKind::from_str_loose(&kind),
        name: row.get("name")?,
        file: non_empty(row.get("file")?),
        line: row.get::<_, Option<u32>>("line")?.filter(|l| *l > 0),
        package: non_empty(row.get("package")?),
        type_info: non_empty(row.get("type_info")?),
    })
}

fn row_to_search_result(row: &Row<'_>) -> rusqlite::Result<SearchResult> {
    let kind: String = row.get("kind")?;
    Ok(SearchResult {
        id: row.get("id")?,
        kind: NodeKind::from_str_loose(&kind),
        name: row.get("name")?,
        package: non_empty(row.get("package")?),
        file: non_empty(row.get("file")?),
        line: row.get::<_, Option<u32>>("line")?.filter(|l| *l > 0),
    })
}

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// Typed wrapper around the CPG SQLite database.
pub struct GraphStore {
    pub conn: Connection,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish_non_exhaustive()
    }
}

impl GraphStore {
    /// Wrap an already-open connection (tests, ingest).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an existing database read-only, the production mode.
    pub fn open_readonly(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: db::open_readonly(path)?,
        })
    }

    // -------------------------------------------------------------------
    // Node lookups
    // -------------------------------------------------------------------

    /// Fetch a single node by id.
    pub fn get_node(&self, id: &str) -> Result<Option<Node>> {
        let mut stmt = self.conn.prepare_cached(GET_NODE_SQL)?;
        Ok(stmt.query_row(params![id], row_to_node).optional()?)
    }

    /// Distinct call-edge targets of `id`, capped at `limit` per node.
    pub fn direct_callees(&self, id: &str, limit: u32) -> Result<Vec<String>> {
        self.neighbor_ids(DIRECT_CALLEES_SQL, id, limit)
    }

    /// Distinct call-edge sources pointing at `id`, capped at `limit`.
    pub fn direct_callers(&self, id: &str, limit: u32) -> Result<Vec<String>> {
        self.neighbor_ids(DIRECT_CALLERS_SQL, id, limit)
    }

    fn neighbor_ids(&self, sql: &str, id: &str, limit: u32) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![id, limit], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All call edges whose both endpoints are in `ids`.
    ///
    /// Used by the traversal's lateral-edge policy; the dynamic placeholder
    /// list is rebuilt per call because the id set size varies.
    pub fn call_edges_among(&self, ids: &[&str]) -> Result<Vec<Edge>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT source, target, kind FROM edges \
             WHERE kind = 'call' AND source IN ({placeholders}) AND target IN ({placeholders})"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let mut bindings: Vec<&dyn rusqlite::types::ToSql> = Vec::with_capacity(ids.len() * 2);
        for id in ids {
            bindings.push(id);
        }
        for id in ids {
            bindings.push(id);
        }

        let rows = stmt.query_map(bindings.as_slice(), |row| {
            Ok(Edge {
                source: row.get(0)?,
                target: row.get(1)?,
                kind: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // -------------------------------------------------------------------
    // Packages
    // -------------------------------------------------------------------

    /// Per-package file/function counts, largest packages first.
    pub fn packages(&self) -> Result<Vec<PackageSummary>> {
        let mut stmt = self.conn.prepare_cached(PACKAGES_SQL)?;
        let rows = stmt.query_map(params![PACKAGE_LIMIT as u32], |row| {
            Ok(PackageSummary {
                name: row.get(0)?,
                module: None,
                file_count: row.get(1)?,
                func_count: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Package-level dependency graph: one node per package, one
    /// deduplicated `depends` edge per cross-package call relation.
    pub fn package_graph(&self) -> Result<Graph> {
        let mut graph = Graph::default();

        let mut stmt = self.conn.prepare_cached(PACKAGE_NAMES_SQL)?;
        let names = stmt
            .query_map(params![PACKAGE_LIMIT as u32], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for name in &names {
            graph.nodes.push(Node {
                id: name.clone(),
                kind: NodeKind::Package,
                name: name.clone(),
                file: None,
                line: None,
                package: None,
                type_info: None,
            });
        }

        let known = graph.node_ids();
        let mut deps_stmt = self.conn.prepare_cached(PACKAGE_DEPS_SQL)?;
        let deps = deps_stmt
            .query_map(params![PACKAGE_EDGE_LIMIT as u32], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut edges = Vec::new();
        for (source, target) in deps {
            if known.contains(source.as_str()) && known.contains(target.as_str()) {
                edges.push(Edge {
                    source,
                    target,
                    kind: "depends".to_string(),
                });
            }
        }
        graph.edges = edges;
        Ok(graph)
    }

    /// Functions declared in `pkg`, in name order.
    pub fn functions_in_package(&self, pkg: &str) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare_cached(FUNCTIONS_IN_PACKAGE_SQL)?;
        let rows = stmt.query_map(params![pkg, PACKAGE_FUNCTION_LIMIT as u32], row_to_node)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // -------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------

    /// Substring name search over functions, methods, and types.
    ///
    /// `limit <= 0` falls back to the default of 50; requests above the
    /// maximum are capped.
    pub fn search(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = if limit <= 0 {
            SEARCH_DEFAULT_LIMIT
        } else {
            (limit as u64).min(SEARCH_MAX_LIMIT as u64) as u32
        };

        let contains = format!("%{query}%");
        let prefix = format!("{query}%");
        let mut stmt = self.conn.prepare_cached(SEARCH_SQL)?;
        let rows = stmt.query_map(
            params![contains, query, prefix, limit],
            row_to_search_result,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // -------------------------------------------------------------------
    // Sources
    // -------------------------------------------------------------------

    /// Source text of the file containing function `id`. A function whose
    /// file was not captured yields `None`, not an error.
    pub fn source_for_function(&self, id: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached(SOURCE_FOR_FUNCTION_SQL)?;
        Ok(stmt
            .query_row(params![id], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Source text of `file`, if captured.
    pub fn source_for_file(&self, file: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached(SOURCE_FOR_FILE_SQL)?;
        Ok(stmt
            .query_row(params![file], |row| row.get::<_, String>(0))
            .optional()?)
    }

    // -------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------

    /// Whole-graph statistics.
    pub fn stats(&self) -> Result<Stats> {
        let count = |sql: &str| -> Result<u64> {
            let mut stmt = self.conn.prepare_cached(sql)?;
            Ok(stmt.query_row([], |row| row.get::<_, u64>(0))?)
        };
        Ok(Stats {
            total_nodes: count("SELECT COUNT(*) FROM nodes")?,
            total_edges: count("SELECT COUNT(*) FROM edges")?,
            total_functions: count("SELECT COUNT(*) FROM nodes WHERE kind = 'function'")?,
            total_packages: count(
                "SELECT COUNT(DISTINCT package) FROM nodes \
                 WHERE package IS NOT NULL AND package != ''",
            )?,
            total_files: count(
                "SELECT COUNT(DISTINCT file) FROM nodes WHERE file IS NOT NULL AND file != ''",
            )?,
        })
    }

    // -------------------------------------------------------------------
    // Writes (tests and offline ingest only)
    // -------------------------------------------------------------------

    pub fn upsert_node(&self, node: &Node) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT_NODE_SQL)?;
        stmt.execute(params![
            node.id,
            node.kind.as_str(),
            node.name,
            node.file,
            node.line,
            node.package,
            node.type_info,
        ])?;
        Ok(())
    }

    pub fn upsert_nodes(&self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            self.upsert_node(node)?;
        }
        Ok(())
    }

    /// Insert an edge. Duplicates are intentionally allowed; the graph
    /// model does not promise simple-graph output.
    pub fn insert_edge(&self, edge: &Edge) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_EDGE_SQL)?;
        stmt.execute(params![edge.source, edge.target, edge.kind])?;
        Ok(())
    }

    pub fn insert_edges(&self, edges: &[Edge]) -> Result<()> {
        for edge in edges {
            self.insert_edge(edge)?;
        }
        Ok(())
    }

    pub fn put_source(&self, file: &str, content: &str) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(PUT_SOURCE_SQL)?;
        stmt.execute(params![file, content])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::initialize_database;
    use crate::types::Direction;

    fn setup() -> GraphStore {
        let conn = initialize_database(":memory:").expect("schema init on :memory:");
        GraphStore::from_connection(conn)
    }

    fn make_node(id: &str, name: &str, pkg: &str, kind: NodeKind) -> Node {
        Node {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            file: Some(format!("{pkg}/{name}.go")),
            line: Some(10),
            package: Some(pkg.to_string()),
            type_info: None,
        }
    }

    fn call(source: &str, target: &str) -> Edge {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            kind: "call".to_string(),
        }
    }

    /// a -> b -> c plus one cross-package call into util.
    fn seed_small_graph(store: &GraphStore) {
        store
            .upsert_nodes(&[
                make_node("a", "Alpha", "core", NodeKind::Function),
                make_node("b", "Beta", "core", NodeKind::Function),
                make_node("c", "Gamma", "util", NodeKind::Function),
                make_node("t", "Thing", "core", NodeKind::Type),
            ])
            .unwrap();
        store
            .insert_edges(&[call("a", "b"), call("b", "c")])
            .unwrap();
    }

    // -- get_node -----------------------------------------------------------

    #[test]
    fn get_node_round_trips() {
        let store = setup();
        seed_small_graph(&store);

        let node = store.get_node("a").unwrap().unwrap();
        assert_eq!(node.name, "Alpha");
        assert_eq!(node.kind, NodeKind::Function);
        assert_eq!(node.package.as_deref(), Some("core"));
    }

    #[test]
    fn get_node_missing_is_none() {
        let store = setup();
        assert!(store.get_node("ghost").unwrap().is_none());
    }

    #[test]
    fn empty_string_columns_become_none() {
        let store = setup();
        store
            .conn
            .execute(
                "INSERT INTO nodes (id, kind, name, file, line, package, type_info) \
                 VALUES ('x', 'function', 'X', '', 0, '', '')",
                [],
            )
            .unwrap();
        let node = store.get_node("x").unwrap().unwrap();
        assert!(node.file.is_none());
        assert!(node.line.is_none());
        assert!(node.package.is_none());
        assert!(node.type_info.is_none());
    }

    // -- neighbors ----------------------------------------------------------

    #[test]
    fn direct_callees_follow_call_edges_only() {
        let store = setup();
        seed_small_graph(&store);
        store
            .insert_edge(&Edge {
                source: "a".into(),
                target: "c".into(),
                kind: "reference".into(),
            })
            .unwrap();

        let callees = store.direct_callees("a", 20).unwrap();
        assert_eq!(callees, vec!["b".to_string()]);
    }

    #[test]
    fn direct_callers_reverse_the_relation() {
        let store = setup();
        seed_small_graph(&store);
        assert_eq!(store.direct_callers("c", 20).unwrap(), vec!["b".to_string()]);
        assert!(store.direct_callers("a", 20).unwrap().is_empty());
    }

    #[test]
    fn neighbor_queries_exclude_non_function_targets() {
        let store = setup();
        seed_small_graph(&store);
        // A call edge into a type node must not surface in the call graph.
        store.insert_edge(&call("a", "t")).unwrap();
        assert_eq!(store.direct_callees("a", 20).unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn neighbor_cap_limits_fanout() {
        let store = setup();
        let mut nodes = vec![make_node("hub", "Hub", "core", NodeKind::Function)];
        let mut edges = Vec::new();
        for i in 0..30 {
            let id = format!("s{i:02}");
            nodes.push(make_node(&id, &format!("Spoke{i}"), "core", NodeKind::Function));
            edges.push(call("hub", &id));
        }
        store.upsert_nodes(&nodes).unwrap();
        store.insert_edges(&edges).unwrap();

        assert_eq!(store.direct_callees("hub", 20).unwrap().len(), 20);
        assert_eq!(store.direct_callees("hub", 100).unwrap().len(), 30);
    }

    #[test]
    fn duplicate_call_edges_collapse_in_neighbor_listing() {
        let store = setup();
        seed_small_graph(&store);
        store.insert_edge(&call("a", "b")).unwrap();
        store.insert_edge(&call("a", "b")).unwrap();
        // DISTINCT applies to neighbor ids, not to the stored edges.
        assert_eq!(store.direct_callees("a", 20).unwrap(), vec!["b".to_string()]);
        let edges = store.call_edges_among(&["a", "b"]).unwrap();
        assert_eq!(edges.len(), 3, "stored duplicates are preserved");
    }

    // -- call_edges_among ---------------------------------------------------

    #[test]
    fn call_edges_among_restricts_both_endpoints() {
        let store = setup();
        seed_small_graph(&store);

        let edges = store.call_edges_among(&["a", "b"]).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0], call("a", "b"));

        assert!(store.call_edges_among(&[]).unwrap().is_empty());
    }

    // -- packages -----------------------------------------------------------

    #[test]
    fn packages_aggregate_counts() {
        let store = setup();
        seed_small_graph(&store);

        let packages = store.packages().unwrap();
        assert_eq!(packages.len(), 2);
        // core has two functions, util one — core sorts first.
        assert_eq!(packages[0].name, "core");
        assert_eq!(packages[0].func_count, 2);
        assert_eq!(packages[1].name, "util");
        assert_eq!(packages[1].func_count, 1);
    }

    #[test]
    fn package_graph_dedupes_cross_package_calls() {
        let store = setup();
        seed_small_graph(&store);
        // A second core -> util call must not produce a second edge.
        store
            .upsert_node(&make_node("d", "Delta", "util", NodeKind::Function))
            .unwrap();
        store.insert_edge(&call("a", "d")).unwrap();

        let graph = store.package_graph().unwrap();
        let names: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(names.contains(&"core"));
        assert!(names.contains(&"util"));
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "core");
        assert_eq!(graph.edges[0].target, "util");
        assert_eq!(graph.edges[0].kind, "depends");
        assert!(graph.is_edge_closed());
    }

    #[test]
    fn functions_in_package_sorted_by_name() {
        let store = setup();
        seed_small_graph(&store);

        let functions = store.functions_in_package("core").unwrap();
        let names: Vec<&str> = functions.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"], "types are excluded");
    }

    // -- search -------------------------------------------------------------

    #[test]
    fn search_ranks_exact_before_prefix_before_substring() {
        let store = setup();
        store
            .upsert_nodes(&[
                make_node("1", "Open", "io", NodeKind::Function),
                make_node("2", "OpenFile", "io", NodeKind::Function),
                make_node("3", "ReOpen", "io", NodeKind::Function),
            ])
            .unwrap();

        let results = store.search("Open", 10).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Open", "OpenFile", "ReOpen"]);
    }

    #[test]
    fn search_empty_query_returns_nothing() {
        let store = setup();
        seed_small_graph(&store);
        assert!(store.search("", 10).unwrap().is_empty());
    }

    #[test]
    fn search_nonpositive_limit_uses_default() {
        let store = setup();
        seed_small_graph(&store);
        let results = store.search("a", 0).unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn search_includes_types_but_not_packages() {
        let store = setup();
        seed_small_graph(&store);
        let results = store.search("Thing", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, NodeKind::Type);
    }

    // -- sources ------------------------------------------------------------

    #[test]
    fn source_lookup_by_function_and_file() {
        let store = setup();
        seed_small_graph(&store);
        store
            .put_source("core/Alpha.go", "package core\n\nfunc Alpha() {}\n")
            .unwrap();

        let by_fn = store.source_for_function("a").unwrap().unwrap();
        assert!(by_fn.contains("func Alpha"));

        let by_file = store.source_for_file("core/Alpha.go").unwrap().unwrap();
        assert_eq!(by_fn, by_file);

        assert!(store.source_for_file("missing.go").unwrap().is_none());
        assert!(store.source_for_function("ghost").unwrap().is_none());
    }

    // -- stats --------------------------------------------------------------

    #[test]
    fn stats_count_distinct_packages_and_files() {
        let store = setup();
        seed_small_graph(&store);

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.total_functions, 3);
        assert_eq!(stats.total_packages, 2);
        assert_eq!(stats.total_files, 4);
    }

    // -- direction smoke ----------------------------------------------------

    #[test]
    fn direction_maps_to_neighbor_queries() {
        let store = setup();
        seed_small_graph(&store);
        let callees = match Direction::Callees {
            Direction::Callees => store.direct_callees("b", 20).unwrap(),
            Direction::Callers => unreachable!(),
        };
        assert_eq!(callees, vec!["c".to_string()]);
    }
}
