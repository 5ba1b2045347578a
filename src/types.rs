//! Core domain types for the CPG explorer.
//!
//! These mirror the JSON wire format of the HTTP API, so every struct
//! carries serde renames matching the camelCase field names that clients
//! receive (`typeInfo`, `fileCount`, `fanIn`, ...).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Kinds of symbol nodes in the code property graph.
///
/// The database may contain kinds beyond the four the explorer renders
/// specially; those deserialize to [`NodeKind::Other`] and pass through
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Function,
    Method,
    Type,
    Package,
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// String representation matching the database and wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Type => "type",
            Self::Package => "package",
            Self::Other => "other",
        }
    }

    /// Parse from a loose string (case-insensitive); unknown kinds map to
    /// [`NodeKind::Other`] rather than failing.
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "function" => Self::Function,
            "method" => Self::Method,
            "type" => Self::Type,
            "package" => Self::Package,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Node / Edge / Graph
// ---------------------------------------------------------------------------

/// A symbol node. Identity is `id`; every other field is descriptive and
/// may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(rename = "typeInfo", default, skip_serializing_if = "Option::is_none")]
    pub type_info: Option<String>,
}

/// A directed edge: `source` calls/references `target`.
///
/// Duplicate edges (same source/target/kind) are legitimate and are never
/// deduplicated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: String,
}

/// A node/edge set returned by a traversal or package query.
///
/// Replaced wholesale on each successful query; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// The set of node ids present in this graph.
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Drop every edge whose `source` or `target` is not present in the
    /// node set. Returns the number of edges removed.
    ///
    /// The render layer requires both endpoints of every edge to resolve,
    /// so this runs on every received graph regardless of what the server
    /// guarantees.
    pub fn retain_valid_edges(&mut self) -> usize {
        let ids: HashSet<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        let before = self.edges.len();
        self.edges
            .retain(|e| ids.contains(&e.source) && ids.contains(&e.target));
        before - self.edges.len()
    }

    /// Whether every edge's endpoints are present in the node set.
    pub fn is_edge_closed(&self) -> bool {
        let ids = self.node_ids();
        self.edges
            .iter()
            .all(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
    }

    /// True when the graph has no nodes at all. A traversal rooted at an
    /// existing node always contains at least the root, so this state is
    /// reserved for genuinely empty responses.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Direction / TraversalRequest
// ---------------------------------------------------------------------------

/// Direction of a call-graph expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow outgoing call edges: what does this function call?
    Callees,
    /// Follow incoming call edges: who calls this function?
    Callers,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Callees => "callees",
            Self::Callers => "callers",
        }
    }

    /// Parse from a query-string value. Anything other than `callers`
    /// means `callees`, so a missing or misspelled parameter degrades to
    /// the common case instead of failing.
    pub fn from_param(s: &str) -> Self {
        if s.eq_ignore_ascii_case("callers") {
            Self::Callers
        } else {
            Self::Callees
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call-graph query. Constructed per user action, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraversalRequest {
    pub root_id: String,
    pub direction: Direction,
    pub depth: u32,
}

impl TraversalRequest {
    /// Build a request. `depth` is raised to the minimum of 1; the server
    /// applies its own configured maximum on top.
    pub fn new(root_id: impl Into<String>, direction: Direction, depth: u32) -> Self {
        Self {
            root_id: root_id.into(),
            direction,
            depth: depth.max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Package / search / stats wire types
// ---------------------------------------------------------------------------

/// Per-package aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(rename = "fileCount")]
    pub file_count: u32,
    #[serde(rename = "funcCount")]
    pub func_count: u32,
}

/// A single name-search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Whole-graph statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "totalNodes")]
    pub total_nodes: u64,
    #[serde(rename = "totalEdges")]
    pub total_edges: u64,
    #[serde(rename = "totalFunctions")]
    pub total_functions: u64,
    #[serde(rename = "totalPackages")]
    pub total_packages: u64,
    #[serde(rename = "totalFiles")]
    pub total_files: u64,
}

// ---------------------------------------------------------------------------
// Metrics / hotspots / findings
// ---------------------------------------------------------------------------

/// Stored metrics for one function, joined with live fan-in/fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub complexity: u32,
    pub loc: u32,
    pub parameters: u32,
    pub returns: u32,
    #[serde(rename = "fanIn")]
    pub fan_in: u32,
    #[serde(rename = "fanOut")]
    pub fan_out: u32,
}

/// A function ranked by composite risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub name: String,
    pub package: String,
    pub file: String,
    pub line: u32,
    pub complexity: u32,
    pub loc: u32,
    #[serde(rename = "fanIn")]
    pub fan_in: u32,
    #[serde(rename = "fanOut")]
    pub fan_out: u32,
    pub score: i64,
}

/// Severity of a static-analysis finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse loosely; unknown severities are reported as warnings rather
    /// than dropped.
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "info" | "note" | "hint" => Self::Info,
            "error" | "critical" | "high" => Self::Error,
            _ => Self::Warning,
        }
    }
}

/// A static-analysis finding attributed to a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
}

/// Source text of one file, as served by `/api/source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub source: String,
    pub file: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
