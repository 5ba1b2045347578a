//! Bounded breadth-first call-graph assembly.
//!
//! Answers one question: starting from a root function, what does the
//! call graph look like within `depth` hops in a given direction? The
//! result is a self-contained [`Graph`] — every edge's endpoints are
//! guaranteed to be present in the node set.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::store::GraphStore;
use crate::types::{Direction, Edge, Graph};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which edges a traversal emits between the visited nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Only the edges actually crossed during expansion.
    TraversedOnly,
    /// Every call edge between two visited nodes, including lateral calls
    /// that are not on any shortest path from the root.
    AllBetweenVisited,
}

/// Tuning knobs for call-graph traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Depth used when a request does not specify one.
    pub default_depth: u32,
    /// Hard ceiling; requested depths above this are clamped down.
    pub max_depth: u32,
    /// Expansion stops once this many nodes are collected.
    pub node_cap: usize,
    /// Per-node neighbor cap during expansion.
    pub neighbor_cap: u32,
    /// Lateral-edge behavior.
    pub edge_policy: EdgePolicy,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_depth: 2,
            max_depth: 5,
            node_cap: 60,
            neighbor_cap: 20,
            edge_policy: EdgePolicy::AllBetweenVisited,
        }
    }
}

impl TraversalConfig {
    /// Clamp a requested depth into the supported range. Zero is not a
    /// valid depth; it is raised to 1 rather than rejected.
    pub fn clamp_depth(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_depth)
    }
}

// ---------------------------------------------------------------------------
// CallGraphTraversal
// ---------------------------------------------------------------------------

/// Depth-bounded BFS over the stored call graph.
pub struct CallGraphTraversal<'a> {
    store: &'a GraphStore,
    config: TraversalConfig,
}

impl<'a> CallGraphTraversal<'a> {
    pub fn new(store: &'a GraphStore, config: TraversalConfig) -> Self {
        Self { store, config }
    }

    /// Expand from `root_id` up to `depth` hops in `direction`.
    ///
    /// The root sits at hop 0 and is always included when it exists;
    /// nodes at exactly hop `depth` are included, nodes beyond are not.
    /// Each node is visited at most once, so cyclic graphs terminate.
    /// A missing root yields an empty graph.
    pub fn traverse(&self, root_id: &str, direction: Direction, depth: u32) -> Result<Graph> {
        let depth = self.config.clamp_depth(depth);

        let mut graph = Graph::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut traversed: Vec<Edge> = Vec::new();
        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        queue.push_back((root_id.to_string(), 0));

        while let Some((id, hop)) = queue.pop_front() {
            if graph.nodes.len() >= self.config.node_cap {
                tracing::debug!(
                    root = root_id,
                    cap = self.config.node_cap,
                    "node cap reached, truncating expansion"
                );
                break;
            }
            if !visited.insert(id.clone()) {
                continue;
            }

            let Some(node) = self.store.get_node(&id)? else {
                // Dangling edge target or an unknown root: skip silently.
                continue;
            };
            graph.nodes.push(node);

            if hop >= depth {
                continue;
            }

            let neighbors = match direction {
                Direction::Callees => self.store.direct_callees(&id, self.config.neighbor_cap)?,
                Direction::Callers => self.store.direct_callers(&id, self.config.neighbor_cap)?,
            };

            for neighbor in neighbors {
                traversed.push(match direction {
                    Direction::Callees => Edge {
                        source: id.clone(),
                        target: neighbor.clone(),
                        kind: "call".to_string(),
                    },
                    Direction::Callers => Edge {
                        source: neighbor.clone(),
                        target: id.clone(),
                        kind: "call".to_string(),
                    },
                });
                if !visited.contains(&neighbor) {
                    queue.push_back((neighbor, hop + 1));
                }
            }
        }

        graph.edges = match self.config.edge_policy {
            EdgePolicy::TraversedOnly => traversed,
            EdgePolicy::AllBetweenVisited => {
                let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
                self.store.call_edges_among(&ids)?
            }
        };

        // Expansion can record edges to nodes that never got dequeued
        // (node cap, missing rows); the contract is edge closure.
        let dropped = graph.retain_valid_edges();
        if dropped > 0 {
            tracing::debug!(root = root_id, dropped, "dropped edges with missing endpoints");
        }

        tracing::debug!(
            root = root_id,
            %direction,
            depth,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "traversal complete"
        );
        Ok(graph)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::initialize_database;
    use crate::types::{Node, NodeKind};
    use pretty_assertions::assert_eq;

    fn setup() -> GraphStore {
        let conn = initialize_database(":memory:").expect("schema init on :memory:");
        GraphStore::from_connection(conn)
    }

    fn make_node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            kind: NodeKind::Function,
            name: id.to_uppercase(),
            file: Some(format!("pkg/{id}.go")),
            line: Some(1),
            package: Some("pkg".to_string()),
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

    /// f1 -> f2 -> f3 -> f4
    fn seed_chain(store: &GraphStore) {
        store
            .upsert_nodes(&[
                make_node("f1"),
                make_node("f2"),
                make_node("f3"),
                make_node("f4"),
            ])
            .unwrap();
        store
            .insert_edges(&[call("f1", "f2"), call("f2", "f3"), call("f3", "f4")])
            .unwrap();
    }

    /// a -> b, a -> c, b -> d, c -> d
    fn seed_diamond(store: &GraphStore) {
        store
            .upsert_nodes(&[make_node("a"), make_node("b"), make_node("c"), make_node("d")])
            .unwrap();
        store
            .insert_edges(&[call("a", "b"), call("a", "c"), call("b", "d"), call("c", "d")])
            .unwrap();
    }

    fn traversal(store: &GraphStore) -> CallGraphTraversal<'_> {
        CallGraphTraversal::new(store, TraversalConfig::default())
    }

    fn ids(graph: &Graph) -> Vec<&str> {
        let mut ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    // -- depth boundary -----------------------------------------------------

    #[test]
    fn depth_two_includes_boundary_and_excludes_beyond() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("f1", Direction::Callees, 2)
            .unwrap();

        assert_eq!(ids(&graph), vec!["f1", "f2", "f3"]);
        assert!(graph.is_edge_closed());
    }

    #[test]
    fn depth_one_returns_direct_neighbors_only() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("f1", Direction::Callees, 1)
            .unwrap();
        assert_eq!(ids(&graph), vec!["f1", "f2"]);
    }

    #[test]
    fn depth_zero_is_raised_to_one() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("f1", Direction::Callees, 0)
            .unwrap();
        assert_eq!(ids(&graph), vec!["f1", "f2"]);
    }

    #[test]
    fn depth_above_max_falls_back_to_configured_maximum() {
        let store = setup();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for i in 0..10 {
            nodes.push(make_node(&format!("n{i}")));
            if i > 0 {
                edges.push(call(&format!("n{}", i - 1), &format!("n{i}")));
            }
        }
        store.upsert_nodes(&nodes).unwrap();
        store.insert_edges(&edges).unwrap();

        // max_depth defaults to 5: root + 5 hops = 6 nodes, not 10.
        let graph = traversal(&store)
            .traverse("n0", Direction::Callees, 99)
            .unwrap();
        assert_eq!(graph.nodes.len(), 6);
    }

    // -- direction ----------------------------------------------------------

    #[test]
    fn callers_direction_walks_reverse_edges() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("f4", Direction::Callers, 2)
            .unwrap();

        assert_eq!(ids(&graph), vec!["f2", "f3", "f4"]);
        // Edge orientation is preserved: sources still call targets.
        assert!(graph.edges.iter().any(|e| e.source == "f3" && e.target == "f4"));
        assert!(graph.edges.iter().any(|e| e.source == "f2" && e.target == "f3"));
    }

    // -- root handling ------------------------------------------------------

    #[test]
    fn leaf_root_yields_single_node_no_edges() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("f4", Direction::Callees, 3)
            .unwrap();
        assert_eq!(ids(&graph), vec!["f4"]);
        assert!(graph.edges.is_empty());
        assert!(!graph.is_empty(), "root is always present");
    }

    #[test]
    fn missing_root_yields_empty_graph() {
        let store = setup();
        seed_chain(&store);

        let graph = traversal(&store)
            .traverse("ghost", Direction::Callees, 3)
            .unwrap();
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
    }

    // -- cycles -------------------------------------------------------------

    #[test]
    fn cyclic_graph_terminates_with_unique_nodes() {
        let store = setup();
        store
            .upsert_nodes(&[make_node("x"), make_node("y"), make_node("z")])
            .unwrap();
        store
            .insert_edges(&[call("x", "y"), call("y", "z"), call("z", "x")])
            .unwrap();

        let graph = traversal(&store)
            .traverse("x", Direction::Callees, 5)
            .unwrap();

        assert_eq!(ids(&graph), vec!["x", "y", "z"]);
        let mut seen = HashSet::new();
        for node in &graph.nodes {
            assert!(seen.insert(&node.id), "node {} appeared twice", node.id);
        }
        assert!(graph.is_edge_closed());
    }

    #[test]
    fn self_recursive_function_terminates() {
        let store = setup();
        store.upsert_node(&make_node("r")).unwrap();
        store.insert_edge(&call("r", "r")).unwrap();

        let graph = traversal(&store)
            .traverse("r", Direction::Callees, 3)
            .unwrap();
        assert_eq!(ids(&graph), vec!["r"]);
        assert_eq!(graph.edges.len(), 1, "the self-loop edge is kept");
    }

    // -- diamond convergence ------------------------------------------------

    #[test]
    fn diamond_visits_shared_node_once() {
        let store = setup();
        seed_diamond(&store);

        let graph = traversal(&store)
            .traverse("a", Direction::Callees, 2)
            .unwrap();

        assert_eq!(ids(&graph), vec!["a", "b", "c", "d"]);
        // Both converging edges into d survive.
        assert!(graph.edges.iter().any(|e| e.source == "b" && e.target == "d"));
        assert!(graph.edges.iter().any(|e| e.source == "c" && e.target == "d"));
    }

    // -- edge policy --------------------------------------------------------

    #[test]
    fn lateral_edges_follow_the_configured_policy() {
        let store = setup();
        store
            .upsert_nodes(&[make_node("a"), make_node("b"), make_node("c")])
            .unwrap();
        // b -> c is lateral when expanding one hop from a.
        store
            .insert_edges(&[call("a", "b"), call("a", "c"), call("b", "c")])
            .unwrap();

        let lateral = CallGraphTraversal::new(
            &store,
            TraversalConfig {
                edge_policy: EdgePolicy::AllBetweenVisited,
                ..TraversalConfig::default()
            },
        )
        .traverse("a", Direction::Callees, 1)
        .unwrap();
        assert!(
            lateral.edges.iter().any(|e| e.source == "b" && e.target == "c"),
            "all-between-visited includes the lateral call"
        );

        let tree_only = CallGraphTraversal::new(
            &store,
            TraversalConfig {
                edge_policy: EdgePolicy::TraversedOnly,
                ..TraversalConfig::default()
            },
        )
        .traverse("a", Direction::Callees, 1)
        .unwrap();
        assert!(
            !tree_only.edges.iter().any(|e| e.source == "b" && e.target == "c"),
            "traversed-only omits the lateral call"
        );
        assert_eq!(tree_only.edges.len(), 2);
    }

    // -- node cap -----------------------------------------------------------

    #[test]
    fn node_cap_bounds_result_and_preserves_closure() {
        let store = setup();
        let mut nodes = vec![make_node("hub")];
        let mut edges = Vec::new();
        for i in 0..30 {
            let id = format!("s{i:02}");
            nodes.push(make_node(&id));
            edges.push(call("hub", &id));
        }
        store.upsert_nodes(&nodes).unwrap();
        store.insert_edges(&edges).unwrap();

        let capped = CallGraphTraversal::new(
            &store,
            TraversalConfig {
                node_cap: 10,
                neighbor_cap: 100,
                ..TraversalConfig::default()
            },
        )
        .traverse("hub", Direction::Callees, 1)
        .unwrap();

        assert_eq!(capped.nodes.len(), 10);
        assert!(
            capped.is_edge_closed(),
            "edges to truncated nodes must be filtered out"
        );
    }

    // -- idempotence --------------------------------------------------------

    #[test]
    fn identical_queries_yield_identical_id_sets() {
        let store = setup();
        seed_diamond(&store);
        let t = traversal(&store);

        let first = t.traverse("a", Direction::Callees, 2).unwrap();
        let second = t.traverse("a", Direction::Callees, 2).unwrap();

        assert_eq!(ids(&first), ids(&second));
        let edge_key = |g: &Graph| {
            let mut keys: Vec<String> = g
                .edges
                .iter()
                .map(|e| format!("{}->{}:{}", e.source, e.target, e.kind))
                .collect();
            keys.sort();
            keys
        };
        assert_eq!(edge_key(&first), edge_key(&second));
    }
}
