//! Module dependency graph: container, builder, cycle detection, metrics

pub mod builder;
pub mod cycles;
pub mod metrics;

pub use builder::{BuildOptions, GraphBuilder};
pub use cycles::find_cycles;
pub use metrics::compute_metrics;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{DependencyEdge, GraphMetrics, ModuleNode};

/// The module dependency graph for one file set.
///
/// Nodes are deduplicated by id and kept in insertion order; edges preserve
/// multiplicity. Every edge's `from` is a node; `to` is only guaranteed to
/// be a node when the target is internal (external targets may exist as
/// edge-only references when the builder was not asked to materialize them).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<ModuleNode>,
    pub edges: Vec<DependencyEdge>,
    pub metrics: GraphMetrics,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same id exists
    pub fn add_node(&mut self, id: String, is_external: bool) {
        if self.node_index.contains_key(&id) {
            return;
        }
        self.node_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(ModuleNode { id, is_external });
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        self.edges.push(edge);
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&ModuleNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids this module depends on, in edge order
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Ids of modules that depend on this one
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.to == id && e.from != id)
            .map(|e| e.from.as_str())
            .collect()
    }

    /// Adjacency over internal edges only, for cycle detection
    pub(crate) fn internal_adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &self.nodes {
            if !node.is_external {
                adjacency.entry(node.id.as_str()).or_default();
            }
        }
        for edge in &self.edges {
            if !edge.is_external && self.has_node(edge.from.as_str()) {
                adjacency
                    .entry(edge.from.as_str())
                    .or_default()
                    .push(edge.to.as_str());
            }
        }
        adjacency
    }

    /// Rewrite internal node ids relative to `root`, so graphs built from
    /// different checkout locations of the same file set compare equal.
    /// External ids (bare package names) are left alone.
    pub fn rebase(&mut self, root: &std::path::Path) {
        let rebased = |id: &str| -> Option<String> {
            std::path::Path::new(id)
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().into_owned())
        };

        for node in &mut self.nodes {
            if let Some(id) = rebased(&node.id) {
                node.id = id;
            }
        }
        for edge in &mut self.edges {
            if let Some(from) = rebased(&edge.from) {
                edge.from = from;
            }
            if let Some(to) = rebased(&edge.to) {
                edge.to = to;
            }
        }
        for cycle in &mut self.metrics.cycles {
            for id in cycle.iter_mut() {
                if let Some(r) = rebased(id) {
                    *id = r;
                }
            }
        }
        for id in &mut self.metrics.hotspots {
            if let Some(r) = rebased(id) {
                *id = r;
            }
        }
        if let Some(id) = self.metrics.most_connected.as_mut() {
            if let Some(r) = rebased(id) {
                *id = r;
            }
        }
        self.reindex();
    }

    /// Rebuild the id index after deserialization
    pub fn reindex(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BindingKind, EdgeKind};

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Import,
            is_external: false,
            binding: BindingKind::Named,
        }
    }

    #[test]
    fn nodes_deduplicate_by_id() {
        let mut graph = DependencyGraph::new();
        graph.add_node("/a.ts".into(), false);
        graph.add_node("/a.ts".into(), false);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn parallel_edges_are_preserved() {
        let mut graph = DependencyGraph::new();
        graph.add_node("/a.ts".into(), false);
        graph.add_node("/b.ts".into(), false);
        graph.add_edge(edge("/a.ts", "/b.ts"));
        graph.add_edge(edge("/a.ts", "/b.ts"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn dependents_exclude_self_loops() {
        let mut graph = DependencyGraph::new();
        graph.add_node("/a.ts".into(), false);
        graph.add_edge(edge("/a.ts", "/a.ts"));
        assert!(graph.dependents_of("/a.ts").is_empty());
        assert_eq!(graph.dependencies_of("/a.ts"), vec!["/a.ts"]);
    }
}
