//! Circular dependency detection over internal edges.
//!
//! Depth-first traversal from every unvisited node with an explicit
//! recursion stack; revisiting a node already on the stack yields the stack
//! slice from that node's first occurrence through the current node, closed
//! by repeating the start node. One DFS pass per root keeps this O(V+E);
//! cycles that share nodes but differ in which path is found first may be
//! under-reported. That is a known completeness limitation, kept
//! deliberately: full minimal-cycle-basis enumeration is not worth the
//! cost on typical codebases.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::DependencyGraph;

/// All distinct cycles discoverable from the DFS exploration order.
/// Each cycle is a closed path (`[A, B, C, A]`); a self-loop is `[A, A]`.
/// Cycles with the same node set are reported once.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let adjacency = graph.internal_adjacency();
    let mut roots: Vec<&str> = adjacency.keys().copied().collect();
    roots.sort_unstable();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    let mut seen_sets: HashSet<BTreeSet<String>> = HashSet::new();
    let mut cycles = Vec::new();

    for root in roots {
        if !visited.contains(root) {
            dfs(
                root,
                &adjacency,
                &mut visited,
                &mut on_stack,
                &mut path,
                &mut seen_sets,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    seen_sets: &mut HashSet<BTreeSet<String>>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    if let Some(deps) = adjacency.get(node) {
        for &dep in deps {
            if !adjacency.contains_key(dep) {
                // Dangling internal target; cannot participate in a cycle
                continue;
            }
            if !visited.contains(dep) {
                dfs(dep, adjacency, visited, on_stack, path, seen_sets, cycles);
            } else if on_stack.contains(dep) {
                record_cycle(path, dep, seen_sets, cycles);
            }
        }
    }

    path.pop();
    on_stack.remove(node);
}

fn record_cycle(
    path: &[&str],
    start: &str,
    seen_sets: &mut HashSet<BTreeSet<String>>,
    cycles: &mut Vec<Vec<String>>,
) {
    let first = match path.iter().position(|&n| n == start) {
        Some(i) => i,
        None => return,
    };
    let node_set: BTreeSet<String> = path[first..].iter().map(|s| s.to_string()).collect();
    if !seen_sets.insert(node_set) {
        return;
    }
    let mut cycle: Vec<String> = path[first..].iter().map(|s| s.to_string()).collect();
    cycle.push(start.to_string());
    cycles.push(cycle);
}
