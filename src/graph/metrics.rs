//! Aggregate graph statistics and the architectural health score.
//!
//! The health score formula is load-bearing: the diff engine's regression
//! detection compares scores across snapshots, so any change here shifts
//! every reported delta.

use std::collections::HashMap;

use crate::core::{DependencyEdge, GraphMetrics, ModuleNode};

// Nodes with a single outgoing edge are never hotspots; in tiny graphs the
// average is low enough that every leaf importer would otherwise qualify.
const HOTSPOT_MIN_DEGREE: usize = 2;
const HOTSPOT_FACTOR: f64 = 1.5;

/// Compute metrics from scratch. `cycles` comes from `cycles::find_cycles`;
/// it is not recomputed here so callers can reuse one detection pass.
pub fn compute_metrics(
    nodes: &[ModuleNode],
    edges: &[DependencyEdge],
    cycles: Vec<Vec<String>>,
) -> GraphMetrics {
    let node_count = nodes.len();
    let internal_edge_count = edges.iter().filter(|e| !e.is_external).count();
    let external_edge_count = edges.len() - internal_edge_count;

    let denominator = node_count.max(1) as f64;
    let average_coupling = round1(internal_edge_count as f64 / denominator);
    let external_ratio = external_edge_count as f64 / denominator;

    let out_degrees = internal_out_degrees(nodes, edges);

    // Ties break toward the first-encountered node id, for determinism;
    // only a strictly greater degree displaces the current best
    let mut best: Option<(&str, usize)> = None;
    for n in nodes.iter().filter(|n| !n.is_external) {
        let degree = out_degrees.get(n.id.as_str()).copied().unwrap_or(0);
        if degree > 0 && best.map_or(true, |(_, d)| degree > d) {
            best = Some((n.id.as_str(), degree));
        }
    }
    let most_connected = best.map(|(id, _)| id.to_string());

    let threshold = HOTSPOT_FACTOR * average_coupling;
    let hotspots: Vec<String> = nodes
        .iter()
        .filter(|n| !n.is_external)
        .filter(|n| {
            let degree = out_degrees.get(n.id.as_str()).copied().unwrap_or(0);
            degree >= HOTSPOT_MIN_DEGREE && degree as f64 > threshold
        })
        .map(|n| n.id.clone())
        .collect();

    let health_score = health_score(
        cycles.len(),
        average_coupling,
        external_ratio,
        hotspots.len(),
    );

    GraphMetrics {
        node_count,
        edge_count: edges.len(),
        internal_edge_count,
        external_edge_count,
        cycles,
        average_coupling,
        most_connected,
        hotspots,
        health_score,
    }
}

/// Starts at 100, penalized by cycles, excess coupling, external-dependency
/// ratio, and hotspot count; clamped to [0, 100].
pub fn health_score(
    cycle_count: usize,
    average_coupling: f64,
    external_ratio: f64,
    hotspot_count: usize,
) -> f64 {
    let mut score = 100.0;
    score -= 10.0 * cycle_count as f64;
    score -= 5.0 * (average_coupling - 5.0).max(0.0);
    score -= 10.0 * (external_ratio - 2.0).max(0.0);
    score -= 3.0 * hotspot_count as f64;
    score.clamp(0.0, 100.0)
}

fn internal_out_degrees<'a>(
    nodes: &'a [ModuleNode],
    edges: &'a [DependencyEdge],
) -> HashMap<&'a str, usize> {
    let mut degrees: HashMap<&str, usize> = nodes
        .iter()
        .filter(|n| !n.is_external)
        .map(|n| (n.id.as_str(), 0))
        .collect();
    for edge in edges.iter().filter(|e| !e.is_external) {
        if let Some(d) = degrees.get_mut(edge.from.as_str()) {
            *d += 1;
        }
    }
    degrees
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
