//! Structural diff between two graph snapshots.
//!
//! Five passes over the baseline/current pair: edge set difference, cycle
//! set difference, coupling delta, external-target set difference, hotspot
//! set difference. Each difference becomes one typed change with severity,
//! category, and table-driven impact; the whole list feeds the summary and
//! recommendation stages.

use std::collections::{BTreeSet, HashSet};

use crate::comparison::impact::impact_of;
use crate::comparison::recommendations;
use crate::comparison::types::*;
use crate::core::GraphMetrics;
use crate::snapshot::GraphSnapshot;

pub struct Differ<'a> {
    baseline: &'a GraphSnapshot,
    current: &'a GraphSnapshot,
}

impl<'a> Differ<'a> {
    pub fn new(baseline: &'a GraphSnapshot, current: &'a GraphSnapshot) -> Self {
        Self { baseline, current }
    }

    pub fn diff(&self) -> DiffReport {
        let mut changes = Vec::new();
        self.diff_edges(&mut changes);
        self.diff_cycles(&mut changes);
        self.diff_coupling(&mut changes);
        self.diff_external(&mut changes);
        self.diff_hotspots(&mut changes);

        let impact = self.summarize(&changes);
        let recommendations = recommendations::generate(&changes);

        DiffReport {
            baseline: summary_of(self.baseline),
            current: summary_of(self.current),
            changes,
            impact,
            recommendations,
        }
    }

    /// Edge identity for diffing is (from, to, binding); kind is excluded
    /// so an import that merely becomes type-only is not reported.
    fn diff_edges(&self, changes: &mut Vec<ArchitecturalChange>) {
        let before = edge_keys(self.baseline);
        let after = edge_keys(self.current);

        // Multiplicity is a metrics concern; the diff reports each distinct
        // (from, to, binding) once
        let mut reported: HashSet<EdgeKey> = HashSet::new();
        for edge in &self.current.graph.edges {
            let key: EdgeKey = (edge.from.clone(), edge.to.clone(), edge.binding);
            if before.contains(&key) || !reported.insert(key) {
                continue;
            }
            let severity = if edge.is_external {
                ChangeSeverity::Medium
            } else {
                ChangeSeverity::Low
            };
            changes.push(change(
                ChangeType::DependencyAdded,
                severity,
                format!("{} now depends on {}", edge.from, edge.to),
                ChangeDetails {
                    before: None,
                    after: Some(edge.to.clone()),
                    nodes: vec![edge.from.clone(), edge.to.clone()],
                },
            ));
        }

        reported.clear();
        for edge in &self.baseline.graph.edges {
            let key: EdgeKey = (edge.from.clone(), edge.to.clone(), edge.binding);
            if after.contains(&key) || !reported.insert(key) {
                continue;
            }
            let severity = if edge.is_external {
                ChangeSeverity::Medium
            } else {
                ChangeSeverity::Low
            };
            changes.push(change(
                ChangeType::DependencyRemoved,
                severity,
                format!("{} no longer depends on {}", edge.from, edge.to),
                ChangeDetails {
                    before: Some(edge.to.clone()),
                    after: None,
                    nodes: vec![edge.from.clone(), edge.to.clone()],
                },
            ));
        }
    }

    /// Cycles compare as node-id sets; rotations and entry points do not
    /// distinguish two reports of the same cycle.
    fn diff_cycles(&self, changes: &mut Vec<ArchitecturalChange>) {
        let before = cycle_sets(&self.baseline.graph.metrics);
        let after = cycle_sets(&self.current.graph.metrics);

        for cycle in &after {
            if !before.contains(cycle) {
                let severity = if cycle.len() > 2 {
                    ChangeSeverity::Critical
                } else {
                    ChangeSeverity::High
                };
                let nodes: Vec<String> = cycle.iter().cloned().collect();
                changes.push(change(
                    ChangeType::CircularDependencyIntroduced,
                    severity,
                    format!("new circular dependency through {} modules", cycle.len()),
                    ChangeDetails {
                        before: None,
                        after: Some(nodes.join(" -> ")),
                        nodes,
                    },
                ));
            }
        }
        for cycle in &before {
            if !after.contains(cycle) {
                let nodes: Vec<String> = cycle.iter().cloned().collect();
                changes.push(change(
                    ChangeType::CircularDependencyResolved,
                    ChangeSeverity::Low,
                    format!("circular dependency through {} modules resolved", cycle.len()),
                    ChangeDetails {
                        before: Some(nodes.join(" -> ")),
                        after: None,
                        nodes,
                    },
                ));
            }
        }
    }

    fn diff_coupling(&self, changes: &mut Vec<ArchitecturalChange>) {
        let before = self.baseline.graph.metrics.average_coupling;
        let after = self.current.graph.metrics.average_coupling;
        let delta = after - before;
        if delta == 0.0 {
            return;
        }

        let severity = if delta.abs() > 2.0 {
            ChangeSeverity::High
        } else if delta.abs() > 1.0 {
            ChangeSeverity::Medium
        } else {
            ChangeSeverity::Low
        };
        let change_type = if delta > 0.0 {
            ChangeType::CouplingIncreased
        } else {
            ChangeType::CouplingDecreased
        };
        changes.push(change(
            change_type,
            severity,
            format!("average coupling moved from {:.1} to {:.1}", before, after),
            ChangeDetails {
                before: Some(format!("{:.1}", before)),
                after: Some(format!("{:.1}", after)),
                nodes: vec![],
            },
        ));
    }

    fn diff_external(&self, changes: &mut Vec<ArchitecturalChange>) {
        let before = external_targets(self.baseline);
        let after = external_targets(self.current);

        for target in after.difference(&before) {
            changes.push(change(
                ChangeType::ExternalDependencyAdded,
                ChangeSeverity::Medium,
                format!("new external dependency '{}'", target),
                ChangeDetails {
                    before: None,
                    after: Some(target.to_string()),
                    nodes: vec![target.to_string()],
                },
            ));
        }
        for target in before.difference(&after) {
            changes.push(change(
                ChangeType::ExternalDependencyRemoved,
                ChangeSeverity::Low,
                format!("external dependency '{}' removed", target),
                ChangeDetails {
                    before: Some(target.to_string()),
                    after: None,
                    nodes: vec![target.to_string()],
                },
            ));
        }
    }

    fn diff_hotspots(&self, changes: &mut Vec<ArchitecturalChange>) {
        let before: BTreeSet<&str> = self
            .baseline
            .graph
            .metrics
            .hotspots
            .iter()
            .map(String::as_str)
            .collect();
        let after: BTreeSet<&str> = self
            .current
            .graph
            .metrics
            .hotspots
            .iter()
            .map(String::as_str)
            .collect();

        for node in after.difference(&before) {
            changes.push(change(
                ChangeType::HotspotCreated,
                ChangeSeverity::Medium,
                format!("{} became a dependency hotspot", node),
                ChangeDetails {
                    before: None,
                    after: Some(node.to_string()),
                    nodes: vec![node.to_string()],
                },
            ));
        }
        for node in before.difference(&after) {
            changes.push(change(
                ChangeType::HotspotResolved,
                ChangeSeverity::Low,
                format!("{} is no longer a dependency hotspot", node),
                ChangeDetails {
                    before: Some(node.to_string()),
                    after: None,
                    nodes: vec![node.to_string()],
                },
            ));
        }
    }

    fn summarize(&self, changes: &[ArchitecturalChange]) -> ImpactSummary {
        let mut by_severity = std::collections::BTreeMap::new();
        let mut by_category = std::collections::BTreeMap::new();
        for c in changes {
            *by_severity.entry(c.severity.to_string()).or_insert(0) += 1;
            *by_category.entry(c.category.to_string()).or_insert(0) += 1;
        }

        let before = &self.baseline.graph.metrics;
        let after = &self.current.graph.metrics;
        let key_metrics = vec![
            metric_delta("node_count", before.node_count as f64, after.node_count as f64),
            metric_delta("edge_count", before.edge_count as f64, after.edge_count as f64),
            metric_delta(
                "internal_edge_count",
                before.internal_edge_count as f64,
                after.internal_edge_count as f64,
            ),
            metric_delta(
                "external_edge_count",
                before.external_edge_count as f64,
                after.external_edge_count as f64,
            ),
            metric_delta(
                "average_coupling",
                before.average_coupling,
                after.average_coupling,
            ),
            metric_delta(
                "cycle_count",
                before.cycles.len() as f64,
                after.cycles.len() as f64,
            ),
            metric_delta(
                "hotspot_count",
                before.hotspots.len() as f64,
                after.hotspots.len() as f64,
            ),
        ];

        ImpactSummary {
            by_severity,
            by_category,
            health_change: HealthChange {
                before: before.health_score,
                after: after.health_score,
                delta: after.health_score - before.health_score,
            },
            key_metrics,
        }
    }
}

fn change(
    change_type: ChangeType,
    severity: ChangeSeverity,
    description: String,
    details: ChangeDetails,
) -> ArchitecturalChange {
    ArchitecturalChange {
        change_type,
        severity,
        category: change_type.category(),
        description,
        details,
        impact: impact_of(change_type),
    }
}

fn summary_of(snapshot: &GraphSnapshot) -> SnapshotSummary {
    SnapshotSummary {
        reference: snapshot.reference.clone(),
        timestamp: snapshot.timestamp,
        metrics: snapshot.graph.metrics.clone(),
    }
}

type EdgeKey = (String, String, crate::core::BindingKind);

fn edge_keys(snapshot: &GraphSnapshot) -> HashSet<EdgeKey> {
    snapshot
        .graph
        .edges
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.binding))
        .collect()
}

fn external_targets(snapshot: &GraphSnapshot) -> BTreeSet<&str> {
    snapshot
        .graph
        .edges
        .iter()
        .filter(|e| e.is_external)
        .map(|e| e.to.as_str())
        .collect()
}

fn cycle_sets(metrics: &GraphMetrics) -> HashSet<BTreeSet<String>> {
    metrics
        .cycles
        .iter()
        .map(|cycle| cycle.iter().cloned().collect())
        .collect()
}

fn metric_delta(name: &str, before: f64, after: f64) -> MetricDelta {
    MetricDelta {
        name: name.to_string(),
        before,
        after,
        delta: after - before,
    }
}
