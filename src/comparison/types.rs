//! Types describing architectural change between two snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::GraphMetrics;

/// Closed enumeration of everything the diff engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    DependencyAdded,
    DependencyRemoved,
    CircularDependencyIntroduced,
    CircularDependencyResolved,
    CouplingIncreased,
    CouplingDecreased,
    LayerViolationIntroduced,
    LayerViolationResolved,
    ExternalDependencyAdded,
    ExternalDependencyRemoved,
    HotspotCreated,
    HotspotResolved,
}

impl ChangeType {
    pub fn category(&self) -> ChangeCategory {
        match self {
            ChangeType::DependencyAdded | ChangeType::DependencyRemoved => {
                ChangeCategory::Dependencies
            }
            ChangeType::CircularDependencyIntroduced
            | ChangeType::CircularDependencyResolved
            | ChangeType::LayerViolationIntroduced
            | ChangeType::LayerViolationResolved => ChangeCategory::Architecture,
            ChangeType::CouplingIncreased | ChangeType::CouplingDecreased => {
                ChangeCategory::Coupling
            }
            ChangeType::ExternalDependencyAdded | ChangeType::ExternalDependencyRemoved => {
                ChangeCategory::External
            }
            ChangeType::HotspotCreated | ChangeType::HotspotResolved => ChangeCategory::Complexity,
        }
    }

    /// Positive changes improve the architecture; they never generate
    /// recommendations
    pub fn is_improvement(&self) -> bool {
        matches!(
            self,
            ChangeType::DependencyRemoved
                | ChangeType::CircularDependencyResolved
                | ChangeType::CouplingDecreased
                | ChangeType::LayerViolationResolved
                | ChangeType::ExternalDependencyRemoved
                | ChangeType::HotspotResolved
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ChangeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeSeverity::Low => "low",
            ChangeSeverity::Medium => "medium",
            ChangeSeverity::High => "high",
            ChangeSeverity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Dependencies,
    Architecture,
    Coupling,
    Complexity,
    External,
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeCategory::Dependencies => "dependencies",
            ChangeCategory::Architecture => "architecture",
            ChangeCategory::Coupling => "coupling",
            ChangeCategory::Complexity => "complexity",
            ChangeCategory::External => "external",
        };
        write!(f, "{}", s)
    }
}

/// Before/after values and the node ids a change touches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetails {
    pub before: Option<String>,
    pub after: Option<String>,
    pub nodes: Vec<String>,
}

/// Impact on three axes, each in [-5, +5], from a fixed per-type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeImpact {
    pub maintainability: i8,
    pub performance: i8,
    pub testability: i8,
    pub overall_score: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturalChange {
    pub change_type: ChangeType,
    pub severity: ChangeSeverity,
    pub category: ChangeCategory,
    pub description: String,
    pub details: ChangeDetails,
    pub impact: ChangeImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthChange {
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub name: String,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

/// Histograms, health delta, and per-metric deltas for the whole diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub health_change: HealthChange,
    pub key_metrics: Vec<MetricDelta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: ChangeSeverity,
    pub category: ChangeCategory,
    pub change_type: ChangeType,
    pub title: String,
    pub actions: Vec<String>,
    /// Indices into `DiffReport::changes`
    pub related_changes: Vec<usize>,
}

/// Metrics and identity of one side of the diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub reference: String,
    pub timestamp: DateTime<Utc>,
    pub metrics: GraphMetrics,
}

/// The diff engine's complete, JSON-serializable output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub baseline: SnapshotSummary,
    pub current: SnapshotSummary,
    pub changes: Vec<ArchitecturalChange>,
    pub impact: ImpactSummary,
    pub recommendations: Vec<Recommendation>,
}

impl DiffReport {
    /// Drop changes below `min`. A pure post-filter: histograms, health
    /// deltas, and recommendation priorities keep their computed values.
    /// Recommendation change references are remapped to the surviving list;
    /// references to dropped changes are removed.
    pub fn with_min_severity(mut self, min: ChangeSeverity) -> Self {
        let mut remap = vec![None; self.changes.len()];
        let mut kept = Vec::with_capacity(self.changes.len());
        for (index, change) in self.changes.drain(..).enumerate() {
            if change.severity >= min {
                remap[index] = Some(kept.len());
                kept.push(change);
            }
        }
        self.changes = kept;

        for recommendation in &mut self.recommendations {
            recommendation.related_changes = recommendation
                .related_changes
                .iter()
                .filter_map(|&index| remap.get(index).copied().flatten())
                .collect();
        }
        self
    }

    /// True when any change is at or above `threshold`
    pub fn has_regression_at(&self, threshold: ChangeSeverity) -> bool {
        self.changes
            .iter()
            .any(|c| !c.change_type.is_improvement() && c.severity >= threshold)
    }
}
