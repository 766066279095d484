//! Graph snapshot diffing: typed changes, impact scoring, recommendations

pub mod differ;
pub mod impact;
pub mod recommendations;
pub mod types;

pub use differ::Differ;
pub use types::{
    ArchitecturalChange, ChangeCategory, ChangeDetails, ChangeImpact, ChangeSeverity, ChangeType,
    DiffReport, HealthChange, ImpactSummary, MetricDelta, Recommendation, SnapshotSummary,
};
