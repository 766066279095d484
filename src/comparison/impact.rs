//! Fixed impact lookup table.
//!
//! Each change type maps to a constant (maintainability, performance,
//! testability) triple; the overall score is their sum. The table is data,
//! not computation; downstream report consumers depend on these exact
//! values, so treat any edit as a breaking change.

use crate::comparison::types::{ChangeImpact, ChangeType};

pub fn impact_of(change_type: ChangeType) -> ChangeImpact {
    let (maintainability, performance, testability) = match change_type {
        ChangeType::DependencyAdded => (-1, 0, -1),
        ChangeType::DependencyRemoved => (1, 0, 1),
        ChangeType::CircularDependencyIntroduced => (-3, -1, -2),
        ChangeType::CircularDependencyResolved => (3, 1, 2),
        ChangeType::CouplingIncreased => (-2, 0, -2),
        ChangeType::CouplingDecreased => (2, 0, 2),
        ChangeType::LayerViolationIntroduced => (-3, 0, -1),
        ChangeType::LayerViolationResolved => (3, 0, 1),
        ChangeType::ExternalDependencyAdded => (-1, -1, -1),
        ChangeType::ExternalDependencyRemoved => (1, 1, 1),
        ChangeType::HotspotCreated => (-2, -1, -1),
        ChangeType::HotspotResolved => (2, 1, 1),
    };
    ChangeImpact {
        maintainability,
        performance,
        testability,
        overall_score: maintainability + performance + testability,
    }
}
