//! Ranked, deduplicated recommendations derived from a change list.
//!
//! One recommendation per (category, change type), whatever the number of
//! matching changes; the fixed action checklist per type is part of the
//! report contract.

use std::collections::BTreeMap;

use crate::comparison::types::{
    ArchitecturalChange, ChangeCategory, ChangeSeverity, ChangeType, Recommendation,
};

/// Build recommendations for all regression-type changes, sorted by
/// priority descending. Improvement changes never generate one.
pub fn generate(changes: &[ArchitecturalChange]) -> Vec<Recommendation> {
    let mut grouped: BTreeMap<(ChangeCategory, ChangeType), Vec<usize>> = BTreeMap::new();
    for (index, change) in changes.iter().enumerate() {
        if change.change_type.is_improvement() {
            continue;
        }
        if advice_for(change.change_type).is_none() {
            continue;
        }
        grouped
            .entry((change.category, change.change_type))
            .or_default()
            .push(index);
    }

    let mut recommendations: Vec<Recommendation> = grouped
        .into_iter()
        .map(|((category, change_type), related_changes)| {
            let (title, actions) = advice_for(change_type).expect("filtered above");
            let priority = related_changes
                .iter()
                .map(|&i| changes[i].severity)
                .max()
                .unwrap_or(ChangeSeverity::Low);
            Recommendation {
                priority,
                category,
                change_type,
                title: title.to_string(),
                actions: actions.iter().map(|a| a.to_string()).collect(),
                related_changes,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations
}

/// Fixed title and action checklist per regression type. Plain dependency
/// additions are informational and get no recommendation.
fn advice_for(change_type: ChangeType) -> Option<(&'static str, &'static [&'static str])> {
    match change_type {
        ChangeType::CircularDependencyIntroduced => Some((
            "Resolve circular dependencies",
            &[
                "Extract the shared pieces into a module both sides can import",
                "Invert one edge of the cycle behind an interface",
                "Move cross-cutting types into a dedicated types module",
            ],
        )),
        ChangeType::CouplingIncreased => Some((
            "Reduce module coupling",
            &[
                "Review whether new imports can go through existing facades",
                "Split modules that accumulated unrelated responsibilities",
            ],
        )),
        ChangeType::ExternalDependencyAdded => Some((
            "Audit new external dependencies",
            &[
                "Confirm each new package is maintained and license-compatible",
                "Check whether an existing dependency already covers the need",
            ],
        )),
        ChangeType::HotspotCreated => Some((
            "Break up dependency hotspots",
            &[
                "Split the hotspot module along its distinct import clusters",
                "Push widely-imported helpers closer to their callers",
            ],
        )),
        ChangeType::LayerViolationIntroduced => Some((
            "Restore layer boundaries",
            &["Route the dependency through the layer's public interface"],
        )),
        _ => None,
    }
}
