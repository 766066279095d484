//! Cross-file dead-export and unused-import detection.
//!
//! Operates on the flat export/import fact lists, not the graph: liveness
//! is a question about binding names, which the graph's edges deliberately
//! do not carry. Namespace and default imports each count as referencing
//! every export of their target: the bound value can expose any member
//! under any local name.

pub mod confidence;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::core::{
    Confidence, DeadExport, ExportFact, ImportFact, ImportedNames, UnusedImport,
};
use crate::resolver::ModuleResolver;

/// Sentinel recorded for namespace imports; satisfies any export check
pub const NAMESPACE_SENTINEL: &str = "*";
/// Sentinel recorded for default imports; satisfies any export check
pub const DEFAULT_SENTINEL: &str = "default";

pub struct CrossReferencer {
    resolver: ModuleResolver,
}

impl CrossReferencer {
    pub fn new(resolver: ModuleResolver) -> Self {
        Self { resolver }
    }

    /// Exports with no import record resolving to their module and matching
    /// their name, the default sentinel, or the namespace sentinel.
    pub fn find_dead_exports(
        &self,
        exports: &[ExportFact],
        imports: &[ImportFact],
    ) -> Vec<DeadExport> {
        let imported = self.imported_names(imports);

        exports
            .iter()
            .filter(|export| !is_export_referenced(export, &imported))
            .map(|export| {
                let risk_factors = confidence::export_risk_factors(export);
                DeadExport {
                    export: export.clone(),
                    confidence: Confidence::from_risk_count(risk_factors.len()),
                    risk_factors,
                }
            })
            .collect()
    }

    /// Imports of internal modules whose binding matches none of the
    /// target's exports. External targets are skipped: there are no export
    /// facts to check them against.
    pub fn find_unused_imports(
        &self,
        imports: &[ImportFact],
        exports: &[ExportFact],
    ) -> Vec<UnusedImport> {
        let mut exported: HashMap<&str, HashSet<&str>> = HashMap::new();
        let mut has_default: HashSet<&str> = HashSet::new();
        for export in exports {
            exported
                .entry(export.module.as_str())
                .or_default()
                .insert(export.name.as_str());
            if export.is_default {
                has_default.insert(export.module.as_str());
            }
        }

        imports
            .iter()
            .filter_map(|import| {
                let target = self
                    .resolver
                    .resolve(Path::new(&import.module), &import.source);
                if target.is_external {
                    return None;
                }
                let matched = match import.binding {
                    crate::core::BindingKind::SideEffect => false,
                    crate::core::BindingKind::Namespace => exported
                        .get(target.id.as_str())
                        .map(|names| !names.is_empty())
                        .unwrap_or(false),
                    crate::core::BindingKind::Default => has_default.contains(target.id.as_str()),
                    crate::core::BindingKind::Named => exported
                        .get(target.id.as_str())
                        .map(|names| names.contains(import.name.as_str()))
                        .unwrap_or(false),
                };
                if matched {
                    return None;
                }
                let risk_factors = confidence::import_risk_factors(import);
                Some(UnusedImport {
                    import: import.clone(),
                    confidence: Confidence::from_risk_count(risk_factors.len()),
                    risk_factors,
                })
            })
            .collect()
    }

    /// Index of binding names imported per resolved module id, with
    /// sentinels for default and namespace imports
    fn imported_names(&self, imports: &[ImportFact]) -> ImportedNames {
        let mut index: ImportedNames = HashMap::new();
        for import in imports {
            let target = self
                .resolver
                .resolve(Path::new(&import.module), &import.source);
            let names = index.entry(target.id).or_default();
            match import.binding {
                crate::core::BindingKind::Namespace => {
                    names.insert(NAMESPACE_SENTINEL.to_string());
                }
                crate::core::BindingKind::Default => {
                    names.insert(DEFAULT_SENTINEL.to_string());
                }
                crate::core::BindingKind::Named => {
                    names.insert(import.name.clone());
                }
                // References the module, not any binding
                crate::core::BindingKind::SideEffect => {}
            }
        }
        index
    }
}

fn is_export_referenced(export: &ExportFact, imported: &ImportedNames) -> bool {
    let Some(names) = imported.get(export.module.as_str()) else {
        return false;
    };
    // both sentinels satisfy every export of the module: a default import
    // binds an object whose members cannot be tracked by name
    names.contains(NAMESPACE_SENTINEL)
        || names.contains(DEFAULT_SENTINEL)
        || names.contains(export.name.as_str())
}
