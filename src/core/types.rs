//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// How an edge came to exist in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Plain `import` statement
    Import,
    /// Re-export (`export ... from`)
    Export,
    /// `import type` / `export type`
    TypeOnly,
}

/// The binding shape an import or export uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    Default,
    Named,
    Namespace,
    SideEffect,
}

/// What kind of declaration an export fact refers to.
///
/// This is the closed set the core branches on; the extractor is the only
/// component that ever looks at raw syntax nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactKind {
    Value,
    Function,
    Class,
    TypeAlias,
    Interface,
}

impl FactKind {
    /// Type-level declarations may be referenced only in annotations the
    /// extractor cannot see.
    pub fn is_type_level(&self) -> bool {
        matches!(self, FactKind::TypeAlias | FactKind::Interface)
    }
}

/// A single exported binding, as reported by the fact extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFact {
    /// Canonical id of the module declaring the export
    pub module: String,
    /// Exported binding name (`"default"` for default exports)
    pub name: String,
    pub kind: FactKind,
    pub is_default: bool,
    pub line: usize,
}

/// A single imported binding, as reported by the fact extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact {
    /// Canonical id of the importing module
    pub module: String,
    /// The specifier as written in source (`./util`, `react`, ...)
    pub source: String,
    /// Local binding name; empty for side-effect imports
    pub name: String,
    pub binding: BindingKind,
    /// True for `import type` / re-export `export type`
    pub type_only: bool,
    /// True when this record is a re-export rather than an import
    pub re_export: bool,
    pub line: usize,
}

/// Everything the extractor learned about one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFacts {
    pub exports: Vec<ExportFact>,
    pub imports: Vec<ImportFact>,
}

/// A node in the dependency graph, deduplicated by id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Canonical absolute path, or the package name for external targets
    pub id: String,
    pub is_external: bool,
}

/// One dependency edge. Multiple edges between the same pair are preserved;
/// multiplicity feeds the coupling metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub is_external: bool,
    pub binding: BindingKind,
}

/// Aggregate statistics for one graph, recomputed in full per snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub internal_edge_count: usize,
    pub external_edge_count: usize,
    /// Each inner list is one closed cycle, start node repeated at the end
    pub cycles: Vec<Vec<String>>,
    /// Internal edges per node, one decimal
    pub average_coupling: f64,
    pub most_connected: Option<String>,
    /// Nodes whose out-degree exceeds 1.5x the average coupling
    pub hotspots: Vec<String>,
    /// 0-100, see `graph::metrics`
    pub health_score: f64,
}

/// Discrete confidence that a dead-reference candidate is safe to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Fixed mapping from risk-factor count: 0 -> High, 1-2 -> Medium,
    /// 3+ -> Low. A rule, not a score.
    pub fn from_risk_count(count: usize) -> Self {
        match count {
            0 => Confidence::High,
            1 | 2 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// An export with no traceable import anywhere in the analyzed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadExport {
    pub export: ExportFact,
    pub confidence: Confidence,
    pub risk_factors: Vec<String>,
}

/// An import whose binding is never matched against any export record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedImport {
    pub import: ImportFact,
    pub confidence: Confidence,
    pub risk_factors: Vec<String>,
}

/// Project-level analysis result for a single file set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub project_path: PathBuf,
    pub file_count: usize,
    pub metrics: GraphMetrics,
    pub dead_exports: Vec<DeadExport>,
    pub unused_imports: Vec<UnusedImport>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Index from module id to the set of binding names imported from it,
/// with sentinel entries for default and namespace imports
pub type ImportedNames = HashMap<String, std::collections::HashSet<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_from_risk_count_boundaries() {
        assert_eq!(Confidence::from_risk_count(0), Confidence::High);
        assert_eq!(Confidence::from_risk_count(1), Confidence::Medium);
        assert_eq!(Confidence::from_risk_count(2), Confidence::Medium);
        assert_eq!(Confidence::from_risk_count(3), Confidence::Low);
        assert_eq!(Confidence::from_risk_count(10), Confidence::Low);
    }

    #[test]
    fn type_level_fact_kinds() {
        assert!(FactKind::Interface.is_type_level());
        assert!(FactKind::TypeAlias.is_type_level());
        assert!(!FactKind::Function.is_type_level());
        assert!(!FactKind::Value.is_type_level());
    }
}
