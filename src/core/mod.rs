//! Core data model shared by the graph, dead-code, and comparison layers

pub mod cache;
pub mod errors;
pub mod types;

pub use cache::{CacheStats, FactCache};
pub use errors::{DriftmapError, DriftmapResult};
pub use types::{
    AnalysisReport, BindingKind, Confidence, DeadExport, DependencyEdge, EdgeKind, ExportFact,
    FactKind, GraphMetrics, ImportFact, ImportedNames, ModuleFacts, ModuleNode, UnusedImport,
};
