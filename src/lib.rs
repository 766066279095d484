// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod core;
pub mod deadcode;
pub mod extraction;
pub mod graph;
pub mod io;
pub mod resolver;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{
    AnalysisReport, BindingKind, Confidence, DeadExport, DependencyEdge, EdgeKind, ExportFact,
    FactCache, FactKind, GraphMetrics, ImportFact, ModuleFacts, ModuleNode, UnusedImport,
};

pub use crate::comparison::{
    ArchitecturalChange, ChangeCategory, ChangeSeverity, ChangeType, DiffReport, Differ,
    Recommendation,
};

pub use crate::deadcode::CrossReferencer;
pub use crate::extraction::{FactExtractor, TreeSitterExtractor};
pub use crate::graph::{BuildOptions, DependencyGraph, GraphBuilder};
pub use crate::resolver::ModuleResolver;
pub use crate::snapshot::{GitProvider, GraphSnapshot, SnapshotManager, SnapshotProvider};
