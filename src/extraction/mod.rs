//! Fact extraction boundary.
//!
//! The analysis core never touches syntax trees; it consumes flat
//! `ExportFact`/`ImportFact` records through the `FactExtractor` trait.
//! `TreeSitterExtractor` is the production implementation; tests substitute
//! in-memory fakes.

pub mod tree_sitter;

use anyhow::Result;
use std::path::Path;

use crate::core::ModuleFacts;

pub use self::tree_sitter::TreeSitterExtractor;

pub trait FactExtractor {
    /// Extract all import/export facts from one file's content.
    /// A failure here is per-file; batch callers skip the file.
    fn extract(&self, path: &Path, content: &str) -> Result<ModuleFacts>;
}
