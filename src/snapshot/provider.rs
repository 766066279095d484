//! Snapshot provider abstraction.
//!
//! The core never invokes version control directly; everything it needs
//! from history goes through this trait, which keeps the diff engine
//! testable against in-memory fakes.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::core::DriftmapResult;

/// Access to the analyzed file set as it existed at a given reference
pub trait SnapshotProvider {
    /// Paths (relative to the project root) present at `reference`
    fn list_files(&self, reference: &str) -> Result<Vec<PathBuf>>;

    /// Content of one file at `reference`
    fn read_file_at(&self, path: &Path, reference: &str) -> Result<String>;

    /// Materialize the file set into a scoped workspace on disk.
    /// The workspace is deleted when the handle drops, on every exit path.
    fn materialize(&self, reference: &str) -> Result<Workspace>;
}

/// A directory holding one materialized snapshot.
///
/// Temporary workspaces are deleted on drop; that drop is the guaranteed
/// release half of the acquire/use/release discipline around snapshot
/// analysis.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    // Present for temporary workspaces; dropping it removes the directory
    _tempdir: Option<TempDir>,
}

impl Workspace {
    /// A scoped temporary workspace rooted in a fresh directory
    pub fn temporary() -> Result<Self> {
        let tempdir = TempDir::new()?;
        Ok(Self {
            root: tempdir.path().to_path_buf(),
            _tempdir: Some(tempdir),
        })
    }

    /// Wrap an existing directory; nothing is deleted on drop
    pub fn existing(root: PathBuf) -> Self {
        Self {
            root,
            _tempdir: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one file into the workspace, creating parent directories
    pub fn write_file(&self, relative: &Path, content: &[u8]) -> DriftmapResult<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_workspace_is_deleted_on_drop() {
        let root = {
            let workspace = Workspace::temporary().unwrap();
            workspace
                .write_file(Path::new("src/a.ts"), b"export {};\n")
                .unwrap();
            assert!(workspace.root().join("src/a.ts").is_file());
            workspace.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn existing_workspace_survives_drop() {
        let tempdir = TempDir::new().unwrap();
        let root = tempdir.path().to_path_buf();
        {
            let _workspace = Workspace::existing(root.clone());
        }
        assert!(root.exists());
    }
}
