//! git2-backed snapshot provider.
//!
//! Opens a fresh `Repository` per operation; `git2::Repository` is not
//! Sync and the per-open cost is irrelevant next to tree materialization.
//! A reference that does not resolve is a fatal, descriptive error: the
//! diff engine has nothing to compute without both snapshots.

use anyhow::{Context as _, Result};
use git2::{ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use std::path::{Path, PathBuf};

use crate::core::DriftmapError;
use crate::snapshot::provider::{SnapshotProvider, Workspace};

pub struct GitProvider {
    repo_path: PathBuf,
}

impl GitProvider {
    /// Discover the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("not a git repository: {}", path.display()))?;
        let repo_path = repo
            .workdir()
            .ok_or_else(|| anyhow::anyhow!("bare repositories are not supported"))?
            .to_path_buf();
        Ok(Self { repo_path })
    }

    fn open_repo(&self) -> Result<Repository> {
        Repository::open(&self.repo_path)
            .with_context(|| format!("failed to open repository at {}", self.repo_path.display()))
    }

    fn tree_at<'r>(&self, repo: &'r Repository, reference: &str) -> Result<git2::Tree<'r>> {
        let object = repo
            .revparse_single(reference)
            .map_err(|e| DriftmapError::snapshot(reference, e.message().to_string()))?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| DriftmapError::snapshot(reference, "does not point at a commit"))?;
        Ok(commit.tree()?)
    }
}

impl SnapshotProvider for GitProvider {
    fn list_files(&self, reference: &str) -> Result<Vec<PathBuf>> {
        let repo = self.open_repo()?;
        let tree = self.tree_at(&repo, reference)?;

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(PathBuf::from(format!("{}{}", dir, name)));
                }
            }
            TreeWalkResult::Ok
        })?;
        Ok(files)
    }

    fn read_file_at(&self, path: &Path, reference: &str) -> Result<String> {
        let repo = self.open_repo()?;
        let tree = self.tree_at(&repo, reference)?;
        let entry = tree
            .get_path(path)
            .with_context(|| format!("{} not present at '{}'", path.display(), reference))?;
        let blob = entry
            .to_object(&repo)?
            .peel_to_blob()
            .with_context(|| format!("{} is not a file at '{}'", path.display(), reference))?;
        String::from_utf8(blob.content().to_vec())
            .with_context(|| format!("{} is not valid UTF-8", path.display()))
    }

    fn materialize(&self, reference: &str) -> Result<Workspace> {
        let repo = self.open_repo()?;
        let tree = self.tree_at(&repo, reference)?;
        let workspace = Workspace::temporary()?;

        let mut write_error = None;
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                return TreeWalkResult::Ok;
            };
            let relative = PathBuf::from(format!("{}{}", dir, name));
            let result = entry
                .to_object(&repo)
                .map_err(anyhow::Error::from)
                .and_then(|object| object.peel_to_blob().map_err(anyhow::Error::from))
                .and_then(|blob| {
                    workspace
                        .write_file(&relative, blob.content())
                        .map_err(anyhow::Error::from)
                });
            match result {
                Ok(()) => TreeWalkResult::Ok,
                Err(e) => {
                    write_error = Some(e.context(format!("materializing {}", relative.display())));
                    TreeWalkResult::Abort
                }
            }
        })?;

        // Workspace drops (and deletes) here if a blob failed to write
        match write_error {
            Some(e) => Err(e),
            None => Ok(workspace),
        }
    }
}
