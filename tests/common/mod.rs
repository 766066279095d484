#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use driftmap::config::DriftmapConfig;
use driftmap::core::ModuleFacts;
use driftmap::{
    BuildOptions, DependencyGraph, FactExtractor, GraphBuilder, ModuleResolver,
    TreeSitterExtractor,
};

/// Write a throwaway project with the given relative-path/content pairs
pub fn write_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

/// Run the extraction-and-build pipeline over every source file under `root`
pub fn build_graph_for(root: &Path) -> (Vec<std::path::PathBuf>, Vec<ModuleFacts>, DependencyGraph) {
    let config = DriftmapConfig::default();
    let walker = driftmap::io::FileWalker::new(root.to_path_buf(), config.extensions.clone());
    let files = walker.walk().unwrap();

    let extractor = TreeSitterExtractor::new();
    let outcomes: Vec<anyhow::Result<ModuleFacts>> = files
        .iter()
        .map(|file| {
            let content = fs::read_to_string(file)?;
            extractor.extract(file, &content)
        })
        .collect();

    let builder = GraphBuilder::new(
        ModuleResolver::new(config.extensions.clone()),
        BuildOptions::default(),
    );
    let graph = builder.build(&files, &outcomes).unwrap();
    let facts = outcomes.into_iter().map(|o| o.unwrap()).collect();
    (files, facts, graph)
}

/// Stage everything and commit, returning nothing; the caller reads via refs
pub fn commit_all(repo: &git2::Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index.add_all(["*"], git2::IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = git2::Signature::now("tester", "tester@example.com").unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}
