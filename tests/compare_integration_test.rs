mod common;

use common::commit_all;
use driftmap::config::DriftmapConfig;
use driftmap::core::FactCache;
use driftmap::{
    BuildOptions, ChangeSeverity, ChangeType, Differ, GitProvider, ModuleResolver,
    SnapshotManager, TreeSitterExtractor,
};
use std::fs;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    repo: git2::Repository,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).unwrap();
    }

    fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).unwrap();
    }
}

fn snapshot_pair(
    fixture: &Fixture,
    before: &str,
    after: &str,
) -> (driftmap::snapshot::GraphSnapshot, driftmap::snapshot::GraphSnapshot) {
    let config = DriftmapConfig::default();
    let provider = GitProvider::open(fixture.dir.path()).unwrap();
    let extractor = TreeSitterExtractor::new();
    let manager = SnapshotManager::new(
        &extractor,
        &provider,
        ModuleResolver::new(config.extensions.clone()),
        BuildOptions::default(),
        config.extensions.clone(),
    );
    let mut cache = FactCache::new(config.cache_capacity);
    let baseline = manager.snapshot(before, &mut cache).unwrap();
    let current = manager.snapshot(after, &mut cache).unwrap();
    (baseline, current)
}

#[test]
fn detects_introduced_cycle_between_commits() {
    let fixture = Fixture::new();
    fixture.write("a.ts", "export const a = 1;\n");
    fixture.write("b.ts", "import { a } from './a';\nexport const b = a;\n");
    commit_all(&fixture.repo, "baseline");

    fixture.write(
        "a.ts",
        "import { b } from './b';\nexport const a = () => b;\n",
    );
    commit_all(&fixture.repo, "introduce cycle");

    let (baseline, current) = snapshot_pair(&fixture, "HEAD~1", "HEAD");
    let report = Differ::new(&baseline, &current).diff();

    let cycle_change = report
        .changes
        .iter()
        .find(|c| c.change_type == ChangeType::CircularDependencyIntroduced)
        .expect("cycle change missing");
    // two-node cycles are high, not critical
    assert_eq!(cycle_change.severity, ChangeSeverity::High);
    assert_eq!(report.impact.health_change.delta, -10.0);
    assert!(report.has_regression_at(ChangeSeverity::High));

    let recommendation = report
        .recommendations
        .iter()
        .find(|r| r.change_type == ChangeType::CircularDependencyIntroduced)
        .expect("cycle recommendation missing");
    assert!(!recommendation.actions.is_empty());
}

#[test]
fn identical_revisions_produce_an_empty_diff() {
    let fixture = Fixture::new();
    fixture.write("main.ts", "import './style.css';\nexport default 1;\n");
    fixture.write("util.ts", "export const u = 1;\n");
    commit_all(&fixture.repo, "only commit");

    let (baseline, current) = snapshot_pair(&fixture, "HEAD", "HEAD");
    let report = Differ::new(&baseline, &current).diff();

    assert!(report.changes.is_empty());
    assert!(report.recommendations.is_empty());
    assert_eq!(report.impact.health_change.delta, 0.0);
}

#[test]
fn removed_module_surfaces_as_removed_dependencies() {
    let fixture = Fixture::new();
    fixture.write("helper.ts", "export const h = 1;\n");
    fixture.write("main.ts", "import { h } from './helper';\nh;\n");
    commit_all(&fixture.repo, "baseline");

    fixture.remove("helper.ts");
    fixture.write("main.ts", "export const standalone = 1;\n");
    commit_all(&fixture.repo, "inline helper");

    let (baseline, current) = snapshot_pair(&fixture, "HEAD~1", "HEAD");
    let report = Differ::new(&baseline, &current).diff();

    let removal = report
        .changes
        .iter()
        .find(|c| c.change_type == ChangeType::DependencyRemoved)
        .expect("removal missing");
    assert!(removal.change_type.is_improvement());
    assert!(!report.has_regression_at(ChangeSeverity::Low));
}

#[test]
fn new_external_dependency_is_flagged() {
    let fixture = Fixture::new();
    fixture.write("main.ts", "export const x = 1;\n");
    commit_all(&fixture.repo, "baseline");

    fixture.write(
        "main.ts",
        "import _ from 'lodash';\nexport const x = _.identity(1);\n",
    );
    commit_all(&fixture.repo, "add lodash");

    let (baseline, current) = snapshot_pair(&fixture, "HEAD~1", "HEAD");
    let report = Differ::new(&baseline, &current).diff();

    assert!(report
        .changes
        .iter()
        .any(|c| c.change_type == ChangeType::ExternalDependencyAdded
            && c.description.contains("lodash")));
}

#[test]
fn unknown_reference_is_a_descriptive_error() {
    let fixture = Fixture::new();
    fixture.write("main.ts", "export const x = 1;\n");
    commit_all(&fixture.repo, "only commit");

    let config = DriftmapConfig::default();
    let provider = GitProvider::open(fixture.dir.path()).unwrap();
    let extractor = TreeSitterExtractor::new();
    let manager = SnapshotManager::new(
        &extractor,
        &provider,
        ModuleResolver::new(config.extensions.clone()),
        BuildOptions::default(),
        config.extensions.clone(),
    );
    let mut cache = FactCache::new(16);

    let error = manager
        .snapshot("no-such-branch", &mut cache)
        .unwrap_err()
        .to_string();
    assert!(error.contains("no-such-branch"), "got: {}", error);
}
