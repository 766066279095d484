use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::DriftmapConfig;
use crate::core::{AnalysisReport, ExportFact, FactCache, ImportFact, ModuleFacts};
use crate::deadcode::CrossReferencer;
use crate::extraction::{FactExtractor, TreeSitterExtractor};
use crate::graph::{BuildOptions, DependencyGraph, GraphBuilder};
use crate::io::FileWalker;
use crate::resolver::ModuleResolver;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub no_dead_code: bool,
}

/// Walked file set with per-file extraction outcomes, order-aligned
pub(crate) struct ProjectFacts {
    /// Canonicalized project root; all file paths are absolute under it
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub facts: Vec<Result<ModuleFacts>>,
}

impl ProjectFacts {
    /// Flatten the successful outcomes into one export and one import list
    pub fn flattened(&self) -> (Vec<ExportFact>, Vec<ImportFact>) {
        let mut exports = Vec::new();
        let mut imports = Vec::new();
        for facts in self.facts.iter().flatten() {
            exports.extend(facts.exports.iter().cloned());
            imports.extend(facts.imports.iter().cloned());
        }
        (exports, imports)
    }
}

/// Walk `path` and extract facts from every source file, caching by content
pub(crate) fn collect_project_facts(
    path: &Path,
    config: &DriftmapConfig,
) -> Result<ProjectFacts> {
    // resolver extension probing and node identity both assume absolute
    // paths; a relative root like `.` would split the two apart
    let root = path
        .canonicalize()
        .with_context(|| format!("resolving {}", path.display()))?;
    let walker = FileWalker::new(root.clone(), config.extensions.clone())
        .with_ignore_patterns(config.ignore_patterns.clone());
    let files = walker.walk()?;
    info!("{}: {} source files", root.display(), files.len());

    let extractor = TreeSitterExtractor::new();
    let mut cache = FactCache::new(config.cache_capacity);
    let facts = files
        .iter()
        .map(|file| {
            let content = fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            cache.get_or_compute(file, &content, || extractor.extract(file, &content))
        })
        .collect();

    Ok(ProjectFacts { root, files, facts })
}

pub(crate) fn build_graph(
    project: &ProjectFacts,
    config: &DriftmapConfig,
) -> Result<DependencyGraph> {
    let resolver = ModuleResolver::new(config.extensions.clone());
    let options = BuildOptions {
        include_external: config.include_external,
        fail_fast: config.fail_fast,
    };
    GraphBuilder::new(resolver, options).build(&project.files, &project.facts)
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let project_config = DriftmapConfig::load(&config.path);
    let project = collect_project_facts(&config.path, &project_config)?;
    let graph = build_graph(&project, &project_config)?;

    let (dead_exports, unused_imports) = if config.no_dead_code {
        (Vec::new(), Vec::new())
    } else {
        let (exports, imports) = project.flattened();
        let referencer = CrossReferencer::new(ModuleResolver::new(
            project_config.extensions.clone(),
        ));
        (
            referencer.find_dead_exports(&exports, &imports),
            referencer.find_unused_imports(&imports, &exports),
        )
    };

    let mut report = AnalysisReport {
        project_path: config.path.clone(),
        file_count: project.files.len(),
        metrics: graph.metrics.clone(),
        dead_exports,
        unused_imports,
        timestamp: Utc::now(),
    };
    relativize_report(&mut report, &project.root);

    let mut writer = super::writer_for(config.format, config.output.as_ref())?;
    writer.write_analysis(&report)
}

/// Rewrite absolute module ids relative to the project root for display.
/// External ids (bare package names) pass through untouched.
pub(crate) fn relativize_report(report: &mut AnalysisReport, root: &Path) {
    let relativize = |id: &mut String| {
        if let Some(relative) = pathdiff::diff_paths(Path::new(id.as_str()), root) {
            if !relative.as_os_str().is_empty() && !relative.starts_with("..") {
                *id = relative.to_string_lossy().into_owned();
            }
        }
    };

    for cycle in &mut report.metrics.cycles {
        cycle.iter_mut().for_each(relativize);
    }
    report.metrics.hotspots.iter_mut().for_each(relativize);
    if let Some(node) = report.metrics.most_connected.as_mut() {
        relativize(node);
    }
    for dead in &mut report.dead_exports {
        relativize(&mut dead.export.module);
    }
    for unused in &mut report.unused_imports {
        relativize(&mut unused.import.module);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphMetrics;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn collects_and_builds_small_project() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "util.ts", "export const helper = 1;\n");
        write_source(&dir, "main.ts", "import { helper } from './util';\n");

        let config = DriftmapConfig::default();
        let project = collect_project_facts(dir.path(), &config).unwrap();
        assert_eq!(project.files.len(), 2);
        assert!(project.facts.iter().all(|f| f.is_ok()));

        let graph = build_graph(&project, &config).unwrap();
        assert_eq!(graph.metrics.node_count, 2);
        assert_eq!(graph.metrics.internal_edge_count, 1);
    }

    #[test]
    fn duplicate_file_content_does_not_confuse_dead_export_attribution() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        // identical text in two files; only b/x.ts is imported
        write_source(&dir, "a/x.ts", "export const live = 1;\n");
        write_source(&dir, "b/x.ts", "export const live = 1;\n");
        write_source(&dir, "main.ts", "import { live } from './b/x';\nlive;\n");

        let config = DriftmapConfig::default();
        let project = collect_project_facts(dir.path(), &config).unwrap();
        let (exports, imports) = project.flattened();
        let referencer = CrossReferencer::new(ModuleResolver::new(config.extensions.clone()));

        let dead = referencer.find_dead_exports(&exports, &imports);
        assert_eq!(dead.len(), 1, "dead: {:?}", dead);
        assert!(dead[0].export.module.ends_with("a/x.ts"));
    }

    #[test]
    fn relativize_rewrites_internal_ids_only() {
        let root = Path::new("/proj");
        let mut report = AnalysisReport {
            project_path: root.to_path_buf(),
            file_count: 0,
            metrics: GraphMetrics {
                cycles: vec![vec![
                    "/proj/a.ts".to_string(),
                    "/proj/b.ts".to_string(),
                    "/proj/a.ts".to_string(),
                ]],
                hotspots: vec!["react".to_string()],
                most_connected: Some("/proj/src/hub.ts".to_string()),
                ..Default::default()
            },
            dead_exports: vec![],
            unused_imports: vec![],
            timestamp: Utc::now(),
        };

        relativize_report(&mut report, root);
        assert_eq!(report.metrics.cycles[0], vec!["a.ts", "b.ts", "a.ts"]);
        assert_eq!(report.metrics.most_connected.as_deref(), Some("src/hub.ts"));
        // bare package names have no path under the root
        assert_eq!(report.metrics.hotspots, vec!["react"]);
    }
}
