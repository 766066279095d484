use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::cli::{OutputFormat, SeverityArg};
use crate::comparison::Differ;
use crate::config::DriftmapConfig;
use crate::core::FactCache;
use crate::extraction::TreeSitterExtractor;
use crate::graph::BuildOptions;
use crate::resolver::ModuleResolver;
use crate::snapshot::{GitProvider, SnapshotManager};

pub struct CompareConfig {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub min_severity: Option<SeverityArg>,
    pub fail_on_regression: Option<SeverityArg>,
}

/// Snapshot both revisions, diff them, and write the report.
/// Returns true when the regression gate tripped.
pub fn handle_compare(config: CompareConfig) -> Result<bool> {
    let project_config = DriftmapConfig::load(&config.path);
    let provider = GitProvider::open(&config.path)?;
    let extractor = TreeSitterExtractor::new();
    let resolver = ModuleResolver::new(project_config.extensions.clone());
    let options = BuildOptions {
        include_external: project_config.include_external,
        fail_fast: project_config.fail_fast,
    };
    let manager = SnapshotManager::new(
        &extractor,
        &provider,
        resolver,
        options,
        project_config.extensions.clone(),
    );

    // one cache across both refs; entries are keyed by content hash, so
    // files unchanged between revisions are extracted once
    let mut cache = FactCache::new(project_config.cache_capacity);
    let baseline = manager.snapshot(&config.before, &mut cache)?;
    let current = manager.snapshot(&config.after, &mut cache)?;
    info!(
        "cache after both snapshots: {} hits, {} misses",
        cache.stats().hits,
        cache.stats().misses
    );

    let mut report = Differ::new(&baseline, &current).diff();
    let regression = config
        .fail_on_regression
        .map(|threshold| report.has_regression_at(threshold.into()))
        .unwrap_or(false);
    if let Some(min) = config.min_severity {
        report = report.with_min_severity(min.into());
    }

    let mut writer = super::writer_for(config.format, config.output.as_ref())?;
    writer.write_diff(&report)?;
    Ok(regression)
}
