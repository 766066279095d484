use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use super::analyze::{collect_project_facts, relativize_report};
use crate::cli::OutputFormat;
use crate::config::DriftmapConfig;
use crate::core::{AnalysisReport, Confidence, DriftmapError, GraphMetrics};
use crate::deadcode::CrossReferencer;
use crate::resolver::ModuleResolver;

pub struct DeadCodeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub min_confidence: Option<String>,
}

fn parse_confidence(value: &str) -> Result<Confidence> {
    match value.to_ascii_lowercase().as_str() {
        "low" => Ok(Confidence::Low),
        "medium" => Ok(Confidence::Medium),
        "high" => Ok(Confidence::High),
        other => Err(DriftmapError::Config(format!(
            "unknown confidence level '{}': expected low, medium, or high",
            other
        ))
        .into()),
    }
}

pub fn handle_dead_code(config: DeadCodeConfig) -> Result<()> {
    let min_confidence = config
        .min_confidence
        .as_deref()
        .map(parse_confidence)
        .transpose()?;

    let project_config = DriftmapConfig::load(&config.path);
    let project = collect_project_facts(&config.path, &project_config)?;
    let (exports, imports) = project.flattened();

    let referencer = CrossReferencer::new(ModuleResolver::new(
        project_config.extensions.clone(),
    ));
    let mut dead_exports = referencer.find_dead_exports(&exports, &imports);
    let mut unused_imports = referencer.find_unused_imports(&imports, &exports);

    if let Some(min) = min_confidence {
        dead_exports.retain(|d| d.confidence >= min);
        unused_imports.retain(|u| u.confidence >= min);
    }

    let mut report = AnalysisReport {
        project_path: config.path.clone(),
        file_count: project.files.len(),
        metrics: GraphMetrics::default(),
        dead_exports,
        unused_imports,
        timestamp: Utc::now(),
    };
    relativize_report(&mut report, &project.root);

    let mut writer = super::writer_for(config.format, config.output.as_ref())?;
    writer.write_analysis(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_confidence_levels() {
        assert_eq!(parse_confidence("high").unwrap(), Confidence::High);
        assert_eq!(parse_confidence("Medium").unwrap(), Confidence::Medium);
        assert!(parse_confidence("extreme").is_err());
    }
}
