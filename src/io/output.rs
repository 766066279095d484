use colored::*;
use std::io::Write;

use crate::comparison::{ChangeSeverity, DiffReport};
use crate::core::AnalysisReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait ReportWriter {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
    fn write_diff(&mut self, report: &DiffReport) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(writer: W, format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        Ok(())
    }

    fn write_diff(&mut self, report: &DiffReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let m = &report.metrics;
        writeln!(self.writer, "# Driftmap Analysis Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        // dead-code-only reports carry no graph
        if m.node_count > 0 {
            writeln!(self.writer, "## Graph")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "- Modules: {}", m.node_count)?;
            writeln!(
                self.writer,
                "- Edges: {} ({} internal, {} external)",
                m.edge_count, m.internal_edge_count, m.external_edge_count
            )?;
            writeln!(self.writer, "- Average coupling: {:.1}", m.average_coupling)?;
            writeln!(self.writer, "- Health score: {:.0}/100", m.health_score)?;
            if let Some(node) = &m.most_connected {
                writeln!(self.writer, "- Most connected: {}", node)?;
            }
            writeln!(self.writer)?;
        }

        if !m.cycles.is_empty() {
            writeln!(self.writer, "## Circular Dependencies")?;
            writeln!(self.writer)?;
            for cycle in &m.cycles {
                writeln!(self.writer, "- {}", cycle.join(" -> "))?;
            }
            writeln!(self.writer)?;
        }

        if !report.dead_exports.is_empty() {
            writeln!(self.writer, "## Dead Exports")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Module | Export | Line | Confidence | Risk factors |")?;
            writeln!(self.writer, "|--------|--------|------|------------|--------------|")?;
            for dead in &report.dead_exports {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} | {} |",
                    dead.export.module,
                    dead.export.name,
                    dead.export.line,
                    dead.confidence,
                    dead.risk_factors.join(", ")
                )?;
            }
            writeln!(self.writer)?;
        }

        if !report.unused_imports.is_empty() {
            writeln!(self.writer, "## Unused Imports")?;
            writeln!(self.writer)?;
            for unused in &report.unused_imports {
                writeln!(
                    self.writer,
                    "- `{}` from `{}` in {} (line {}, {})",
                    unused.import.name,
                    unused.import.source,
                    unused.import.module,
                    unused.import.line,
                    unused.confidence
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_diff(&mut self, report: &DiffReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Architectural Drift Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Comparing `{}` -> `{}`",
            report.baseline.reference, report.current.reference
        )?;
        writeln!(self.writer)?;
        let health = &report.impact.health_change;
        writeln!(
            self.writer,
            "Health score: {:.0} -> {:.0} ({:+.0})",
            health.before, health.after, health.delta
        )?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Changes ({})", report.changes.len())?;
        writeln!(self.writer)?;
        for change in &report.changes {
            writeln!(
                self.writer,
                "- **[{}]** {} ({})",
                change.severity, change.description, change.category
            )?;
        }
        writeln!(self.writer)?;

        if !report.recommendations.is_empty() {
            writeln!(self.writer, "## Recommendations")?;
            writeln!(self.writer)?;
            for rec in &report.recommendations {
                writeln!(self.writer, "### {} ({})", rec.title, rec.priority)?;
                writeln!(self.writer)?;
                for action in &rec.actions {
                    writeln!(self.writer, "- [ ] {}", action)?;
                }
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn severity_label(severity: ChangeSeverity) -> ColoredString {
        match severity {
            ChangeSeverity::Critical => "CRITICAL".red().bold(),
            ChangeSeverity::High => "HIGH".red(),
            ChangeSeverity::Medium => "MEDIUM".yellow(),
            ChangeSeverity::Low => "LOW".green(),
        }
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let m = &report.metrics;
        if m.node_count > 0 {
            writeln!(self.writer, "{}", "Dependency graph".bold())?;
            writeln!(
                self.writer,
                "  {} modules, {} edges ({} internal / {} external)",
                m.node_count, m.edge_count, m.internal_edge_count, m.external_edge_count
            )?;
            writeln!(self.writer, "  average coupling {:.1}", m.average_coupling)?;

            let health = format!("{:.0}/100", m.health_score);
            let health = if m.health_score >= 80.0 {
                health.green()
            } else if m.health_score >= 50.0 {
                health.yellow()
            } else {
                health.red()
            };
            writeln!(self.writer, "  health score {}", health)?;
        }

        if !m.cycles.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Circular dependencies".bold())?;
            for cycle in &m.cycles {
                writeln!(self.writer, "  {}", cycle.join(" -> ").red())?;
            }
        }
        if !m.hotspots.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Hotspots".bold())?;
            for node in &m.hotspots {
                writeln!(self.writer, "  {}", node.yellow())?;
            }
        }

        if !report.dead_exports.is_empty() {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} ({})",
                "Dead exports".bold(),
                report.dead_exports.len()
            )?;
            for dead in &report.dead_exports {
                writeln!(
                    self.writer,
                    "  {}:{} {} [{}] {}",
                    dead.export.module,
                    dead.export.line,
                    dead.export.name,
                    dead.confidence,
                    dead.risk_factors.join(", ").dimmed()
                )?;
            }
        }
        if !report.unused_imports.is_empty() {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} ({})",
                "Unused imports".bold(),
                report.unused_imports.len()
            )?;
            for unused in &report.unused_imports {
                writeln!(
                    self.writer,
                    "  {}:{} {} from '{}' [{}]",
                    unused.import.module,
                    unused.import.line,
                    unused.import.name,
                    unused.import.source,
                    unused.confidence
                )?;
            }
        }
        Ok(())
    }

    fn write_diff(&mut self, report: &DiffReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} -> {}",
            "Comparing".bold(),
            report.baseline.reference,
            report.current.reference
        )?;
        let health = &report.impact.health_change;
        let delta = format!("{:+.0}", health.delta);
        let delta = if health.delta < 0.0 {
            delta.red()
        } else if health.delta > 0.0 {
            delta.green()
        } else {
            delta.normal()
        };
        writeln!(
            self.writer,
            "health {:.0} -> {:.0} ({})",
            health.before, health.after, delta
        )?;
        writeln!(self.writer)?;

        if report.changes.is_empty() {
            writeln!(self.writer, "no architectural changes")?;
            return Ok(());
        }

        for change in &report.changes {
            writeln!(
                self.writer,
                "[{}] {}",
                Self::severity_label(change.severity),
                change.description
            )?;
        }

        if !report.recommendations.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Recommendations".bold())?;
            for rec in &report.recommendations {
                writeln!(
                    self.writer,
                    "  [{}] {}",
                    Self::severity_label(rec.priority),
                    rec.title
                )?;
                for action in &rec.actions {
                    writeln!(self.writer, "      - {}", action)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphMetrics;
    use chrono::Utc;
    use std::path::PathBuf;

    fn empty_analysis() -> AnalysisReport {
        AnalysisReport {
            project_path: PathBuf::from("/p"),
            file_count: 0,
            metrics: GraphMetrics {
                health_score: 100.0,
                ..Default::default()
            },
            dead_exports: vec![],
            unused_imports: vec![],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn json_analysis_output_is_valid_json() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_analysis(&empty_analysis())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["metrics"]["health_score"], 100.0);
    }

    #[test]
    fn markdown_analysis_output_has_header() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_analysis(&empty_analysis())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Driftmap Analysis Report"));
    }
}
