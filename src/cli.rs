use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::comparison::ChangeSeverity;
use crate::io::output;

#[derive(Parser, Debug)]
#[command(name = "driftmap")]
#[command(about = "Module dependency graph and architectural drift analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph and report structural metrics
    Analyze {
        /// Path to the project root
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the dead-export and unused-import pass
        #[arg(long = "no-dead-code")]
        no_dead_code: bool,
    },

    /// Report dead exports and unused imports only
    DeadCode {
        /// Path to the project root
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Lowest confidence level to report (low, medium, high)
        #[arg(long = "min-confidence")]
        min_confidence: Option<String>,
    },

    /// Compare the dependency graphs of two git revisions
    Compare {
        /// Path to the git repository (defaults to the current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Baseline revision (any git rev-parse expression)
        #[arg(long)]
        before: String,

        /// Current revision; defaults to HEAD
        #[arg(long, default_value = "HEAD")]
        after: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop changes below this severity from the change list
        #[arg(long = "min-severity", value_enum)]
        min_severity: Option<SeverityArg>,

        /// Exit non-zero when any non-improvement change is at or above
        /// this severity (high when given without a value)
        #[arg(
            long = "fail-on-regression",
            value_enum,
            num_args = 0..=1,
            default_missing_value = "high"
        )]
        fail_on_regression: Option<SeverityArg>,
    },

    /// Write a default .driftmap.toml into the target directory
    Init {
        /// Directory to initialize (defaults to the current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Markdown => output::OutputFormat::Markdown,
            OutputFormat::Terminal => output::OutputFormat::Terminal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityArg> for ChangeSeverity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => ChangeSeverity::Low,
            SeverityArg::Medium => ChangeSeverity::Medium,
            SeverityArg::High => ChangeSeverity::High,
            SeverityArg::Critical => ChangeSeverity::Critical,
        }
    }
}
