//! CLI command implementations.
//!
//! Each submodule handles one subcommand end to end: wire up the walker,
//! extractor, and graph pipeline, then hand the result to a report writer.

pub mod analyze;
pub mod compare;
pub mod deadcode;
pub mod init;

pub use analyze::handle_analyze;
pub use compare::handle_compare;
pub use deadcode::handle_dead_code;
pub use init::handle_init;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::io::{create_writer, ReportWriter};

/// Open the requested destination and wrap it in the format's writer.
fn writer_for(format: OutputFormat, output: Option<&PathBuf>) -> Result<Box<dyn ReportWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    Ok(create_writer(sink, format.into()))
}
