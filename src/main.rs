use anyhow::Result;
use clap::Parser;
use driftmap::cli::{Cli, Commands};
use driftmap::commands::{
    analyze::AnalyzeConfig, compare::CompareConfig, deadcode::DeadCodeConfig, handle_analyze,
    handle_compare, handle_dead_code, handle_init,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            no_dead_code,
        } => handle_analyze(AnalyzeConfig {
            path,
            format,
            output,
            no_dead_code,
        }),
        Commands::DeadCode {
            path,
            format,
            output,
            min_confidence,
        } => handle_dead_code(DeadCodeConfig {
            path,
            format,
            output,
            min_confidence,
        }),
        Commands::Compare {
            path,
            before,
            after,
            format,
            output,
            min_severity,
            fail_on_regression,
        } => {
            let regression = handle_compare(CompareConfig {
                path,
                before,
                after,
                format,
                output,
                min_severity,
                fail_on_regression,
            })?;
            if regression {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { path, force } => handle_init(&path, force),
    }
}
