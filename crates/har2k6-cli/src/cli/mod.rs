//! CLI for har2k6.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use har2k6_core::config;
use std::path::PathBuf;

use commands::{flag_override, run_completions, run_convert, ConvertOverrides};

/// Top-level CLI for the HAR → k6 converter.
#[derive(Debug, Parser)]
#[command(name = "har2k6")]
#[command(about = "Convert HAR (HTTP Archive) recordings into k6 load-test scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert a HAR file to a k6 script.
    #[command(after_help = "Examples:\n  \
        har2k6 convert -O har-session.js session.har\n  \
        har2k6 convert -O har-session.js --only yourdomain.com,additionaldomain.com session.har\n  \
        k6 run har-session.js")]
    Convert {
        /// Path to the HAR file.
        path: PathBuf,

        /// k6 script output filename (default from config, else har-script.js).
        #[arg(short = 'O', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include only requests from the given domains (comma-separated).
        #[arg(long, value_delimiter = ',', value_name = "DOMAINS")]
        only: Vec<String>,

        /// Skip requests from the given domains (comma-separated).
        #[arg(long, value_delimiter = ',', value_name = "DOMAINS")]
        skip: Vec<String>,

        /// Split requests into separate batches when the start time difference between
        /// subsequent requests is at least this many ms; a sleep is added between batches.
        #[arg(long, value_name = "MS")]
        batch_threshold: Option<u64>,

        /// Add a check for each HTTP status response.
        #[arg(long, overrides_with = "no_enable_status_code_checks")]
        enable_status_code_checks: bool,

        /// Do not add status checks, even if the config file enables them.
        #[arg(long, overrides_with = "enable_status_code_checks")]
        no_enable_status_code_checks: bool,

        /// Return from the iteration when a status check fails (requires checks).
        #[arg(long, overrides_with = "no_return_on_failed_check")]
        return_on_failed_check: bool,

        /// Keep iterating after a failed check, even if the config file says otherwise.
        #[arg(long, overrides_with = "return_on_failed_check")]
        no_return_on_failed_check: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Convert {
                path,
                output,
                only,
                skip,
                batch_threshold,
                enable_status_code_checks,
                no_enable_status_code_checks,
                return_on_failed_check,
                no_return_on_failed_check,
            } => {
                let cfg = config::load_or_default()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let overrides = ConvertOverrides {
                    output,
                    only,
                    skip,
                    batch_threshold,
                    enable_status_code_checks: flag_override(
                        enable_status_code_checks,
                        no_enable_status_code_checks,
                    ),
                    return_on_failed_check: flag_override(
                        return_on_failed_check,
                        no_return_on_failed_check,
                    ),
                };
                run_convert(&path, &overrides, &cfg)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
