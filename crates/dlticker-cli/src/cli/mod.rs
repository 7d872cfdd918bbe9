//! CLI for the dlticker live download ticker.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dlticker_core::config;

use commands::{run_config, run_demo, run_exec, DemoOptions, MAX_DEMO_SECONDS};

/// Top-level CLI for dlticker.
#[derive(Debug, Parser)]
#[command(name = "dlticker")]
#[command(about = "dlticker: scroll-aware logging with a live download ticker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Drive the ticker with simulated segmented downloads.
    Demo {
        /// Segments per file.
        #[arg(long, default_value = "3", value_name = "N")]
        segments: usize,
        /// Number of simulated files.
        #[arg(long, default_value = "2", value_name = "N")]
        files: usize,
        /// How long each simulated download takes (1 to 86400).
        #[arg(
            long,
            default_value = "10",
            value_name = "N",
            value_parser = clap::value_parser!(u64).range(1..=MAX_DEMO_SECONDS)
        )]
        seconds: u64,
        /// Log only; never draw the live frame.
        #[arg(long)]
        daemon: bool,
    },

    /// Run a command inside a scroll session, logging its output above the ticker.
    Exec {
        /// Command and arguments (use `--` before them).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        cmd: Vec<String>,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Demo {
                segments,
                files,
                seconds,
                daemon,
            } => {
                let opts = DemoOptions {
                    segments,
                    files,
                    seconds,
                    daemon,
                };
                run_demo(cfg, opts).await?;
            }
            CliCommand::Exec { cmd } => run_exec(cfg, &cmd).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
