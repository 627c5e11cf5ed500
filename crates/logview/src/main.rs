//! logview
//!
//! Browse, page through and search log files under a configured directory.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Context;
use clap::{Parser, Subcommand};
use logview::config::{default_config_path, Config};
use logview::{logging, open_viewer, render};
use viewer::{LogViewer, RawListQuery, RawViewQuery, DEFAULT_CONTEXT_LINES};

/// logview - page through and search large log files.
#[derive(Parser, Debug)]
#[command(name = "logview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log directory to serve (overrides config and environment)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List a directory under the log root
    Ls {
        /// Directory relative to the log root (defaults to the root)
        path: Option<String>,

        /// Listing page
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        /// Case-insensitive filter on entry names
        #[arg(long, short)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one page of a file
    View {
        /// File relative to the log root
        file: String,

        /// Page number
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the first match in a file with surrounding lines
    Search {
        /// File relative to the log root
        file: String,

        /// Text to look for (case-insensitive)
        text: String,

        /// Number of context lines (1-300)
        #[arg(long, short = 'C', default_value_t = DEFAULT_CONTEXT_LINES as i64, allow_negative_numbers = true)]
        context: i64,

        /// Context side: before, after or both
        #[arg(long, short, default_value = "both")]
        direction: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the validated absolute path of a file
    Path {
        /// File relative to the log root
        file: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load(&config_path)?;
    config.apply_env_overrides();
    if let Some(root) = &cli.root {
        config.viewer.log_dir = root.clone();
    }

    logging::init(cli.verbose, &config.logging.log_level);
    tracing::debug!("Using config file: {:?}", config_path);

    config.validate().context("Invalid configuration")?;
    let viewer = open_viewer(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&viewer, cli.command, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Run one command against `viewer`, writing its output to `out`.
fn execute<W: Write>(viewer: &LogViewer, command: Commands, out: &mut W) -> anyhow::Result<()> {
    match command {
        Commands::Ls {
            path,
            page,
            search,
            json,
        } => {
            let normalized = RawListQuery { page, search }.normalize();
            if normalized.corrected {
                tracing::info!("Listing parameters normalized to {:?}", normalized.value);
            }

            let view = viewer.browse(path.as_deref(), &normalized.value)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
            } else {
                render::write_directory(out, &view, SystemTime::now())?;
            }
        }
        Commands::View { file, page, json } => {
            let normalized = RawViewQuery {
                page,
                ..RawViewQuery::default()
            }
            .normalize();
            if normalized.corrected {
                tracing::info!("Page normalized to {}", normalized.value.page);
            }

            let view = viewer.view(&file, &normalized.value)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
            } else {
                render::write_file(out, &view)?;
            }
        }
        Commands::Search {
            file,
            text,
            context,
            direction,
            json,
        } => {
            let normalized = RawViewQuery {
                page: 1,
                search: Some(text),
                context,
                direction,
            }
            .normalize();
            if normalized.corrected {
                tracing::info!(
                    "Search parameters normalized to context {} {}",
                    normalized.value.context,
                    normalized.value.direction
                );
            }

            let view = viewer.view(&file, &normalized.value)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
            } else {
                render::write_file(out, &view)?;
            }
        }
        Commands::Path { file } => {
            let path = viewer.locate(&file)?;
            writeln!(out, "{}", path.display())?;
        }
    }

    Ok(())
}
