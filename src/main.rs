//! Richpad - A terminal rich-text editor with a formatting toolbar.
//!
//! # Usage
//!
//! ```bash
//! richpad
//! richpad "Some starting text"
//! richpad --seed-file notes.txt --no-preview
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use richpad::app::App;
use richpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use richpad::editor::HistoryConfig;

const DEFAULT_SEED: &str = "How about this as a start";

/// A terminal rich-text editor with a formatting toolbar
#[derive(Parser, Debug)]
#[command(name = "richpad", version, about, long_about = None)]
struct Cli {
    /// Initial text for the editor
    #[arg(value_name = "TEXT", default_value = DEFAULT_SEED)]
    text: String,

    /// Read the initial text from a file instead
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    seed_file: Option<PathBuf>,

    /// Hide the plain-text preview pane
    #[arg(long)]
    no_preview: bool,

    /// Maximum number of undo steps kept
    #[arg(long, value_name = "N")]
    history_depth: Option<usize>,

    /// Edits closer together than this (milliseconds) undo as one step
    #[arg(long = "group-delay", value_name = "MS")]
    group_delay_ms: Option<u64>,

    /// Write logs to a file (the terminal is owned by the editor)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Log to `path` when given; otherwise only warnings and errors go to
/// stderr. `RUST_LOG` is respected either way.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;

    let seed = match &cli.seed_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?,
        None => cli.text.clone(),
    };

    let defaults = HistoryConfig::default();
    let history = HistoryConfig {
        depth: effective.history_depth.unwrap_or(defaults.depth),
        new_group_delay_ms: effective
            .group_delay_ms
            .unwrap_or(defaults.new_group_delay_ms),
    };
    tracing::info!(?history, preview = !effective.no_preview, "starting richpad");

    let mut app = App::new(seed)
        .with_history(history)
        .with_preview(!effective.no_preview)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
