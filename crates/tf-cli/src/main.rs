//! CLI frontend for the Taleforge narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tf",
    about = "Taleforge: play and check interactive fiction projects",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file and report issues
    Check {
        /// Project JSON file
        file: PathBuf,
    },

    /// Summarize a project's scenes, quests, and cast
    Show {
        /// Project JSON file
        file: PathBuf,
    },

    /// Play a project interactively
    Play {
        /// Project JSON file
        file: PathBuf,

        /// Directory for save slots
        #[arg(long, default_value = ".taleforge")]
        save_dir: PathBuf,

        /// Save slot name
        #[arg(long, default_value = "quicksave")]
        slot: String,

        /// Trigger passes per sweep (1-32)
        #[arg(long, default_value = "4")]
        max_trigger_passes: usize,

        /// Save after every resolved choice
        #[arg(long)]
        autosave: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Show { file } => commands::show::run(&file),
        Commands::Play {
            file,
            save_dir,
            slot,
            max_trigger_passes,
            autosave,
        } => commands::play::run(
            &file,
            commands::play::PlayOptions {
                save_dir,
                slot,
                max_trigger_passes,
                autosave,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
