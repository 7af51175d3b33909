//! CLI frontend for the Fabula interactive story engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fb",
    about = "Fabula, an engine for state-machine interactive fiction",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a story file and report diagnostics
    Check {
        /// Story file to compile
        file: PathBuf,

        /// List every factor and transition
        #[arg(short, long)]
        verbose: bool,
    },

    /// Play a story interactively
    Play {
        /// Story file to play
        file: PathBuf,

        /// RNG seed for the spontaneous passes
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Consider spontaneous transitions in random order instead of
        /// declaration order
        #[arg(long)]
        shuffle: bool,
    },

    /// Export the compiled story model as JSON
    Export {
        /// Story file to compile
        file: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
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
        Commands::Check { file, verbose } => commands::check::run(&file, verbose),
        Commands::Play {
            file,
            seed,
            shuffle,
        } => commands::play::run(&file, seed, shuffle),
        Commands::Export { file, output } => commands::export::run(&file, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
