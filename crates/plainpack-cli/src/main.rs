//! Plainpack CLI - flatten operator custom resources into plain manifests

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

mod commands;
mod display;
mod exit_codes;

#[derive(Parser)]
#[command(name = "plainpack")]
#[command(author = "Plainpack Contributors")]
#[command(version)]
#[command(about = "Convert operator custom resources into plain Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert manifest files or directories
    Convert {
        /// Manifest file(s) or directory(ies) to read
        #[arg(short = 'f', long = "filename", required = true)]
        files: Vec<PathBuf>,

        /// Output directory (if not set, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write passthrough manifests, not only synthetic ones
        #[arg(long)]
        all: bool,
    },

    /// List registered converters
    Converters,
}

fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    // Set debug level
    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    match cli.command {
        Commands::Convert { files, output, all } => {
            commands::convert::run(&files, output.as_deref(), all)
        }
        Commands::Converters => commands::converters::run(),
    }
}
