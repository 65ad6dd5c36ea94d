// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! agegap - a daily "who is older" trivia game.
//!
//! This is the binary entry point for the game server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod challenge;
mod doctor;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// agegap - a daily "who is older" trivia game.
#[derive(Parser, Debug)]
#[command(name = "agegap", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Print the challenge for a date as JSON.
    Challenge {
        /// Date as YYYY-MM-DD (UTC today if omitted).
        #[arg(long)]
        date: Option<String>,
        /// Include the correct answers.
        #[arg(long)]
        answers: bool,
    },
    /// Check configuration, dataset, and storage.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => agegap_config::load_and_validate_path(path),
        None => agegap_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            agegap_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Challenge { date, answers }) => {
            challenge::run_challenge(&config, date.as_deref(), answers)
        }
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("agegap: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
