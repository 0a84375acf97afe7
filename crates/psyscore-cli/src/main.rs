//! psyscore CLI: validate assessment definitions and score answer sets.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "psyscore",
    version,
    about = "Psychometric assessment scoring engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and lint assessment definitions
    Validate {
        /// Path to a .toml/.json definition or a directory of them
        #[arg(long)]
        test: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score an answer set against an assessment definition
    Score {
        /// Path to the .toml/.json definition
        #[arg(long)]
        test: PathBuf,

        /// JSON object mapping question id to the submitted value
        #[arg(long)]
        answers: PathBuf,

        /// Output format: table, json
        #[arg(long)]
        format: Option<String>,

        /// Also write the JSON result to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Normalization base: answered, declared
        #[arg(long)]
        normalization: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example assessment
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("psyscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { test, config } => commands::validate::execute(test, config),
        Commands::Score {
            test,
            answers,
            format,
            output,
            normalization,
            config,
        } => commands::score::execute(test, answers, format, output, normalization, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
