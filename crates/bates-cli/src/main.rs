mod commands;
mod inputs;
mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bates", about = "Preview Bates numbering before stamping")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preview settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the documents an upload resolves to
    Info(commands::info::InfoArgs),
    /// Show the label range each document will receive
    Ranges(commands::ranges::RangesArgs),
    /// Render a stamped preview of one page to PNG
    Preview(commands::preview::PreviewArgs),
    /// Show the index table for an upload
    Index(commands::index::IndexArgs),
    /// Print or save preview settings as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = inputs::load_settings(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Ranges(args) => commands::ranges::run(args, &settings),
        Commands::Preview(args) => commands::preview::run(args, &settings),
        Commands::Index(args) => commands::index::run(args, &settings),
        Commands::Config(args) => commands::config::run(args, &settings),
    }
}
