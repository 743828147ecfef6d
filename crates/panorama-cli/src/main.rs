mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panorama", about = "Stitch overlapping photographs into a panorama")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stitch an ordered sequence of images into one panorama
    Stitch(commands::stitch::StitchArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
    /// Show image dimensions and estimated stitching memory
    Info(commands::info::InfoArgs),
    /// Delete old image artifacts from an output directory
    Clean(commands::clean::CleanArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Stitch(args) => commands::stitch::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Clean(args) => commands::clean::run(args),
    }
}
