use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;
mod display;

use commands::{generate, log, sitemap, status, GlobalOptions};

#[derive(Parser)]
#[command(name = "dirmanifest")]
#[command(
    version,
    about = "Directory manifests with content digests and change history",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and update its manifest, details and change history
    Generate {
        /// Directory to scan (defaults to current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Also render the sitemap once the manifest is written
        #[arg(long)]
        sitemap: bool,
    },

    /// Show what the next generate would record, without writing anything
    Status {
        /// Directory to scan (defaults to current directory)
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Show the change history
    Log {
        /// Directory whose history to show (defaults to current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Render an HTML sitemap from the stored manifest
    Sitemap {
        /// Directory whose manifest to render (defaults to current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output file (defaults to <root>/sitemap.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page title
        #[arg(short, long)]
        title: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.options.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Generate { root, sitemap } => {
            generate::run(root, sitemap, &cli.options)?;
        }
        Commands::Status { root } => {
            status::run(root, &cli.options)?;
        }
        Commands::Log { root, limit } => {
            log::run(root, limit, &cli.options)?;
        }
        Commands::Sitemap {
            root,
            output,
            title,
        } => {
            sitemap::run(root, output, title, &cli.options)?;
        }
    }

    Ok(())
}
