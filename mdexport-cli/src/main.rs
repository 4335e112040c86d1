//! # mdexport CLI
//!
//! Command-line interface for exporting versioned MDX documentation as plain
//! Markdown.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdexport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "mdexport.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export all versions into the static asset directory
    Export {
        /// Keep running and re-export documents as they change
        #[arg(long, env = "MDEXPORT_DEV")]
        watch: bool,
    },

    /// Export all versions into the build output directory
    Publish {
        /// Override the build output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List the resolved documentation versions
    Versions {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the exported Markdown of a single document
    Render {
        /// Source document path
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Export { watch } => commands::export_static(&cli.config, watch).await,
        Commands::Publish { out_dir } => commands::publish(&cli.config, out_dir.as_deref()),
        Commands::Versions { json } => commands::list_versions(&cli.config, json),
        Commands::Render { file } => commands::render_document(&cli.config, &file),
    }
}
