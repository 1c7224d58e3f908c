//! # lectern CLI
//!
//! Command-line interface for lectern: builds the search index and theme for a
//! generated documentation site and serves it for preview.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "lectern.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter lectern.yml
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Write the search index, theme stylesheet and client assets into the site
    Build {
        /// Emit compact output for publishing
        #[arg(long)]
        release: bool,
    },

    /// Build, then serve the site locally and re-index on changes
    Serve {
        /// Server port (defaults to `port` in the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not watch the site directory for changes
        #[arg(long)]
        no_watch: bool,
    },

    /// Query the built search index
    Search {
        /// Search query
        query: String,

        /// Maximum results to return
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    console::set_colors_enabled(!cli.no_color);
    console::set_colors_enabled_stderr(!cli.no_color);

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build { release } => {
            commands::build_site(&cli.config, &commands::BuildOptions { release })
        }
        Commands::Serve { port, no_watch } => {
            let opts = commands::ServeOptions {
                port,
                watch: !no_watch,
            };
            commands::serve_site(&cli.config, opts).await
        }
        Commands::Search { query, limit, json } => {
            commands::search_site(&cli.config, &query, commands::SearchOptions { limit, json })
        }
    }
}
