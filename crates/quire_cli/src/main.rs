//! Quire CLI
//!
//! Command-line tools for inspecting and maintaining Quire's local state.
//!
//! # Commands
//!
//! - `diff` - Compare two documents the way draft reconciliation does
//! - `drafts` - List, show or remove encrypted drafts
//! - `cache` - List, remove or clear API cache entries
//! - `tree` - Print the sorted children of a path in a saved listing

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quire local state tools.
#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the cache and draft namespaces
    #[arg(global = true, short, long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(global = true, short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two documents; exits with status 1 when they differ substantially
    Diff {
        /// First document
        a: PathBuf,
        /// Second document
        b: PathBuf,
    },

    /// Inspect encrypted drafts (key from QUIRE_DRAFT_PASSPHRASE)
    Drafts {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Inspect the API cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print the sorted children of PATH in a listing file
    Tree {
        /// JSON listing as served by the remote
        listing: PathBuf,
        /// Path to list; defaults to the first root path
        path: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum DraftAction {
    /// List drafts, newest first
    List,
    /// Show one draft
    Show {
        /// Draft id
        id: String,
    },
    /// Remove one draft
    Remove {
        /// Draft id
        id: String,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cache entries
    List,
    /// Remove one cache entry
    Remove {
        /// Cache key, e.g. `articles` or `article:src/posts/a.md`
        key: String,
    },
    /// Remove every cache entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Diff { a, b } => {
            let differs = commands::diff::run(&a, &b, &cli.format)?;
            if differs {
                std::process::exit(1);
            }
        }
        Commands::Drafts { action } => {
            let dir = cli.data_dir.ok_or("Data directory required for drafts")?;
            match action {
                DraftAction::List => commands::drafts::list(&dir, &cli.format).await?,
                DraftAction::Show { id } => commands::drafts::show(&dir, &id, &cli.format).await?,
                DraftAction::Remove { id } => commands::drafts::remove(&dir, &id).await?,
            }
        }
        Commands::Cache { action } => {
            let dir = cli.data_dir.ok_or("Data directory required for cache")?;
            match action {
                CacheAction::List => commands::cache::list(&dir, &cli.format).await?,
                CacheAction::Remove { key } => commands::cache::remove(&dir, &key).await?,
                CacheAction::Clear => commands::cache::clear(&dir).await?,
            }
        }
        Commands::Tree { listing, path } => {
            commands::tree::run(&listing, path.as_deref(), &cli.format)?;
        }
        Commands::Version => {
            println!("Quire CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Quire Core v{}", quire_core::VERSION);
        }
    }

    Ok(())
}
