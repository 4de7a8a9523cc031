//! CLI administration tool for short-link.
//!
//! Inspects the CSV source and the fallback snapshot offline, without
//! starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Parse the source file and report what the server would load
//! cargo run --bin short-link-admin -- source check
//!
//! # Print the entries of a snapshot file
//! cargo run --bin short-link-admin -- snapshot show ./data/fallback.json
//!
//! # Write a snapshot from the current source file
//! cargo run --bin short-link-admin -- snapshot export ./data/fallback.json
//!
//! # Show where a request would be redirected
//! cargo run --bin short-link-admin -- resolve /docs --host go.example.com
//! ```
//!
//! # Environment Variables
//!
//! - `SOURCE_FILE`: CSV source, unless `--source` is given
//! - `SOURCE_SKIP_HEADER`, `IGNORE_CASE_IN_PATH`, `ENABLE_INFO_PAGES`,
//!   `ALLOW_ROOT_REDIRECT`: same meaning as for the server

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

use short_link::application::services::{RedirectResolver, ResolverOptions};
use short_link::domain::data_source::DataSource;
use short_link::domain::hooks::HookChain;
use short_link::domain::keys::KeyOptions;
use short_link::domain::mapping::{Mapping, MappingStore};
use short_link::infrastructure::persistence::fallback_file::{self, to_entries};
use short_link::infrastructure::source::CsvDataSource;
use short_link::utils::flags::parse_bool;

/// CLI tool for inspecting short-link data.
#[derive(Parser)]
#[command(name = "short-link-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV source file (defaults to `SOURCE_FILE`)
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Source file operations
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },

    /// Fallback snapshot operations
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// Resolve a request path against the source mapping
    Resolve {
        /// Request path, e.g. `/docs` or `/docs+`
        path: String,

        /// Request hostname, used when the path is empty
        #[arg(long, default_value = "")]
        host: String,
    },
}

#[derive(Subcommand)]
enum SourceAction {
    /// Parse the source file and print a summary
    Check {
        /// Print every entry
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// Print the entries of a snapshot file
    Show { file: PathBuf },

    /// Write a snapshot from the source file
    Export {
        file: PathBuf,

        /// Overwrite an existing file without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Source { action } => match action {
            SourceAction::Check { verbose } => check_source(cli.source, verbose).await?,
        },
        Commands::Snapshot { action } => match action {
            SnapshotAction::Show { file } => show_snapshot(&file).await?,
            SnapshotAction::Export { file, yes } => export_snapshot(cli.source, &file, yes).await?,
        },
        Commands::Resolve { path, host } => resolve(cli.source, &path, &host).await?,
    }

    Ok(())
}

fn flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn key_options() -> KeyOptions {
    KeyOptions {
        ignore_case: flag("IGNORE_CASE_IN_PATH", true),
        info_enabled: flag("ENABLE_INFO_PAGES", true),
    }
}

fn open_source(source: Option<PathBuf>) -> Result<CsvDataSource> {
    let path = match source {
        Some(path) => path,
        None => std::env::var("SOURCE_FILE")
            .map(PathBuf::from)
            .context("SOURCE_FILE must be set or --source given")?,
    };

    Ok(CsvDataSource::new(path)
        .with_skip_header(flag("SOURCE_SKIP_HEADER", true))
        .with_check_modified(false))
}

/// Fetches the source and applies the same hooks as the server.
async fn load_mapping(source: &CsvDataSource) -> Result<Mapping> {
    let raw = source
        .fetch_mapping()
        .await
        .with_context(|| format!("Failed to read {}", source.path().display()))?;

    Ok(HookChain::standard(&key_options()).apply(raw))
}

fn print_entries(mapping: &Mapping) {
    for entry in to_entries(mapping) {
        println!("  {} → {}", entry.key.cyan(), entry.target);
    }
}

async fn check_source(source: Option<PathBuf>, verbose: bool) -> Result<()> {
    let source = open_source(source)?;

    println!("{}", "📄 Source check".bright_blue().bold());
    println!("  File: {}", source.path().display().to_string().cyan());
    println!();

    let mapping = load_mapping(&source).await?;

    if let Some(modified) = source.last_modified() {
        println!("  Modified: {}", modified.to_rfc3339());
    }
    println!(
        "  Entries:  {}",
        mapping.len().to_string().bright_yellow().bold()
    );

    let aliases = mapping
        .values()
        .filter(|t| !short_link::domain::keys::is_absolute_target(t))
        .count();
    if aliases > 0 {
        println!("  Aliases:  {}", aliases);
    }

    if verbose {
        println!();
        print_entries(&mapping);
    }

    println!();
    println!("{}", "✅ Source is readable".green().bold());
    Ok(())
}

async fn show_snapshot(file: &Path) -> Result<()> {
    let mapping = fallback_file::read_snapshot(file)
        .await
        .with_context(|| format!("Failed to read snapshot {}", file.display()))?;

    println!("{}", "💾 Fallback snapshot".bright_blue().bold());
    println!("  File:    {}", file.display().to_string().cyan());
    println!("  Entries: {}", mapping.len().to_string().bright_yellow());
    println!();
    print_entries(&mapping);

    Ok(())
}

async fn export_snapshot(source: Option<PathBuf>, file: &Path, skip_confirm: bool) -> Result<()> {
    let source = open_source(source)?;
    let mapping = load_mapping(&source).await?;

    if file.exists() && !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", file.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    fallback_file::write_snapshot(file, &mapping)
        .await
        .with_context(|| format!("Failed to write snapshot {}", file.display()))?;

    println!(
        "{} {} entries written to {}",
        "✅".green(),
        mapping.len().to_string().bright_yellow().bold(),
        file.display().to_string().cyan()
    );
    Ok(())
}

async fn resolve(source: Option<PathBuf>, path: &str, host: &str) -> Result<()> {
    let source = open_source(source)?;
    let mapping = load_mapping(&source).await?;

    let store = Arc::new(MappingStore::new());
    store.update_mapping(mapping);

    let options = ResolverOptions {
        keys: key_options(),
        allow_root_redirect: flag("ALLOW_ROOT_REDIRECT", true),
    };
    let request = RedirectResolver::new(store, options).resolve(path, host, &Method::GET);

    println!("  Path: {}", request.original_path.cyan());
    println!("  Key:  {}", request.normalized_key.cyan());

    match request.target {
        Some(target) if request.info_request => {
            println!("  {} info page for {}", "ℹ️ ".bright_white(), target.bright_yellow());
        }
        Some(target) => {
            println!("  {} 307 → {}", "✅".green(), target.bright_yellow().bold());
        }
        None => {
            println!("  {} 404 not found", "❌".red());
        }
    }

    Ok(())
}
