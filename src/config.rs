//! Configuration for the beddb-tiles command-line tool.
//!
//! This module provides:
//! - Subcommands for each read operation (`info`, `tiles`, `list`)
//! - Environment variables with `BEDDB_` prefix for shared options
//! - Validation with readable error messages
//!
//! # Example
//!
//! ```ignore
//! use beddb_tiles::config::{Cli, Command};
//! use clap::Parser;
//!
//! match Cli::parse().into_command() {
//!     Command::Info(config) => println!("Reading {}", config.store.db.display()),
//!     Command::Tiles(config) => println!("{} tiles requested", config.tile_ids.len()),
//!     Command::List(config) => println!("Listing [{}, {}]", config.start, config.end),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `BEDDB_PATH` - Path to the beddb file
//! - `BEDDB_PRETTY` - Pretty-print JSON output (default: false)
//! - `BEDDB_SEQUENTIAL` - Fetch tiles of a batch one at a time (default: false)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Default Values
// =============================================================================

/// Default log filter when `--verbose` is not given.
pub const DEFAULT_LOG_FILTER: &str = "beddb_tiles=info";

/// Log filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "beddb_tiles=debug";

// =============================================================================
// CLI Arguments
// =============================================================================

/// beddb-tiles - Read genomic interval tiles from beddb files.
///
/// Tiles are addressed as `<dataset>.<zoom>.<x>`. Output is JSON on stdout;
/// logs go to stderr.
#[derive(Parser, Debug, Clone)]
#[command(name = "beddb-tiles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the parsed arguments and return the selected command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print dataset metadata (tileset info)
    Info(InfoConfig),

    /// Fetch one or more tiles by id
    Tiles(TilesConfig),

    /// List entries overlapping a coordinate range at every zoom level
    List(ListConfig),
}

impl Command {
    /// Shared store options of the selected command.
    pub fn store(&self) -> &StoreArgs {
        match self {
            Command::Info(config) => &config.store,
            Command::Tiles(config) => &config.store,
            Command::List(config) => &config.store,
        }
    }
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the beddb (SQLite) file.
    #[arg(long, env = "BEDDB_PATH")]
    pub db: PathBuf,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false, env = "BEDDB_PRETTY")]
    pub pretty: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl StoreArgs {
    /// Validate the shared options.
    pub fn validate(&self) -> Result<(), String> {
        if self.db.as_os_str().is_empty() {
            return Err("Store path is required. Set --db or BEDDB_PATH".to_string());
        }
        Ok(())
    }

    /// Log filter matching the verbosity flag.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

/// Configuration for the `info` command.
#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    #[command(flatten)]
    pub store: StoreArgs,
}

impl InfoConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()
    }
}

/// Configuration for the `tiles` command.
#[derive(Args, Debug, Clone)]
pub struct TilesConfig {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Tile ids of the form `<dataset>.<zoom>.<x>`.
    #[arg(required = true)]
    pub tile_ids: Vec<String>,

    /// Fetch tiles one after another instead of concurrently.
    #[arg(long, default_value_t = false, env = "BEDDB_SEQUENTIAL")]
    pub sequential: bool,
}

impl TilesConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()?;

        if self.tile_ids.is_empty() {
            return Err("At least one tile id is required".to_string());
        }

        Ok(())
    }
}

/// Configuration for the `list` command.
#[derive(Args, Debug, Clone)]
pub struct ListConfig {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Start of the coordinate range (inclusive).
    #[arg(long)]
    pub start: i64,

    /// End of the coordinate range (inclusive).
    #[arg(long)]
    pub end: i64,

    /// Maximum number of entries to return (storage order, not ranked).
    #[arg(long)]
    pub max_entries: Option<usize>,
}

impl ListConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()?;

        if self.start > self.end {
            return Err(format!(
                "start ({}) must not be greater than end ({})",
                self.start, self.end
            ));
        }

        if self.max_entries == Some(0) {
            return Err("max_entries must be greater than 0".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
