//! beddb-tiles - read genomic interval tiles from beddb files.
//!
//! This binary parses the command line, runs one read operation and prints
//! the result as JSON on stdout.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beddb_tiles::{
    config::{Cli, Command, InfoConfig, ListConfig, StoreArgs, TilesConfig},
    store::SqliteStore,
    tile::{OutputRecord, TileService},
};

#[tokio::main]
async fn main() -> ExitCode {
    let command = Cli::parse().into_command();
    init_logging(command.store());

    match command {
        Command::Info(config) => run_info(config).await,
        Command::Tiles(config) => run_tiles(config).await,
        Command::List(config) => run_list(config).await,
    }
}

// =============================================================================
// Info Command
// =============================================================================

async fn run_info(config: InfoConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let service = open_service(&config.store);
    match service.tileset_info().await {
        Ok(info) => print_json(&info, config.store.pretty),
        Err(e) => {
            error!("Failed to read tileset info: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Tiles Command
// =============================================================================

/// One entry of the `tiles` output array.
#[derive(Debug, Serialize)]
struct TileOutput {
    tile_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<OutputRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn run_tiles(config: TilesConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut service = open_service(&config.store);
    if config.sequential {
        service = service.sequential();
    }

    let results = match service.tiles(config.tile_ids).await {
        Ok(results) => results,
        Err(e) => {
            error!("Failed to fetch tiles: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output: Vec<TileOutput> = results
        .into_iter()
        .map(|(tile_id, result)| match result {
            Ok(items) => TileOutput {
                tile_id,
                items: Some(items),
                error: None,
            },
            Err(e) => TileOutput {
                tile_id,
                items: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    print_json(&output, config.store.pretty)
}

// =============================================================================
// List Command
// =============================================================================

async fn run_list(config: ListConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let service = open_service(&config.store);
    match service
        .list_items(config.start, config.end, config.max_entries)
        .await
    {
        Ok(items) => {
            debug!("Listed {} entries", items.len());
            print_json(&items, config.store.pretty)
        }
        Err(e) => {
            error!("Failed to list entries: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn open_service(args: &StoreArgs) -> TileService<SqliteStore> {
    let store = SqliteStore::new(&args.db);
    debug!("Using store {}", store.path().display());
    TileService::new(store)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so stdout carries only JSON.
fn init_logging(args: &StoreArgs) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
