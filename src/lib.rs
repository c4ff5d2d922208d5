//! # beddb-tiles
//!
//! Read path for multi-resolution genomic interval tiles stored in beddb
//! (SQLite) files.
//!
//! A beddb file holds intervals (start, end, chromosome offset, importance,
//! uid, tab-delimited fields) indexed per zoom level. Callers request tiles
//! `<dataset>.<zoom>.<x>` and receive the intervals overlapping each tile's
//! coordinate window at that zoom, or list every entry in an arbitrary range.
//!
//! ## Architecture
//!
//! The library is organized into a few modules:
//!
//! - [`store`] - The interval index trait and its SQLite backend
//! - [`tile`] - Tile coordinate mapping, tile assembly, and the async tile service
//! - [`config`] - CLI configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use beddb_tiles::store::{IntervalIndex, SqliteStore};
//! use beddb_tiles::tile;
//!
//! let store = SqliteStore::new("genes.beddb");
//!
//! let info = store.tileset_info().unwrap();
//! println!("{} zoom levels over {} bp", info.max_zoom + 1, info.max_width);
//!
//! for (tile_id, result) in tile::tiles(&store, &["genes.0.0", "genes.1.1"]).unwrap() {
//!     match result {
//!         Ok(records) => println!("{}: {} records", tile_id, records.len()),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, InfoConfig, ListConfig, StoreArgs, TilesConfig};
pub use error::{StoreError, TileError};
pub use store::{
    IntervalIndex, IntervalRecord, OverlapQuery, SqliteStore, TilesetInfo, ZoomFilter,
};
pub use tile::{
    fetch_tile, fetch_tiles, list_items, tiles, OutputRecord, TileGrid, TileId, TileResult,
    TileService, TileWindow,
};
