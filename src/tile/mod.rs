//! Tile layer.
//!
//! This module maps tile identifiers onto coordinate windows, queries the
//! interval store for each window, and reshapes the rows into per-tile
//! output records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        TileService (async facade)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             Tile Assembler              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileGrid    │  │  OutputRecord   │  │
//! │  │  (zoom, x) → │  │  (reshaped      │  │
//! │  │  window      │  │   intervals)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             IntervalIndex               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileId`]: Parsed `<dataset>.<zoom>.<x>` identifier
//! - [`TileGrid`]: Tile width, tile windows, and interval-to-tile assignment
//! - [`tiles`]: Batch assembly, one result per requested id
//! - [`fetch_tiles`]: Adjacent tiles from a single overlap query
//! - [`list_items`]: Arbitrary window listing with an optional cap
//! - [`TileService`]: Runs the above on tokio's blocking pool
//!
//! # Example
//!
//! ```
//! use beddb_tiles::tile::{TileGrid, TileId};
//!
//! let tile: TileId = "genes.1.1".parse().unwrap();
//! let grid = TileGrid::new(1024.0);
//!
//! let window = grid.window(tile.zoom, tile.x, 1);
//! assert_eq!((window.start, window.end), (512.0, 1024.0));
//! ```

mod assemble;
mod coords;
mod service;

pub use assemble::{fetch_tile, fetch_tiles, list_items, tiles, OutputRecord, TileResult};
pub use coords::{TileGrid, TileId, TileWindow};
pub use service::TileService;
