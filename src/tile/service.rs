//! Tile Service for async callers.
//!
//! The TileService owns a shared store and runs every storage call on
//! tokio's blocking pool, so it can be used from request handlers without
//! stalling the runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                      tiles()                            │    │
//! │  │  1. Read grid width      3. One blocking lookup / tile  │    │
//! │  │  2. Parse tile ids       4. Collect in request order    │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              │                                  │
//! │                              ▼                                  │
//! │                    ┌───────────────────┐                        │
//! │                    │   IntervalIndex   │                        │
//! │                    └───────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{StoreError, TileError};
use crate::store::{IntervalIndex, TilesetInfo};

use super::assemble::{self, resolve_tile_id, OutputRecord, TileResult};
use super::coords::TileGrid;

// =============================================================================
// Tile Service
// =============================================================================

/// Async facade over the tile assembler.
///
/// Tiles in one batch are looked up concurrently by default. Lookups share no
/// mutable state, so the result is identical to the sequential assembler:
/// same length and order as the requested ids.
///
/// # Example
///
/// ```ignore
/// use beddb_tiles::store::SqliteStore;
/// use beddb_tiles::tile::TileService;
///
/// let service = TileService::new(SqliteStore::new("genes.beddb"));
///
/// let info = service.tileset_info().await?;
/// let tiles = service.tiles(vec!["genes.0.0".to_string()]).await?;
///
/// for (tile_id, result) in tiles {
///     println!("{}: {} records", tile_id, result?.len());
/// }
/// ```
pub struct TileService<S: IntervalIndex> {
    /// The interval store shared with blocking tasks
    store: Arc<S>,

    /// Whether tiles in a batch are fetched concurrently
    concurrent: bool,
}

impl<S: IntervalIndex + 'static> TileService<S> {
    /// Create a new tile service that fetches tiles concurrently.
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    /// Create a new tile service with a shared store.
    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            concurrent: true,
        }
    }

    /// Fetch the tiles of a batch one after another in a single blocking task.
    pub fn sequential(mut self) -> Self {
        self.concurrent = false;
        self
    }

    /// Whether tiles in a batch are fetched concurrently.
    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Read the dataset metadata.
    pub async fn tileset_info(&self) -> Result<TilesetInfo, TileError> {
        let store = Arc::clone(&self.store);
        run_blocking(move || store.tileset_info()).await
    }

    /// List entries overlapping `[start, end]`, optionally capped.
    pub async fn list_items(
        &self,
        start: i64,
        end: i64,
        max_entries: Option<usize>,
    ) -> Result<Vec<OutputRecord>, TileError> {
        let store = Arc::clone(&self.store);
        run_blocking(move || assemble::list_items(store.as_ref(), start, end, max_entries)).await
    }

    /// Assemble tiles for a batch of tile ids.
    ///
    /// # Errors
    ///
    /// Storage failures abort the batch. Malformed ids are reported in their
    /// own slot and do not affect the others.
    ///
    /// When a concurrent lookup fails, the call returns without waiting for
    /// the lookups still running. Those blocking tasks are detached and run
    /// to completion; their results are dropped.
    pub async fn tiles(&self, tile_ids: Vec<String>) -> Result<Vec<(String, TileResult)>, TileError> {
        if tile_ids.is_empty() {
            return Ok(Vec::new());
        }

        if !self.concurrent {
            let store = Arc::clone(&self.store);
            return run_blocking(move || assemble::tiles(store.as_ref(), &tile_ids)).await;
        }

        let store = Arc::clone(&self.store);
        let grid = TileGrid::new(run_blocking(move || store.max_width()).await?);

        // Spawn every lookup first, then await in request order
        let mut pending: Vec<(String, Result<JoinHandle<_>, TileError>)> =
            Vec::with_capacity(tile_ids.len());
        for tile_id in tile_ids {
            let task = resolve_tile_id(&tile_id).map(|tile| {
                let store = Arc::clone(&self.store);
                tokio::task::spawn_blocking(move || {
                    assemble::fetch_tile(store.as_ref(), grid, &tile)
                })
            });
            pending.push((tile_id, task));
        }

        let mut results = Vec::with_capacity(pending.len());
        for (tile_id, task) in pending {
            let result = match task {
                Ok(handle) => Ok(handle.await.map_err(|e| TileError::Join(e.to_string()))??),
                Err(e) => Err(e),
            };
            results.push((tile_id, result));
        }

        Ok(results)
    }
}

/// Run a storage call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, TileError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TileError::Join(e.to_string()))?
        .map_err(TileError::from)
}

// =============================================================================
// Tests
// =============================================================================
