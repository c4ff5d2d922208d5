//! Tile assembly and range listing.
//!
//! These are the synchronous building blocks: each call reads the store
//! through [`IntervalIndex`] and reshapes the rows into [`OutputRecord`]s.
//! [`TileService`](super::TileService) wraps them for async callers.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, TileError};
use crate::store::{IntervalIndex, IntervalRecord, OverlapQuery};

use super::coords::{TileGrid, TileId};

/// Extra zoom levels fetched below a requested tile before merging.
///
/// Fixed at 0: a tile is resolved at exactly its own zoom. Raising it fetches
/// the `2^EXTRA_ZOOM` higher-resolution children of the tile and concatenates
/// their records.
const EXTRA_ZOOM: u32 = 0;

// =============================================================================
// Output Record
// =============================================================================

/// An interval as returned to tile clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub x_start: i64,
    pub x_end: i64,
    pub chr_offset: i64,
    pub importance: f64,
    pub uid: String,
    pub fields: Vec<String>,
}

impl From<&IntervalRecord> for OutputRecord {
    fn from(record: &IntervalRecord) -> Self {
        Self {
            x_start: record.start_pos,
            x_end: record.end_pos,
            chr_offset: record.chr_offset,
            importance: record.importance,
            uid: record.uid.clone(),
            fields: record.fields.clone(),
        }
    }
}

impl From<IntervalRecord> for OutputRecord {
    fn from(record: IntervalRecord) -> Self {
        Self {
            x_start: record.start_pos,
            x_end: record.end_pos,
            chr_offset: record.chr_offset,
            importance: record.importance,
            uid: record.uid,
            fields: record.fields,
        }
    }
}

/// Result for a single requested tile id.
pub type TileResult = Result<Vec<OutputRecord>, TileError>;

// =============================================================================
// Tile Fetching
// =============================================================================

/// Fetch `num_tiles` adjacent tiles starting at `x` with a single overlap query.
///
/// Returns one `(tile_x, records)` bucket per tile index, in index order. An
/// interval overlapping several of the tiles appears in each of their buckets.
pub fn fetch_tiles<S: IntervalIndex + ?Sized>(
    store: &S,
    grid: TileGrid,
    zoom: u32,
    x: u64,
    num_tiles: u64,
) -> Result<Vec<(u64, Vec<OutputRecord>)>, StoreError> {
    let window = grid.window(zoom, x, num_tiles);
    let rows = store.query_overlap(&OverlapQuery::new(zoom, window.start, window.end))?;

    let mut buckets: Vec<(u64, Vec<OutputRecord>)> = (0..num_tiles)
        .map(|offset| (x + offset, Vec::new()))
        .collect();

    for row in &rows {
        for tile_x in grid.assign(row, zoom, x, num_tiles) {
            buckets[(tile_x - x) as usize].1.push(OutputRecord::from(row));
        }
    }

    Ok(buckets)
}

/// Fetch the records of a single tile.
pub fn fetch_tile<S: IntervalIndex + ?Sized>(
    store: &S,
    grid: TileGrid,
    tile: &TileId,
) -> Result<Vec<OutputRecord>, StoreError> {
    let factor = 1u64 << EXTRA_ZOOM;
    let mut records = Vec::new();

    for j in 0..factor {
        // Children are indexed by their higher-resolution tile number
        let child_x = tile.x.saturating_mul(factor).saturating_add(j);
        for (_, bucket) in fetch_tiles(store, grid, tile.zoom + EXTRA_ZOOM, child_x, 1)? {
            records.extend(bucket);
        }
    }

    debug!(tile = %tile, records = records.len(), "fetched tile");
    Ok(records)
}

/// Parse a tile id, logging ids that are rejected.
pub(crate) fn resolve_tile_id(tile_id: &str) -> Result<TileId, TileError> {
    TileId::parse(tile_id).map_err(|e| {
        warn!("Rejected tile request: {}", e);
        e
    })
}

/// Assemble tiles for a batch of tile ids.
///
/// The result has one entry per requested id, in request order. An id that
/// does not parse yields `Err(InvalidTileId)` in its slot; a tile with no
/// overlapping intervals yields an empty vector. Storage failures abort the
/// whole batch.
pub fn tiles<S, T>(store: &S, tile_ids: &[T]) -> Result<Vec<(String, TileResult)>, StoreError>
where
    S: IntervalIndex + ?Sized,
    T: AsRef<str>,
{
    if tile_ids.is_empty() {
        return Ok(Vec::new());
    }

    let grid = TileGrid::new(store.max_width()?);

    let mut results = Vec::with_capacity(tile_ids.len());
    for tile_id in tile_ids {
        let tile_id = tile_id.as_ref();
        let result = match resolve_tile_id(tile_id) {
            Ok(tile) => Ok(fetch_tile(store, grid, &tile)?),
            Err(e) => Err(e),
        };
        results.push((tile_id.to_string(), result));
    }

    Ok(results)
}

// =============================================================================
// Range Listing
// =============================================================================

/// List the entries overlapping `[start, end]` at every zoom level.
///
/// With `max_entries` set, at most that many records are returned. The cut
/// follows storage order; it is not ranked by importance or position.
pub fn list_items<S: IntervalIndex + ?Sized>(
    store: &S,
    start: i64,
    end: i64,
    max_entries: Option<usize>,
) -> Result<Vec<OutputRecord>, StoreError> {
    let query = OverlapQuery::any_zoom(start as f64, end as f64).with_limit(max_entries);
    let mut records: Vec<OutputRecord> = store
        .query_overlap(&query)?
        .into_iter()
        .map(OutputRecord::from)
        .collect();

    if let Some(max) = max_entries {
        records.truncate(max);
    }

    Ok(records)
}
