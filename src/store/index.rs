use crate::error::StoreError;

use super::record::{IntervalRecord, TilesetInfo};

/// Zoom-level predicate applied by an overlap query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomFilter {
    /// Only entries indexed at zoom levels `<= z`
    UpTo(u32),

    /// Every indexed resolution level
    Any,
}

impl ZoomFilter {
    /// Returns `true` if an entry stored at `zoom_level` passes the filter.
    pub fn accepts(&self, zoom_level: i64) -> bool {
        match self {
            ZoomFilter::UpTo(max) => zoom_level <= i64::from(*max),
            ZoomFilter::Any => true,
        }
    }
}

/// Parameters of an overlap query against the position index.
///
/// `start` and `end` are compared inclusively against the coarse index bounds:
/// an entry matches when `rEndPos >= start` and `rStartPos <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapQuery {
    /// Zoom-level predicate
    pub zoom: ZoomFilter,

    /// Window start (inclusive)
    pub start: f64,

    /// Window end (inclusive)
    pub end: f64,

    /// Maximum number of rows to return, in storage order
    pub limit: Option<usize>,
}

impl OverlapQuery {
    /// Query entries up to `max_zoom` overlapping `[start, end]`.
    pub fn new(max_zoom: u32, start: f64, end: f64) -> Self {
        Self {
            zoom: ZoomFilter::UpTo(max_zoom),
            start,
            end,
            limit: None,
        }
    }

    /// Query entries at every zoom level overlapping `[start, end]`.
    pub fn any_zoom(start: f64, end: f64) -> Self {
        Self {
            zoom: ZoomFilter::Any,
            start,
            end,
            limit: None,
        }
    }

    /// Cap the number of returned rows.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Returns `true` if coarse index bounds `[r_start, r_end]` intersect the window.
    pub fn overlaps(&self, r_start: f64, r_end: f64) -> bool {
        r_end >= self.start && r_start <= self.end
    }
}

/// Read access to a pre-built interval index.
///
/// This abstraction lets the tile assembler work against any range-indexed
/// store. Each call is independent: implementations acquire whatever handle
/// they need for the duration of the call and release it before returning.
pub trait IntervalIndex: Send + Sync {
    /// Read the dataset metadata record.
    fn tileset_info(&self) -> Result<TilesetInfo, StoreError>;

    /// Read only the coordinate span of the tiling grid.
    ///
    /// Tile assembly needs nothing else from the metadata, so backends can
    /// skip decoding the other columns.
    fn max_width(&self) -> Result<f64, StoreError> {
        self.tileset_info().map(|info| info.max_width)
    }

    /// Return every indexed interval matching `query`, in storage order.
    ///
    /// Returns an empty vector when nothing overlaps.
    fn query_overlap(&self, query: &OverlapQuery) -> Result<Vec<IntervalRecord>, StoreError>;

    /// Identifier for logging (typically the file path).
    fn identifier(&self) -> &str;
}
