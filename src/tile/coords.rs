//! Tile coordinate mapping.
//!
//! Tiles subdivide the linear coordinate axis `[0, max_width)` into `2^zoom`
//! equal windows at each zoom level:
//!
//! ```text
//! zoom 0  |0                                  |
//! zoom 1  |0                |1                |
//! zoom 2  |0       |1       |2       |3       |
//!         0                                   max_width
//! ```
//!
//! Tile `x` at zoom `z` covers `[x * w(z), (x + 1) * w(z))` with
//! `w(z) = max_width / 2^z`. Nothing here checks `x` or `zoom` against the
//! dataset bounds; out-of-range tiles simply map to windows past the data.

use std::fmt;
use std::str::FromStr;

use crate::error::TileError;
use crate::store::{IntervalRecord, TilesetInfo};

// =============================================================================
// Tile Identifier
// =============================================================================

/// A parsed tile identifier of the form `<dataset>.<zoom>.<x>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Opaque dataset identifier
    pub dataset: String,

    /// Zoom level (0 = whole grid in one tile)
    pub zoom: u32,

    /// Tile index along the axis
    pub x: u64,
}

impl TileId {
    /// Create a tile identifier.
    pub fn new(dataset: impl Into<String>, zoom: u32, x: u64) -> Self {
        Self {
            dataset: dataset.into(),
            zoom,
            x,
        }
    }

    /// Parse a tile identifier.
    ///
    /// The id must have exactly three dot-separated components, the last two
    /// being non-negative integers.
    pub fn parse(tile_id: &str) -> Result<Self, TileError> {
        let parts: Vec<&str> = tile_id.split('.').collect();
        if parts.len() != 3 {
            return Err(TileError::invalid_tile_id(
                tile_id,
                format!(
                    "expected 3 dot-separated components, found {}",
                    parts.len()
                ),
            ));
        }

        let zoom = parts[1].parse::<u32>().map_err(|e| {
            TileError::invalid_tile_id(tile_id, format!("invalid zoom '{}': {}", parts[1], e))
        })?;
        let x = parts[2].parse::<u64>().map_err(|e| {
            TileError::invalid_tile_id(tile_id, format!("invalid x '{}': {}", parts[2], e))
        })?;

        Ok(Self::new(parts[0], zoom, x))
    }
}

impl FromStr for TileId {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileId::parse(s)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.dataset, self.zoom, self.x)
    }
}

// =============================================================================
// Tile Window
// =============================================================================

/// Half-open coordinate window `[start, end)` covered by one or more tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileWindow {
    pub start: f64,
    pub end: f64,
}

impl TileWindow {
    /// Returns `true` if the interval `[start, end)` belongs to this window.
    ///
    /// The end comparison is inclusive: an interval ending exactly at the
    /// window start is still assigned to the window.
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        (start as f64) < self.end && (end as f64) >= self.start
    }

    /// Width of the window in coordinate units.
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

// =============================================================================
// Tile Grid
// =============================================================================

/// The tiling grid of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    max_width: f64,
}

impl TileGrid {
    /// Create a grid spanning `[0, max_width)`.
    pub fn new(max_width: f64) -> Self {
        Self { max_width }
    }

    /// Coordinate span covered by the grid.
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Width of a single tile at `zoom`.
    pub fn tile_width(&self, zoom: u32) -> f64 {
        let exponent = i32::try_from(zoom).unwrap_or(i32::MAX);
        self.max_width / 2f64.powi(exponent)
    }

    /// Window covered by `num_tiles` adjacent tiles starting at `x`.
    pub fn window(&self, zoom: u32, x: u64, num_tiles: u64) -> TileWindow {
        let width = self.tile_width(zoom);
        let start = x as f64 * width;
        TileWindow {
            start,
            end: start + num_tiles as f64 * width,
        }
    }

    /// Tile indices in `[x_start, x_start + num_tiles)` that `interval` is assigned to.
    ///
    /// An interval spanning several tiles is assigned to each of them.
    pub fn assign<'a>(
        &'a self,
        interval: &'a IntervalRecord,
        zoom: u32,
        x_start: u64,
        num_tiles: u64,
    ) -> impl Iterator<Item = u64> + 'a {
        (x_start..x_start.saturating_add(num_tiles)).filter(move |&x| {
            self.window(zoom, x, 1)
                .overlaps(interval.start_pos, interval.end_pos)
        })
    }
}

impl From<&TilesetInfo> for TileGrid {
    fn from(info: &TilesetInfo) -> Self {
        TileGrid::new(info.max_width)
    }
}
