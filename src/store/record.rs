//! Records read from a beddb store.

use serde::Serialize;

/// Delimiter used for multi-valued text columns (`fields`, `chrom_names`, `chrom_sizes`).
pub const FIELD_DELIMITER: char = '\t';

// =============================================================================
// Tileset Info
// =============================================================================

/// Dataset-level constants read from the `tileset_info` row.
///
/// Field names match the JSON keys consumed by tile clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TilesetInfo {
    /// Resolution decimation per zoom level
    pub zoom_step: i64,

    /// Total addressable coordinate span
    pub max_length: i64,

    /// Reference assembly identifier (e.g. "hg19")
    pub assembly: String,

    /// Chromosome names, parallel to `chrom_sizes`
    pub chrom_names: Vec<String>,

    /// Chromosome sizes, parallel to `chrom_names`
    pub chrom_sizes: Vec<i64>,

    /// Tile size in coordinate units at zoom 0
    pub tile_size: f64,

    /// Highest valid zoom level
    pub max_zoom: i64,

    /// Coordinate span covered by the tiling grid
    pub max_width: f64,

    /// Lower bound of the single-dimensional bounding box (always `[1]`)
    pub min_pos: Vec<i64>,

    /// Upper bound of the single-dimensional bounding box (`[max_length]`)
    pub max_pos: Vec<i64>,

    /// Opaque header blob, empty if the store has none
    pub header: String,
}

impl TilesetInfo {
    /// Build tileset info from the stored columns, deriving the bounding box.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        zoom_step: i64,
        max_length: i64,
        assembly: impl Into<String>,
        chrom_names: Vec<String>,
        chrom_sizes: Vec<i64>,
        tile_size: f64,
        max_zoom: i64,
        max_width: f64,
        header: impl Into<String>,
    ) -> Self {
        Self {
            zoom_step,
            max_length,
            assembly: assembly.into(),
            chrom_names,
            chrom_sizes,
            tile_size,
            max_zoom,
            max_width,
            min_pos: vec![1],
            max_pos: vec![max_length],
            header: header.into(),
        }
    }
}

// =============================================================================
// Interval Record
// =============================================================================

/// One interval row returned by an overlap query.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord {
    /// Start of the interval (inclusive)
    pub start_pos: i64,

    /// End of the interval (exclusive)
    pub end_pos: i64,

    /// Offset converting the linear coordinate to a chromosome-relative one
    pub chr_offset: i64,

    /// Score used for zoom-dependent filtering
    pub importance: f64,

    /// Unique identifier
    pub uid: String,

    /// Opaque payload fields in storage order
    pub fields: Vec<String>,
}

/// Split a stored delimited string into its ordered fields.
///
/// The split is lossless for fields that do not contain the delimiter.
pub fn split_fields(stored: &str) -> Vec<String> {
    stored.split(FIELD_DELIMITER).map(str::to_string).collect()
}

/// Join fields into the stored representation.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| field.as_ref())
        .collect::<Vec<&str>>()
        .join(&FIELD_DELIMITER.to_string())
}
