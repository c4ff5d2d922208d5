//! SQLite-backed interval index (the beddb file layout).
//!
//! A beddb file holds three tables:
//!
//! ```text
//! tileset_info    one row of dataset constants (optional 9th `header` column)
//! intervals       id, zoomLevel, importance, startPos, endPos, chrOffset, uid, fields
//! position_index  id, rStartPos, rEndPos (coarse per-zoom bounds, usually an R-tree)
//! ```
//!
//! Every operation opens its own read-only connection and drops it before
//! returning, so no handle outlives a call and errors never leak one.

use std::path::{Path, PathBuf};

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags, Row};
use tracing::debug;

use super::index::{IntervalIndex, OverlapQuery, ZoomFilter};
use super::record::{split_fields, IntervalRecord, TilesetInfo, FIELD_DELIMITER};
use crate::error::StoreError;

const METADATA_QUERY: &str = "SELECT * FROM tileset_info";

/// Columns of `tileset_info` before the optional header.
const METADATA_COLUMNS: usize = 8;

/// Column index of `max_width`.
const MAX_WIDTH_COLUMN: usize = 7;

/// Column index of the optional header.
const HEADER_COLUMN: usize = 8;

/// A beddb file on local disk.
///
/// Constructing the store performs no I/O; the file is opened per call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    identifier: String,
}

impl SqliteStore {
    /// Create a store for the beddb file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let identifier = path.display().to_string();
        Self { path, identifier }
    }

    /// Get the path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Connection::open_with_flags(&self.path, flags).map_err(|e| StoreError::Unavailable {
            path: self.identifier.clone(),
            message: e.to_string(),
        })
    }

    /// Map a SQLite error to the store error taxonomy.
    fn store_error(&self, err: rusqlite::Error) -> StoreError {
        match err.sqlite_error_code() {
            Some(ErrorCode::NotADatabase)
            | Some(ErrorCode::CannotOpen)
            | Some(ErrorCode::PermissionDenied) => StoreError::Unavailable {
                path: self.identifier.clone(),
                message: err.to_string(),
            },
            _ => StoreError::Query(err.to_string()),
        }
    }

    /// Run the metadata query and decode its single row with `decode`.
    fn read_metadata<T>(
        &self,
        decode: impl FnOnce(&Row, usize) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.connect()?;

        let mut statement = match conn.prepare(METADATA_QUERY) {
            Ok(statement) => statement,
            Err(e) if is_missing_table(&e) => {
                return Err(StoreError::MetadataMissing {
                    path: self.identifier.clone(),
                })
            }
            Err(e) => return Err(self.store_error(e)),
        };
        let column_count = statement.column_count();
        if column_count < METADATA_COLUMNS {
            return Err(StoreError::Query(format!(
                "tileset_info has {} columns, expected at least {}",
                column_count, METADATA_COLUMNS
            )));
        }

        let mut rows = statement.query([]).map_err(|e| self.store_error(e))?;
        let row = rows
            .next()
            .map_err(|e| self.store_error(e))?
            .ok_or_else(|| StoreError::MetadataMissing {
                path: self.identifier.clone(),
            })?;

        decode(row, column_count)
    }
}

impl IntervalIndex for SqliteStore {
    fn tileset_info(&self) -> Result<TilesetInfo, StoreError> {
        self.read_metadata(row_to_metadata)
    }

    fn max_width(&self) -> Result<f64, StoreError> {
        self.read_metadata(|row, _| real_column(row, MAX_WIDTH_COLUMN, "max_width"))
    }

    fn query_overlap(&self, query: &OverlapQuery) -> Result<Vec<IntervalRecord>, StoreError> {
        let conn = self.connect()?;

        let (sql, params) = overlap_sql(query);
        let mut statement = conn.prepare(&sql).map_err(|e| self.store_error(e))?;
        let mut rows = statement
            .query(params_from_iter(params))
            .map_err(|e| self.store_error(e))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(|e| self.store_error(e))? {
            records.push(row_to_interval(row)?);
        }

        debug!(
            store = %self.identifier,
            zoom = ?query.zoom,
            start = query.start,
            end = query.end,
            rows = records.len(),
            "overlap query"
        );

        Ok(records)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Query Construction
// =============================================================================

/// Build the overlap query and its bound parameters.
fn overlap_sql(query: &OverlapQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(
        "SELECT startPos, endPos, chrOffset, importance, fields, uid \
         FROM intervals, position_index \
         WHERE intervals.id = position_index.id",
    );
    let mut params = Vec::with_capacity(4);

    if let ZoomFilter::UpTo(max_zoom) = query.zoom {
        sql.push_str(" AND zoomLevel <= ?");
        params.push(Value::Integer(i64::from(max_zoom)));
    }

    sql.push_str(" AND rEndPos >= ? AND rStartPos <= ?");
    params.push(Value::Real(query.start));
    params.push(Value::Real(query.end));

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    }

    (sql, params)
}

/// Decode a `tileset_info` row.
///
/// NULL text columns read as empty, as does a missing or NULL header.
fn row_to_metadata(row: &Row, column_count: usize) -> Result<TilesetInfo, StoreError> {
    let chrom_names = optional_text_column(row, 3, "chrom_names")?;
    let chrom_sizes = optional_text_column(row, 4, "chrom_sizes")?;

    let header = if column_count == METADATA_COLUMNS + 1 {
        optional_text_column(row, HEADER_COLUMN, "header")?
    } else {
        String::new()
    };

    Ok(TilesetInfo::new(
        int_column(row, 0, "zoom_step")?,
        int_column(row, 1, "max_length")?,
        optional_text_column(row, 2, "assembly")?,
        split_list(&chrom_names),
        parse_sizes(&chrom_sizes)?,
        real_column(row, 5, "tile_size")?,
        int_column(row, 6, "max_zoom")?,
        real_column(row, MAX_WIDTH_COLUMN, "max_width")?,
        header,
    ))
}

fn row_to_interval(row: &Row) -> Result<IntervalRecord, StoreError> {
    Ok(IntervalRecord {
        start_pos: int_column(row, 0, "startPos")?,
        end_pos: int_column(row, 1, "endPos")?,
        chr_offset: int_column(row, 2, "chrOffset")?,
        importance: real_column(row, 3, "importance")?,
        fields: split_fields(&text_column(row, 4, "fields")?),
        uid: text_column(row, 5, "uid")?,
    })
}

// =============================================================================
// Column Decoding
// =============================================================================
//
// SQLite is dynamically typed: builders have written numeric columns as both
// INTEGER and REAL, and uid as both TEXT and BLOB. Decoding normalizes once here.

fn column<'a>(row: &'a Row, idx: usize, name: &str) -> Result<ValueRef<'a>, StoreError> {
    row.get_ref(idx)
        .map_err(|e| StoreError::Query(format!("column {}: {}", name, e)))
}

fn int_column(row: &Row, idx: usize, name: &str) -> Result<i64, StoreError> {
    match column(row, idx, name)? {
        ValueRef::Integer(v) => Ok(v),
        // Integral REALs only
        ValueRef::Real(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        ValueRef::Real(v) => Err(StoreError::Query(format!(
            "column {}: expected an integer, found {}",
            name, v
        ))),
        other => Err(unexpected_type(name, "an integer", other)),
    }
}

fn real_column(row: &Row, idx: usize, name: &str) -> Result<f64, StoreError> {
    match column(row, idx, name)? {
        ValueRef::Real(v) => Ok(v),
        ValueRef::Integer(v) => Ok(v as f64),
        other => Err(unexpected_type(name, "a number", other)),
    }
}

fn text_column(row: &Row, idx: usize, name: &str) -> Result<String, StoreError> {
    match column(row, idx, name)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::Query(format!("column {}: invalid UTF-8: {}", name, e))),
        ValueRef::Integer(v) => Ok(v.to_string()),
        ValueRef::Real(v) => Ok(v.to_string()),
        other => Err(unexpected_type(name, "text", other)),
    }
}

fn optional_text_column(row: &Row, idx: usize, name: &str) -> Result<String, StoreError> {
    match column(row, idx, name)? {
        ValueRef::Null => Ok(String::new()),
        _ => text_column(row, idx, name),
    }
}

fn unexpected_type(name: &str, expected: &str, found: ValueRef) -> StoreError {
    StoreError::Query(format!(
        "column {}: expected {}, found {}",
        name,
        expected,
        found.data_type()
    ))
}

fn split_list(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        Vec::new()
    } else {
        split_fields(stored)
    }
}

fn parse_sizes(stored: &str) -> Result<Vec<i64>, StoreError> {
    if stored.is_empty() {
        return Ok(Vec::new());
    }
    stored
        .split(FIELD_DELIMITER)
        .map(|size| {
            size.trim().parse::<i64>().map_err(|e| {
                StoreError::Query(format!("chrom_sizes: invalid size '{}': {}", size, e))
            })
        })
        .collect()
}

fn is_missing_table(err: &rusqlite::Error) -> bool {
    err.to_string().contains("no such table")
}
