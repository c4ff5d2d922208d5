//! Storage layer: the interval index and its records.
//!
//! The tile assembler only sees the [`IntervalIndex`] trait. [`SqliteStore`]
//! implements it over beddb files; any other range-indexed backend can be
//! plugged in as long as it honors the overlap contract of
//! [`IntervalIndex::query_overlap`].
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Tile Assembler              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          IntervalIndex Trait            │
//! │  tileset_info()     query_overlap()     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   SqliteStore (per-call connection)     │
//! └─────────────────────────────────────────┘
//! ```

mod index;
mod record;
mod sqlite;

pub use index::{IntervalIndex, OverlapQuery, ZoomFilter};
pub use record::{join_fields, split_fields, IntervalRecord, TilesetInfo, FIELD_DELIMITER};
pub use sqlite::SqliteStore;
