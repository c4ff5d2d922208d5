//! Store integration tests against beddb files on disk.
//!
//! Tests verify:
//! - Metadata reading with and without the header column
//! - Missing metadata and unreadable stores
//! - Overlap queries: zoom filtering, coarse index bounds, uid decoding

use std::fs;

use beddb_tiles::error::StoreError;
use beddb_tiles::store::{IntervalIndex, OverlapQuery, SqliteStore};

use super::test_utils::{BeddbBuilder, FixtureInterval, UidStorage};

// =============================================================================
// Tileset Info
// =============================================================================

#[test]
fn test_tileset_info_without_header() {
    let fixture = BeddbBuilder::new(1024.0).build();

    let info = fixture.store().tileset_info().unwrap();
    assert_eq!(info.max_width, 1024.0);
    assert_eq!(info.max_length, 1024);
    assert_eq!(info.assembly, "test");
    assert_eq!(info.chrom_names, vec!["chr1", "chr2"]);
    assert_eq!(info.chrom_sizes, vec![512, 512]);
    assert_eq!(info.min_pos, vec![1]);
    assert_eq!(info.max_pos, vec![1024]);
    assert_eq!(info.header, "");
}

#[test]
fn test_tileset_info_with_header() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_header(Some("chrom\tstart\tend\tname"))
        .build();

    let info = fixture.store().tileset_info().unwrap();
    assert_eq!(info.header, "chrom\tstart\tend\tname");
}

#[test]
fn test_tileset_info_null_header_is_empty() {
    let fixture = BeddbBuilder::new(1024.0).with_header(None).build();

    let info = fixture.store().tileset_info().unwrap();
    assert_eq!(info.header, "");
}

#[test]
fn test_tileset_info_null_text_columns() {
    let fixture = BeddbBuilder::new(1024.0).with_assembly(None).build();
    let conn = rusqlite::Connection::open(fixture.path()).unwrap();
    conn.execute_batch("UPDATE tileset_info SET chrom_names = NULL, chrom_sizes = NULL")
        .unwrap();
    drop(conn);

    let info = fixture.store().tileset_info().unwrap();
    assert_eq!(info.assembly, "");
    assert!(info.chrom_names.is_empty());
    assert!(info.chrom_sizes.is_empty());
    assert_eq!(info.max_width, 1024.0);
}

#[test]
fn test_max_width_ignores_other_columns() {
    let fixture = BeddbBuilder::new(2048.0).build();
    let conn = rusqlite::Connection::open(fixture.path()).unwrap();
    conn.execute_batch("UPDATE tileset_info SET chrom_sizes = 'large\tsmall'")
        .unwrap();
    drop(conn);

    let store = fixture.store();
    assert!(matches!(store.tileset_info(), Err(StoreError::Query(_))));
    assert_eq!(store.max_width().unwrap(), 2048.0);
}

#[test]
fn test_metadata_missing_row() {
    let fixture = BeddbBuilder::new(1024.0).without_metadata_row().build();

    match fixture.store().tileset_info() {
        Err(StoreError::MetadataMissing { path }) => {
            assert!(path.ends_with("fixture.beddb"));
        }
        other => panic!("Expected MetadataMissing, got {:?}", other),
    }
}

#[test]
fn test_metadata_missing_table() {
    let fixture = BeddbBuilder::new(1024.0).without_metadata_table().build();

    assert!(matches!(
        fixture.store().tileset_info(),
        Err(StoreError::MetadataMissing { .. })
    ));
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.beddb");
    let store = SqliteStore::new(&path);

    assert!(matches!(
        store.tileset_info(),
        Err(StoreError::Unavailable { .. })
    ));
    // Read-only opens never create the file
    assert!(!path.exists());
}

#[test]
fn test_non_database_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.beddb");
    fs::write(&path, vec![0x42u8; 4096]).unwrap();
    let store = SqliteStore::new(&path);

    let err = store.tileset_info().unwrap_err();
    assert!(err.is_unavailable(), "got {:?}", err);

    let err = store
        .query_overlap(&OverlapQuery::any_zoom(0.0, 10.0))
        .unwrap_err();
    assert!(err.is_unavailable(), "got {:?}", err);
}

// =============================================================================
// Overlap Queries
// =============================================================================

#[test]
fn test_query_returns_stored_fields() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(
            FixtureInterval::new(0, 100, 600, "gene-a")
                .with_importance(7.5)
                .with_chr_offset(250)
                .with_fields(&["chr1", "100", "600", "BRCA1", "", "+"]),
        )
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::new(0, 0.0, 1024.0))
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!((row.start_pos, row.end_pos), (100, 600));
    assert_eq!(row.chr_offset, 250);
    assert_eq!(row.importance, 7.5);
    assert_eq!(row.uid, "gene-a");
    assert_eq!(row.fields, vec!["chr1", "100", "600", "BRCA1", "", "+"]);
}

#[test]
fn test_blob_and_text_uids_decode_the_same() {
    let intervals = vec![
        FixtureInterval::new(0, 10, 20, "alpha"),
        FixtureInterval::new(0, 30, 40, "béta"),
    ];
    let text = BeddbBuilder::new(1024.0)
        .with_intervals(intervals.clone())
        .build();
    let blob = BeddbBuilder::new(1024.0)
        .with_uid_storage(UidStorage::Blob)
        .with_intervals(intervals)
        .build();

    let query = OverlapQuery::any_zoom(0.0, 1024.0);
    let text_rows = text.store().query_overlap(&query).unwrap();
    let blob_rows = blob.store().query_overlap(&query).unwrap();

    assert_eq!(text_rows, blob_rows);
    assert_eq!(blob_rows[1].uid, "béta");
}

#[test]
fn test_zoom_level_filter() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 0, 100, "z0"))
        .with_interval(FixtureInterval::new(2, 0, 100, "z2"))
        .with_interval(FixtureInterval::new(5, 0, 100, "z5"))
        .build();
    let store = fixture.store();

    let uids = |query: OverlapQuery| -> Vec<String> {
        store
            .query_overlap(&query)
            .unwrap()
            .into_iter()
            .map(|r| r.uid)
            .collect()
    };

    assert_eq!(uids(OverlapQuery::new(0, 0.0, 1024.0)), vec!["z0"]);
    assert_eq!(uids(OverlapQuery::new(2, 0.0, 1024.0)), vec!["z0", "z2"]);
    assert_eq!(uids(OverlapQuery::any_zoom(0.0, 1024.0)), vec!["z0", "z2", "z5"]);
}

#[test]
fn test_query_uses_coarse_index_bounds() {
    // Exact interval sits at 900..950 but its index entry spans the whole axis
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 900, 950, "wide").with_index_bounds(0, 1024))
        .with_interval(FixtureInterval::new(0, 10, 20, "narrow").with_index_bounds(500, 600))
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::new(0, 0.0, 100.0))
        .unwrap();
    let uids: Vec<&str> = rows.iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(uids, vec!["wide"]);
}

#[test]
fn test_inclusive_window_bounds() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 0, 100, "ends-at-start"))
        .with_interval(FixtureInterval::new(0, 200, 300, "starts-at-end"))
        .with_interval(FixtureInterval::new(0, 301, 400, "after"))
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::new(0, 100.0, 200.0))
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_query_with_no_overlap_is_empty() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 0, 100, "a"))
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::new(0, 500.0, 600.0))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_query_limit() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_intervals((0..10).map(|i| FixtureInterval::new(0, i * 10, i * 10 + 5, "x")))
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::any_zoom(0.0, 1024.0).with_limit(Some(3)))
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_rtree_position_index() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_rtree()
        .with_interval(FixtureInterval::new(0, 100, 600, "a"))
        .with_interval(FixtureInterval::new(1, 700, 800, "b"))
        .build();

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::new(1, 650.0, 1024.0))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uid, "b");
}

#[test]
fn test_missing_interval_tables_is_query_error() {
    let fixture = BeddbBuilder::new(1024.0).build();
    let conn = rusqlite::Connection::open(fixture.path()).unwrap();
    conn.execute_batch("DROP TABLE position_index").unwrap();
    drop(conn);

    assert!(matches!(
        fixture
            .store()
            .query_overlap(&OverlapQuery::any_zoom(0.0, 1.0)),
        Err(StoreError::Query(_))
    ));
}

#[test]
fn test_fractional_coordinates_are_rejected() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 100, 600, "a"))
        .build();
    let conn = rusqlite::Connection::open(fixture.path()).unwrap();
    conn.execute_batch("UPDATE intervals SET startPos = 100.5").unwrap();
    drop(conn);

    match fixture
        .store()
        .query_overlap(&OverlapQuery::any_zoom(0.0, 1024.0))
    {
        Err(StoreError::Query(message)) => assert!(message.contains("startPos")),
        other => panic!("Expected Query error, got {:?}", other),
    }
}

#[test]
fn test_integral_real_coordinates_are_kept() {
    let fixture = BeddbBuilder::new(1024.0)
        .with_interval(FixtureInterval::new(0, 100, 600, "a"))
        .build();
    let conn = rusqlite::Connection::open(fixture.path()).unwrap();
    // A column without affinity keeps the REAL storage class
    conn.execute_batch(
        "ALTER TABLE intervals RENAME TO intervals_int;
         CREATE TABLE intervals (id INT PRIMARY KEY, zoomLevel, importance,
             startPos, endPos, chrOffset, uid, fields);
         INSERT INTO intervals SELECT id, zoomLevel, importance, CAST(startPos AS REAL),
             CAST(endPos AS REAL), chrOffset, uid, fields FROM intervals_int;",
    )
    .unwrap();
    drop(conn);

    let rows = fixture
        .store()
        .query_overlap(&OverlapQuery::any_zoom(0.0, 1024.0))
        .unwrap();
    assert_eq!((rows[0].start_pos, rows[0].end_pos), (100, 600));
}
