use thiserror::Error;

/// Errors raised while reading from a beddb store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store file could not be opened or is not a database
    #[error("Store unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },

    /// The store has no `tileset_info` row
    #[error("Metadata missing: {path} has no tileset_info record")]
    MetadataMissing { path: String },

    /// Query execution failed or a row had an unexpected shape
    #[error("Query error: {0}")]
    Query(String),
}

impl StoreError {
    /// Returns `true` if the store itself could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

/// Errors that can occur while assembling tiles
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Tile identifier is not of the form `uid.zoom.x`
    #[error("Invalid tile id '{tile_id}': {reason}")]
    InvalidTileId { tile_id: String, reason: String },

    /// Storage failure while fetching the tile
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A blocking lookup task panicked or was cancelled
    #[error("Tile task failed: {0}")]
    Join(String),
}

impl TileError {
    pub(crate) fn invalid_tile_id(tile_id: &str, reason: impl Into<String>) -> Self {
        TileError::InvalidTileId {
            tile_id: tile_id.to_string(),
            reason: reason.into(),
        }
    }
}
