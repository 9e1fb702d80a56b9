//! Error type for collaborator-facing operations
//!
//! The simulation itself never fails; these errors only come out of the
//! catalog, tuning and folder-construction boundaries.

/// Errors raised while loading data handed to the simulation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown chip id: {0}")]
    UnknownChip(u32),

    #[error("Chip {id} has a malformed area pattern: expected 3 rows, got {rows}")]
    MalformedPattern { id: u32, rows: usize },

    #[error("Chip {id} has a malformed area pattern: row {row} has {len} cells, expected 3")]
    MalformedRow { id: u32, row: usize, len: usize },

    #[error("Duplicate chip id in catalog: {0}")]
    DuplicateChip(u32),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
