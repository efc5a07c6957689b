//! Local store error types.

use thiserror::Error;

/// A failed local store operation.
///
/// Only persistence can fail; in-memory reads and writes are infallible.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
