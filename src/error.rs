//! Error types
//!
//! Content errors reject bad level/tuning data up front. The simulation itself
//! has no error paths: it keeps its invariants by clamping.

use thiserror::Error;

/// Errors raised while building levels or tuning from external data
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown enemy archetype `{0}`")]
    UnknownArchetype(String),

    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),

    #[error("unknown pickup kind `{0}`")]
    UnknownPickup(String),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by progress storage backends
///
/// These never reach the player; `ProgressionStore` logs and swallows them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage unavailable")]
    Unavailable,
}
