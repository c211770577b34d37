//! Error types for play sessions.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The scene a session should stand on is not in the project.
    #[error("scene not found: {0}")]
    SceneMissing(String),

    /// The current scene has no choice with this id.
    #[error("unknown choice: {0}")]
    UnknownChoice(String),

    /// The choice exists but its conditions do not hold.
    #[error("choice not available: {0}")]
    ChoiceUnavailable(String),

    /// The session is paused.
    #[error("session is paused")]
    Paused,

    /// The project has no item with this id.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The item is not in the inventory.
    #[error("item not held: {0}")]
    ItemNotHeld(String),

    /// The item cannot be used, or its use conditions do not hold.
    #[error("item cannot be used: {0}")]
    ItemNotUsable(String),

    /// The item cannot be dropped.
    #[error("item cannot be discarded: {0}")]
    ItemNotDiscardable(String),

    /// Persistence backend error.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// A save blob that is not valid JSON for a game state.
    #[error("malformed save: {0}")]
    MalformedSave(#[from] serde_json::Error),

    /// A save written by an incompatible format version.
    #[error("unsupported save format: {0}")]
    UnsupportedSaveFormat(u32),
}
