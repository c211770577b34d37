//! Save blob encoding.
//!
//! A save is a JSON envelope around the [`GameState`] carrying a format
//! version and the time it was written. Bare game-state JSON, as exported by
//! the authoring tool's quicksave, is accepted on load as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tf_core::GameState;

use crate::error::{SessionError, SessionResult};

/// Version written into every envelope.
pub const SAVE_FORMAT: u32 = 1;

/// The on-disk shape of a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnvelope {
    /// Format version, see [`SAVE_FORMAT`].
    pub format: u32,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
    /// The saved game.
    pub state: GameState,
}

/// Encode a state as a save blob stamped with the current time.
pub fn serialize(state: &GameState) -> SessionResult<String> {
    let envelope = SaveEnvelope {
        format: SAVE_FORMAT,
        saved_at: Utc::now(),
        state: state.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a save blob. Objects without a `format` field are read as a
/// bare game state.
pub fn deserialize(blob: &str) -> SessionResult<GameState> {
    let raw: serde_json::Value = serde_json::from_str(blob)?;
    if raw.get("format").is_none() {
        return Ok(serde_json::from_value(raw)?);
    }
    let envelope: SaveEnvelope = serde_json::from_value(raw)?;
    if envelope.format != SAVE_FORMAT {
        return Err(SessionError::UnsupportedSaveFormat(envelope.format));
    }
    Ok(envelope.state)
}
