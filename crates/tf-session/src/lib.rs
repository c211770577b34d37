//! Play sessions for Taleforge.
//!
//! A [`Session`] owns one project snapshot and the evolving
//! [`tf_core::GameState`], routes player input through the rule engine, and
//! persists state through any [`KeyValueStore`]. The debug console lives
//! here too, since it edits the state a session owns.

pub mod config;
pub mod debug;
pub mod error;
pub mod persist;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use debug::{DebugCommand, QuestOp};
pub use error::{SessionError, SessionResult};
pub use persist::{SAVE_FORMAT, SaveEnvelope, deserialize, serialize};
pub use session::{Session, TurnOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
