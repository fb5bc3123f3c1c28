//! Session snapshot repository trait.
//!
//! Defines the interface the session store uses to persist its full session
//! list after every mutation.

use super::model::ChatSession;
use crate::error::Result;

/// Storage key under which the session list is persisted.
pub const SESSIONS_STORAGE_KEY: &str = "chat_sessions";

/// Durable storage for the complete session list.
///
/// Writes are whole-state snapshots, so saving the same list twice is
/// idempotent. Implementations decide where the record lives (a JSON file in
/// the data directory, memory for tests, ...).
pub trait SessionSnapshotRepository: Send + Sync {
    /// Loads the persisted session list.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(sessions))`: A snapshot exists and was decoded
    /// - `Ok(None)`: Nothing has been persisted yet
    /// - `Err(_)`: The snapshot exists but could not be read or decoded
    fn load(&self) -> Result<Option<Vec<ChatSession>>>;

    /// Replaces the persisted snapshot with `sessions`.
    fn save(&self, sessions: &[ChatSession]) -> Result<()>;
}
