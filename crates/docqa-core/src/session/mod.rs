//! Session domain module.
//!
//! This module contains the chat session model, the message and traversal
//! report types, the persistence trait, and the session store.
//!
//! # Module Structure
//!
//! - `model`: Core session model (`ChatSession`)
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `traversal`: Server traversal report (`TraversalInfo`, `SelectedSection`)
//! - `repository`: Snapshot persistence trait
//! - `store`: Session lifecycle and observable state (`SessionStore`)

mod message;
mod model;
mod repository;
mod store;
mod traversal;

// Re-export public API
pub use message::{Message, MessageRole};
pub use model::ChatSession;
pub use repository::{SESSIONS_STORAGE_KEY, SessionSnapshotRepository};
pub use store::{SessionState, SessionStore};
pub use traversal::{SelectedSection, TraversalInfo};
