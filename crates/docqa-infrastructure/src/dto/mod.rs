//! Data transfer objects for persisted state.

pub mod session;

pub use session::{ChatSessionDto, MessageDto};
