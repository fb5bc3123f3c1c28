pub mod config;
pub mod error;
pub mod performance;
pub mod retrieval;
pub mod session;
pub mod settings;
pub mod ui;

// Re-export common error type
pub use error::{DocqaError, Result};
