//! Application layer for docqa.
//!
//! Use cases that coordinate the stores in `docqa-core` with the retrieval
//! service.

pub mod chat_orchestrator;
pub mod document_navigator;
pub mod optimistic;

pub use chat_orchestrator::{ChatOrchestrator, SendOutcome, SkipReason};
pub use document_navigator::DocumentNavigator;
pub use optimistic::OptimisticAppend;
