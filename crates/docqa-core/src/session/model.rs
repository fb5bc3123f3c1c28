//! Chat session domain model.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation about one or more indexed documents.
///
/// Identifiers are time-ordered UUIDs, so sorting by `id` matches creation
/// order and an identifier is never handed out twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID v7)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Index identifiers backing this session, in the order they were added
    pub document_refs: Vec<String>,
    /// Conversation thread, oldest first
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates a session whose thread starts with the given greeting.
    pub fn new(
        title: impl Into<String>,
        document_refs: Vec<String>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            document_refs,
            messages: vec![Message::assistant(greeting)],
            created_at: Utc::now(),
        }
    }
}
