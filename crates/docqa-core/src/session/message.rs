//! Conversation message types.
//!
//! Messages are immutable once appended to a session; every constructor
//! assigns a fresh identifier.

use super::traversal::TraversalInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the answer service.
    Assistant,
}

/// A single message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (time-ordered UUID)
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// Message text, possibly containing inline formatting.
    pub content: String,
    /// Citation strings backing the answer, in answer order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    /// Multi-document comparison report, passed through as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_report: Option<serde_json::Value>,
    /// How the server selected context for this answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversal_info: Option<TraversalInfo>,
    /// Cross-references the server expanded from the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_references: Option<Vec<serde_json::Value>>,
    /// Set when the server flagged the answer as possibly unsupported.
    #[serde(default)]
    pub warning: bool,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            content: content.into(),
            citations: None,
            comparison_report: None,
            traversal_info: None,
            resolved_references: None,
            warning: false,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates a plain assistant message (greetings, canned replies).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = Some(citations);
        self
    }

    pub fn with_comparison_report(mut self, report: serde_json::Value) -> Self {
        self.comparison_report = Some(report);
        self
    }

    pub fn with_traversal_info(mut self, info: TraversalInfo) -> Self {
        self.traversal_info = Some(info);
        self
    }

    pub fn with_resolved_references(mut self, references: Vec<serde_json::Value>) -> Self {
        self.resolved_references = Some(references);
        self
    }

    pub fn with_warning(mut self, warning: bool) -> Self {
        self.warning = warning;
        self
    }

    /// Citations of this message, empty when the answer carried none.
    pub fn citations(&self) -> &[String] {
        self.citations.as_deref().unwrap_or_default()
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("first");
        let b = Message::user("first");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_optional_fields_are_omitted_from_json() {
        let json = serde_json::to_value(Message::assistant("hello")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("citations").is_none());
        assert!(json.get("traversal_info").is_none());
        assert_eq!(json["warning"], false);
    }
}
