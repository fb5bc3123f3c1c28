//! Persisted shape of chat sessions.
//!
//! The snapshot file is a JSON array of [`ChatSessionDto`]. Keeping this
//! layer separate lets the domain model change without breaking files that
//! are already on disk.

use chrono::{DateTime, SecondsFormat, Utc};
use docqa_core::DocqaError;
use docqa_core::session::{ChatSession, Message, MessageRole, TraversalInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_report: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversal_info: Option<TraversalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_references: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub warning: bool,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            citations: message.citations.clone(),
            comparison_report: message.comparison_report.clone(),
            traversal_info: message.traversal_info.clone(),
            resolved_references: message.resolved_references.clone(),
            warning: message.warning,
        }
    }
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message {
            id: dto.id,
            role: dto.role,
            content: dto.content,
            citations: dto.citations,
            comparison_report: dto.comparison_report,
            traversal_info: dto.traversal_info,
            resolved_references: dto.resolved_references,
            warning: dto.warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub document_refs: Vec<String>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<&ChatSession> for ChatSessionDto {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            document_refs: session.document_refs.clone(),
            messages: session.messages.iter().map(MessageDto::from).collect(),
            created_at: session
                .created_at
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl TryFrom<ChatSessionDto> for ChatSession {
    type Error = DocqaError;

    fn try_from(dto: ChatSessionDto) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
            .map_err(|e| DocqaError::Serialization {
                format: "JSON".to_string(),
                message: format!(
                    "session '{}' has invalid createdAt '{}': {}",
                    dto.id, dto.created_at, e
                ),
            })?
            .with_timezone(&Utc);

        Ok(ChatSession {
            id: dto.id,
            title: dto.title,
            document_refs: dto.document_refs,
            messages: dto.messages.into_iter().map(Message::from).collect(),
            created_at,
        })
    }
}
