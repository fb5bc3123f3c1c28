//! Wire types exchanged with the retrieval service.

use crate::session::{Message, TraversalInfo};
use crate::settings::{DomainProfile, ResponseLanguage, RetrievalSettings};
use crate::ui::SelectedNode;
use serde::{Deserialize, Serialize};

/// Section pinned to a question, overriding general retrieval for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContext {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<SelectedNode> for NodeContext {
    fn from(node: SelectedNode) -> Self {
        Self {
            id: node.id,
            title: node.title,
            page_ref: node.page_ref,
            summary: node.summary,
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub index_filenames: Vec<String>,
    pub use_deep_traversal: bool,
    pub max_depth: u32,
    pub max_branches: u32,
    pub domain_template: DomainProfile,
    pub language: ResponseLanguage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_context: Option<NodeContext>,
}

impl ChatRequest {
    pub fn new(
        question: impl Into<String>,
        index_filenames: Vec<String>,
        settings: RetrievalSettings,
        node_context: Option<NodeContext>,
    ) -> Self {
        Self {
            question: question.into(),
            index_filenames,
            use_deep_traversal: settings.use_deep_traversal,
            max_depth: settings.max_depth,
            max_branches: settings.max_branches,
            domain_template: settings.domain_template,
            language: settings.language,
            node_context,
        }
    }
}

/// Body of a successful `POST /chat` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub comparison: Option<serde_json::Value>,
    #[serde(default)]
    pub traversal_info: Option<TraversalInfo>,
    #[serde(default)]
    pub resolved_references: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub hallucination_warning: Option<bool>,
}

impl ChatResponse {
    /// Tokens of context the answer was generated from; zero without a report.
    pub fn context_token_count(&self) -> u64 {
        self.traversal_info
            .as_ref()
            .map(|info| info.total_tokens)
            .unwrap_or(0)
    }

    /// Builds the assistant message appended to the session thread.
    pub fn into_message(self) -> Message {
        let warning = self.hallucination_warning.unwrap_or(false);
        let mut message = Message::assistant(self.answer).with_warning(warning);
        if let Some(citations) = self.citations {
            message = message.with_citations(citations);
        }
        if let Some(report) = self.comparison.filter(|v| !v.is_null()) {
            message = message.with_comparison_report(report);
        }
        if let Some(info) = self.traversal_info {
            message = message.with_traversal_info(info);
        }
        if let Some(references) = self.resolved_references {
            message = message.with_resolved_references(references);
        }
        message
    }
}

/// Body of `GET /indices`: either a bare list or `{"indices": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndexList {
    Bare(Vec<String>),
    Wrapped { indices: Vec<String> },
}

impl IndexList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Bare(indices) | Self::Wrapped { indices } => indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_names() {
        let request = ChatRequest::new(
            "What changed?",
            vec!["report.json".to_string()],
            RetrievalSettings::default(),
            None,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "What changed?");
        assert_eq!(json["index_filenames"][0], "report.json");
        assert_eq!(json["use_deep_traversal"], true);
        assert_eq!(json["domain_template"], "general");
        assert_eq!(json["language"], "ko");
        assert!(json.get("node_context").is_none());
    }

    #[test]
    fn test_minimal_response_builds_plain_message() {
        let response: ChatResponse = serde_json::from_str(r#"{"answer": "42"}"#).unwrap();
        assert_eq!(response.context_token_count(), 0);

        let message = response.into_message();
        assert_eq!(message.content, "42");
        assert!(message.citations.is_none());
        assert!(message.traversal_info.is_none());
        assert!(!message.warning);
    }

    #[test]
    fn test_full_response_builds_rich_message() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "answer": "Revenue grew.",
                "citations": ["Annual Report, p.4"],
                "comparison": {"documents": ["a", "b"]},
                "traversal_info": {"used_deep_traversal": true, "total_tokens": 812},
                "resolved_references": [{"reference": "Table 3"}],
                "hallucination_warning": true
            }"#,
        )
        .unwrap();
        assert_eq!(response.context_token_count(), 812);

        let message = response.into_message();
        assert_eq!(message.citations(), ["Annual Report, p.4".to_string()]);
        assert!(message.comparison_report.is_some());
        assert_eq!(message.resolved_references.as_ref().unwrap().len(), 1);
        assert!(message.warning);
    }

    #[test]
    fn test_index_list_accepts_both_shapes() {
        let bare: IndexList = serde_json::from_str(r#"["a.json", "b.json"]"#).unwrap();
        let wrapped: IndexList = serde_json::from_str(r#"{"indices": ["a.json"]}"#).unwrap();
        assert_eq!(bare.into_vec().len(), 2);
        assert_eq!(wrapped.into_vec(), vec!["a.json".to_string()]);
    }
}
