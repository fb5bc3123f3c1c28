//! Traversal report attached to answers produced with deep traversal.

use crate::ui::tree::deserialize_page_ref;
use serde::{Deserialize, Serialize};

/// A section the server chose as context for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSection {
    #[serde(alias = "document", alias = "documentId")]
    pub document_id: String,
    pub title: String,
    #[serde(
        default,
        alias = "pageRef",
        alias = "page",
        deserialize_with = "deserialize_page_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_ref: Option<String>,
}

/// Report describing how the server walked the section tree for one query.
///
/// Read-only on the client: it is stored on the assistant message and only
/// consulted for display and for the token count fed to performance metrics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraversalInfo {
    #[serde(default)]
    pub used_deep_traversal: bool,
    /// Node identifiers in visiting order.
    #[serde(default)]
    pub nodes_visited: Vec<String>,
    #[serde(default)]
    pub nodes_selected: Vec<SelectedSection>,
    #[serde(default)]
    pub max_depth: u32,
    #[serde(default)]
    pub max_branches: u32,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TraversalInfo {
    /// Number of distinct nodes the traversal touched.
    pub fn distinct_visited(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.nodes_visited
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .count()
    }
}
