//! Boundary to the remote retrieval/answer-generation service.

mod model;

pub use model::{ChatRequest, ChatResponse, IndexList, NodeContext};

use crate::error::Result;
use crate::ui::DocumentTree;
use async_trait::async_trait;

/// The remote document question-answering service.
///
/// This trait decouples the orchestration layer from the transport, so the
/// HTTP client and test doubles are interchangeable.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Answers a question (`POST /chat`).
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Fetches the section tree of one index (`GET /tree/{index}`).
    async fn fetch_tree(&self, index_filename: &str) -> Result<DocumentTree>;

    /// Lists the indices available for resuming (`GET /indices`).
    async fn list_indices(&self) -> Result<Vec<String>>;

    /// URL at which the viewer shows `file` opened at `page`.
    fn document_url(&self, file: &str, page: u32) -> Result<String>;
}
