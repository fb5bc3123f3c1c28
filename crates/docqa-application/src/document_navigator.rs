//! Document-level use cases: resuming indexed documents, the section tree
//! panel and the citation viewer.

use docqa_core::Result;
use docqa_core::retrieval::RetrievalService;
use docqa_core::session::SessionStore;
use docqa_core::ui::{CitationTarget, Notification, UiStore};
use std::path::Path;
use std::sync::Arc;

/// Coordinates the retrieval service with the session and UI stores for
/// everything outside the send-message cycle.
pub struct DocumentNavigator {
    service: Arc<dyn RetrievalService>,
    sessions: Arc<SessionStore>,
    ui: Arc<UiStore>,
}

impl DocumentNavigator {
    pub fn new(
        service: Arc<dyn RetrievalService>,
        sessions: Arc<SessionStore>,
        ui: Arc<UiStore>,
    ) -> Self {
        Self {
            service,
            sessions,
            ui,
        }
    }

    /// Lists indices that can be resumed. A failure is shown as a
    /// notification and yields an empty list.
    pub async fn list_indices(&self) -> Vec<String> {
        match self.service.list_indices().await {
            Ok(indices) => indices,
            Err(e) => {
                tracing::warn!("[DocumentNavigator] list_indices failed: {}", e);
                self.ui
                    .notify(Notification::error(format!("Failed to load documents: {e}")));
                Vec::new()
            }
        }
    }

    /// Starts a new active session over an already indexed document.
    pub fn resume_document(&self, index_filename: &str) -> String {
        let title = document_title(index_filename);
        let greeting = format!("\"{title}\" is ready. Ask me anything about it.");
        let session_id = self
            .sessions
            .create(title.clone(), vec![index_filename.to_string()], greeting);
        tracing::info!(
            "[DocumentNavigator] resumed {} as session {}",
            index_filename,
            session_id
        );
        session_id
    }

    /// Loads the section tree of `index_filename` into the tree panel.
    ///
    /// On failure a notification is shown and the panel keeps whatever it
    /// showed before. Returns whether a tree was loaded.
    pub async fn open_document_tree(&self, index_filename: &str) -> bool {
        match self.service.fetch_tree(index_filename).await {
            Ok(document) => {
                self.ui.load_tree(index_filename, document);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "[DocumentNavigator] fetch_tree({}) failed: {}",
                    index_filename,
                    e
                );
                self.ui.notify(Notification::error(format!(
                    "Failed to load the document structure: {e}"
                )));
                false
            }
        }
    }

    pub fn close_tree_panel(&self) {
        self.ui.close_tree();
    }

    /// Opens the viewer on a citation and returns the URL to display, or
    /// `None` when the citation does not follow `<document>, p.<page>`.
    pub fn open_citation(&self, citation: &str) -> Result<Option<String>> {
        match self.ui.open_citation(citation) {
            CitationTarget::Resolved { file, page } => {
                self.service.document_url(&file, page).map(Some)
            }
            CitationTarget::Unresolvable => Ok(None),
        }
    }
}

/// Session title for an index: its file stem.
fn document_title(index_filename: &str) -> String {
    Path::new(index_filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| index_filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docqa_core::DocqaError;
    use docqa_core::retrieval::{ChatRequest, ChatResponse};
    use docqa_core::session::{ChatSession, SessionSnapshotRepository};
    use docqa_core::ui::{DocumentTree, NotificationLevel, TreeNode, ViewerTarget};

    struct NullRepository;

    impl SessionSnapshotRepository for NullRepository {
        fn load(&self) -> Result<Option<Vec<ChatSession>>> {
            Ok(None)
        }

        fn save(&self, _sessions: &[ChatSession]) -> Result<()> {
            Ok(())
        }
    }

    struct MockRetrieval {
        reachable: bool,
    }

    #[async_trait]
    impl RetrievalService for MockRetrieval {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
            Err(DocqaError::internal("not used"))
        }

        async fn fetch_tree(&self, index_filename: &str) -> Result<DocumentTree> {
            if !self.reachable {
                return Err(DocqaError::network(None, "connection refused", true));
            }
            Ok(DocumentTree {
                document_name: document_title(index_filename),
                tree: TreeNode {
                    id: "root".into(),
                    title: "Root".into(),
                    summary: None,
                    page_ref: None,
                    children: vec![],
                },
            })
        }

        async fn list_indices(&self) -> Result<Vec<String>> {
            if !self.reachable {
                return Err(DocqaError::network(Some(503), "unavailable", true));
            }
            Ok(vec!["annual_report.json".into(), "manual.json".into()])
        }

        fn document_url(&self, file: &str, page: u32) -> Result<String> {
            Ok(format!("http://test/pdf/{file}#page={page}"))
        }
    }

    fn navigator(reachable: bool) -> (DocumentNavigator, Arc<SessionStore>, Arc<UiStore>) {
        let sessions = Arc::new(SessionStore::new(Arc::new(NullRepository)));
        let ui = Arc::new(UiStore::new());
        let nav = DocumentNavigator::new(
            Arc::new(MockRetrieval { reachable }),
            sessions.clone(),
            ui.clone(),
        );
        (nav, sessions, ui)
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title("annual_report.json"), "annual_report");
        assert_eq!(document_title("indices/manual.v2.json"), "manual.v2");
        assert_eq!(document_title("plain"), "plain");
    }

    #[tokio::test]
    async fn test_list_indices() {
        let (nav, _, ui) = navigator(true);
        assert_eq!(nav.list_indices().await.len(), 2);
        assert!(ui.notification().is_none());
    }

    #[tokio::test]
    async fn test_list_indices_failure_notifies() {
        let (nav, _, ui) = navigator(false);
        assert!(nav.list_indices().await.is_empty());
        assert_eq!(ui.notification().unwrap().level, NotificationLevel::Error);
    }

    #[test]
    fn test_resume_document_creates_active_session() {
        let (nav, sessions, _) = navigator(true);

        let id = nav.resume_document("annual_report.json");

        let session = sessions.active_session().unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.title, "annual_report");
        assert_eq!(session.document_refs, vec!["annual_report.json".to_string()]);
        assert_eq!(session.messages.len(), 1);
        assert!(!session.messages[0].is_user());
    }

    #[tokio::test]
    async fn test_open_and_close_tree_panel() {
        let (nav, _, ui) = navigator(true);

        assert!(nav.open_document_tree("manual.json").await);
        assert_eq!(ui.loaded_tree().unwrap().index_filename, "manual.json");

        nav.close_tree_panel();
        assert!(ui.loaded_tree().is_none());
    }

    #[tokio::test]
    async fn test_tree_fetch_failure_keeps_state() {
        let (nav, _, ui) = navigator(true);
        nav.open_document_tree("manual.json").await;
        let before = ui.loaded_tree();

        let failing = DocumentNavigator::new(
            Arc::new(MockRetrieval { reachable: false }),
            Arc::new(SessionStore::new(Arc::new(NullRepository))),
            ui.clone(),
        );
        assert!(!failing.open_document_tree("other.json").await);

        assert_eq!(ui.loaded_tree(), before);
        assert!(ui.notification().is_some());
    }

    #[test]
    fn test_open_citation() {
        let (nav, _, ui) = navigator(true);

        let url = nav.open_citation("Intro Report, p.12").unwrap();
        assert_eq!(url.as_deref(), Some("http://test/pdf/Intro Report.pdf#page=12"));
        assert_eq!(
            ui.viewer(),
            Some(ViewerTarget {
                file: "Intro Report.pdf".into(),
                page: 12
            })
        );

        assert_eq!(nav.open_citation("not a citation").unwrap(), None);
        assert_eq!(ui.viewer().unwrap().page, 12);
    }
}
