//! Chat orchestrator.
//!
//! The only component that coordinates several stores: it reads the input
//! buffer, retrieval settings and tree selection, performs one request to the
//! retrieval service and writes the outcome back into the session and
//! performance stores.

use crate::optimistic::OptimisticAppend;
use docqa_core::DocqaError;
use docqa_core::performance::{PerformanceStore, QueryMetric};
use docqa_core::retrieval::{ChatRequest, NodeContext, RetrievalService};
use docqa_core::session::{Message, SessionStore};
use docqa_core::settings::SettingsStore;
use docqa_core::ui::{Notification, UiStore};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankInput,
    /// Another send is in flight (in any session).
    AlreadyGenerating,
    NoActiveSession,
}

/// Result of one [`ChatOrchestrator::send_message`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Skipped(SkipReason),
    /// The answer was appended to the session the question was asked in.
    Committed {
        session_id: String,
        message_id: String,
    },
    /// The answer arrived after its session had been deleted.
    Discarded { session_id: String },
    /// The request failed and the thread was restored to its pre-send state.
    RolledBack { session_id: String, error: DocqaError },
}

/// Drives the send-message cycle.
///
/// `is_generating` is a single flag shared by all sessions: while any
/// request is in flight, every further send is skipped.
pub struct ChatOrchestrator {
    settings: Arc<SettingsStore>,
    ui: Arc<UiStore>,
    performance: Arc<PerformanceStore>,
    sessions: Arc<SessionStore>,
    service: Arc<dyn RetrievalService>,
    generating: watch::Sender<bool>,
}

impl ChatOrchestrator {
    pub fn new(
        settings: Arc<SettingsStore>,
        ui: Arc<UiStore>,
        performance: Arc<PerformanceStore>,
        sessions: Arc<SessionStore>,
        service: Arc<dyn RetrievalService>,
    ) -> Self {
        let (generating, _) = watch::channel(false);
        Self {
            settings,
            ui,
            performance,
            sessions,
            service,
            generating,
        }
    }

    pub fn is_generating(&self) -> bool {
        *self.generating.borrow()
    }

    pub fn subscribe_generating(&self) -> watch::Receiver<bool> {
        self.generating.subscribe()
    }

    /// Sends the input buffer as a question in the active session.
    ///
    /// The user message is shown immediately. On success the answer is
    /// appended to the session that was active when the send started, even
    /// if another session has been selected since. On failure the thread is
    /// restored to exactly what it was before the send and the error is
    /// surfaced as a notification. `is_generating` is reset in every case.
    ///
    /// Dropping the returned future before it settles rolls the thread back
    /// the same way a failed request does.
    pub async fn send_message(&self) -> SendOutcome {
        let input = self.ui.input();
        let question = input.trim();
        if question.is_empty() {
            return SendOutcome::Skipped(SkipReason::BlankInput);
        }

        let Some(_generating) = GeneratingGuard::try_acquire(&self.generating) else {
            tracing::debug!("[ChatOrchestrator] send skipped: a request is already in flight");
            return SendOutcome::Skipped(SkipReason::AlreadyGenerating);
        };

        let Some(session) = self.sessions.active_session() else {
            return SendOutcome::Skipped(SkipReason::NoActiveSession);
        };

        let append = OptimisticAppend::new(&session, Message::user(question));
        let session_id = append.session_id().to_string();
        let Some(pending) = PendingAppend::apply(append, &self.sessions) else {
            return SendOutcome::Skipped(SkipReason::NoActiveSession);
        };
        self.ui.clear_input();

        let settings = self.settings.settings();
        let node_context = self.ui.selected_node().map(NodeContext::from);
        let request = ChatRequest::new(question, session.document_refs, settings, node_context);

        tracing::info!(
            "[ChatOrchestrator] sending question: session={}, deep={}, node_context={}",
            session_id,
            settings.use_deep_traversal,
            request.node_context.is_some()
        );

        let started = Instant::now();
        match self.service.chat(request).await {
            Ok(response) => {
                let elapsed = started.elapsed().as_secs_f64();
                let tokens = response.context_token_count();
                let answer = response.into_message();
                let message_id = answer.id.clone();
                pending.commit();

                self.performance.record_query(QueryMetric::new(
                    elapsed,
                    tokens,
                    settings.use_deep_traversal,
                ));

                match self.sessions.append_message(&session_id, answer) {
                    Ok(()) => SendOutcome::Committed {
                        session_id,
                        message_id,
                    },
                    Err(e) => {
                        tracing::warn!(
                            "[ChatOrchestrator] answer dropped, session {} is gone: {}",
                            session_id,
                            e
                        );
                        SendOutcome::Discarded { session_id }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    "[ChatOrchestrator] request failed for session {}: {}",
                    session_id,
                    error
                );
                pending.rollback();
                self.ui
                    .notify(Notification::error(format!("Failed to get an answer: {error}")));
                SendOutcome::RolledBack { session_id, error }
            }
        }
    }
}

/// An applied optimistic append awaiting the server's answer.
///
/// Unless [`PendingAppend::commit`] is called, the append is compensated
/// when the guard goes away, including when the send future is dropped.
struct PendingAppend<'a> {
    append: Option<OptimisticAppend>,
    sessions: &'a SessionStore,
}

impl<'a> PendingAppend<'a> {
    /// Runs the forward action. `None` when the session no longer exists.
    fn apply(append: OptimisticAppend, sessions: &'a SessionStore) -> Option<Self> {
        append.apply(sessions).ok()?;
        Some(Self {
            append: Some(append),
            sessions,
        })
    }

    /// Keeps the appended message.
    fn commit(mut self) {
        self.append = None;
    }

    fn rollback(mut self) {
        self.compensate();
    }

    fn compensate(&mut self) {
        if let Some(append) = self.append.take() {
            if let Err(e) = append.compensate(self.sessions) {
                tracing::warn!("[ChatOrchestrator] rollback skipped: {}", e);
            }
        }
    }
}

impl Drop for PendingAppend<'_> {
    fn drop(&mut self) {
        if self.append.is_some() {
            tracing::debug!("[ChatOrchestrator] send cancelled before settling");
            self.compensate();
        }
    }
}

/// Holds `is_generating == true`; dropping it resets the flag.
struct GeneratingGuard<'a> {
    flag: &'a watch::Sender<bool>,
}

impl<'a> GeneratingGuard<'a> {
    /// Atomic test-and-set: succeeds only if the flag was clear.
    fn try_acquire(flag: &'a watch::Sender<bool>) -> Option<Self> {
        let acquired = flag.send_if_modified(|generating| {
            if *generating {
                false
            } else {
                *generating = true;
                true
            }
        });
        acquired.then_some(Self { flag })
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docqa_core::Result;
    use docqa_core::retrieval::ChatResponse;
    use docqa_core::session::{ChatSession, SessionSnapshotRepository, TraversalInfo};
    use docqa_core::ui::{ClickModifiers, DocumentTree, NotificationLevel, TreeNode};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct NullRepository;

    impl SessionSnapshotRepository for NullRepository {
        fn load(&self) -> Result<Option<Vec<ChatSession>>> {
            Ok(None)
        }

        fn save(&self, _sessions: &[ChatSession]) -> Result<()> {
            Ok(())
        }
    }

    /// Pauses a request until the test releases it.
    #[derive(Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    /// Retrieval double answering from a script and recording requests.
    #[derive(Default)]
    struct ScriptedRetrieval {
        responses: Mutex<VecDeque<Result<ChatResponse>>>,
        requests: Mutex<Vec<ChatRequest>>,
        gate: Option<Gate>,
    }

    impl ScriptedRetrieval {
        fn answering(responses: Vec<Result<ChatResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        fn gated(responses: Vec<Result<ChatResponse>>) -> Self {
            Self {
                gate: Some(Gate::default()),
                ..Self::answering(responses)
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }

        async fn wait_until_in_flight(&self) {
            self.gate.as_ref().unwrap().entered.notified().await;
        }

        fn release(&self) {
            self.gate.as_ref().unwrap().release.notify_one();
        }
    }

    #[async_trait]
    impl RetrievalService for ScriptedRetrieval {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(DocqaError::internal("no scripted response")))
        }

        async fn fetch_tree(&self, index_filename: &str) -> Result<DocumentTree> {
            Err(DocqaError::not_found("DocumentTree", index_filename))
        }

        async fn list_indices(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn document_url(&self, file: &str, page: u32) -> Result<String> {
            Ok(format!("http://test/pdf/{file}#page={page}"))
        }
    }

    struct Harness {
        orchestrator: ChatOrchestrator,
        settings: Arc<SettingsStore>,
        ui: Arc<UiStore>,
        performance: Arc<PerformanceStore>,
        sessions: Arc<SessionStore>,
        service: Arc<ScriptedRetrieval>,
    }

    fn harness(service: ScriptedRetrieval) -> Harness {
        let settings = Arc::new(SettingsStore::default());
        let ui = Arc::new(UiStore::new());
        let performance = Arc::new(PerformanceStore::new());
        let sessions = Arc::new(SessionStore::new(Arc::new(NullRepository)));
        let service = Arc::new(service);
        let orchestrator = ChatOrchestrator::new(
            settings.clone(),
            ui.clone(),
            performance.clone(),
            sessions.clone(),
            service.clone(),
        );
        Harness {
            orchestrator,
            settings,
            ui,
            performance,
            sessions,
            service,
        }
    }

    fn answer(text: &str) -> ChatResponse {
        ChatResponse {
            answer: text.to_string(),
            ..Default::default()
        }
    }

    fn tree() -> DocumentTree {
        DocumentTree {
            document_name: "Manual".into(),
            tree: TreeNode {
                id: "root".into(),
                title: "Manual".into(),
                summary: None,
                page_ref: None,
                children: vec![TreeNode {
                    id: "install".into(),
                    title: "Installation".into(),
                    summary: Some("How to install".into()),
                    page_ref: Some("7".into()),
                    children: vec![],
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_skipped() {
        let h = harness(ScriptedRetrieval::default());
        h.sessions.create("Doc", vec!["doc.json".into()], "Hi");
        h.ui.set_input("   \n");

        let outcome = h.orchestrator.send_message().await;

        assert_eq!(outcome, SendOutcome::Skipped(SkipReason::BlankInput));
        assert!(h.service.requests().is_empty());
        assert!(!h.orchestrator.is_generating());
    }

    #[tokio::test]
    async fn test_no_active_session_is_skipped() {
        let h = harness(ScriptedRetrieval::default());
        h.ui.set_input("Question");

        let outcome = h.orchestrator.send_message().await;

        assert_eq!(outcome, SendOutcome::Skipped(SkipReason::NoActiveSession));
        assert_eq!(h.ui.input(), "Question");
        assert!(!h.orchestrator.is_generating());
    }

    #[tokio::test]
    async fn test_successful_send_commits_and_records_metric() {
        let response = ChatResponse {
            answer: "It takes five minutes.".into(),
            citations: Some(vec!["Manual, p.7".into()]),
            traversal_info: Some(TraversalInfo {
                used_deep_traversal: true,
                total_tokens: 900,
                ..Default::default()
            }),
            hallucination_warning: Some(true),
            ..Default::default()
        };
        let h = harness(ScriptedRetrieval::answering(vec![Ok(response)]));
        let id = h.sessions.create("Manual", vec!["manual.json".into()], "Hi");
        h.ui.set_input("  How long does installing take?  ");

        let outcome = h.orchestrator.send_message().await;

        let SendOutcome::Committed { session_id, message_id } = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert_eq!(session_id, id);

        let thread = h.sessions.messages(&id).unwrap();
        assert_eq!(thread.len(), 3);
        assert!(thread[1].is_user());
        assert_eq!(thread[1].content, "How long does installing take?");
        assert_eq!(thread[2].id, message_id);
        assert_eq!(thread[2].citations(), ["Manual, p.7".to_string()]);
        assert!(thread[2].warning);

        assert_eq!(h.ui.input(), "");
        assert!(!h.orchestrator.is_generating());

        let request = &h.service.requests()[0];
        assert_eq!(request.question, "How long does installing take?");
        assert_eq!(request.index_filenames, vec!["manual.json".to_string()]);
        assert_eq!(request.max_depth, 5);
        assert!(request.node_context.is_none());

        let agg = h.performance.aggregate();
        assert_eq!(agg.total_queries, 1);
        assert!((agg.avg_context_size - 900.0).abs() < 1e-9);
        assert!((agg.deep_traversal_usage_percent - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_traversal_info_counts_zero_tokens() {
        let h = harness(ScriptedRetrieval::answering(vec![Ok(answer("Yes."))]));
        h.settings.set_deep_traversal(false);
        h.sessions.create("Doc", vec![], "Hi");
        h.ui.set_input("Is it?");

        h.orchestrator.send_message().await;

        let history = h.performance.snapshot().queries_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].context_token_count, 0);
        assert!(!history[0].used_deep_traversal);
        assert!(history[0].response_time_seconds >= 0.0);
    }

    #[tokio::test]
    async fn test_selected_node_is_attached_as_context() {
        let h = harness(ScriptedRetrieval::answering(vec![Ok(answer("Ok."))]));
        h.sessions.create("Manual", vec!["manual.json".into()], "Hi");
        h.ui.load_tree("manual.json", tree());
        h.ui.click_node("install", ClickModifiers::SECONDARY);

        h.orchestrator.send_message().await;

        let request = &h.service.requests()[0];
        assert!(request.question.contains("Installation"));
        let context = request.node_context.as_ref().unwrap();
        assert_eq!(context.id, "install");
        assert_eq!(context.title, "Installation");
        assert_eq!(context.page_ref.as_deref(), Some("7"));
        assert_eq!(context.summary.as_deref(), Some("How to install"));
    }

    #[tokio::test]
    async fn test_failed_send_restores_exact_thread() {
        let h = harness(ScriptedRetrieval::answering(vec![Err(DocqaError::network(
            Some(502),
            "bad gateway",
            true,
        ))]));
        let id = h.sessions.create("Doc", vec![], "Hi");
        h.sessions
            .append_message(&id, Message::user("Earlier question"))
            .unwrap();
        let before = h.sessions.messages(&id).unwrap();
        h.ui.set_input("Will this fail?");

        let outcome = h.orchestrator.send_message().await;

        assert!(matches!(
            outcome,
            SendOutcome::RolledBack { ref error, .. } if error.is_retryable()
        ));
        assert_eq!(h.sessions.messages(&id).unwrap(), before);
        assert!(!h.orchestrator.is_generating());
        assert_eq!(h.performance.aggregate().total_queries, 0);

        let notification = h.ui.notification().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_concurrent_send_is_skipped_while_generating() {
        let h = harness(ScriptedRetrieval::gated(vec![Ok(answer("First."))]));
        let id = h.sessions.create("Doc", vec![], "Hi");
        let other = h.sessions.create("Other", vec![], "Hi");
        h.sessions.select(&id).unwrap();
        h.ui.set_input("First question");

        let (first, second) = tokio::join!(h.orchestrator.send_message(), async {
            h.service.wait_until_in_flight().await;
            assert!(h.orchestrator.is_generating());
            // The flag is global: a different session is blocked too
            h.sessions.select(&other).unwrap();
            h.ui.set_input("Second question");
            let second = h.orchestrator.send_message().await;
            h.service.release();
            second
        });

        assert!(matches!(first, SendOutcome::Committed { .. }));
        assert_eq!(second, SendOutcome::Skipped(SkipReason::AlreadyGenerating));
        assert_eq!(h.service.requests().len(), 1);
        assert_eq!(h.ui.input(), "Second question");
        assert_eq!(h.sessions.messages(&other).unwrap().len(), 1);
        assert_eq!(h.sessions.messages(&id).unwrap().len(), 3);
        assert!(!h.orchestrator.is_generating());
    }

    #[tokio::test]
    async fn test_answer_lands_in_original_session_after_switch() {
        let h = harness(ScriptedRetrieval::gated(vec![Ok(answer("For the first."))]));
        let first = h.sessions.create("First", vec![], "Hi");
        let second = h.sessions.create("Second", vec![], "Hi");
        h.sessions.select(&first).unwrap();
        h.ui.set_input("Question");

        let (outcome, _) = tokio::join!(h.orchestrator.send_message(), async {
            h.service.wait_until_in_flight().await;
            h.sessions.select(&second).unwrap();
            h.service.release();
        });

        assert!(matches!(
            outcome,
            SendOutcome::Committed { ref session_id, .. } if *session_id == first
        ));
        assert_eq!(h.sessions.active_session_id(), Some(second.clone()));
        let first_thread = h.sessions.messages(&first).unwrap();
        assert_eq!(first_thread.last().unwrap().content, "For the first.");
        assert_eq!(h.sessions.messages(&second).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_mutations_made_during_request() {
        let h = harness(ScriptedRetrieval::gated(vec![Err(DocqaError::service("boom"))]));
        let id = h.sessions.create("Doc", vec![], "Hi");
        let before = h.sessions.messages(&id).unwrap();
        h.ui.set_input("Question");

        let (outcome, _) = tokio::join!(h.orchestrator.send_message(), async {
            h.service.wait_until_in_flight().await;
            h.sessions
                .append_message(&id, Message::assistant("Landed mid-request"))
                .unwrap();
            h.service.release();
        });

        assert!(matches!(outcome, SendOutcome::RolledBack { .. }));
        let after = h.sessions.messages(&id).unwrap();
        assert_eq!(after, before);
        assert!(after.iter().all(|m| m.content != "Landed mid-request"));
    }

    #[tokio::test]
    async fn test_answer_for_deleted_session_is_discarded() {
        let h = harness(ScriptedRetrieval::gated(vec![Ok(answer("Too late."))]));
        let id = h.sessions.create("Doc", vec![], "Hi");
        h.ui.set_input("Question");

        let (outcome, _) = tokio::join!(h.orchestrator.send_message(), async {
            h.service.wait_until_in_flight().await;
            h.sessions.delete(&id).unwrap();
            h.service.release();
        });

        assert_eq!(outcome, SendOutcome::Discarded { session_id: id });
        assert!(h.sessions.sessions().is_empty());
        assert!(!h.orchestrator.is_generating());
    }

    #[tokio::test]
    async fn test_generating_flag_is_observable() {
        let h = harness(ScriptedRetrieval::gated(vec![Ok(answer("Done."))]));
        h.sessions.create("Doc", vec![], "Hi");
        h.ui.set_input("Question");
        let mut rx = h.orchestrator.subscribe_generating();

        let (_, seen) = tokio::join!(h.orchestrator.send_message(), async {
            h.service.wait_until_in_flight().await;
            let seen = *rx.borrow_and_update();
            h.service.release();
            seen
        });

        assert!(seen);
        assert!(!*rx.borrow());
    }

    #[tokio::test]
    async fn test_dropped_send_rolls_back_thread() {
        let h = harness(ScriptedRetrieval::gated(vec![Ok(answer("Too late."))]));
        let id = h.sessions.create("Doc", vec![], "Hi");
        let before = h.sessions.messages(&id).unwrap();
        h.ui.set_input("Question");

        tokio::select! {
            biased;
            outcome = h.orchestrator.send_message() => panic!("send settled: {outcome:?}"),
            _ = h.service.wait_until_in_flight() => {}
        }

        assert_eq!(h.sessions.messages(&id).unwrap(), before);
        assert!(!h.orchestrator.is_generating());
        assert_eq!(h.performance.aggregate().total_queries, 0);
    }
}
