//! Session store: the durable conversation state.

use super::message::Message;
use super::model::ChatSession;
use super::repository::SessionSnapshotRepository;
use crate::error::{DocqaError, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// Observable state held by [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Sessions in creation order.
    pub sessions: Vec<ChatSession>,
    /// Always references an entry of `sessions` when set.
    pub active_session_id: Option<String>,
}

impl SessionState {
    fn find_mut(&mut self, session_id: &str) -> Result<&mut ChatSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| DocqaError::not_found("ChatSession", session_id))
    }
}

/// Holds every chat session and the active-session pointer.
///
/// `SessionStore` is responsible for:
/// - Creating, selecting and deleting sessions
/// - Appending messages and replacing a thread wholesale (rollback)
/// - Writing the full session list to its repository after every mutation
/// - Notifying subscribers synchronously on every change
///
/// Persistence is best-effort: a failed write is logged and the in-memory
/// state stays authoritative.
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    repository: Arc<dyn SessionSnapshotRepository>,
}

impl SessionStore {
    /// Creates a store and restores the previously persisted sessions.
    ///
    /// A snapshot that cannot be read or decoded is logged and treated as
    /// "no prior sessions".
    pub fn new(repository: Arc<dyn SessionSnapshotRepository>) -> Self {
        let sessions = match repository.load() {
            Ok(Some(sessions)) => {
                tracing::info!("[SessionStore] Restored {} session(s)", sessions.len());
                sessions
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "[SessionStore] Failed to restore sessions, starting empty: {}",
                    e
                );
                Vec::new()
            }
        };

        let (state, _) = watch::channel(SessionState {
            sessions,
            active_session_id: None,
        });

        Self { state, repository }
    }

    /// Returns a receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.state.borrow().sessions.clone()
    }

    pub fn session(&self, session_id: &str) -> Option<ChatSession> {
        self.state
            .borrow()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.state.borrow().active_session_id.clone()
    }

    pub fn active_session(&self) -> Option<ChatSession> {
        let id = self.active_session_id()?;
        self.session(&id)
    }

    /// Returns a copy of a session's thread.
    pub fn messages(&self, session_id: &str) -> Option<Vec<Message>> {
        self.state
            .borrow()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.messages.clone())
    }

    /// Creates a session, makes it active and returns its ID.
    pub fn create(
        &self,
        title: impl Into<String>,
        document_refs: Vec<String>,
        greeting: impl Into<String>,
    ) -> String {
        let session = ChatSession::new(title, document_refs, greeting);
        let session_id = session.id.clone();
        tracing::debug!(
            "[SessionStore] create: id={}, title={}",
            session.id,
            session.title
        );

        self.state.send_modify(|state| {
            state.sessions.push(session);
            state.active_session_id = Some(session_id.clone());
        });
        self.persist();

        session_id
    }

    /// Makes an existing session the active one.
    pub fn select(&self, session_id: &str) -> Result<()> {
        self.mutate(|state| {
            state.find_mut(session_id)?;
            state.active_session_id = Some(session_id.to_string());
            Ok(())
        })
    }

    /// Deletes a session. Clears the active pointer if it pointed at it.
    pub fn delete(&self, session_id: &str) -> Result<()> {
        self.mutate(|state| {
            let before = state.sessions.len();
            state.sessions.retain(|s| s.id != session_id);
            if state.sessions.len() == before {
                return Err(DocqaError::not_found("ChatSession", session_id));
            }
            if state.active_session_id.as_deref() == Some(session_id) {
                state.active_session_id = None;
            }
            Ok(())
        })
    }

    pub fn append_message(&self, session_id: &str, message: Message) -> Result<()> {
        self.mutate(|state| {
            state.find_mut(session_id)?.messages.push(message);
            Ok(())
        })
    }

    /// Replaces a session's whole thread; used to roll back optimistic appends.
    pub fn replace_messages(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        self.mutate(|state| {
            state.find_mut(session_id)?.messages = messages;
            Ok(())
        })
    }

    /// Applies `f` and, if it succeeds, notifies subscribers and persists.
    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionState) -> Result<()>,
    {
        let mut result = Err(DocqaError::internal("session mutation did not run"));
        self.state.send_if_modified(|state| {
            result = f(state);
            result.is_ok()
        });

        if result.is_ok() {
            self.persist();
        }
        result
    }

    fn persist(&self) {
        let sessions = self.state.borrow().sessions.clone();
        if let Err(e) = self.repository.save(&sessions) {
            tracing::warn!("[SessionStore] Failed to persist sessions: {}", e);
        }
    }
}
