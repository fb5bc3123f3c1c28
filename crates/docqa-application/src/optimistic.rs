//! Optimistic append of a user message with a compensating rollback.

use docqa_core::Result;
use docqa_core::session::{ChatSession, Message, SessionStore};

/// An append that has been (or will be) shown before the server confirmed it.
///
/// Holds the precondition snapshot of the target thread, the forward action
/// (append `message`) and, through [`OptimisticAppend::compensate`], the
/// compensating action (restore the snapshot). Restoring overwrites the whole
/// thread, so anything else appended to the same session after the snapshot
/// was taken is discarded along with the optimistic message.
#[derive(Debug, Clone)]
pub struct OptimisticAppend {
    session_id: String,
    snapshot: Vec<Message>,
    message: Message,
}

impl OptimisticAppend {
    /// Captures the session's current thread as the rollback point.
    pub fn new(session: &ChatSession, message: Message) -> Self {
        Self {
            session_id: session.id.clone(),
            snapshot: session.messages.clone(),
            message,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.snapshot
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Forward action: appends the message to the captured session.
    pub fn apply(&self, sessions: &SessionStore) -> Result<()> {
        sessions.append_message(&self.session_id, self.message.clone())
    }

    /// Compensating action: restores the thread captured in [`Self::new`].
    pub fn compensate(self, sessions: &SessionStore) -> Result<()> {
        tracing::debug!(
            "[OptimisticAppend] rollback: session={}, restoring {} messages",
            self.session_id,
            self.snapshot.len()
        );
        sessions.replace_messages(&self.session_id, self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::session::SessionSnapshotRepository;
    use std::sync::Arc;

    struct NullRepository;

    impl SessionSnapshotRepository for NullRepository {
        fn load(&self) -> Result<Option<Vec<ChatSession>>> {
            Ok(None)
        }

        fn save(&self, _sessions: &[ChatSession]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_apply_then_compensate_restores_snapshot() {
        let store = SessionStore::new(Arc::new(NullRepository));
        let id = store.create("Doc", vec![], "Hello");
        let session = store.session(&id).unwrap();
        let before = session.messages.clone();

        let append = OptimisticAppend::new(&session, Message::user("Question"));
        append.apply(&store).unwrap();
        assert_eq!(store.messages(&id).unwrap().len(), 2);

        append.compensate(&store).unwrap();
        assert_eq!(store.messages(&id).unwrap(), before);
    }

    #[test]
    fn test_compensate_fails_for_deleted_session() {
        let store = SessionStore::new(Arc::new(NullRepository));
        let id = store.create("Doc", vec![], "Hello");
        let append = OptimisticAppend::new(&store.session(&id).unwrap(), Message::user("Q"));
        append.apply(&store).unwrap();
        store.delete(&id).unwrap();

        assert!(append.compensate(&store).unwrap_err().is_not_found());
    }
}
