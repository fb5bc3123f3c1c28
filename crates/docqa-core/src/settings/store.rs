//! Settings store: retrieval configuration as a plain value container.

use super::model::{DomainProfile, ResponseLanguage, RetrievalSettings};
use tokio::sync::watch;

/// Holds the retrieval configuration sent with every question.
///
/// No side effects beyond notifying subscribers.
pub struct SettingsStore {
    state: watch::Sender<RetrievalSettings>,
    defaults: RetrievalSettings,
}

impl SettingsStore {
    /// Creates a store seeded with `defaults`; `reset` returns to them.
    pub fn new(defaults: RetrievalSettings) -> Self {
        let defaults = defaults.clamped();
        let (state, _) = watch::channel(defaults);
        Self { state, defaults }
    }

    pub fn subscribe(&self) -> watch::Receiver<RetrievalSettings> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> RetrievalSettings {
        *self.state.borrow()
    }

    pub fn set_deep_traversal(&self, enabled: bool) {
        self.state.send_modify(|s| s.use_deep_traversal = enabled);
    }

    pub fn set_max_depth(&self, depth: u32) {
        self.state.send_modify(|s| {
            s.max_depth = depth;
            *s = s.clamped();
        });
    }

    pub fn set_max_branches(&self, branches: u32) {
        self.state.send_modify(|s| {
            s.max_branches = branches;
            *s = s.clamped();
        });
    }

    pub fn set_domain_template(&self, domain: DomainProfile) {
        self.state.send_modify(|s| s.domain_template = domain);
    }

    pub fn set_language(&self, language: ResponseLanguage) {
        self.state.send_modify(|s| s.language = language);
    }

    pub fn reset(&self) {
        self.state.send_replace(self.defaults);
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(RetrievalSettings::default())
    }
}
