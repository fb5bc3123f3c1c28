//! Wiring of stores, services and use cases for one CLI run.

use anyhow::Result;
use docqa_application::{ChatOrchestrator, DocumentNavigator};
use docqa_core::config::ClientConfig;
use docqa_core::performance::PerformanceStore;
use docqa_core::retrieval::RetrievalService;
use docqa_core::session::SessionStore;
use docqa_core::settings::SettingsStore;
use docqa_core::ui::UiStore;
use docqa_infrastructure::{DocqaPaths, JsonSessionRepository};
use docqa_interaction::HttpRetrievalClient;
use std::sync::Arc;

pub struct App {
    pub settings: Arc<SettingsStore>,
    pub ui: Arc<UiStore>,
    pub performance: Arc<PerformanceStore>,
    pub sessions: Arc<SessionStore>,
    pub orchestrator: ChatOrchestrator,
    pub navigator: DocumentNavigator,
}

impl App {
    pub fn bootstrap(config: &ClientConfig) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => DocqaPaths::data_dir()?,
        };
        tracing::info!(
            "[Bootstrap] api={}, data_dir={}",
            config.api_base_url,
            data_dir.display()
        );

        let service: Arc<dyn RetrievalService> =
            Arc::new(HttpRetrievalClient::from_config(config)?);
        let settings = Arc::new(SettingsStore::new(config.defaults));
        let ui = Arc::new(UiStore::new());
        let performance = Arc::new(PerformanceStore::new());
        let sessions = Arc::new(SessionStore::new(Arc::new(JsonSessionRepository::new(
            data_dir,
        ))));

        let orchestrator = ChatOrchestrator::new(
            settings.clone(),
            ui.clone(),
            performance.clone(),
            sessions.clone(),
            service.clone(),
        );
        let navigator = DocumentNavigator::new(service, sessions.clone(), ui.clone());

        Ok(Self {
            settings,
            ui,
            performance,
            sessions,
            orchestrator,
            navigator,
        })
    }

    /// Prints and clears the pending notification, if any.
    pub fn flush_notification(&self) {
        if let Some(notification) = self.ui.notification() {
            crate::render::notification(&notification);
            self.ui.dismiss_notification();
        }
    }
}
