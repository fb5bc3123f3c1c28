//! Retrieval configuration: value types and the settings store.

mod model;
mod store;

pub use model::{
    DomainProfile, MAX_TRAVERSAL_BRANCHES, MAX_TRAVERSAL_DEPTH, MIN_TRAVERSAL_BRANCHES,
    MIN_TRAVERSAL_DEPTH, ResponseLanguage, RetrievalSettings,
};
pub use store::SettingsStore;
