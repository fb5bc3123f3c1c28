//! Transient interaction state: panels, section tree navigation, citation
//! resolution and the document viewer target.

pub mod citation;
pub mod intent;
mod notification;
mod store;
pub mod tree;

pub use citation::{CitationTarget, DOCUMENT_FILE_EXTENSION, resolve_citation};
pub use intent::{ClickModifiers, TreeIntent, intents_for_click, question_template};
pub use notification::{Notification, NotificationLevel};
pub use store::{LoadedTree, SelectedNode, UiState, UiStore, ViewerTarget};
pub use tree::{DocumentTree, TreeNode};
