//! UI store: transient interaction state.

use super::citation::{CitationTarget, resolve_citation};
use super::intent::{ClickModifiers, TreeIntent, intents_for_click, question_template};
use super::notification::Notification;
use super::tree::{DocumentTree, TreeNode};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

/// The section tree currently shown in the tree panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTree {
    pub index_filename: String,
    pub document: DocumentTree,
}

/// The tree section pinned as context for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNode {
    pub id: String,
    pub title: String,
    pub page_ref: Option<String>,
    pub summary: Option<String>,
}

impl From<&TreeNode> for SelectedNode {
    fn from(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            page_ref: node.page_ref.clone(),
            summary: node.summary.clone(),
        }
    }
}

/// Where the document viewer is pointed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerTarget {
    /// Source file name, extension included
    pub file: String,
    /// 1-based page number
    pub page: u32,
}

/// Observable state held by [`UiStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub sidebar_open: bool,
    pub show_traversal_panel: bool,
    pub show_performance_panel: bool,
    /// `None` while the tree panel is closed.
    pub tree: Option<LoadedTree>,
    /// IDs of expanded nodes. Replaced, never mutated in place.
    pub expanded_nodes: Arc<BTreeSet<String>>,
    /// Always a node of `tree` when set.
    pub selected_node: Option<SelectedNode>,
    pub viewer: Option<ViewerTarget>,
    /// Message whose "copied" feedback is showing.
    pub copied_message_id: Option<String>,
    /// Question input buffer.
    pub input: String,
    pub notification: Option<Notification>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            show_traversal_panel: false,
            show_performance_panel: false,
            tree: None,
            expanded_nodes: Arc::new(BTreeSet::new()),
            selected_node: None,
            viewer: None,
            copied_message_id: None,
            input: String::new(),
            notification: None,
        }
    }
}

/// Holds transient interaction state and the tree/citation logic behind it.
pub struct UiStore {
    state: watch::Sender<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    // ============================================================================
    // Panels
    // ============================================================================

    pub fn toggle_sidebar(&self) {
        self.state.send_modify(|s| s.sidebar_open = !s.sidebar_open);
    }

    pub fn toggle_traversal_panel(&self) {
        self.state
            .send_modify(|s| s.show_traversal_panel = !s.show_traversal_panel);
    }

    pub fn toggle_performance_panel(&self) {
        self.state
            .send_modify(|s| s.show_performance_panel = !s.show_performance_panel);
    }

    // ============================================================================
    // Input buffer
    // ============================================================================

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.input = text);
    }

    pub fn clear_input(&self) {
        self.state.send_if_modified(|s| {
            if s.input.is_empty() {
                return false;
            }
            s.input.clear();
            true
        });
    }

    // ============================================================================
    // Section tree
    // ============================================================================

    /// Opens the tree panel on a document, discarding the previous tree,
    /// its expansion state and any selection.
    pub fn load_tree(&self, index_filename: impl Into<String>, document: DocumentTree) {
        let loaded = LoadedTree {
            index_filename: index_filename.into(),
            document,
        };
        tracing::debug!(
            "[UiStore] load_tree: index={}, nodes={}",
            loaded.index_filename,
            loaded.document.tree.node_count()
        );
        self.state.send_modify(|s| {
            s.tree = Some(loaded);
            s.expanded_nodes = Arc::new(BTreeSet::new());
            s.selected_node = None;
        });
    }

    pub fn close_tree(&self) {
        self.state.send_modify(|s| {
            s.tree = None;
            s.expanded_nodes = Arc::new(BTreeSet::new());
            s.selected_node = None;
        });
    }

    pub fn loaded_tree(&self) -> Option<LoadedTree> {
        self.state.borrow().tree.clone()
    }

    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.state.borrow().expanded_nodes.contains(node_id)
    }

    pub fn selected_node(&self) -> Option<SelectedNode> {
        self.state.borrow().selected_node.clone()
    }

    /// Handles a click on a tree node and returns the intents it produced.
    ///
    /// Clicks on IDs that are not part of the loaded tree are ignored.
    pub fn click_node(&self, node_id: &str, modifiers: ClickModifiers) -> Vec<TreeIntent> {
        let intents = {
            let state = self.state.borrow();
            match state.tree.as_ref().and_then(|t| t.document.tree.find(node_id)) {
                Some(node) => intents_for_click(node, modifiers),
                None => return Vec::new(),
            }
        };

        for intent in &intents {
            self.apply_intent(intent);
        }
        intents
    }

    /// Routes an intent to its handler. Returns whether state changed.
    pub fn apply_intent(&self, intent: &TreeIntent) -> bool {
        match intent {
            TreeIntent::ToggleExpansion { node_id } => self.toggle_expansion(node_id),
            TreeIntent::SelectNodeForQuery { node_id } => self.select_node_for_query(node_id),
        }
    }

    /// Shows or hides a node's subtree. Selection is untouched.
    pub fn toggle_expansion(&self, node_id: &str) -> bool {
        self.state.send_if_modified(|s| {
            let Some(node) = s.tree.as_ref().and_then(|t| t.document.tree.find(node_id)) else {
                return false;
            };
            if !node.has_children() {
                return false;
            }

            let mut expanded = BTreeSet::clone(&s.expanded_nodes);
            if !expanded.remove(node_id) {
                expanded.insert(node_id.to_string());
            }
            s.expanded_nodes = Arc::new(expanded);
            true
        })
    }

    /// Makes the node the sole selection and overwrites the input buffer
    /// with a question about it.
    pub fn select_node_for_query(&self, node_id: &str) -> bool {
        self.state.send_if_modified(|s| {
            let Some(node) = s.tree.as_ref().and_then(|t| t.document.tree.find(node_id)) else {
                return false;
            };
            let selected = SelectedNode::from(node);
            let draft = question_template(node);
            s.selected_node = Some(selected);
            s.input = draft;
            true
        })
    }

    /// Clears the selection only; expansion state is kept.
    pub fn deselect_node(&self) {
        self.state.send_if_modified(|s| s.selected_node.take().is_some());
    }

    // ============================================================================
    // Document viewer
    // ============================================================================

    /// Opens the viewer at the cited page; unresolvable citations change nothing.
    pub fn open_citation(&self, citation: &str) -> CitationTarget {
        let target = resolve_citation(citation);
        match &target {
            CitationTarget::Resolved { file, page } => self.open_viewer(file.clone(), *page),
            CitationTarget::Unresolvable => {
                tracing::debug!("[UiStore] Ignoring unresolvable citation: {:?}", citation);
            }
        }
        target
    }

    pub fn open_viewer(&self, file: impl Into<String>, page: u32) {
        let target = ViewerTarget {
            file: file.into(),
            page,
        };
        self.state.send_modify(|s| s.viewer = Some(target));
    }

    pub fn close_viewer(&self) {
        self.state.send_if_modified(|s| s.viewer.take().is_some());
    }

    pub fn viewer(&self) -> Option<ViewerTarget> {
        self.state.borrow().viewer.clone()
    }

    // ============================================================================
    // Feedback
    // ============================================================================

    pub fn mark_copied(&self, message_id: impl Into<String>) {
        let message_id = message_id.into();
        self.state
            .send_modify(|s| s.copied_message_id = Some(message_id));
    }

    pub fn clear_copied(&self) {
        self.state
            .send_if_modified(|s| s.copied_message_id.take().is_some());
    }

    pub fn notify(&self, notification: Notification) {
        self.state.send_modify(|s| s.notification = Some(notification));
    }

    pub fn dismiss_notification(&self) {
        self.state.send_if_modified(|s| s.notification.take().is_some());
    }

    pub fn notification(&self) -> Option<Notification> {
        self.state.borrow().notification.clone()
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}
