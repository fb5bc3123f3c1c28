//! Translation of tree-node clicks into explicit intents.
//!
//! The physical gesture is overloaded (plain click navigates, shift-click
//! pins the section to the next question). Dispatch stays overloaded here;
//! each intent has its own handler on the UI store.

use super::tree::TreeNode;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    /// Shift (or the platform's equivalent) was held.
    pub secondary: bool,
}

impl ClickModifiers {
    pub const NONE: ClickModifiers = ClickModifiers { secondary: false };
    pub const SECONDARY: ClickModifiers = ClickModifiers { secondary: true };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeIntent {
    /// Show or hide the node's subtree.
    ToggleExpansion { node_id: String },
    /// Make the node the question's context and draft a question about it.
    SelectNodeForQuery { node_id: String },
}

/// Intents produced by one click on `node`, in the order they apply.
///
/// A shift-click on a node with children both toggles it and selects it; a
/// plain click on a leaf produces nothing.
pub fn intents_for_click(node: &TreeNode, modifiers: ClickModifiers) -> Vec<TreeIntent> {
    let mut intents = Vec::with_capacity(2);
    if node.has_children() {
        intents.push(TreeIntent::ToggleExpansion {
            node_id: node.id.clone(),
        });
    }
    if modifiers.secondary {
        intents.push(TreeIntent::SelectNodeForQuery {
            node_id: node.id.clone(),
        });
    }
    intents
}

/// Question drafted into the input buffer when a section is selected.
pub fn question_template(node: &TreeNode) -> String {
    match node.page_ref.as_deref() {
        Some(page) => format!(
            "Please explain the section \"{}\" (p.{}) in detail.",
            node.title, page
        ),
        None => format!("Please explain the section \"{}\" in detail.", node.title),
    }
}
