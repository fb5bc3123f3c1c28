pub mod chat;
pub mod repl_command;

use crate::app::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;

pub async fn indices(app: &App) -> Result<()> {
    let indices = app.navigator.list_indices().await;
    app.flush_notification();
    if indices.is_empty() {
        println!("{}", "No indexed documents.".bright_black());
    }
    for index in indices {
        println!("{index}");
    }
    Ok(())
}

pub async fn tree(app: &App, index: &str) -> Result<()> {
    if !app.navigator.open_document_tree(index).await {
        app.flush_notification();
        return Ok(());
    }
    // Expand everything for a one-shot listing
    if let Some(loaded) = app.ui.loaded_tree() {
        expand_all(app, &loaded.document.tree);
    }
    render::tree(&app.ui.snapshot());
    Ok(())
}

fn expand_all(app: &App, node: &docqa_core::ui::TreeNode) {
    for child in &node.children {
        if child.has_children() {
            app.ui.toggle_expansion(&child.id);
            expand_all(app, child);
        }
    }
}

pub fn sessions(app: &App) -> Result<()> {
    let state = app.sessions.snapshot();
    if state.sessions.is_empty() {
        println!("{}", "No sessions yet.".bright_black());
    }
    for session in &state.sessions {
        let active = state.active_session_id.as_deref() == Some(session.id.as_str());
        render::session_line(session, active);
    }
    Ok(())
}
