//! Terminal rendering of store state.

use colored::Colorize;
use docqa_core::performance::PerformanceAggregate;
use docqa_core::session::{ChatSession, Message};
use docqa_core::settings::RetrievalSettings;
use docqa_core::ui::{Notification, NotificationLevel, TreeNode, UiState};

pub fn notification(notification: &Notification) {
    match notification.level {
        NotificationLevel::Info => println!("{}", notification.message.bright_black()),
        NotificationLevel::Error => eprintln!("{}", notification.message.red()),
    }
}

pub fn message(message: &Message) {
    if message.is_user() {
        println!("{}", format!("> {}", message.content).green());
        return;
    }

    for line in message.content.lines() {
        println!("{}", line.bright_blue());
    }
    if message.warning {
        println!(
            "{}",
            "⚠ This answer may not be fully supported by the document.".yellow()
        );
    }
    for (i, citation) in message.citations().iter().enumerate() {
        println!("{}", format!("  [{}] {}", i + 1, citation).bright_black());
    }
    if let Some(info) = &message.traversal_info {
        let mode = if info.used_deep_traversal {
            "deep traversal"
        } else {
            "flat retrieval"
        };
        println!(
            "{}",
            format!(
                "  ({}: {} nodes visited, {} selected, {} tokens)",
                mode,
                info.distinct_visited(),
                info.nodes_selected.len(),
                info.total_tokens
            )
            .bright_black()
        );
    }
    println!();
}

pub fn session_line(session: &ChatSession, active: bool) {
    let marker = if active { "*" } else { " " };
    println!(
        "{} {}  {}  {}  ({} messages)",
        marker,
        session.id.bright_black(),
        session.title.bold(),
        session.created_at.format("%Y-%m-%d %H:%M"),
        session.messages.len()
    );
}

/// Prints the loaded tree, descending only into expanded nodes.
pub fn tree(state: &UiState) {
    let Some(loaded) = &state.tree else {
        println!("{}", "No document structure loaded.".bright_black());
        return;
    };
    println!("{}", loaded.document.document_name.bright_magenta().bold());
    let selected = state.selected_node.as_ref().map(|n| n.id.as_str());
    for child in &loaded.document.tree.children {
        tree_node(child, state, selected, 1);
    }
}

fn tree_node(node: &TreeNode, state: &UiState, selected: Option<&str>, depth: usize) {
    let expanded = state.expanded_nodes.contains(&node.id);
    let marker = match (node.has_children(), expanded) {
        (false, _) => " ",
        (true, false) => "▸",
        (true, true) => "▾",
    };
    let page = node
        .page_ref
        .as_deref()
        .map(|p| format!(" (p.{p})"))
        .unwrap_or_default();
    let line = format!(
        "{}{} {}{}  [{}]",
        "  ".repeat(depth),
        marker,
        node.title,
        page,
        node.id
    );
    if selected == Some(node.id.as_str()) {
        println!("{}", line.bright_yellow().bold());
    } else {
        println!("{}", line);
    }

    if expanded {
        for child in &node.children {
            tree_node(child, state, selected, depth + 1);
        }
    }
}

pub fn settings(settings: &RetrievalSettings) {
    println!(
        "{}",
        format!(
            "deep={} depth={} branches={} domain={} lang={}",
            settings.use_deep_traversal,
            settings.max_depth,
            settings.max_branches,
            settings.domain_template,
            settings.language
        )
        .bright_black()
    );
}

pub fn stats(aggregate: &PerformanceAggregate) {
    println!("{}", "=== Performance ===".bright_magenta().bold());
    println!("Total queries:         {}", aggregate.total_queries);
    println!("Avg response time:     {:.2}s", aggregate.avg_response_time);
    println!("Avg context size:      {:.0} tokens", aggregate.avg_context_size);
    println!(
        "Deep traversal usage:  {:.1}% (last 50)",
        aggregate.deep_traversal_usage_percent
    );
}
