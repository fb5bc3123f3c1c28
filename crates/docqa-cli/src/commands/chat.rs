//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::repl_command::{COMMANDS, ReplCommand};
use crate::app::App;
use crate::render;
use docqa_application::{SendOutcome, SkipReason};
use docqa_core::ui::ClickModifiers;

/// Rustyline helper completing and highlighting slash commands.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// Picks the session to chat in: an explicit session, a freshly resumed
/// index, or the most recent existing session.
fn activate_session(app: &App, index: Option<&str>, session: Option<&str>) -> Result<()> {
    if let Some(session_id) = session {
        app.sessions.select(session_id)?;
        return Ok(());
    }
    if let Some(index) = index {
        app.navigator.resume_document(index);
        return Ok(());
    }
    match app.sessions.sessions().last() {
        Some(latest) => app.sessions.select(&latest.id)?,
        None => bail!("No sessions yet. Start one with `docqa chat --index <index>`."),
    }
    Ok(())
}

/// Loads the tree panel for the active session's first document.
async fn load_active_tree(app: &App) {
    let Some(index) = app
        .sessions
        .active_session()
        .and_then(|s| s.document_refs.first().cloned())
    else {
        app.navigator.close_tree_panel();
        return;
    };
    if !app.navigator.open_document_tree(&index).await {
        app.flush_notification();
    }
}

fn print_thread(app: &App) {
    let Some(session) = app.sessions.active_session() else {
        return;
    };
    println!("{}", format!("=== {} ===", session.title).bright_magenta().bold());
    for message in &session.messages {
        render::message(message);
    }
}

fn print_help() {
    let lines = [
        ("/expand <node-id>", "show or hide a section's children"),
        ("/select <node-id>", "ask about one section"),
        ("/deselect", "clear the selected section"),
        ("/cite <document>, p.<page>", "open a citation in the viewer"),
        ("/deep on|off", "toggle deep traversal"),
        ("/depth <n>", "maximum traversal depth (1-10)"),
        ("/branches <n>", "branches explored per level (1-10)"),
        ("/domain <name>", "general, medical, legal, technical, academic"),
        ("/lang ko|en", "answer language"),
        ("/stats", "query performance"),
        ("/sessions", "list sessions"),
        ("/switch <session-id>", "change the active session"),
        ("/delete <session-id>", "delete a session"),
        ("/quit", "leave"),
    ];
    for (cmd, description) in lines {
        println!("  {:<30} {}", cmd.bright_cyan(), description.bright_black());
    }
}

async fn ask(app: &App, question: String) {
    app.ui.set_input(question);
    println!("{}", "Thinking...".bright_black());
    match app.orchestrator.send_message().await {
        SendOutcome::Committed {
            session_id,
            message_id,
        } => {
            let answer = app
                .sessions
                .messages(&session_id)
                .and_then(|messages| messages.into_iter().find(|m| m.id == message_id));
            if let Some(answer) = answer {
                render::message(&answer);
            }
        }
        SendOutcome::Discarded { .. } => {
            println!("{}", "The session was deleted before the answer arrived.".yellow());
        }
        SendOutcome::RolledBack { .. } => app.flush_notification(),
        SendOutcome::Skipped(SkipReason::NoActiveSession) => {
            println!("{}", "No active session. Use /switch <session-id>.".yellow());
        }
        SendOutcome::Skipped(reason) => {
            tracing::debug!("[Chat] send skipped: {:?}", reason);
        }
    }
}

/// Applies one command. Returns `false` when the REPL should stop.
async fn handle(app: &App, command: ReplCommand) -> Result<bool> {
    match command {
        ReplCommand::Ask(question) => ask(app, question).await,
        ReplCommand::Expand(node_id) => {
            if app.ui.click_node(&node_id, ClickModifiers::NONE).is_empty() {
                println!("{}", format!("Nothing to expand at '{node_id}'.").yellow());
            }
            render::tree(&app.ui.snapshot());
        }
        ReplCommand::Select(node_id) => {
            if app.ui.click_node(&node_id, ClickModifiers::SECONDARY).is_empty() {
                println!("{}", format!("No section '{node_id}' in this document.").yellow());
            } else {
                println!("{}", format!("Draft: {}", app.ui.input()).bright_black());
                println!(
                    "{}",
                    "Press Enter to send the draft, or type your own question.".bright_black()
                );
            }
        }
        ReplCommand::Deselect => app.ui.deselect_node(),
        ReplCommand::Cite(citation) => match app.navigator.open_citation(&citation)? {
            Some(url) => println!("{}", format!("Open: {url}").bright_cyan()),
            None => tracing::debug!("[Chat] ignoring unresolvable citation: {}", citation),
        },
        ReplCommand::Deep(enabled) => {
            app.settings.set_deep_traversal(enabled);
            render::settings(&app.settings.settings());
        }
        ReplCommand::Depth(depth) => {
            app.settings.set_max_depth(depth);
            render::settings(&app.settings.settings());
        }
        ReplCommand::Branches(branches) => {
            app.settings.set_max_branches(branches);
            render::settings(&app.settings.settings());
        }
        ReplCommand::Domain(domain) => {
            app.settings.set_domain_template(domain);
            render::settings(&app.settings.settings());
        }
        ReplCommand::Lang(language) => {
            app.settings.set_language(language);
            render::settings(&app.settings.settings());
        }
        ReplCommand::Stats => render::stats(&app.performance.aggregate()),
        ReplCommand::Sessions => super::sessions(app)?,
        ReplCommand::Switch(session_id) => {
            app.sessions.select(&session_id)?;
            load_active_tree(app).await;
            print_thread(app);
        }
        ReplCommand::Delete(session_id) => {
            app.sessions.delete(&session_id)?;
            println!("{}", "Session deleted.".bright_black());
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Invalid(message) => println!("{}", message.yellow()),
    }
    Ok(true)
}

pub async fn run(app: &App, index: Option<&str>, session: Option<&str>) -> Result<()> {
    activate_session(app, index, session)?;
    load_active_tree(app).await;

    let mut rl: Editor<ChatHelper, rustyline::history::DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== docqa ===".bright_magenta().bold());
    println!("{}", "Ask a question, or type /help for commands.".bright_black());
    render::settings(&app.settings.settings());
    println!();
    print_thread(app);

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                // An empty line sends whatever is drafted in the input buffer
                let command = if trimmed.is_empty() {
                    let draft = app.ui.input();
                    if draft.trim().is_empty() {
                        continue;
                    }
                    ReplCommand::Ask(draft)
                } else {
                    let _ = rl.add_history_entry(trimmed);
                    ReplCommand::parse(trimmed)
                };

                match handle(app, command).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("{}", format!("Error: {e}").red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
