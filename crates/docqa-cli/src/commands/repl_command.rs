//! Parsing of slash commands typed into the chat REPL.

use docqa_core::settings::{DomainProfile, ResponseLanguage};

pub const COMMANDS: &[&str] = &[
    "/expand", "/select", "/deselect", "/cite", "/deep", "/depth", "/branches", "/domain",
    "/lang", "/stats", "/sessions", "/switch", "/delete", "/help", "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: a question.
    Ask(String),
    Expand(String),
    Select(String),
    Deselect,
    Cite(String),
    Deep(bool),
    Depth(u32),
    Branches(u32),
    Domain(DomainProfile),
    Lang(ResponseLanguage),
    Stats,
    Sessions,
    Switch(String),
    Delete(String),
    Help,
    Quit,
    /// Slash command that could not be understood, with a usage hint.
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if !line.starts_with('/') {
            return Self::Ask(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let required = |build: fn(String) -> Self, usage: &str| {
            if arg.is_empty() {
                Self::Invalid(usage.to_string())
            } else {
                build(arg.to_string())
            }
        };

        match name {
            "/expand" => required(Self::Expand, "usage: /expand <node-id>"),
            "/select" => required(Self::Select, "usage: /select <node-id>"),
            "/deselect" => Self::Deselect,
            "/cite" => required(Self::Cite, "usage: /cite <document>, p.<page>"),
            "/deep" => match arg {
                "on" | "true" | "1" => Self::Deep(true),
                "off" | "false" | "0" => Self::Deep(false),
                _ => Self::Invalid("usage: /deep on|off".to_string()),
            },
            "/depth" => arg
                .parse()
                .map(Self::Depth)
                .unwrap_or_else(|_| Self::Invalid("usage: /depth <1-10>".to_string())),
            "/branches" => arg
                .parse()
                .map(Self::Branches)
                .unwrap_or_else(|_| Self::Invalid("usage: /branches <1-10>".to_string())),
            "/domain" => Self::Domain(DomainProfile::from_name(arg)),
            "/lang" => arg
                .parse()
                .map(Self::Lang)
                .unwrap_or_else(|_| Self::Invalid("usage: /lang ko|en".to_string())),
            "/stats" => Self::Stats,
            "/sessions" => Self::Sessions,
            "/switch" => required(Self::Switch, "usage: /switch <session-id>"),
            "/delete" => required(Self::Delete, "usage: /delete <session-id>"),
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Invalid(format!("Unknown command: {other} (try /help)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            ReplCommand::parse("  What is on page 3? "),
            ReplCommand::Ask("What is on page 3?".to_string())
        );
    }

    #[test]
    fn test_citation_argument_keeps_commas() {
        assert_eq!(
            ReplCommand::parse("/cite Smith, Jones & Co, p.4"),
            ReplCommand::Cite("Smith, Jones & Co, p.4".to_string())
        );
    }

    #[test]
    fn test_settings_commands() {
        assert_eq!(ReplCommand::parse("/deep off"), ReplCommand::Deep(false));
        assert_eq!(ReplCommand::parse("/depth 7"), ReplCommand::Depth(7));
        assert_eq!(
            ReplCommand::parse("/domain Medical"),
            ReplCommand::Domain(DomainProfile::Medical)
        );
        assert_eq!(
            ReplCommand::parse("/domain astrology"),
            ReplCommand::Domain(DomainProfile::General)
        );
        assert_eq!(
            ReplCommand::parse("/lang en"),
            ReplCommand::Lang(ResponseLanguage::English)
        );
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(ReplCommand::parse("/depth deep"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/select"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/frobnicate"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_every_listed_command_parses() {
        for name in COMMANDS {
            let parsed = ReplCommand::parse(&format!("{name} x"));
            assert!(
                !matches!(&parsed, ReplCommand::Invalid(msg) if msg.starts_with("Unknown")),
                "{name} not recognized"
            );
        }
    }
}
