//! Citation grammar and resolution.
//!
//! Grammar (surrounding whitespace ignored):
//!
//! ```text
//! citation := document-name "," ws* "p." ws* page
//! page     := [1-9][0-9]*
//! ```
//!
//! The document name is everything before the last `, p.` and may itself
//! contain commas. Citation text is owned by the remote service, so anything
//! outside the grammar resolves to [`CitationTarget::Unresolvable`] instead of
//! an error.

use regex::Regex;
use std::sync::LazyLock;

/// Extension of the source files citations point into.
pub const DOCUMENT_FILE_EXTENSION: &str = "pdf";

static CITATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<document>.*\S)\s*,\s*p\.\s*(?P<page>[0-9]+)\s*$")
        .expect("citation pattern is valid")
});

/// Outcome of resolving a citation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationTarget {
    Resolved { file: String, page: u32 },
    Unresolvable,
}

impl CitationTarget {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Resolves `"<documentName>, p.<page>"` into a file reference and page.
pub fn resolve_citation(citation: &str) -> CitationTarget {
    let Some(captures) = CITATION_PATTERN.captures(citation) else {
        return CitationTarget::Unresolvable;
    };

    let page = match captures["page"].parse::<u32>() {
        Ok(page) if page > 0 => page,
        _ => return CitationTarget::Unresolvable,
    };

    CitationTarget::Resolved {
        file: format!("{}.{}", &captures["document"], DOCUMENT_FILE_EXTENSION),
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_well_formed_citation() {
        assert_eq!(
            resolve_citation("Intro Report, p.12"),
            CitationTarget::Resolved {
                file: "Intro Report.pdf".to_string(),
                page: 12
            }
        );
    }

    #[test]
    fn test_document_name_may_contain_commas() {
        assert_eq!(
            resolve_citation("  Smith, Jones 2021 ,  p. 3 "),
            CitationTarget::Resolved {
                file: "Smith, Jones 2021.pdf".to_string(),
                page: 3
            }
        );
    }

    #[test]
    fn test_rejects_text_outside_grammar() {
        for citation in [
            "not a citation",
            "",
            ", p.4",
            "Report p.4",
            "Report, page 4",
            "Report, p.",
            "Report, p.0",
            "Report, p.12a",
            "Report, p.99999999999",
        ] {
            assert_eq!(
                resolve_citation(citation),
                CitationTarget::Unresolvable,
                "{citation:?} should be unresolvable"
            );
        }
    }
}
