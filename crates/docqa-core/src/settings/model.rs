//! Retrieval configuration values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_TRAVERSAL_DEPTH: u32 = 1;
pub const MAX_TRAVERSAL_DEPTH: u32 = 10;
pub const MIN_TRAVERSAL_BRANCHES: u32 = 1;
pub const MAX_TRAVERSAL_BRANCHES: u32 = 10;

/// Document domain the server tunes its prompts and traversal for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainProfile {
    #[default]
    General,
    Medical,
    Legal,
    Technical,
    Academic,
}

impl DomainProfile {
    pub const ALL: [DomainProfile; 5] = [
        DomainProfile::General,
        DomainProfile::Medical,
        DomainProfile::Legal,
        DomainProfile::Technical,
        DomainProfile::Academic,
    ];

    /// Parses a profile name case-insensitively; anything unknown is `General`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "medical" => Self::Medical,
            "legal" => Self::Legal,
            "technical" => Self::Technical,
            "academic" => Self::Academic,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Medical => "medical",
            Self::Legal => "legal",
            Self::Technical => "technical",
            Self::Academic => "academic",
        }
    }
}

impl fmt::Display for DomainProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language the server should answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseLanguage {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

impl ResponseLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
        }
    }
}

impl FromStr for ResponseLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ko" | "korean" => Ok(Self::Korean),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unsupported response language: {other}")),
        }
    }
}

impl fmt::Display for ResponseLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Everything the retrieval service needs to know about how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Walk the section tree instead of using the whole document.
    pub use_deep_traversal: bool,
    pub max_depth: u32,
    pub max_branches: u32,
    pub domain_template: DomainProfile,
    pub language: ResponseLanguage,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            use_deep_traversal: true,
            max_depth: 5,
            max_branches: 3,
            domain_template: DomainProfile::General,
            language: ResponseLanguage::Korean,
        }
    }
}

impl RetrievalSettings {
    /// Returns a copy with depth and breadth pulled into their valid ranges.
    pub fn clamped(mut self) -> Self {
        self.max_depth = self.max_depth.clamp(MIN_TRAVERSAL_DEPTH, MAX_TRAVERSAL_DEPTH);
        self.max_branches = self
            .max_branches
            .clamp(MIN_TRAVERSAL_BRANCHES, MAX_TRAVERSAL_BRANCHES);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_profile_from_name() {
        assert_eq!(DomainProfile::from_name("medical"), DomainProfile::Medical);
        assert_eq!(DomainProfile::from_name("Legal"), DomainProfile::Legal);
        assert_eq!(DomainProfile::from_name("TECHNICAL"), DomainProfile::Technical);
        assert_eq!(DomainProfile::from_name("unknown"), DomainProfile::General);
        assert_eq!(DomainProfile::from_name(""), DomainProfile::General);
    }

    #[test]
    fn test_settings_wire_format() {
        let json = serde_json::to_value(RetrievalSettings::default()).unwrap();
        assert_eq!(json["domain_template"], "general");
        assert_eq!(json["language"], "ko");
        assert_eq!(json["max_depth"], 5);
    }

    #[test]
    fn test_clamped() {
        let settings = RetrievalSettings {
            max_depth: 0,
            max_branches: 42,
            ..Default::default()
        }
        .clamped();
        assert_eq!(settings.max_depth, MIN_TRAVERSAL_DEPTH);
        assert_eq!(settings.max_branches, MAX_TRAVERSAL_BRANCHES);
    }
}
