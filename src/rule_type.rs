//! Rule kind definitions.

use std::fmt;

/// RuleKind represents the matching strategy of a parsed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// Matches only the literal host
    Exact,
    /// Matches the host and all of its subdomains
    Suffix,
    /// Matches any host containing the substring
    Keyword,
    /// Regular expression (retained, never evaluated)
    Regex,
}

impl RuleKind {
    /// All kinds, in display order.
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Exact,
        RuleKind::Suffix,
        RuleKind::Keyword,
        RuleKind::Regex,
    ];

    /// Parse a rule kind from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EXACT" => Some(RuleKind::Exact),
            "SUFFIX" => Some(RuleKind::Suffix),
            "KEYWORD" => Some(RuleKind::Keyword),
            "REGEX" => Some(RuleKind::Regex),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Exact => "EXACT",
            RuleKind::Suffix => "SUFFIX",
            RuleKind::Keyword => "KEYWORD",
            RuleKind::Regex => "REGEX",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
