//! Parsed rule types and lookup structure trait definitions.

mod domain;
mod keyword;

pub use domain::{ExactSet, SuffixSet};
pub use keyword::KeywordList;

use std::fmt;

use crate::RuleKind;

/// The pattern part of a parsed filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RulePattern {
    /// Matches only the literal host (lowercase)
    ExactDomain(String),
    /// Matches the host and any hostname ending in `.host` (lowercase)
    SuffixDomain(String),
    /// Matches any hostname containing the substring (lowercase)
    Keyword(String),
    /// Regular expression source, delimiters stripped, never compiled here
    Regex(String),
}

/// A single classified filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedRule {
    /// What the rule matches
    pub pattern: RulePattern,
    /// True if the source line carried the `@@` marker
    pub whitelist: bool,
}

impl ParsedRule {
    /// Create an exact-domain rule.
    pub fn exact(host: impl Into<String>, whitelist: bool) -> Self {
        Self {
            pattern: RulePattern::ExactDomain(host.into()),
            whitelist,
        }
    }

    /// Create a suffix-domain rule.
    pub fn suffix(host: impl Into<String>, whitelist: bool) -> Self {
        Self {
            pattern: RulePattern::SuffixDomain(host.into()),
            whitelist,
        }
    }

    /// Create a keyword rule.
    pub fn keyword(substring: impl Into<String>, whitelist: bool) -> Self {
        Self {
            pattern: RulePattern::Keyword(substring.into()),
            whitelist,
        }
    }

    /// Create a regex rule.
    pub fn regex(pattern: impl Into<String>, whitelist: bool) -> Self {
        Self {
            pattern: RulePattern::Regex(pattern.into()),
            whitelist,
        }
    }

    /// Create a rule of the given kind.
    pub fn from_parts(kind: RuleKind, value: String, whitelist: bool) -> Self {
        let pattern = match kind {
            RuleKind::Exact => RulePattern::ExactDomain(value),
            RuleKind::Suffix => RulePattern::SuffixDomain(value),
            RuleKind::Keyword => RulePattern::Keyword(value),
            RuleKind::Regex => RulePattern::Regex(value),
        };
        Self { pattern, whitelist }
    }

    /// Get the kind of this rule.
    pub fn kind(&self) -> RuleKind {
        match self.pattern {
            RulePattern::ExactDomain(_) => RuleKind::Exact,
            RulePattern::SuffixDomain(_) => RuleKind::Suffix,
            RulePattern::Keyword(_) => RuleKind::Keyword,
            RulePattern::Regex(_) => RuleKind::Regex,
        }
    }

    /// Get the domain, keyword or regex source carried by this rule.
    pub fn value(&self) -> &str {
        match &self.pattern {
            RulePattern::ExactDomain(s)
            | RulePattern::SuffixDomain(s)
            | RulePattern::Keyword(s)
            | RulePattern::Regex(s) => s,
        }
    }

    /// Consume the rule, returning its domain, keyword or regex source.
    pub fn into_value(self) -> String {
        match self.pattern {
            RulePattern::ExactDomain(s)
            | RulePattern::SuffixDomain(s)
            | RulePattern::Keyword(s)
            | RulePattern::Regex(s) => s,
        }
    }

    /// Render this rule back into filter-list grammar.
    ///
    /// Parsing the returned line yields an equal rule.
    pub fn to_rule_line(&self) -> String {
        let body = match &self.pattern {
            RulePattern::ExactDomain(host) => format!("|http://{}", host),
            RulePattern::SuffixDomain(host) => format!("||{}", host),
            RulePattern::Keyword(keyword) => keyword.clone(),
            RulePattern::Regex(re) => format!("/{}/", re),
        };
        if self.whitelist {
            format!("@@{}", body)
        } else {
            body
        }
    }
}

impl fmt::Display for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rule_line())
    }
}

/// Matcher is the interface shared by the lookup structures of a match index.
///
/// Hosts passed to `matches` must already be lowercase.
pub trait Matcher {
    /// Check whether the host matches any entry.
    fn matches(&self, host: &str) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether the matcher holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the kind of rule this matcher evaluates.
    fn rule_kind(&self) -> RuleKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_trait_object() {
        let set: SuffixSet = ["google.com"].into_iter().collect();
        let matcher: &dyn Matcher = &set;
        assert_eq!(matcher.rule_kind(), RuleKind::Suffix);
        assert_eq!(matcher.len(), 1);
        assert!(matcher.matches("www.google.com"));
    }

    #[test]
    fn test_rule_kind_and_value() {
        let rule = ParsedRule::keyword("adtracker", false);
        assert_eq!(rule.kind(), RuleKind::Keyword);
        assert_eq!(rule.value(), "adtracker");
        assert!(!rule.whitelist);
    }

    #[test]
    fn test_to_rule_line() {
        assert_eq!(ParsedRule::suffix("example.com", true).to_rule_line(), "@@||example.com");
        assert_eq!(ParsedRule::exact("foo.example.org", false).to_string(), "|http://foo.example.org");
        assert_eq!(ParsedRule::regex(r"^https?://a\.b", false).to_rule_line(), r"/^https?://a\.b/");
        assert_eq!(ParsedRule::keyword("evil", false).to_rule_line(), "evil");
    }
}
