//! Keyword substring matching.

use aho_corasick::{AhoCorasick, MatchKind};

use super::Matcher;
use crate::RuleKind;

/// KeywordList matches hosts containing any stored keyword anywhere.
///
/// Matching is plain substring search, not label-bounded: `evil`
/// matches `notevilsite.com`. Queries run through an Aho-Corasick
/// automaton, so cost is linear in the host length whatever the number
/// of keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordList {
    keywords: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl KeywordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate the keywords in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Find the keyword that starts earliest in the host.
    ///
    /// When several keywords start at the same position the one stored
    /// first wins.
    pub fn find(&self, host: &str) -> Option<&str> {
        match &self.automaton {
            Some(ac) => ac
                .find(host)
                .map(|m| self.keywords[m.pattern().as_usize()].as_str()),
            None => self
                .keywords
                .iter()
                .find(|k| host.contains(k.as_str()))
                .map(String::as_str),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let keywords: Vec<String> = iter.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            return Self::default();
        }

        // Only fails past the automaton's size limits; fall back to a scan
        let automaton = match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&keywords)
        {
            Ok(ac) => Some(ac),
            Err(e) => {
                log::warn!("Keyword automaton not built, using linear scan: {}", e);
                None
            }
        };

        Self {
            keywords,
            automaton,
        }
    }
}

impl Matcher for KeywordList {
    fn matches(&self, host: &str) -> bool {
        self.find(host).is_some()
    }

    fn len(&self) -> usize {
        self.keywords.len()
    }

    fn rule_kind(&self) -> RuleKind {
        RuleKind::Keyword
    }
}
