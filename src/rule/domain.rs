//! Domain lookup sets: exact membership and label-walk suffix matching.

use ahash::AHashSet;

use super::Matcher;
use crate::RuleKind;

/// ExactSet matches hosts equal to a stored domain.
///
/// # Examples
/// ```
/// use k2pac::rule::{ExactSet, Matcher};
///
/// let set: ExactSet = ["google.com"].into_iter().collect();
/// assert!(set.matches("google.com"));
/// assert!(!set.matches("www.google.com"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactSet {
    /// Exact match domains (lowercase)
    domains: AHashSet<String>,
}

impl ExactSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate the stored domains in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExactSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for ExactSet {
    fn matches(&self, host: &str) -> bool {
        self.domains.contains(host)
    }

    fn len(&self) -> usize {
        self.domains.len()
    }

    fn rule_kind(&self) -> RuleKind {
        RuleKind::Exact
    }
}

/// SuffixSet matches a stored domain and every subdomain of it.
///
/// Only the rule domains are stored. A query walks its own parent
/// labels, so `a.b.example.com` probes `a.b.example.com`,
/// `b.example.com`, `example.com` and `com`.
///
/// # Examples
/// ```
/// use k2pac::rule::{Matcher, SuffixSet};
///
/// let set: SuffixSet = ["youtube.com"].into_iter().collect();
/// assert!(set.matches("youtube.com"));
/// assert!(set.matches("www.youtube.com"));
/// assert!(!set.matches("notyoutube.com"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SuffixSet {
    /// Suffix match domains (no leading dot, lowercase)
    suffixes: AHashSet<String>,
}

impl SuffixSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate the stored domains in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// Find the stored entry that matches the host, if any.
    pub fn find(&self, host: &str) -> Option<&str> {
        // Check if host itself is a registered suffix
        if let Some(hit) = self.suffixes.get(host) {
            return Some(hit.as_str());
        }

        // Check parent domains
        let mut current = host;
        while let Some(pos) = current.find('.') {
            current = &current[pos + 1..];
            if let Some(hit) = self.suffixes.get(current) {
                return Some(hit.as_str());
            }
        }

        None
    }
}

impl<S: Into<String>> FromIterator<S> for SuffixSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            suffixes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for SuffixSet {
    fn matches(&self, host: &str) -> bool {
        self.find(host).is_some()
    }

    fn len(&self) -> usize {
        self.suffixes.len()
    }

    fn rule_kind(&self) -> RuleKind {
        RuleKind::Suffix
    }
}
