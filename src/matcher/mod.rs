//! Match index construction and hostname evaluation.
//!
//! The index is built once from an aggregated [`RuleSet`] and is read-only
//! afterwards. Evaluation walks a fixed policy where the first applicable
//! step decides:
//!
//! 1. Local or private host → Direct
//! 2. Whitelist exact → Direct
//! 3. Whitelist suffix → Direct
//! 4. Block exact → Proxy
//! 5. Block suffix → Proxy
//! 6. Keyword substring → Proxy
//! 7. Otherwise → Direct
//!
//! Whitelist always wins over blacklist, whatever the specificity.
//! Regex rules are not consulted.

mod local;

pub use local::is_local_host;

use std::borrow::Cow;
use std::fmt;

use crate::rule::{ExactSet, KeywordList, Matcher, SuffixSet};
use crate::ruleset::RuleSet;
use crate::Decision;

/// The policy step that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason<'a> {
    /// Dotless, `.local` or private address
    Local,
    /// Host is an exact whitelist entry
    WhitelistExact,
    /// Host is under the given whitelist suffix
    WhitelistSuffix(&'a str),
    /// Host is an exact block entry
    BlockExact,
    /// Host is under the given block suffix
    BlockSuffix(&'a str),
    /// Host contains the given keyword
    Keyword(&'a str),
    /// No rule applied
    Default,
}

impl MatchReason<'_> {
    /// The decision this step produces.
    pub fn decision(&self) -> Decision {
        match self {
            MatchReason::BlockExact | MatchReason::BlockSuffix(_) | MatchReason::Keyword(_) => {
                Decision::Proxy
            }
            MatchReason::Local
            | MatchReason::WhitelistExact
            | MatchReason::WhitelistSuffix(_)
            | MatchReason::Default => Decision::Direct,
        }
    }
}

impl fmt::Display for MatchReason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::Local => write!(f, "local"),
            MatchReason::WhitelistExact => write!(f, "whitelist-exact"),
            MatchReason::WhitelistSuffix(s) => write!(f, "whitelist-suffix {}", s),
            MatchReason::BlockExact => write!(f, "block-exact"),
            MatchReason::BlockSuffix(s) => write!(f, "block-suffix {}", s),
            MatchReason::Keyword(k) => write!(f, "keyword {}", k),
            MatchReason::Default => write!(f, "default"),
        }
    }
}

/// MatchIndex holds the lookup structures consulted per hostname.
///
/// # Examples
/// ```
/// use k2pac::{Decision, MatchIndex, RuleSet};
///
/// let rules = RuleSet::from_sources("||google.com\n", None);
/// let index = MatchIndex::build(&rules);
///
/// assert_eq!(index.classify("maps.google.com"), Decision::Proxy);
/// assert_eq!(index.classify("www.youtube.com"), Decision::Direct);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    white_exact: ExactSet,
    white_suffix: SuffixSet,
    block_exact: ExactSet,
    block_suffix: SuffixSet,
    keywords: KeywordList,
}

impl MatchIndex {
    /// Build an index from aggregated rules.
    ///
    /// Domain sets are copied as-is; suffix matching happens at query time
    /// by walking the host's parent labels. Keywords are sorted so that the
    /// index and anything emitted from it are reproducible.
    pub fn build(rules: &RuleSet) -> Self {
        let mut keywords: Vec<&String> = rules.block_keywords().iter().collect();
        keywords.sort_unstable();

        let index = Self {
            white_exact: rules.white_exact().iter().cloned().collect(),
            white_suffix: rules.white_suffix().iter().cloned().collect(),
            block_exact: rules.block_exact().iter().cloned().collect(),
            block_suffix: rules.block_suffix().iter().cloned().collect(),
            keywords: keywords.into_iter().cloned().collect(),
        };

        log::debug!(
            "Built match index: {} whitelist exact, {} whitelist suffix, {} block exact, {} block suffix, {} keywords",
            index.white_exact.len(),
            index.white_suffix.len(),
            index.block_exact.len(),
            index.block_suffix.len(),
            index.keywords.len()
        );

        index
    }

    /// Decide how a hostname should be routed.
    pub fn classify(&self, host: &str) -> Decision {
        self.explain(host).decision()
    }

    /// Decide how a hostname should be routed and report which step decided.
    ///
    /// The host is lowercased before any lookup.
    pub fn explain(&self, host: &str) -> MatchReason<'_> {
        let lowered = lowercase(host);
        let host: &str = &lowered;

        if is_local_host(host) {
            return MatchReason::Local;
        }

        if self.white_exact.matches(host) {
            return MatchReason::WhitelistExact;
        }
        if let Some(suffix) = self.white_suffix.find(host) {
            return MatchReason::WhitelistSuffix(suffix);
        }

        if self.block_exact.matches(host) {
            return MatchReason::BlockExact;
        }
        if let Some(suffix) = self.block_suffix.find(host) {
            return MatchReason::BlockSuffix(suffix);
        }
        if let Some(keyword) = self.keywords.find(host) {
            return MatchReason::Keyword(keyword);
        }

        MatchReason::Default
    }

    /// Exact-whitelist lookup set.
    pub fn white_exact(&self) -> &ExactSet {
        &self.white_exact
    }

    /// Suffix-whitelist lookup set.
    pub fn white_suffix(&self) -> &SuffixSet {
        &self.white_suffix
    }

    /// Exact-block lookup set.
    pub fn block_exact(&self) -> &ExactSet {
        &self.block_exact
    }

    /// Suffix-block lookup set.
    pub fn block_suffix(&self) -> &SuffixSet {
        &self.block_suffix
    }

    /// Block keywords, sorted.
    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }
}

impl From<&RuleSet> for MatchIndex {
    fn from(rules: &RuleSet) -> Self {
        Self::build(rules)
    }
}

/// Decide how a hostname should be routed by the given index.
pub fn classify(host: &str, index: &MatchIndex) -> Decision {
    index.classify(host)
}

fn lowercase(host: &str) -> Cow<'_, str> {
    if host.chars().any(char::is_uppercase) {
        Cow::Owned(host.to_lowercase())
    } else {
        Cow::Borrowed(host)
    }
}
