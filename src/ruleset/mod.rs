//! Rule aggregation into per-category containers.

mod config;

pub use config::{GeneratorConfig, DEFAULT_FEED_URL, DEFAULT_PROXY_TOKEN};

use ahash::AHashSet;
use std::fmt;

use crate::converter::{classify_line, parse_rule, LineClass};
use crate::rule::{ParsedRule, RulePattern};
use crate::RuleKind;

/// Line counters collected while aggregating.
///
/// These are diagnostics only; they never influence a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Lines seen, of every class
    pub lines: usize,
    /// Empty lines
    pub blank: usize,
    /// `!` and `[` lines
    pub comments: usize,
    /// Candidate lines that matched no rule form
    pub unrecognized: usize,
    /// Parsed rules with no container (whitelisted keywords)
    pub dropped: usize,
    /// Parsed rules routed into a container
    pub accepted: usize,
}

impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines ({} rules, {} blank, {} comments, {} unrecognized, {} dropped)",
            self.lines, self.accepted, self.blank, self.comments, self.unrecognized, self.dropped
        )
    }
}

/// RuleSet holds parsed rules sorted into disjoint containers.
///
/// The feed and the user rules are folded into the same containers with
/// plain set insertion; duplicates collapse and source order is irrelevant.
/// Whitelist precedence is applied by the evaluator, not here.
///
/// Regex rules are retained but never consulted by the evaluator.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    block_exact: AHashSet<String>,
    block_suffix: AHashSet<String>,
    block_keywords: AHashSet<String>,
    block_regex: AHashSet<String>,
    white_exact: AHashSet<String>,
    white_suffix: AHashSet<String>,
    white_regex: AHashSet<String>,
    stats: AggregateStats,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate the feed and then the optional user rules.
    ///
    /// # Examples
    /// ```
    /// use k2pac::RuleSet;
    ///
    /// let rules = RuleSet::from_sources("||example.com\n", Some("@@||example.com\n"));
    /// assert!(rules.block_suffix().contains("example.com"));
    /// assert!(rules.white_suffix().contains("example.com"));
    /// ```
    pub fn from_sources(feed: &str, user_rules: Option<&str>) -> Self {
        let mut rules = Self::new();
        rules.extend_lines("feed", feed);
        if let Some(user_rules) = user_rules {
            rules.extend_lines("user rules", user_rules);
        }
        rules
    }

    /// Add every line of a rule document.
    pub fn extend_lines(&mut self, source: &str, text: &str) {
        let before = self.stats;
        for line in text.lines() {
            self.add_line(line);
        }

        let added = AggregateStats {
            lines: self.stats.lines - before.lines,
            blank: self.stats.blank - before.blank,
            comments: self.stats.comments - before.comments,
            unrecognized: self.stats.unrecognized - before.unrecognized,
            dropped: self.stats.dropped - before.dropped,
            accepted: self.stats.accepted - before.accepted,
        };
        log::info!("Aggregated {}: {}", source, added);

        let sizes: Vec<String> = self
            .container_sizes()
            .iter()
            .map(|(name, size)| format!("{} {}", size, name))
            .collect();
        log::info!("Containers after {}: {}", source, sizes.join(", "));
    }

    /// Classify, parse and store one raw line.
    ///
    /// Returns the parsed rule if it was stored.
    pub fn add_line(&mut self, line: &str) -> Option<ParsedRule> {
        self.stats.lines += 1;

        match classify_line(line) {
            LineClass::Blank => {
                self.stats.blank += 1;
                None
            }
            LineClass::Comment => {
                self.stats.comments += 1;
                None
            }
            LineClass::Candidate => {
                let line = line.trim();
                match parse_rule(line) {
                    Some(rule) => self.add_rule(rule.clone()).then_some(rule),
                    None => {
                        self.stats.unrecognized += 1;
                        log::trace!("Skipping unrecognized rule: {}", line);
                        None
                    }
                }
            }
        }
    }

    /// Route a parsed rule into its container.
    ///
    /// Returns `false` if the rule has no container and was dropped.
    pub fn add_rule(&mut self, rule: ParsedRule) -> bool {
        let whitelist = rule.whitelist;
        let container = match (&rule.pattern, whitelist) {
            (RulePattern::ExactDomain(_), false) => &mut self.block_exact,
            (RulePattern::SuffixDomain(_), false) => &mut self.block_suffix,
            (RulePattern::Keyword(_), false) => &mut self.block_keywords,
            (RulePattern::Regex(_), false) => &mut self.block_regex,
            (RulePattern::ExactDomain(_), true) => &mut self.white_exact,
            (RulePattern::SuffixDomain(_), true) => &mut self.white_suffix,
            (RulePattern::Regex(_), true) => &mut self.white_regex,
            (RulePattern::Keyword(keyword), true) => {
                log::debug!("Dropping whitelist keyword: {}", keyword);
                self.stats.dropped += 1;
                return false;
            }
        };

        container.insert(rule.into_value());
        self.stats.accepted += 1;
        true
    }

    /// Exact-block domains.
    pub fn block_exact(&self) -> &AHashSet<String> {
        &self.block_exact
    }

    /// Suffix-block domains.
    pub fn block_suffix(&self) -> &AHashSet<String> {
        &self.block_suffix
    }

    /// Block keywords.
    pub fn block_keywords(&self) -> &AHashSet<String> {
        &self.block_keywords
    }

    /// Block regex sources.
    pub fn block_regex(&self) -> &AHashSet<String> {
        &self.block_regex
    }

    /// Exact-whitelist domains.
    pub fn white_exact(&self) -> &AHashSet<String> {
        &self.white_exact
    }

    /// Suffix-whitelist domains.
    pub fn white_suffix(&self) -> &AHashSet<String> {
        &self.white_suffix
    }

    /// Whitelist regex sources.
    pub fn white_regex(&self) -> &AHashSet<String> {
        &self.white_regex
    }

    /// Get the container for a kind and side, if one exists.
    pub fn container(&self, kind: RuleKind, whitelist: bool) -> Option<&AHashSet<String>> {
        match (kind, whitelist) {
            (RuleKind::Exact, false) => Some(&self.block_exact),
            (RuleKind::Suffix, false) => Some(&self.block_suffix),
            (RuleKind::Keyword, false) => Some(&self.block_keywords),
            (RuleKind::Regex, false) => Some(&self.block_regex),
            (RuleKind::Exact, true) => Some(&self.white_exact),
            (RuleKind::Suffix, true) => Some(&self.white_suffix),
            (RuleKind::Regex, true) => Some(&self.white_regex),
            (RuleKind::Keyword, true) => None,
        }
    }

    /// Number of stored entries for a kind and side.
    pub fn count(&self, kind: RuleKind, whitelist: bool) -> usize {
        self.container(kind, whitelist).map_or(0, |c| c.len())
    }

    /// Every container with its current size, block side first.
    pub fn container_sizes(&self) -> [(&'static str, usize); 7] {
        [
            ("block exact", self.block_exact.len()),
            ("block suffix", self.block_suffix.len()),
            ("block keyword", self.block_keywords.len()),
            ("block regex", self.block_regex.len()),
            ("whitelist exact", self.white_exact.len()),
            ("whitelist suffix", self.white_suffix.len()),
            ("whitelist regex", self.white_regex.len()),
        ]
    }

    /// Total number of stored rules.
    pub fn rule_count(&self) -> usize {
        RuleKind::ALL
            .iter()
            .flat_map(|&kind| [self.count(kind, false), self.count(kind, true)])
            .sum()
    }

    /// Whether no rule is stored.
    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    /// Line counters accumulated so far.
    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    /// Iterate every stored rule, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = ParsedRule> + '_ {
        RuleKind::ALL
            .into_iter()
            .flat_map(|kind| [(kind, false), (kind, true)])
            .filter_map(move |(kind, whitelist)| {
                self.container(kind, whitelist).map(|set| (kind, whitelist, set))
            })
            .flat_map(|(kind, whitelist, set)| {
                set.iter()
                    .map(move |value| ParsedRule::from_parts(kind, value.clone(), whitelist))
            })
    }

    /// Render every stored rule as filter-list lines, sorted.
    ///
    /// Aggregating the output again yields the same containers.
    pub fn to_rule_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.rules().map(|r| r.to_rule_line()).collect();
        lines.sort_unstable();
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_rules_by_kind_and_side() {
        let rules = RuleSet::from_sources(
            "\
||google.com
|https://foo.example.org/path
adtracker
/^ads/
@@|http://ok.example.com
@@||example.com
@@/^good/
",
            None,
        );

        assert!(rules.block_suffix().contains("google.com"));
        assert!(rules.block_exact().contains("foo.example.org"));
        assert!(rules.block_keywords().contains("adtracker"));
        assert!(rules.block_regex().contains("^ads"));
        assert!(rules.white_exact().contains("ok.example.com"));
        assert!(rules.white_suffix().contains("example.com"));
        assert!(rules.white_regex().contains("^good"));
        assert_eq!(rules.rule_count(), 7);
    }

    #[test]
    fn test_duplicates_collapse_across_sources() {
        let rules = RuleSet::from_sources("||google.com\n||GOOGLE.com\n", Some("||google.com\n"));
        assert_eq!(rules.count(RuleKind::Suffix, false), 1);
        assert_eq!(rules.stats().accepted, 3);
        assert_eq!(rules.stats().lines, 3);
    }

    #[test]
    fn test_container_sizes() {
        let rules = RuleSet::from_sources(
            "||a.com\n||b.com\n||a.com\nevil\n@@||ok.com\n@@/w/\n",
            None,
        );
        let sizes = rules.container_sizes();

        assert_eq!(sizes[0], ("block exact", 0));
        assert_eq!(sizes[1], ("block suffix", 2));
        assert_eq!(sizes[2], ("block keyword", 1));
        assert_eq!(sizes[5], ("whitelist suffix", 1));
        assert_eq!(sizes[6], ("whitelist regex", 1));
        assert_eq!(sizes.iter().map(|(_, n)| n).sum::<usize>(), rules.rule_count());
    }

    #[test]
    fn test_user_rules_are_plain_rules() {
        let rules = RuleSet::from_sources("", Some("||blocked.example\n@@||example.com\n"));
        assert!(rules.block_suffix().contains("blocked.example"));
        assert!(rules.white_suffix().contains("example.com"));
        assert!(rules.block_keywords().is_empty());
    }

    #[test]
    fn test_whitelist_keyword_dropped() {
        let mut rules = RuleSet::new();
        assert!(!rules.add_rule(ParsedRule::keyword("evil", true)));
        assert!(rules.add_line("@@evil").is_none());
        assert_eq!(rules.stats().dropped, 2);
        assert!(rules.is_empty());
        assert!(rules.container(RuleKind::Keyword, true).is_none());
    }

    #[test]
    fn test_stats_counts_line_classes() {
        let rules = RuleSet::from_sources("[AutoProxy]\n! c\n\n||a.com\n*weird*\n@@kw\n", None);
        let stats = rules.stats();
        assert_eq!(stats.lines, 6);
        assert_eq!(stats.comments, 2);
        assert_eq!(stats.blank, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.unrecognized, 1);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_rule_lines_reaggregate() {
        let feed = "||google.com\n|https://foo.example.org/x\nevil\n/^re$/\n@@||ok.com\n@@|http://a.ok.com\n@@/w/\n";
        let first = RuleSet::from_sources(feed, None);
        let text = first.to_rule_lines().join("\n");
        let second = RuleSet::from_sources(&text, None);

        assert_eq!(first.to_rule_lines(), second.to_rule_lines());
        assert_eq!(first.rule_count(), second.rule_count());
        assert!(second.white_exact().contains("a.ok.com"));
    }
}
