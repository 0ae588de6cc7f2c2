//! AdBlock-style filter list parser.
//!
//! Only the rule forms used by proxy filter lists are recognised:
//!
//! - `! comment` and `[Header]` lines are skipped
//! - `@@` prefix marks a whitelist rule
//! - `/pattern/` is a regex rule
//! - `||example.com^` is a suffix rule
//! - `|https://host/path` is an exact rule
//! - a bare token is a suffix rule if it is a valid domain, else a keyword
//! - anything else is scanned for an embedded domain
//!
//! Lines matching none of these are dropped without error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

use crate::rule::ParsedRule;
use crate::ruleset::RuleSet;
use crate::Result;

/// Whitelist marker.
const WHITELIST_PREFIX: &str = "@@";

static VALID_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][-A-Za-z0-9.]*\.[A-Za-z]{2,}$").unwrap());

static EXACT_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://([^/^]+)").unwrap());

static BARE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][-A-Za-z0-9.]*[A-Za-z0-9]$").unwrap());

static EMBEDDED_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\*\.)?([A-Za-z0-9][-A-Za-z0-9.]*\.[A-Za-z]{2,})").unwrap());

/// Classification of a raw input line before rule parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Empty after trimming
    Blank,
    /// Starts with `!` or `[`
    Comment,
    /// Anything else; handed to [`parse_rule`]
    Candidate,
}

/// Classify a raw line. The line is trimmed first.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();
    if line.is_empty() {
        LineClass::Blank
    } else if line.starts_with('!') || line.starts_with('[') {
        LineClass::Comment
    } else {
        LineClass::Candidate
    }
}

/// Check whether a string is syntactically a domain name.
///
/// It must contain a dot and end in an alphabetic label of at least two
/// characters. No resolution is performed.
///
/// # Example
/// ```
/// use k2pac::is_valid_domain;
///
/// assert!(is_valid_domain("example.com"));
/// assert!(!is_valid_domain("localhost"));
/// assert!(!is_valid_domain("10.0.0.1"));
/// ```
pub fn is_valid_domain(s: &str) -> bool {
    VALID_DOMAIN.is_match(s)
}

/// Parse one trimmed, non-blank, non-comment line into a rule.
///
/// Returns `None` when the line matches no recognised form or its domain
/// fails validation.
///
/// # Example
/// ```
/// use k2pac::{parse_rule, ParsedRule};
///
/// assert_eq!(parse_rule("||google.com^"), Some(ParsedRule::suffix("google.com", false)));
/// assert_eq!(parse_rule("@@||example.com"), Some(ParsedRule::suffix("example.com", true)));
/// assert_eq!(parse_rule("adtracker"), Some(ParsedRule::keyword("adtracker", false)));
/// ```
pub fn parse_rule(line: &str) -> Option<ParsedRule> {
    let (rest, whitelist) = match line.strip_prefix(WHITELIST_PREFIX) {
        Some(rest) => (rest, true),
        None => (line, false),
    };

    if rest.len() >= 2 && rest.starts_with('/') && rest.ends_with('/') {
        return Some(ParsedRule::regex(&rest[1..rest.len() - 1], whitelist));
    }

    if let Some(body) = rest.strip_prefix("||") {
        let end = body.find(|c: char| c == '/' || c == '^').unwrap_or(body.len());
        let candidate = &body[..end];
        return is_valid_domain(candidate)
            .then(|| ParsedRule::suffix(candidate.to_lowercase(), whitelist));
    }

    if let Some(body) = rest.strip_prefix('|') {
        let host = EXACT_URL.captures(body)?.get(1)?.as_str();
        return is_valid_domain(host).then(|| ParsedRule::exact(host.to_lowercase(), whitelist));
    }

    if BARE_TOKEN.is_match(rest) {
        let token = rest.to_lowercase();
        return Some(if is_valid_domain(rest) {
            ParsedRule::suffix(token, whitelist)
        } else {
            ParsedRule::keyword(token, whitelist)
        });
    }

    let domain = EMBEDDED_DOMAIN.captures(rest)?.get(1)?.as_str();
    Some(ParsedRule::suffix(domain.to_lowercase(), whitelist))
}

/// Parse a raw line of any class. Blank and comment lines yield `None`.
pub fn parse_line(line: &str) -> Option<ParsedRule> {
    match classify_line(line) {
        LineClass::Candidate => parse_rule(line.trim()),
        LineClass::Blank | LineClass::Comment => None,
    }
}

/// AdBlock-style filter list parser.
pub struct AdblockParser;

impl AdblockParser {
    /// Parse a filter list from a reader into a new rule set.
    pub fn parse<R: Read>(reader: R) -> Result<RuleSet> {
        let mut rules = RuleSet::new();
        let buf_reader = BufReader::new(reader);

        for line in buf_reader.lines() {
            rules.add_line(&line?);
        }

        Ok(rules)
    }
}
