//! K2Pac - hostname routing decisions from AdBlock-style filter lists.
//!
//! This crate turns a filter list (such as gfwlist) plus optional user rules
//! into lookup tables, decides whether a hostname goes DIRECT or through the
//! proxy, and renders the same decision logic as a PAC script.
//!
//! # Features
//!
//! - **Rule parsing**: suffix (`||`), exact (`|http://`), keyword, regex and
//!   embedded-domain rules, with `@@` whitelisting
//! - **Aggregation**: the feed and user rules merge by plain set union
//! - **Evaluation**: whitelist before blacklist, suffix matching by label walk
//! - **PAC output**: reproducible scripts with a caller-supplied proxy token
//! - **Feed loading**: HTTP(S) with optional SOCKS5 proxy, gzip, base64
//!
//! # Quick Start
//!
//! ```
//! use k2pac::{Decision, MatchIndex, PacEmitter, RuleSet};
//!
//! let rules = RuleSet::from_sources("||google.com\n", Some("@@||maps.google.com\n"));
//! let index = MatchIndex::build(&rules);
//!
//! assert_eq!(index.classify("www.google.com"), Decision::Proxy);
//! assert_eq!(index.classify("maps.google.com"), Decision::Direct);
//! assert_eq!(index.classify("localhost"), Decision::Direct);
//!
//! let script = PacEmitter::new("SOCKS5 127.0.0.1:1080").emit(&index);
//! assert!(script.contains("FindProxyForURL"));
//! ```
//!
//! # Matching Priority
//!
//! 1. Local hosts (no dot, `.local`, loopback and private IPv4 prefixes)
//! 2. Whitelist exact, then whitelist suffix
//! 3. Block exact, then block suffix
//! 4. Block keywords
//! 5. Direct by default
//!
//! Regex rules are parsed and kept in the [`RuleSet`] but never evaluated.

mod decision;
mod emitter;
mod error;
mod fetch;
mod rule_type;

pub mod converter;
pub mod matcher;
pub mod rule;
pub mod ruleset;

// Re-export core types
pub use decision::Decision;
pub use error::{Error, Result};
pub use rule_type::RuleKind;

// Re-export parsing
pub use converter::{is_valid_domain, parse_line, parse_rule, AdblockParser};
pub use rule::{ParsedRule, RulePattern};

// Re-export aggregation and configuration
pub use ruleset::{AggregateStats, GeneratorConfig, RuleSet};

// Re-export evaluation
pub use matcher::{classify, is_local_host, MatchIndex, MatchReason};

// Re-export I/O collaborators
pub use emitter::PacEmitter;
pub use fetch::{FeedLoader, FeedSource};
