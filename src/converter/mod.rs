//! Filter list format parsers.

mod adblock;

pub use adblock::{classify_line, is_valid_domain, parse_line, parse_rule, AdblockParser, LineClass};
