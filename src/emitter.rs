//! PAC script emitter.
//!
//! Serialises a [`MatchIndex`] into a JavaScript proxy auto-config script.
//! The script defines `FindProxyForURL(url, host)` returning `"DIRECT"` or
//! the caller's proxy token, and evaluates the same policy as
//! [`MatchIndex::classify`].

use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

use crate::rule::Matcher;
use crate::{MatchIndex, Result};

const PAC_FUNCTIONS: &str = r#"
function isLocalHost(host) {
    if (host.indexOf(".") < 0 || host.slice(-6) === ".local") {
        return true;
    }
    var labels = host.split(".");
    var a = octet(labels[0]);
    var b = a < 0 ? -1 : octet(labels[1]);
    if (a === 127 || a === 10) {
        return true;
    }
    if (a === 172 && b >= 16 && b <= 31) {
        return true;
    }
    return a === 192 && b === 168;
}

function octet(label) {
    if (label === undefined || !/^[0-9]+$/.test(label)) {
        return -1;
    }
    var v = parseInt(label, 10);
    return v <= 255 ? v : -1;
}

function suffixMatch(table, host) {
    var suffix = host;
    var pos = 0;
    for (;;) {
        if (hasOwnProperty.call(table, suffix)) {
            return true;
        }
        pos = host.indexOf(".", pos);
        if (pos < 0) {
            return false;
        }
        pos += 1;
        suffix = host.substring(pos);
    }
}

function keywordMatch(host) {
    for (var i = 0; i < keywords.length; i++) {
        if (host.indexOf(keywords[i]) >= 0) {
            return true;
        }
    }
    return false;
}

function FindProxyForURL(url, host) {
    host = host.toLowerCase();
    if (isLocalHost(host)) {
        return direct;
    }
    if (hasOwnProperty.call(exact_white, host) || suffixMatch(suffix_white, host)) {
        return direct;
    }
    if (hasOwnProperty.call(exact_block, host) || suffixMatch(suffix_block, host)) {
        return proxy;
    }
    if (keywordMatch(host)) {
        return proxy;
    }
    return direct;
}
"#;

/// PacEmitter renders a match index as a PAC script.
///
/// # Examples
/// ```
/// use k2pac::{MatchIndex, PacEmitter, RuleSet};
///
/// let index = MatchIndex::build(&RuleSet::from_sources("||google.com\n", None));
/// let script = PacEmitter::new("__PROXY__").emit(&index);
///
/// assert!(script.contains("function FindProxyForURL(url, host)"));
/// assert!(script.contains(r#"var suffix_block = {"google.com":1};"#));
/// ```
#[derive(Debug, Clone)]
pub struct PacEmitter {
    proxy_token: String,
}

impl PacEmitter {
    /// Create an emitter with the proxy placeholder to return for proxied hosts.
    ///
    /// The token is written verbatim; it is not parsed or validated.
    pub fn new(proxy_token: impl Into<String>) -> Self {
        Self {
            proxy_token: proxy_token.into(),
        }
    }

    /// Render the script.
    ///
    /// Table keys are sorted so identical indexes produce identical output.
    pub fn emit(&self, index: &MatchIndex) -> String {
        let mut script = String::with_capacity(64 * 1024);

        script.push_str("// Generated by k2pac. Do not edit.\n");
        script.push_str(&format!(
            "// {} whitelist exact, {} whitelist suffix, {} block exact, {} block suffix, {} keywords\n\n",
            index.white_exact().len(),
            index.white_suffix().len(),
            index.block_exact().len(),
            index.block_suffix().len(),
            index.keywords().len()
        ));

        push_var(&mut script, "proxy", &Value::String(self.proxy_token.clone()));
        push_var(&mut script, "direct", &Value::String("DIRECT".to_string()));
        push_var(&mut script, "exact_block", &domain_table(index.block_exact().iter()));
        push_var(&mut script, "exact_white", &domain_table(index.white_exact().iter()));
        push_var(&mut script, "suffix_block", &domain_table(index.block_suffix().iter()));
        push_var(&mut script, "suffix_white", &domain_table(index.white_suffix().iter()));
        push_var(
            &mut script,
            "keywords",
            &Value::Array(index.keywords().iter().map(Value::from).collect()),
        );
        script.push_str("var hasOwnProperty = Object.prototype.hasOwnProperty;\n");
        script.push_str(PAC_FUNCTIONS);

        script
    }

    /// Render the script and write it to a file.
    ///
    /// The file is written to a temporary sibling first and then renamed,
    /// so a failed run never leaves a truncated script behind.
    pub fn write_to(&self, path: impl AsRef<Path>, index: &MatchIndex) -> Result<usize> {
        let path = path.as_ref();
        let script = self.emit(index);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(script.as_bytes())?;
        file.persist(path).map_err(|e| e.error)?;

        log::info!("Wrote {:?} ({} bytes)", path, script.len());
        Ok(script.len())
    }
}

/// Build a `{"domain": 1}` object with sorted keys.
fn domain_table<'a>(domains: impl Iterator<Item = &'a str>) -> Value {
    let mut sorted: Vec<&str> = domains.collect();
    sorted.sort_unstable();

    let mut map = Map::new();
    for domain in sorted {
        map.insert(domain.to_string(), Value::from(1));
    }
    Value::Object(map)
}

fn push_var(script: &mut String, name: &str, value: &Value) {
    script.push_str("var ");
    script.push_str(name);
    script.push_str(" = ");
    script.push_str(&value.to_string());
    script.push_str(";\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleSet;

    fn emit(feed: &str, token: &str) -> String {
        let index = MatchIndex::build(&RuleSet::from_sources(feed, None));
        PacEmitter::new(token).emit(&index)
    }

    #[test]
    fn test_tables_are_serialized() {
        let script = emit(
            "||b.com\n||a.com\n|https://x.example.org\n@@||ok.com\n@@|http://fine.example.org\nzeta\nalpha\n",
            "__PROXY__",
        );

        assert!(script.contains(r#"var suffix_block = {"a.com":1,"b.com":1};"#));
        assert!(script.contains(r#"var exact_block = {"x.example.org":1};"#));
        assert!(script.contains(r#"var suffix_white = {"ok.com":1};"#));
        assert!(script.contains(r#"var exact_white = {"fine.example.org":1};"#));
        assert!(script.contains(r#"var keywords = ["alpha","zeta"];"#));
    }

    #[test]
    fn test_proxy_token_is_verbatim() {
        let script = emit("||a.com", "SOCKS5 127.0.0.1:1080; DIRECT");
        assert!(script.contains(r#"var proxy = "SOCKS5 127.0.0.1:1080; DIRECT";"#));
        assert!(script.contains(r#"var direct = "DIRECT";"#));
    }

    #[test]
    fn test_empty_index_emits_empty_tables() {
        let script = PacEmitter::new("__PROXY__").emit(&MatchIndex::default());
        assert!(script.contains("var exact_block = {};"));
        assert!(script.contains("var keywords = [];"));
        assert!(script.contains("function FindProxyForURL(url, host)"));
    }

    #[test]
    fn test_output_is_reproducible() {
        let feed = "||c.com\n||a.com\n||b.com\nk1\nk3\nk2\n";
        assert_eq!(emit(feed, "P"), emit(feed, "P"));
    }

    #[test]
    fn test_regex_rules_not_emitted() {
        let script = emit("/secret-regex/\n", "P");
        assert!(!script.contains("secret-regex"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.pac");
        let index = MatchIndex::build(&RuleSet::from_sources("||google.com", None));

        let written = PacEmitter::new("__PROXY__").write_to(&path, &index).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert_eq!(written, content.len());
        assert!(content.contains("google.com"));
    }
}
