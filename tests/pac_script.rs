//! Runs the emitted PAC script under node and compares it with the Rust evaluator.
//!
//! Skipped when `node` is not installed.

use k2pac::{Decision, MatchIndex, PacEmitter, RuleSet};
use std::fs;
use std::process::Command;

const FEED: &str = "\
||google.com
||cn.example.com
|https://foo.example.org/path
|http://www.example.net
adtracker
evil
/^ads/
@@||safe.google.com
@@|https://open.example.net
@@||a.cn.example.com
";

const USER_RULES: &str = "\
||example.net
@@||mirror.cn.example.com
";

const PROXY_TOKEN: &str = "SOCKS5 127.0.0.1:1080; DIRECT";

const HOSTS: &[&str] = &[
    // local and private prefixes
    "localhost",
    "printer.local",
    "127.0.0.1",
    "0127.0.0.1",
    "10.1.2.3",
    "10.example.com",
    "172.16.0.1",
    "172.31.255.255",
    "172.15.0.1",
    "172.32.0.1",
    "172.16.example.com",
    "192.168.1.1",
    "192.169.1.1",
    "192.example.com",
    "256.168.1.1",
    "8.8.8.8",
    // suffix and exact
    "google.com",
    "Maps.Google.com",
    "notgoogle.com",
    "x..google.com",
    "foo.example.org",
    "a.foo.example.org",
    "www.example.net",
    "api.example.net",
    // whitelist over block
    "safe.google.com",
    "deep.safe.google.com",
    "open.example.net",
    "a.cn.example.com",
    "b.cn.example.com",
    "x.mirror.cn.example.com",
    // keywords
    "ads.adtracker.net",
    "notevilsite.com",
    "EVIL.org",
    "ads.example.com",
    "plain.example.com",
];

fn node_available() -> bool {
    Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn expected(decision: Decision) -> &'static str {
    match decision {
        Decision::Direct => "DIRECT",
        Decision::Proxy => PROXY_TOKEN,
    }
}

#[test]
fn test_script_agrees_with_classify() {
    if !node_available() {
        eprintln!("node not found, skipping PAC script evaluation");
        return;
    }

    let index = MatchIndex::build(&RuleSet::from_sources(FEED, Some(USER_RULES)));
    let mut script = PacEmitter::new(PROXY_TOKEN).emit(&index);

    script.push_str(&format!(
        "\nvar hosts = {};\n\
         for (var i = 0; i < hosts.length; i++) {{\n\
         \x20   console.log(FindProxyForURL(\"http://\" + hosts[i] + \"/\", hosts[i]));\n\
         }}\n",
        serde_json::to_string(HOSTS).unwrap()
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proxy.pac.js");
    fs::write(&path, script).unwrap();

    let output = Command::new("node").arg(&path).output().unwrap();
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let results: Vec<&str> = stdout.lines().collect();
    assert_eq!(results.len(), HOSTS.len());

    let mut proxied = 0;
    for (host, result) in HOSTS.iter().zip(results) {
        let decision = index.classify(host);
        if decision == Decision::Proxy {
            proxied += 1;
        }
        assert_eq!(
            result,
            expected(decision),
            "{} ({})",
            host,
            index.explain(host)
        );
    }

    // Both outcomes are exercised
    assert!(proxied > 0 && proxied < HOSTS.len());
}

#[test]
fn test_empty_index_script_is_direct() {
    if !node_available() {
        eprintln!("node not found, skipping PAC script evaluation");
        return;
    }

    let mut script = PacEmitter::new(PROXY_TOKEN).emit(&MatchIndex::default());
    script.push_str("\nconsole.log(FindProxyForURL(\"https://www.google.com/\", \"www.google.com\"));\n");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pac.js");
    fs::write(&path, script).unwrap();

    let output = Command::new("node").arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "DIRECT");
}
