//! Generator configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::Result;

/// Community-maintained gfwlist, base64 encoded.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/gfwlist/gfwlist/master/gfwlist.txt";

/// Placeholder written in place of the proxy directive.
///
/// It is substituted by whoever deploys the script and never interpreted here.
pub const DEFAULT_PROXY_TOKEN: &str = "__PROXY__";

/// Configuration for one generation run.
///
/// Values are immutable once the run starts and are passed explicitly to
/// the feed loader and the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Feed location, an http(s) URL or a local path
    pub feed_url: String,
    /// Whether the feed is base64 encoded
    pub feed_base64: bool,
    /// Proxy placeholder emitted for proxied hosts
    pub proxy_token: String,
    /// Proxy used only to download the feed (`socks5://` or `http://`)
    pub fetch_proxy: Option<String>,
    /// Download timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_base64: true,
            proxy_token: DEFAULT_PROXY_TOKEN.to_string(),
            fetch_proxy: None,
            timeout_secs: 60,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Download timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
