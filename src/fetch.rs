//! Feed loading from a URL or a local file.
//!
//! This module handles:
//! - Downloading the feed over HTTP(S), optionally through a SOCKS5/HTTP proxy
//! - Reading the feed from a local path
//! - Gzip decompression when the payload carries the gzip magic
//! - Base64 decoding of encoded feeds

use base64::Engine;
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::ruleset::GeneratorConfig;
use crate::{Error, Result};

/// Where the feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Remote http(s) URL
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl FeedSource {
    /// Interpret a command-line source: `http://` and `https://` are URLs,
    /// anything else is a path.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidSource("empty feed source".to_string()));
        }

        let lower = s.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(FeedSource::Url(s.to_string()))
        } else if lower.contains("://") {
            Err(Error::InvalidSource(format!("unsupported scheme: {}", s)))
        } else {
            Ok(FeedSource::Path(PathBuf::from(s)))
        }
    }
}

/// FeedLoader fetches and decodes rule documents.
///
/// # Example
///
/// ```ignore
/// use k2pac::{FeedLoader, FeedSource, GeneratorConfig};
///
/// let config = GeneratorConfig::default();
/// let loader = FeedLoader::new(&config)?;
/// let text = loader.load(&FeedSource::parse(&config.feed_url)?)?;
/// ```
pub struct FeedLoader {
    agent: ureq::Agent,
    base64: bool,
}

impl FeedLoader {
    /// Create a loader from the run configuration.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut builder = ureq::AgentBuilder::new().timeout(config.timeout());

        if let Some(proxy) = &config.fetch_proxy {
            let proxy = ureq::Proxy::new(proxy)
                .map_err(|e| Error::Config(format!("invalid fetch proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            agent: builder.build(),
            base64: config.feed_base64,
        })
    }

    /// Create a loader for local files only, with the given encoding.
    pub fn local(base64: bool) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(GeneratorConfig::default().timeout())
                .build(),
            base64,
        }
    }

    /// Load the feed and return its decoded text.
    pub fn load(&self, source: &FeedSource) -> Result<String> {
        let raw = match source {
            FeedSource::Url(url) => self.download(url)?,
            FeedSource::Path(path) => {
                log::info!("Reading feed: {:?}", path);
                fs::read(path)?
            }
        };
        self.decode(raw)
    }

    /// Load a plain-text document such as the user rules. Never base64 decoded.
    pub fn load_plain(&self, source: &FeedSource) -> Result<String> {
        let raw = match source {
            FeedSource::Url(url) => self.download(url)?,
            FeedSource::Path(path) => fs::read(path)?,
        };
        Ok(String::from_utf8(gunzip_if_needed(raw)?)?)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        log::info!("Downloading feed: {}", url);

        let response = self.agent.get(url).call()?;
        let mut data = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut data)
            .map_err(|e| Error::Download(format!("failed to read response: {}", e)))?;

        log::debug!("Downloaded {} bytes", data.len());
        Ok(data)
    }

    /// Decompress and decode raw feed bytes into text.
    pub fn decode(&self, raw: Vec<u8>) -> Result<String> {
        let data = gunzip_if_needed(raw)?;

        if !self.base64 {
            return Ok(String::from_utf8(data)?);
        }

        // Encoded feeds are wrapped at fixed widths
        let compact: Vec<u8> = data
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let decoded = base64::engine::general_purpose::STANDARD.decode(compact)?;
        log::debug!("Decoded base64 feed: {} bytes", decoded.len());
        Ok(String::from_utf8(decoded)?)
    }
}

/// Check if data is gzip compressed.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

fn gunzip_if_needed(raw: Vec<u8>) -> Result<Vec<u8>> {
    if !is_gzip(&raw) {
        return Ok(raw);
    }

    let mut decoder = GzDecoder::new(&raw[..]);
    let mut data = Vec::new();
    decoder.read_to_end(&mut data)?;
    log::debug!("Decompressed gzip feed: {} -> {} bytes", raw.len(), data.len());
    Ok(data)
}
