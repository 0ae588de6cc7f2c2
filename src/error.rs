//! Error types for k2pac.
//!
//! Only the I/O collaborators (feed loading, config loading, artifact
//! writing) can fail. Rule parsing, aggregation, index building and
//! evaluation are infallible.

use thiserror::Error;

/// Error type for k2pac operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Feed download failed
    #[error("download error: {0}")]
    Download(String),

    /// Feed was expected to be base64 but is not
    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded feed is not valid UTF-8
    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid feed source
    #[error("invalid feed source: {0}")]
    InvalidSource(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Error::Download(format!("HTTP error: {}", code)),
            ureq::Error::Transport(t) => Error::Download(format!("transport error: {}", t)),
        }
    }
}

/// Result type alias for k2pac operations.
pub type Result<T> = std::result::Result<T, Error>;
