//! Error types for the harvester.
//!
//! Every fallible operation in this crate returns [`HarvesterError`]. URL and
//! download failures name the URL involved.
//!
//! A selector that matches nothing is not an error: single-field lookups
//! resolve to `None` and extraction carries on with the rest of the page.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download a rendered page.
    #[error("Failed to download page {url}: {source}")]
    PageDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page markup is not well-formed XHTML.
    #[error("Page markup parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
