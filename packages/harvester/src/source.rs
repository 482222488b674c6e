//! Page sources: where rendered page markup comes from.
//!
//! Rendering is done outside this crate. A [`PageSource`] hands back the
//! XHTML serialization of a page that has already been rendered, for example
//! by a headless browser running `new XMLSerializer().serializeToString(document)`.

use std::collections::HashMap;

use reqwest::blocking::Client;

use crate::config::validate_url;
use crate::error::Result;
use crate::http::{create_client_with_timeout, fetch_text};

/// Supplies rendered page markup for a URL.
///
/// Implementations block; async callers run them on a blocking thread.
pub trait PageSource: Send + Sync {
    /// Fetch the rendered markup of the page at `url`.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pre-rendered XHTML over HTTP.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Create a source with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout_secs)?,
        })
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        validate_url(url)?;
        tracing::debug!(url = %url, "Fetching page");
        fetch_text(&self.client, url)
    }
}

/// Serves pages from memory, keyed by URL.
///
/// Useful for replaying saved snapshots and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
}

impl StaticPageSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the markup served for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }
}

impl PageSource for StaticPageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        self.pages.get(url).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no snapshot for {url}"),
            )
            .into()
        })
    }
}
