//! HTTP client wrapper for fetching rendered pages.
//!
//! Requests are made once; retrying and rate limiting are left to whoever
//! drives the crawl.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("belex-harvester/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client with the default timeout.
pub fn create_client() -> Result<Client> {
    create_client_with_timeout(HTTP_TIMEOUT_SECS)
}

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout_secs` - Request timeout in seconds
pub fn create_client_with_timeout(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download a page and return its body as text.
///
/// Non-success statuses are errors.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let wrap = |source: reqwest::Error| HarvesterError::PageDownload {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(wrap)?;
    let response = response.error_for_status().map_err(wrap)?;
    let bytes = response.bytes().map_err(wrap)?;

    Ok(bytes_to_string(&bytes, url))
}

/// Decode a response body as UTF-8, replacing invalid sequences.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(context = %context, error = %e, "Response is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
