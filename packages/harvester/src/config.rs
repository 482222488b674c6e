//! Configuration constants, markup vocabulary and validation functions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

use crate::error::{HarvesterError, Result};

/// Systematic index of the Bern law collection.
pub const DEFAULT_INDEX_URL: &str = "https://www.belex.sites.be.ch/app/de/systematic/texts_of_law";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Systematic register number pattern: groups of digits separated by dots (e.g. "101.1").
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SYSTEMATIC_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid regex"));

/// Class tokens and tag names that identify the parts of a rendered page.
///
/// The defaults match the BELEX web application. Class matching is token
/// based, so `class="paragraph footnoted"` matches `paragraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub systematic_number: String,
    pub title: String,
    pub abbreviation: String,
    pub enactment: String,
    pub ingress_author: String,
    pub ingress_foundation: String,
    pub ingress_action: String,

    /// Header node of a single article.
    pub article: String,
    pub article_number: String,
    pub article_title: String,

    /// Expandable block: wraps outline levels and article bodies.
    pub collapsible: String,
    /// Heading that precedes a collapsible outline level.
    pub section_title: String,
    pub paragraph: String,
    pub paragraph_number: String,

    /// Tag name of the index tree entries that hold links to law texts.
    pub index_node_tag: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            systematic_number: "systematic_number".into(),
            title: "title".into(),
            abbreviation: "abbreviation".into(),
            enactment: "enactment".into(),
            ingress_author: "ingress_author".into(),
            ingress_foundation: "ingress_foundation".into(),
            ingress_action: "ingress_action".into(),
            article: "type-article".into(),
            article_number: "article_number".into(),
            article_title: "article_title".into(),
            collapsible: "collapsible".into(),
            section_title: "section-title".into(),
            paragraph: "paragraph".into(),
            paragraph_number: "number".into(),
            index_node_tag: "clex-tree-node".into(),
        }
    }
}

/// Check whether a string looks like a systematic register number.
///
/// # Examples
/// ```
/// use belex_harvester::config::is_systematic_number;
///
/// assert!(is_systematic_number("101.1"));
/// assert!(is_systematic_number("661"));
/// assert!(!is_systematic_number("BSG 101.1"));
/// ```
pub fn is_systematic_number(value: &str) -> bool {
    SYSTEMATIC_NUMBER_PATTERN.is_match(value)
}

/// Validate and parse an http(s) URL.
///
/// # Returns
/// * `Ok(Url)` if the string parses and uses the `http` or `https` scheme
/// * `Err(HarvesterError::InvalidUrl)` otherwise
///
/// # Examples
/// ```
/// use belex_harvester::config::validate_url;
///
/// assert!(validate_url("https://www.belex.sites.be.ch/app/de/texts_of_law/101.1").is_ok());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| HarvesterError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HarvesterError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_systematic_number() {
        assert!(is_systematic_number("101"));
        assert!(is_systematic_number("101.1"));
        assert!(is_systematic_number("152.01.2"));
        assert!(!is_systematic_number(""));
        assert!(!is_systematic_number("101."));
        assert!(!is_systematic_number(".1"));
        assert!(!is_systematic_number("10a"));
    }

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("http://localhost:8080/index").is_ok());
        assert!(validate_url(DEFAULT_INDEX_URL).is_ok());
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        let err = validate_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'file'"));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("").is_err());
        assert!(validate_url("belex").is_err());
    }

    #[test]
    fn test_markup_config_defaults() {
        let markup = MarkupConfig::default();
        assert_eq!(markup.article, "type-article");
        assert_eq!(markup.section_title, "section-title");
        assert_eq!(markup.index_node_tag, "clex-tree-node");
    }

    #[test]
    fn test_markup_config_partial_override() {
        let markup: MarkupConfig =
            serde_json::from_str(r#"{"paragraph": "absatz"}"#).unwrap();
        assert_eq!(markup.paragraph, "absatz");
        assert_eq!(markup.collapsible, "collapsible");
    }
}
