//! Index page link discovery.
//!
//! The systematic index lists every law text as an anchor inside a tree
//! node element. The page must be rendered with the tree expanded.

use std::collections::HashSet;

use roxmltree::Document;
use serde::Serialize;
use url::Url;

use crate::config::{validate_url, MarkupConfig};
use crate::dom::{find_all_by_tag, get_tag_name};
use crate::error::Result;
use crate::extract::node_text;

/// A link to a law text found on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexLink {
    /// Anchor text (usually number and title of the law).
    pub text: String,
    /// Absolute URL of the law text.
    pub href: String,
}

/// Collect the law-text links of an index page.
///
/// Relative hrefs are resolved against `index_url`. Anchors without an href,
/// hrefs that do not resolve to http(s) URLs, and repeated URLs are skipped.
/// Links are returned in document order.
pub fn collect_index_links(
    doc: &Document<'_>,
    index_url: &str,
    markup: &MarkupConfig,
) -> Result<Vec<IndexLink>> {
    let base = validate_url(index_url)?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for tree_node in find_all_by_tag(doc.root(), &markup.index_node_tag) {
        for anchor in tree_node
            .descendants()
            .filter(|n| n.is_element() && get_tag_name(*n) == "a")
        {
            let Some(href) = anchor.attribute("href") else {
                continue;
            };
            let Some(url) = resolve(&base, href) else {
                tracing::debug!(href = %href, "Skipping unresolvable index link");
                continue;
            };
            if seen.insert(url.clone()) {
                links.push(IndexLink {
                    text: node_text(anchor),
                    href: url,
                });
            }
        }
    }

    tracing::info!(links = links.len(), "Collected index links");
    Ok(links)
}

/// Parse index page markup and collect its law-text links.
pub fn index_links_from_page(
    markup_text: &str,
    index_url: &str,
    markup: &MarkupConfig,
) -> Result<Vec<IndexLink>> {
    let doc = Document::parse(markup_text)?;
    collect_index_links(&doc, index_url, markup)
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
