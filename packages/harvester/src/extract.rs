//! Document extraction: turns a rendered law-text page into an [`ExtractedDocument`].

use roxmltree::{Document, Node};

use crate::config::{is_systematic_number, MarkupConfig};
use crate::dom::{clean_text, find_all_by_class, find_text, text_content};
use crate::error::Result;
use crate::outline::outline_for;
use crate::paragraphs::paragraphs_for;
use crate::types::{ExtractedArticle, ExtractedDocument, LawTextHeader};

/// Parse page markup and extract the law text it shows.
///
/// # Arguments
/// * `markup_text` - XHTML serialization of the rendered page
/// * `source_url` - URL the page was rendered from
/// * `markup` - Class vocabulary of the page
///
/// # Returns
/// The extracted document; fails only when the markup is not well-formed.
pub fn extract_page(
    markup_text: &str,
    source_url: &str,
    markup: &MarkupConfig,
) -> Result<ExtractedDocument> {
    let doc = Document::parse(markup_text)?;
    Ok(extract_document(&doc, source_url, markup))
}

/// Extract header and articles from a parsed page.
pub fn extract_document(
    doc: &Document<'_>,
    source_url: &str,
    markup: &MarkupConfig,
) -> ExtractedDocument {
    let root = doc.root();
    let header = extract_header(root, source_url, markup);
    let articles = extract_articles(root, markup);

    tracing::info!(
        systematic_number = header.systematic_number.as_deref().unwrap_or_default(),
        title = header.title.as_deref().unwrap_or_default(),
        articles = articles.len(),
        "Extracted law text"
    );

    ExtractedDocument { header, articles }
}

/// Extract the flat header fields of a law text.
pub fn extract_header(root: Node<'_, '_>, source_url: &str, markup: &MarkupConfig) -> LawTextHeader {
    let header = LawTextHeader {
        systematic_number: lookup(root, &markup.systematic_number),
        title: lookup(root, &markup.title),
        abbreviation: lookup(root, &markup.abbreviation),
        enactment: lookup(root, &markup.enactment),
        ingress_author: lookup(root, &markup.ingress_author),
        ingress_foundation: lookup(root, &markup.ingress_foundation),
        ingress_action: lookup(root, &markup.ingress_action),
        source_url: source_url.to_string(),
    };

    if let Some(number) = header.systematic_number.as_deref() {
        if !is_systematic_number(number) {
            tracing::warn!(systematic_number = %number, url = %source_url, "Unexpected systematic number format");
        }
    }

    header
}

/// Extract every article on the page, in document order.
pub fn extract_articles(root: Node<'_, '_>, markup: &MarkupConfig) -> Vec<ExtractedArticle> {
    find_all_by_class(root, &markup.article)
        .map(|node| extract_article(node, markup))
        .collect()
}

/// Extract one article: number, title, outline and paragraphs.
pub fn extract_article(node: Node<'_, '_>, markup: &MarkupConfig) -> ExtractedArticle {
    let number = find_text(node, &markup.article_number).unwrap_or_default();
    let title = find_text(node, &markup.article_title).unwrap_or_default();

    tracing::debug!(article_number = %number, article_title = %title, "Article");

    ExtractedArticle {
        number,
        title,
        outline: outline_for(node, markup),
        paragraphs: paragraphs_for(node, markup),
    }
}

/// Single-field lookup; a missing element resolves to `None`.
fn lookup(root: Node<'_, '_>, class: &str) -> Option<String> {
    let value = find_text(root, class);
    if value.is_none() {
        tracing::debug!(selector = %format!(".{class}"), "No element found for selector");
    }
    value
}

/// Text of a node with line breaks flattened, for callers that hold a node.
pub fn node_text(node: Node<'_, '_>) -> String {
    clean_text(&text_content(node))
}
