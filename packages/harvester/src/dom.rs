//! Tree-query helpers over a rendered page.
//!
//! This is the page capability the extractor consumes: find-one, find-all,
//! closest-ancestor and sibling navigation, and text extraction. Nodes are
//! `roxmltree` nodes of the page's XHTML serialization.

use regex::Regex;
use roxmltree::Node;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex"));

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use belex_harvester::dom::get_tag_name;
///
/// let xml = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body/></html>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "html");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check whether an element carries a class token.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use belex_harvester::dom::has_class;
///
/// let doc = Document::parse(r#"<p class="paragraph  note"/>"#).unwrap();
/// assert!(has_class(doc.root_element(), "note"));
/// assert!(!has_class(doc.root_element(), "para"));
/// ```
pub fn has_class(node: Node<'_, '_>, class: &str) -> bool {
    node.is_element()
        && node
            .attribute("class")
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
}

/// Find the first descendant element (excluding `node` itself) with a class.
pub fn find_by_class<'a, 'input>(node: Node<'a, 'input>, class: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|candidate| has_class(*candidate, class))
}

/// Find all descendant elements (excluding `node` itself) with a class, in document order.
pub fn find_all_by_class<'a, 'input>(
    node: Node<'a, 'input>,
    class: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |candidate| has_class(*candidate, class))
}

/// Find all descendant elements with a tag name, in document order.
pub fn find_all_by_tag<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |candidate| candidate.is_element() && get_tag_name(*candidate) == tag)
}

/// Text of the first descendant with a class, trimmed.
///
/// Returns `None` when no element matches; an element without text yields
/// `Some("")`.
pub fn find_text(node: Node<'_, '_>, class: &str) -> Option<String> {
    find_by_class(node, class).map(|found| clean_text(&text_content(found)))
}

/// The nearest ancestor-or-self element carrying a class.
pub fn closest<'a, 'input>(node: Node<'a, 'input>, class: &str) -> Option<Node<'a, 'input>> {
    node.ancestors().find(|candidate| has_class(*candidate, class))
}

/// Ancestor elements (excluding `node` itself) carrying a class, innermost first.
pub fn ancestors_with_class<'a, 'input>(
    node: Node<'a, 'input>,
    class: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    let above = |n: Node<'a, 'input>| n.parent().and_then(|parent| closest(parent, class));
    std::iter::successors(above(node), move |found| above(*found))
}

/// The closest preceding sibling that is an element.
pub fn previous_element_sibling<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.prev_siblings().skip(1).find(|sibling| sibling.is_element())
}

/// The closest following sibling that is an element.
pub fn next_element_sibling<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.next_siblings().skip(1).find(|sibling| sibling.is_element())
}

/// Concatenated text of all descendant text nodes, NFC-normalized.
///
/// Works for text nodes too, which yield their own text.
pub fn text_content(node: Node<'_, '_>) -> String {
    text_content_excluding(node, None)
}

/// Like [`text_content`], but skips the text of descendants carrying `class`.
pub fn text_content_excluding(node: Node<'_, '_>, class: Option<&str>) -> String {
    let raw: String = node
        .descendants()
        .filter(|candidate| candidate.is_text())
        .filter(|text| match class {
            Some(class) => !text
                .ancestors()
                .take_while(|ancestor| *ancestor != node)
                .any(|ancestor| has_class(ancestor, class)),
            None => true,
        })
        .filter_map(|text| text.text())
        .collect();
    raw.nfc().collect()
}

/// Replace line breaks with spaces.
///
/// # Examples
/// ```
/// use belex_harvester::dom::normalize_line_breaks;
///
/// assert_eq!(normalize_line_breaks("a\nb\r\nc"), "a b c");
/// ```
pub fn normalize_line_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

/// Line breaks replaced with spaces, then trimmed.
pub fn clean_text(text: &str) -> String {
    normalize_line_breaks(text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn by_id<'a, 'input>(doc: &'a Document<'input>, id: &str) -> Node<'a, 'input> {
        doc.descendants()
            .find(|n| n.attribute("id") == Some(id))
            .unwrap()
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<h:div xmlns:h="http://www.w3.org/1999/xhtml"><h:span/></h:div>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "div");
    }

    #[test]
    fn test_has_class_matches_tokens_only() {
        let doc = Document::parse(r#"<div class="section-title big"/>"#).unwrap();
        let root = doc.root_element();
        assert!(has_class(root, "section-title"));
        assert!(has_class(root, "big"));
        assert!(!has_class(root, "title"));
        assert!(!has_class(root, "section"));
    }

    #[test]
    fn test_has_class_without_attribute() {
        let doc = Document::parse("<div/>").unwrap();
        assert!(!has_class(doc.root_element(), "x"));
    }

    #[test]
    fn test_find_by_class_excludes_self() {
        let doc =
            Document::parse(r#"<div class="a"><span class="a" id="inner">x</span></div>"#).unwrap();
        let found = find_by_class(doc.root_element(), "a").unwrap();
        assert_eq!(found.attribute("id"), Some("inner"));
    }

    #[test]
    fn test_find_all_by_class_document_order() {
        let xml = r#"<div><p class="x">1</p><div><p class="x">2</p></div><p class="x">3</p></div>"#;
        let doc = Document::parse(xml).unwrap();
        let texts: Vec<String> = find_all_by_class(doc.root_element(), "x")
            .map(text_content)
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_text_missing_is_none() {
        let doc = Document::parse(r#"<div><span class="a"> A </span></div>"#).unwrap();
        assert_eq!(find_text(doc.root(), "a"), Some("A".to_string()));
        assert_eq!(find_text(doc.root(), "b"), None);
    }

    #[test]
    fn test_find_text_empty_element_is_some_empty() {
        let doc = Document::parse(r#"<div><span class="a"/></div>"#).unwrap();
        assert_eq!(find_text(doc.root(), "a"), Some(String::new()));
    }

    #[test]
    fn test_closest_includes_self() {
        let xml = r#"<div class="c" id="outer"><div class="c" id="inner"><p id="p"/></div></div>"#;
        let doc = Document::parse(xml).unwrap();
        let p = by_id(&doc, "p");
        assert_eq!(closest(p, "c").unwrap().attribute("id"), Some("inner"));
        let inner = by_id(&doc, "inner");
        assert_eq!(closest(inner, "c").unwrap().attribute("id"), Some("inner"));
        assert!(closest(p, "missing").is_none());
    }

    #[test]
    fn test_ancestors_with_class_innermost_first() {
        let xml = r#"<div class="c" id="outer"><div><div class="c" id="inner"><p id="p"/></div></div></div>"#;
        let doc = Document::parse(xml).unwrap();
        let ids: Vec<_> = ancestors_with_class(by_id(&doc, "p"), "c")
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["inner", "outer"]);
    }

    #[test]
    fn test_element_siblings_skip_text() {
        let xml = "<div>\n  <a id=\"a\"/>\n  text\n  <b id=\"b\"/>\n</div>";
        let doc = Document::parse(xml).unwrap();
        let a = by_id(&doc, "a");
        let b = by_id(&doc, "b");
        assert_eq!(next_element_sibling(a).unwrap().attribute("id"), Some("b"));
        assert_eq!(previous_element_sibling(b).unwrap().attribute("id"), Some("a"));
        assert!(previous_element_sibling(a).is_none());
        assert!(next_element_sibling(b).is_none());
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = Document::parse("<p>Hello <b>bold</b> world</p>").unwrap();
        assert_eq!(text_content(doc.root_element()), "Hello bold world");
    }

    #[test]
    fn test_text_content_is_nfc_normalized() {
        // "u" followed by a combining diaeresis
        let doc = Document::parse("<p>Gru\u{0308}nde</p>").unwrap();
        assert_eq!(text_content(doc.root_element()), "Gr\u{00fc}nde");
    }

    #[test]
    fn test_text_content_excluding_class() {
        let doc =
            Document::parse(r#"<p><span class="number">1</span>Der Text</p>"#).unwrap();
        assert_eq!(
            text_content_excluding(doc.root_element(), Some("number")),
            "Der Text"
        );
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  line one\nline two\r\n"), "line one line two");
        assert_eq!(clean_text(""), "");
    }
}
