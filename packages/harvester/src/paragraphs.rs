//! Paragraph extraction for article bodies.
//!
//! An article's body is the collapsible block right after the article node.
//! Annotations and footnotes are rendered as separate siblings after the
//! paragraph they belong to; they are folded into that paragraph's text.

use roxmltree::Node;

use crate::config::MarkupConfig;
use crate::dom::{
    clean_text, find_all_by_class, find_by_class, find_text, has_class, next_element_sibling,
    text_content, text_content_excluding,
};
use crate::types::Paragraph;

/// Separator placed between a paragraph's own text and absorbed sibling text.
pub const ABSORB_SEPARATOR: &str = " ";

/// The collapsible body block of an article, if the page has one.
pub fn body_of<'a, 'input>(
    article: Node<'a, 'input>,
    markup: &MarkupConfig,
) -> Option<Node<'a, 'input>> {
    next_element_sibling(article).filter(|block| has_class(*block, &markup.collapsible))
}

/// All paragraphs of an article, in document order.
///
/// Returns an empty list when the article has no body block or the block
/// holds no paragraph nodes.
pub fn paragraphs_for(article: Node<'_, '_>, markup: &MarkupConfig) -> Vec<Paragraph> {
    let Some(body) = body_of(article, markup) else {
        return Vec::new();
    };

    find_all_by_class(body, &markup.paragraph)
        .map(|node| merge_paragraph(node, markup))
        .collect()
}

/// Build one paragraph from its node and the siblings that trail it.
///
/// The paragraph's own text (without its number) is extended with the text
/// of every following sibling up to the next paragraph node, or up to a
/// sibling that holds paragraph nodes of its own.
pub fn merge_paragraph(node: Node<'_, '_>, markup: &MarkupConfig) -> Paragraph {
    let number = find_text(node, &markup.paragraph_number).unwrap_or_default();

    let mut pieces = vec![clean_text(&text_content_excluding(
        node,
        Some(&markup.paragraph_number),
    ))];

    for sibling in node.next_siblings().skip(1) {
        if has_class(sibling, &markup.paragraph)
            || find_by_class(sibling, &markup.paragraph).is_some()
        {
            break;
        }
        pieces.push(clean_text(&text_content(sibling)));
    }

    let text = pieces
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(ABSORB_SEPARATOR);

    Paragraph { number, text }
}
