//! Outline reconstruction for articles.
//!
//! The rendered page nests each outline level (book, part, title, ...) in a
//! collapsible container whose heading is the element right before it. An
//! article's outline path is rebuilt from the headings of the collapsible
//! containers it sits in.

use roxmltree::Node;

use crate::config::MarkupConfig;
use crate::dom::{ancestors_with_class, clean_text, has_class, previous_element_sibling, text_content};
use crate::types::OutlinePath;

/// Heading text of a collapsible container, if its preceding sibling is a section title.
pub fn section_title_of(container: Node<'_, '_>, markup: &MarkupConfig) -> Option<String> {
    previous_element_sibling(container)
        .filter(|heading| has_class(*heading, &markup.section_title))
        .map(|heading| clean_text(&text_content(heading)))
        .filter(|title| !title.is_empty())
}

/// Headings on the path from an article to the document root, innermost first.
pub fn outline_titles(article: Node<'_, '_>, markup: &MarkupConfig) -> Vec<String> {
    ancestors_with_class(article, &markup.collapsible)
        .filter_map(|container| section_title_of(container, markup))
        .collect()
}

/// Rebuild the outline path of an article.
///
/// Headings are assigned outermost first, so a book and a part above an
/// article land in `book_name` and `part_name` with all finer levels empty.
/// A level missing from the markup is not detected: the levels below it
/// move up by one slot. When the page nests deeper than eight levels the
/// innermost headings are dropped.
pub fn outline_for(article: Node<'_, '_>, markup: &MarkupConfig) -> OutlinePath {
    let mut titles = outline_titles(article, markup);

    if titles.len() > OutlinePath::DEPTH {
        tracing::warn!(
            levels = titles.len(),
            dropped = ?&titles[..titles.len() - OutlinePath::DEPTH],
            "Outline deeper than supported, dropping innermost headings"
        );
        titles.drain(..titles.len() - OutlinePath::DEPTH);
    }

    titles.reverse();
    OutlinePath::from_titles(titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    fn article<'a, 'input>(doc: &'a Document<'input>) -> Node<'a, 'input> {
        doc.descendants()
            .find(|n| has_class(*n, "type-article"))
            .unwrap()
    }

    #[test]
    fn test_book_and_part_fill_general_levels() {
        let xml = r#"<main>
            <div class="section-title">BookA</div>
            <div class="collapsible">
                <div class="section-title">PartA</div>
                <div class="collapsible">
                    <div class="type-article"/>
                </div>
            </div>
        </main>"#;
        let doc = Document::parse(xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());

        assert_eq!(
            outline,
            OutlinePath {
                book_name: "BookA".to_string(),
                part_name: "PartA".to_string(),
                ..OutlinePath::default()
            }
        );
    }

    #[test]
    fn test_all_eight_levels() {
        let mut xml = String::from("<main>");
        for level in 1..=8 {
            xml.push_str(&format!(
                r#"<h2 class="section-title">L{level}</h2><div class="collapsible">"#
            ));
        }
        xml.push_str(r#"<div class="type-article"/>"#);
        for _ in 1..=8 {
            xml.push_str("</div>");
        }
        xml.push_str("</main>");

        let doc = Document::parse(&xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());
        assert_eq!(outline.book_name, "L1");
        assert_eq!(outline.chapter_name, "L5");
        assert_eq!(outline.sub_section_name, "L8");
    }

    #[test]
    fn test_deeper_than_eight_drops_innermost() {
        let mut xml = String::from("<main>");
        for level in 1..=9 {
            xml.push_str(&format!(
                r#"<h2 class="section-title">L{level}</h2><div class="collapsible">"#
            ));
        }
        xml.push_str(r#"<div class="type-article"/>"#);
        for _ in 1..=9 {
            xml.push_str("</div>");
        }
        xml.push_str("</main>");

        let doc = Document::parse(&xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());
        assert_eq!(outline.book_name, "L1");
        assert_eq!(outline.sub_section_name, "L8");
    }

    #[test]
    fn test_container_without_heading_contributes_nothing() {
        let xml = r#"<main>
            <div class="section-title">Book</div>
            <div class="collapsible">
                <p>intro</p>
                <div class="collapsible">
                    <div class="type-article"/>
                </div>
            </div>
        </main>"#;
        let doc = Document::parse(xml).unwrap();
        let titles = outline_titles(article(&doc), &MarkupConfig::default());
        assert_eq!(titles, vec!["Book".to_string()]);
    }

    #[test]
    fn test_non_collapsible_ancestors_ignored() {
        let xml = r#"<main>
            <div class="section-title">Ignored</div>
            <div class="wrapper">
                <div class="type-article"/>
            </div>
        </main>"#;
        let doc = Document::parse(xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());
        assert_eq!(outline, OutlinePath::default());
    }

    #[test]
    fn test_heading_text_normalized() {
        let xml = "<main><div class=\"section-title\">\n  1. Teil\n  Allgemeines\n</div>\
                   <div class=\"collapsible\"><div class=\"type-article\"/></div></main>";
        let doc = Document::parse(xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());
        assert_eq!(outline.book_name, "1. Teil   Allgemeines");
    }

    #[test]
    fn test_skipped_level_shifts_following_levels() {
        // Book, then directly a chapter heading: the chapter lands in part_name.
        let xml = r#"<main>
            <div class="section-title">Book</div>
            <div class="collapsible">
                <div class="section-title">Chapter</div>
                <div class="collapsible"><div class="type-article"/></div>
            </div>
        </main>"#;
        let doc = Document::parse(xml).unwrap();
        let outline = outline_for(article(&doc), &MarkupConfig::default());
        assert_eq!(outline.part_name, "Chapter");
        assert_eq!(outline.chapter_name, "");
    }
}
