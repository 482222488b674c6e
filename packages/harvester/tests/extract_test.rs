//! End-to-end extraction tests against saved BELEX page snapshots.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use belex_harvester::types::{OutlinePath, Paragraph};
use belex_harvester::{collect_index_links, extract_page, ExtractedDocument, MarkupConfig};

const SOURCE_URL: &str = "https://www.belex.sites.be.ch/app/de/texts_of_law/101.1";

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("belex")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn constitution() -> ExtractedDocument {
    extract_page(&load_fixture("law_101_1.xhtml"), SOURCE_URL, &MarkupConfig::default())
        .expect("fixture is well-formed")
}

#[test]
fn test_header() {
    let header = constitution().header;

    assert_eq!(header.systematic_number.as_deref(), Some("101.1"));
    assert_eq!(header.title.as_deref(), Some("Verfassung des Kantons Bern"));
    assert_eq!(header.abbreviation.as_deref(), Some("KV"));
    assert_eq!(header.enactment.as_deref(), Some("vom 6. Juni 1993"));
    assert_eq!(header.ingress_author.as_deref(), Some("Das Volk des Kantons Bern,"));
    assert_eq!(
        header.ingress_foundation.as_deref(),
        Some("im Bewusstsein seiner Verantwortung vor Gott gegenüber Mensch und Umwelt,")
    );
    assert_eq!(header.ingress_action.as_deref(), Some("beschliesst:"));
    assert_eq!(header.source_url, SOURCE_URL);
}

#[test]
fn test_article_count_and_order() {
    let numbers: Vec<String> = constitution()
        .articles
        .into_iter()
        .map(|a| a.number)
        .collect();
    assert_eq!(numbers, vec!["Art. 1", "Art. 2", "Art. 9", "Art. 10"]);
}

#[test]
fn test_paragraphs_with_absorbed_annotations() {
    let doc = constitution();
    assert_eq!(
        doc.articles[0].paragraphs,
        vec![
            Paragraph::new(
                "1",
                "Der Kanton Bern ist ein freiheitlicher, demokratischer und sozialer Rechtsstaat."
            ),
            Paragraph::new(
                "2",
                "Er ist ein Gliedstaat der Schweizerischen Eidgenossenschaft. \
                 Fassung gemäss Volksbeschluss vom 24. 9. 2006 In Kraft seit 1. 1. 2007"
            ),
            Paragraph::new("3", "Die Staatsgewalt beruht auf dem Volk."),
        ]
    );
}

#[test]
fn test_unnumbered_paragraph() {
    let doc = constitution();
    assert_eq!(
        doc.articles[1].paragraphs,
        vec![Paragraph::new(
            "",
            "Das Kantonsgebiet ist in Verwaltungskreise eingeteilt."
        )]
    );
}

#[test]
fn test_outline_paths() {
    let doc = constitution();

    assert_eq!(
        doc.articles[0].outline,
        OutlinePath {
            book_name: "1. Allgemeine Bestimmungen".to_string(),
            ..OutlinePath::default()
        }
    );
    assert_eq!(
        doc.articles[2].outline,
        OutlinePath {
            book_name: "2. Grundrechte".to_string(),
            part_name: "2.1 Menschenwürde".to_string(),
            ..OutlinePath::default()
        }
    );
    assert_eq!(
        doc.articles[3].outline,
        OutlinePath {
            book_name: "2. Grundrechte".to_string(),
            ..OutlinePath::default()
        }
    );
}

#[test]
fn test_missing_article_title_and_body() {
    let doc = constitution();
    assert_eq!(doc.articles[2].title, "");
    assert!(doc.articles[3].paragraphs.is_empty());
    assert_eq!(doc.paragraph_count(), 5);
}

#[test]
fn test_index_links() {
    let xml = load_fixture("index.xhtml");
    let doc = roxmltree::Document::parse(&xml).expect("fixture is well-formed");
    let links = collect_index_links(
        &doc,
        "https://www.belex.sites.be.ch/app/de/systematic/texts_of_law",
        &MarkupConfig::default(),
    )
    .unwrap();

    let hrefs: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec![
            "https://www.belex.sites.be.ch/app/de/texts_of_law/101.1",
            "https://www.belex.sites.be.ch/app/de/texts_of_law/102.1",
        ]
    );
    assert_eq!(links[0].text, "101.1 Verfassung des Kantons Bern");
}
