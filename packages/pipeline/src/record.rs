//! Records handed to the reconciliation engine.
//!
//! A [`Record`] is what the extractor produced for one row: field names with
//! optional values. It is merged over the field defaults of its entity kind
//! before it is compared with the store.

use belex_harvester::{ExtractedArticle, ExtractedDocument, LawTextHeader, Paragraph};

use crate::fields::{EntityKind, Fields};

/// Scraped values for one entity, possibly partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: EntityKind,
    values: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    pub fn law_text() -> Self {
        Self::new(EntityKind::LawText)
    }

    pub fn article() -> Self {
        Self::new(EntityKind::Article)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Set a field value. A later value for the same field wins.
    #[must_use]
    pub fn set(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_opt(name, Some(value.into()))
    }

    /// Set a field that may be absent.
    #[must_use]
    pub fn set_opt(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    /// Merge over the default template of this kind.
    ///
    /// Absent values take the field default. Unknown field names are ignored.
    pub fn merged(&self) -> Fields {
        let mut fields = Fields::defaults(self.kind);
        for (name, value) in &self.values {
            let Some(value) = value else {
                continue;
            };
            if !fields.set(name, value.as_str()) {
                tracing::warn!(kind = %self.kind, field = %name, "Ignoring unrecognized field");
            }
        }
        fields
    }
}

impl From<&LawTextHeader> for Record {
    fn from(header: &LawTextHeader) -> Self {
        Record::law_text()
            .set_opt("systematic_number", header.systematic_number.clone())
            .set_opt("title", header.title.clone())
            .set_opt("abbreviation", header.abbreviation.clone())
            .set_opt("enactment", header.enactment.clone())
            .set_opt("ingress_author", header.ingress_author.clone())
            .set_opt("ingress_foundation", header.ingress_foundation.clone())
            .set_opt("ingress_action", header.ingress_action.clone())
            .set("source_url", header.source_url.as_str())
    }
}

/// One article row for a paragraph, or for the bare article when it has none.
pub fn article_record(
    header: &LawTextHeader,
    article: &ExtractedArticle,
    paragraph: Option<&Paragraph>,
) -> Record {
    let mut record = Record::article()
        .set_opt("systematic_number", header.systematic_number.clone())
        .set_opt("abbreviation", header.abbreviation.clone());

    for (level, title) in article.outline.levels() {
        record = record.set(level, title);
    }

    record
        .set("article_number", article.number.as_str())
        .set("article_title", article.title.as_str())
        .set_opt("paragraph_number", paragraph.map(|p| p.number.clone()))
        .set_opt("paragraph_text", paragraph.map(|p| p.text.clone()))
}

/// All article rows of a document, in document and paragraph order.
pub fn article_records(document: &ExtractedDocument) -> Vec<Record> {
    let header = &document.header;
    document
        .articles
        .iter()
        .flat_map(|article| {
            if article.paragraphs.is_empty() {
                vec![article_record(header, article, None)]
            } else {
                article
                    .paragraphs
                    .iter()
                    .map(|paragraph| article_record(header, article, Some(paragraph)))
                    .collect()
            }
        })
        .collect()
}
