//! Core data types produced by the extractor.
//!
//! An [`ExtractedDocument`] is one law text: its flat header fields plus every
//! article with its outline path and paragraphs.

use serde::{Deserialize, Serialize};

/// Flat header fields of a law text.
///
/// Every field except `source_url` is `None` when the page has no element for
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawTextHeader {
    /// Systematic register number (e.g., "101.1").
    pub systematic_number: Option<String>,
    pub title: Option<String>,
    pub abbreviation: Option<String>,
    /// Enactment clause.
    pub enactment: Option<String>,
    pub ingress_author: Option<String>,
    pub ingress_foundation: Option<String>,
    pub ingress_action: Option<String>,
    /// URL the page was rendered from.
    pub source_url: String,
}

/// Location of an article in the document outline, most general level first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutlinePath {
    pub book_name: String,
    pub part_name: String,
    pub title_name: String,
    pub sub_title_name: String,
    pub chapter_name: String,
    pub sub_chapter_name: String,
    pub section_name: String,
    pub sub_section_name: String,
}

impl OutlinePath {
    /// Number of outline levels.
    pub const DEPTH: usize = 8;

    /// Level names, most general first.
    pub const LEVELS: [&'static str; Self::DEPTH] = [
        "book_name",
        "part_name",
        "title_name",
        "sub_title_name",
        "chapter_name",
        "sub_chapter_name",
        "section_name",
        "sub_section_name",
    ];

    /// Build a path from titles ordered outermost first.
    ///
    /// Titles beyond [`Self::DEPTH`] are ignored.
    ///
    /// # Examples
    /// ```
    /// use belex_harvester::types::OutlinePath;
    ///
    /// let path = OutlinePath::from_titles(["Book A", "Part A"]);
    /// assert_eq!(path.book_name, "Book A");
    /// assert_eq!(path.part_name, "Part A");
    /// assert!(path.chapter_name.is_empty());
    /// ```
    #[must_use]
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::default();
        for (slot, title) in path.slots_mut().into_iter().zip(titles) {
            *slot = title.into();
        }
        path
    }

    /// `(level name, value)` pairs, most general level first.
    #[must_use]
    pub fn levels(&self) -> [(&'static str, &str); Self::DEPTH] {
        [
            (Self::LEVELS[0], self.book_name.as_str()),
            (Self::LEVELS[1], self.part_name.as_str()),
            (Self::LEVELS[2], self.title_name.as_str()),
            (Self::LEVELS[3], self.sub_title_name.as_str()),
            (Self::LEVELS[4], self.chapter_name.as_str()),
            (Self::LEVELS[5], self.sub_chapter_name.as_str()),
            (Self::LEVELS[6], self.section_name.as_str()),
            (Self::LEVELS[7], self.sub_section_name.as_str()),
        ]
    }

    fn slots_mut(&mut self) -> [&mut String; Self::DEPTH] {
        [
            &mut self.book_name,
            &mut self.part_name,
            &mut self.title_name,
            &mut self.sub_title_name,
            &mut self.chapter_name,
            &mut self.sub_chapter_name,
            &mut self.section_name,
            &mut self.sub_section_name,
        ]
    }
}

/// One paragraph of an article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph number; empty when the page shows none.
    pub number: String,
    /// Paragraph text including absorbed annotations.
    pub text: String,
}

impl Paragraph {
    #[must_use]
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }
}

/// A single article with its outline location and paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    /// Article number (e.g., "Art. 12a"); empty when missing.
    pub number: String,
    /// Article title; empty when missing.
    pub title: String,
    pub outline: OutlinePath,
    pub paragraphs: Vec<Paragraph>,
}

/// A complete law text as read from one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub header: LawTextHeader,
    pub articles: Vec<ExtractedArticle>,
}

impl ExtractedDocument {
    /// Total number of paragraphs over all articles.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.articles.iter().map(|a| a.paragraphs.len()).sum()
    }
}
