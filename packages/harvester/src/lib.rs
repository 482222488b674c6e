//! BELEX Harvester - Extract law texts from the Bern legal-code website.
//!
//! This crate turns a rendered law-text page into a flat header plus a list
//! of articles, each carrying its full outline path and its paragraphs.
//!
//! # Example
//!
//! ```
//! use belex_harvester::{extract_page, MarkupConfig};
//!
//! let page = r#"<main>
//!     <span class="systematic_number">101.1</span>
//!     <div class="type-article"><span class="article_number">Art. 1</span></div>
//!     <div class="collapsible"><p class="paragraph">Text</p></div>
//! </main>"#;
//!
//! let doc = extract_page(page, "https://example.test", &MarkupConfig::default()).unwrap();
//! assert_eq!(doc.header.systematic_number.as_deref(), Some("101.1"));
//! assert_eq!(doc.articles[0].paragraphs[0].text, "Text");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, markup vocabulary and validation
//! - [`types`]: Extracted data types (header, article, outline, paragraph)
//! - [`error`]: Error types and Result alias
//! - [`dom`]: Tree-query helpers over the rendered page
//! - [`outline`]: Outline path reconstruction
//! - [`paragraphs`]: Paragraph extraction and annotation merging
//! - [`extract`]: Whole-page extraction
//! - [`index`]: Law-text links on the index page
//! - [`http`]: HTTP client
//! - [`source`]: Page sources
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod http;
pub mod index;
pub mod outline;
pub mod paragraphs;
pub mod source;
pub mod types;

// Re-export main functions
pub use extract::{extract_document, extract_page};
pub use index::{collect_index_links, index_links_from_page, IndexLink};

// Re-export commonly used items
pub use config::MarkupConfig;
pub use error::{HarvesterError, Result};
pub use source::{HttpPageSource, PageSource, StaticPageSource};
pub use types::{ExtractedArticle, ExtractedDocument, LawTextHeader, OutlinePath, Paragraph};
