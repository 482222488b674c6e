//! Crawl driver.
//!
//! Documents are handled one at a time: fetch and extract the page, reconcile
//! its law text, then reconcile each article row in paragraph order. A fetch,
//! parse or store failure abandons the current document only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use belex_harvester::{
    extract_page, index_links_from_page, ExtractedDocument, IndexLink, MarkupConfig, PageSource,
};

use crate::error::{ReconcileError, Result};
use crate::reconcile::{Outcome, Reconciler};
use crate::record::{article_records, Record};
use crate::store::RecordStore;

/// Counts of what a crawl did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub documents: usize,
    pub documents_failed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl CrawlSummary {
    fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Inserted { .. } => self.inserted += 1,
            Outcome::Updated { .. } => self.updated += 1,
            Outcome::NoOpExisting(_) => self.unchanged += 1,
        }
    }
}

/// Where to start a crawl and how far to go.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub index_url: String,
    /// Stop after this many documents.
    pub limit: Option<usize>,
    pub markup: MarkupConfig,
    /// Checked between documents; set to stop the crawl early.
    pub stop: Arc<AtomicBool>,
}

impl CrawlOptions {
    pub fn new(index_url: impl Into<String>) -> Self {
        Self {
            index_url: index_url.into(),
            limit: None,
            markup: MarkupConfig::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Progress report sent after each document.
#[derive(Debug, Clone, Copy)]
pub struct CrawlProgress<'a> {
    /// Documents handled so far, including this one.
    pub position: usize,
    pub total: usize,
    pub url: &'a str,
    pub succeeded: bool,
}

/// Reconcile an extracted document: its law text first, then its article rows.
///
/// Stops at the first record that fails; the failure has already been
/// written to the error log by the reconciler.
pub async fn reconcile_document<S>(
    reconciler: &Reconciler<'_, S>,
    document: &ExtractedDocument,
    summary: &mut CrawlSummary,
) -> std::result::Result<(), ReconcileError>
where
    S: RecordStore + ?Sized,
{
    let law_text = Record::from(&document.header);
    let records = std::iter::once(law_text).chain(article_records(document));

    for record in records {
        match reconciler.reconcile(&record).await {
            Ok(outcome) => summary.count(&outcome),
            Err(e) => {
                summary.failed += 1;
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Fetch a page and extract its document on a blocking thread.
pub async fn fetch_document(
    source: Arc<dyn PageSource>,
    url: String,
    markup: MarkupConfig,
) -> Result<ExtractedDocument> {
    let document = tokio::task::spawn_blocking(move || -> belex_harvester::Result<ExtractedDocument> {
        let markup_text = source.fetch(&url)?;
        extract_page(&markup_text, &url, &markup)
    })
    .await??;
    Ok(document)
}

/// Fetch the index page and collect its law-text links.
pub async fn fetch_index(
    source: Arc<dyn PageSource>,
    index_url: String,
    markup: MarkupConfig,
) -> Result<Vec<IndexLink>> {
    let links = tokio::task::spawn_blocking(move || -> belex_harvester::Result<Vec<IndexLink>> {
        let markup_text = source.fetch(&index_url)?;
        index_links_from_page(&markup_text, &index_url, &markup)
    })
    .await??;
    Ok(links)
}

/// Crawl every law text listed on the index page.
///
/// Failing to load the index is fatal; a failing document is logged,
/// counted and skipped.
pub async fn run_crawl<S>(
    store: &S,
    source: Arc<dyn PageSource>,
    options: &CrawlOptions,
    mut on_progress: impl FnMut(CrawlProgress<'_>),
) -> Result<CrawlSummary>
where
    S: RecordStore + ?Sized,
{
    let mut links = fetch_index(
        Arc::clone(&source),
        options.index_url.clone(),
        options.markup.clone(),
    )
    .await?;
    if let Some(limit) = options.limit {
        links.truncate(limit);
    }

    let total = links.len();
    tracing::info!(index_url = %options.index_url, documents = total, "Starting crawl");

    let reconciler = Reconciler::new(store);
    let mut summary = CrawlSummary::default();

    for (position, link) in links.iter().enumerate() {
        if options.stop.load(Ordering::Relaxed) {
            tracing::info!(remaining = total - position, "Crawl stopped early");
            break;
        }

        summary.documents += 1;
        let succeeded =
            crawl_document(&reconciler, Arc::clone(&source), link, &options.markup, &mut summary)
                .await;
        if !succeeded {
            summary.documents_failed += 1;
        }

        on_progress(CrawlProgress {
            position: position + 1,
            total,
            url: &link.href,
            succeeded,
        });
    }

    tracing::info!(
        documents = summary.documents,
        documents_failed = summary.documents_failed,
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "Crawl finished"
    );
    Ok(summary)
}

async fn crawl_document<S>(
    reconciler: &Reconciler<'_, S>,
    source: Arc<dyn PageSource>,
    link: &IndexLink,
    markup: &MarkupConfig,
    summary: &mut CrawlSummary,
) -> bool
where
    S: RecordStore + ?Sized,
{
    let document = match fetch_document(source, link.href.clone(), markup.clone()).await {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(url = %link.href, error = %e, "Failed to load document");
            return false;
        }
    };

    log_document(&document);

    match reconcile_document(reconciler, &document, summary).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(url = %link.href, error = %e, "Abandoning document");
            false
        }
    }
}

fn log_document(document: &ExtractedDocument) {
    let header = &document.header;
    tracing::info!(
        url = %header.source_url,
        systematic_number = header.systematic_number.as_deref().unwrap_or_default(),
        title = header.title.as_deref().unwrap_or_default(),
        abbreviation = header.abbreviation.as_deref().unwrap_or_default(),
        articles = document.articles.len(),
        paragraphs = document.paragraph_count(),
        "Loaded document"
    );
    for article in &document.articles {
        tracing::debug!(
            article_number = %article.number,
            article_title = %article.title,
            paragraphs = article.paragraphs.len(),
            "Article"
        );
    }
}

/// Reconcile one saved page.
pub async fn import_page<S>(
    store: &S,
    markup_text: &str,
    source_url: &str,
    markup: &MarkupConfig,
) -> Result<CrawlSummary>
where
    S: RecordStore + ?Sized,
{
    let document = extract_page(markup_text, source_url, markup)?;
    log_document(&document);

    let reconciler = Reconciler::new(store);
    let mut summary = CrawlSummary {
        documents: 1,
        ..CrawlSummary::default()
    };
    reconcile_document(&reconciler, &document, &mut summary).await?;
    Ok(summary)
}
