//! Command-line interface for `belex-harvest`.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use belex_harvester::{HttpPageSource, MarkupConfig, PageSource};

use crate::config::{CrawlConfig, PipelineConfig};
use crate::crawl::{import_page, run_crawl, CrawlOptions, CrawlProgress, CrawlSummary};
use crate::db;
use crate::error::Result;
use crate::store::{MemoryStore, MySqlStore, RecordStore};

/// BELEX harvest - Reconcile the Bern law collection into MySQL.
#[derive(Parser)]
#[command(name = "belex-harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print the run summary as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or upgrade the database tables
    Migrate,

    /// Crawl every law text listed on the index page
    Crawl {
        /// Index page listing the law texts (default: BELEX_INDEX_URL)
        #[arg(long)]
        index_url: Option<String>,

        /// Stop after this many documents
        #[arg(long)]
        limit: Option<usize>,

        /// Reconcile into an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconcile a saved XHTML snapshot of one law-text page
    Import {
        /// Saved XHTML serialization of a rendered law-text page
        file: PathBuf,

        /// URL the page was rendered from
        #[arg(long)]
        source_url: String,

        /// Reconcile into an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output { json: cli.json };
    match cli.command {
        Command::Migrate => migrate_command().await,
        Command::Crawl {
            index_url,
            limit,
            dry_run,
        } => crawl_command(index_url, limit, dry_run, output).await,
        Command::Import {
            file,
            source_url,
            dry_run,
        } => import_command(&file, &source_url, dry_run, output).await,
    }
}

async fn migrate_command() -> Result<()> {
    let pool = db::create_pool(&PipelineConfig::from_env()?).await?;
    let result = db::run_migrations(&pool).await;
    pool.close().await;
    result?;

    eprintln!("{}", style("Migrations applied").green());
    Ok(())
}

/// Open the database store and apply pending migrations.
async fn open_store() -> Result<MySqlStore> {
    let pool = db::create_pool(&PipelineConfig::from_env()?).await?;
    if let Err(e) = db::run_migrations(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(MySqlStore::new(pool))
}

async fn crawl_command(
    index_url: Option<String>,
    limit: Option<usize>,
    dry_run: bool,
    output: Output,
) -> Result<()> {
    let mut config = CrawlConfig::from_env();
    if let Some(index_url) = index_url {
        config = config.with_index_url(index_url);
    }

    // The blocking client must be built off the async workers.
    let timeout_secs = config.http_timeout_secs;
    let source = tokio::task::spawn_blocking(move || HttpPageSource::new(timeout_secs)).await??;
    let source: Arc<dyn PageSource> = Arc::new(source);
    let options = CrawlOptions::new(config.index_url).with_limit(limit);

    let stop = Arc::clone(&options.stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received SIGINT, stopping after the current document");
            stop.store(true, Ordering::Relaxed);
        }
    });

    if dry_run {
        let store = MemoryStore::new();
        let summary = crawl_with_progress(&store, source, &options).await?;
        return output.summary(&summary, true);
    }

    let store = open_store().await?;
    let result = crawl_with_progress(&store, source, &options).await;
    store.close().await;
    output.summary(&result?, false)
}

async fn crawl_with_progress<S>(
    store: &S,
    source: Arc<dyn PageSource>,
    options: &CrawlOptions,
) -> Result<CrawlSummary>
where
    S: RecordStore + ?Sized,
{
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let result = run_crawl(store, source, options, |update: CrawlProgress<'_>| {
        progress.set_length(update.total as u64);
        progress.set_position(update.position as u64);
        progress.set_message(update.url.to_string());
        if !update.succeeded {
            progress.println(format!("{} {}", style("failed").red(), update.url));
        }
    })
    .await;

    progress.finish_and_clear();
    result
}

async fn import_command(file: &Path, source_url: &str, dry_run: bool, output: Output) -> Result<()> {
    let markup_text = tokio::fs::read_to_string(file).await?;
    let markup = MarkupConfig::default();

    if dry_run {
        let store = MemoryStore::new();
        let summary = import_page(&store, &markup_text, source_url, &markup).await?;
        return output.summary(&summary, true);
    }

    let store = open_store().await?;
    let result = import_page(&store, &markup_text, source_url, &markup).await;
    store.close().await;
    output.summary(&result?, false)
}

/// How run summaries are reported.
#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn summary(self, summary: &CrawlSummary, dry_run: bool) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(summary)?);
        } else {
            print_summary(summary, dry_run);
        }
        Ok(())
    }
}

fn print_summary(summary: &CrawlSummary, dry_run: bool) {
    let heading = if dry_run {
        style("Dry run finished").yellow().bold()
    } else {
        style("Harvest finished").green().bold()
    };
    eprintln!("{heading}");
    eprintln!(
        "  Documents: {} ({} failed)",
        summary.documents, summary.documents_failed
    );
    eprintln!("  Inserted:  {}", summary.inserted);
    eprintln!("  Updated:   {}", summary.updated);
    eprintln!("  Unchanged: {}", summary.unchanged);
    if summary.failed > 0 {
        eprintln!("  {} {}", style("Failed:").red(), summary.failed);
    }
}
