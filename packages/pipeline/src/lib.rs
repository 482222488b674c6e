pub mod cli;
pub mod config;
pub mod crawl;
pub mod db;
pub mod error;
pub mod error_log;
pub mod fields;
pub mod locks;
pub mod reconcile;
pub mod record;
pub mod store;

pub use config::{CrawlConfig, PipelineConfig};
pub use crawl::{import_page, reconcile_document, run_crawl, CrawlOptions, CrawlSummary};
pub use db::{create_pool, run_migrations};
pub use error::{PipelineError, ReconcileError, StoreError, StoreOperation};
pub use error_log::ErrorLogEntry;
pub use fields::{EntityKind, Fields, NaturalKey};
pub use reconcile::{Outcome, Reconciler};
pub use record::Record;
pub use store::{MemoryStore, MySqlStore, RecordStore, StoredRow};
