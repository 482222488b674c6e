//! Record stores: where current rows, history rows and error log entries live.

mod memory;
mod mysql;

pub use memory::{ArchivedRow, LoggedError, MemoryStore};
pub use mysql::MySqlStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::error_log::ErrorLogEntry;
use crate::fields::{DirtyField, EntityKind, Fields, NaturalKey};

/// A current row as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// Surrogate identity assigned by the store.
    pub id: i64,
    /// Last-modified timestamp maintained by the store.
    pub insert_tsd: Option<DateTime<Utc>>,
    pub fields: Fields,
}

impl StoredRow {
    pub fn kind(&self) -> EntityKind {
        self.fields.kind()
    }
}

/// Write-path capability of the relational store.
///
/// The entity kind travels with the key, fields and rows passed in.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The current row matching `key`, if any.
    async fn select(&self, key: &NaturalKey) -> StoreResult<Option<StoredRow>>;

    /// Write a new current row and return its identity.
    async fn insert(&self, fields: &Fields) -> StoreResult<i64>;

    /// Copy `row` verbatim into the history table of its kind.
    async fn archive(&self, row: &StoredRow) -> StoreResult<()>;

    /// Overwrite the dirty fields of the current row matching `key`.
    async fn update(&self, key: &NaturalKey, dirty: &[DirtyField]) -> StoreResult<()>;

    /// Archive `row`, then apply `dirty` to it.
    ///
    /// The update is not attempted when archiving fails.
    async fn supersede(
        &self,
        row: &StoredRow,
        key: &NaturalKey,
        dirty: &[DirtyField],
    ) -> StoreResult<()> {
        self.archive(row).await?;
        self.update(key, dirty).await
    }

    /// Append an entry to the error log.
    async fn log_error(&self, entry: &ErrorLogEntry) -> StoreResult<()>;
}
