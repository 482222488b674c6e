//! Versioned reconciliation of scraped records against the store.
//!
//! For each record the engine decides between inserting a new current row,
//! leaving an identical row alone, and superseding a changed row. A
//! superseded row is copied into history before any of its fields change.
//! Empty incoming values never overwrite stored ones.

use crate::error::{ReconcileError, StoreResult};
use crate::error_log::record_failure;
use crate::fields::{Fields, NaturalKey};
use crate::locks::KeyLocks;
use crate::record::Record;
use crate::store::{RecordStore, StoredRow};

/// What reconciling one record did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No row had the natural key; a new one was written.
    Inserted { id: i64 },
    /// The row was archived and its dirty fields overwritten.
    Updated { id: i64, dirty: Vec<&'static str> },
    /// The stored row already holds every non-empty incoming value.
    NoOpExisting(StoredRow),
}

impl Outcome {
    /// Identity of the current row.
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted { id } | Self::Updated { id, .. } => *id,
            Self::NoOpExisting(row) => row.id,
        }
    }
}

/// Reconciles records against a store, one natural key at a time.
pub struct Reconciler<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    locks: KeyLocks,
}

impl<'s, S: RecordStore + ?Sized> Reconciler<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
        }
    }

    /// Insert, update or leave alone the current row for `record`.
    ///
    /// Store failures are written to the error log under the record's key
    /// before they are returned.
    pub async fn reconcile(&self, record: &Record) -> Result<Outcome, ReconcileError> {
        let fields = record.merged();
        let key = fields.natural_key();

        let _guard = self.locks.lock(&key).await;

        match self.apply(&fields, &key).await {
            Ok(outcome) => Ok(outcome),
            Err(source) => {
                tracing::warn!(
                    table = key.kind().table(),
                    systematic_number = key.systematic_number(),
                    error = %source,
                    "Reconciliation failed"
                );
                record_failure(self.store, &key, &source).await;
                Err(ReconcileError { key, source })
            }
        }
    }

    async fn apply(&self, fields: &Fields, key: &NaturalKey) -> StoreResult<Outcome> {
        let table = key.kind().table();

        let Some(existing) = self.store.select(key).await? else {
            let id = self.store.insert(fields).await?;
            tracing::info!(
                table,
                id,
                systematic_number = key.systematic_number(),
                "Inserted record"
            );
            return Ok(Outcome::Inserted { id });
        };

        let dirty = fields.dirty_against(&existing.fields);
        if dirty.is_empty() {
            tracing::debug!(table, id = existing.id, "Record unchanged");
            return Ok(Outcome::NoOpExisting(existing));
        }

        self.store.supersede(&existing, key, &dirty).await?;

        let names: Vec<&'static str> = dirty.iter().map(|field| field.name).collect();
        tracing::info!(
            table,
            id = existing.id,
            systematic_number = key.systematic_number(),
            fields = ?names,
            "Archived and updated record"
        );
        Ok(Outcome::Updated {
            id: existing.id,
            dirty: names,
        })
    }
}
