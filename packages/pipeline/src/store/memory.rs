use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RecordStore, StoredRow};
use crate::error::{StoreError, StoreOperation, StoreResult};
use crate::error_log::ErrorLogEntry;
use crate::fields::{DirtyField, EntityKind, Fields, NaturalKey};

/// A history row: the archived row and when it was archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedRow {
    pub row: StoredRow,
    pub archived_at: DateTime<Utc>,
}

/// An error log entry and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedError {
    pub entry: ErrorLogEntry,
    pub insert_tsd: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    current: HashMap<EntityKind, Vec<StoredRow>>,
    history: HashMap<EntityKind, Vec<ArchivedRow>>,
    error_log: Vec<LoggedError>,
    last_id: HashMap<EntityKind, i64>,
}

/// In-process store used for dry runs and tests.
///
/// Identities start at 1 per entity kind. Operations can be made to fail with
/// [`MemoryStore::fail`], and delayed with [`MemoryStore::with_latency`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<StoreOperation>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation, widening interleaving windows between callers.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every later call of `op` fail.
    pub fn fail(&self, op: StoreOperation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(op);
        }
    }

    /// Let `op` succeed again.
    pub fn heal(&self, op: StoreOperation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(&op);
        }
    }

    /// Current rows of `kind`, in insertion order.
    pub fn current(&self, kind: EntityKind) -> Vec<StoredRow> {
        self.read(|tables| tables.current.get(&kind).cloned().unwrap_or_default())
    }

    /// History rows of `kind`, in archival order.
    pub fn history(&self, kind: EntityKind) -> Vec<ArchivedRow> {
        self.read(|tables| tables.history.get(&kind).cloned().unwrap_or_default())
    }

    pub fn error_log(&self) -> Vec<LoggedError> {
        self.read(|tables| tables.error_log.clone())
    }

    fn read<T: Default>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        self.tables
            .lock()
            .map(|tables| f(&*tables))
            .unwrap_or_default()
    }

    /// Wait out the latency, then lock the tables for a call made up of `ops`.
    ///
    /// Fails without touching anything if any of `ops` is set to fail.
    async fn enter_all(&self, ops: &[StoreOperation]) -> StoreResult<MutexGuard<'_, Tables>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        for &op in ops {
            let injected = self
                .failing
                .lock()
                .map(|failing| failing.contains(&op))
                .map_err(|_| poisoned(op))?;
            if injected {
                return Err(StoreError::Rejected {
                    op,
                    reason: "injected failure".into(),
                });
            }
        }

        let op = ops.last().copied().unwrap_or(StoreOperation::Select);
        self.tables.lock().map_err(|_| poisoned(op))
    }

    async fn enter(&self, op: StoreOperation) -> StoreResult<MutexGuard<'_, Tables>> {
        self.enter_all(&[op]).await
    }
}

impl Tables {
    fn archive(&mut self, row: &StoredRow) {
        self.history.entry(row.kind()).or_default().push(ArchivedRow {
            row: row.clone(),
            archived_at: Utc::now(),
        });
    }

    fn update(&mut self, key: &NaturalKey, dirty: &[DirtyField]) {
        let rows = self.current.entry(key.kind()).or_default();
        for row in rows.iter_mut().filter(|row| matches(row, key)) {
            for field in dirty {
                row.fields.set(field.name, field.value.as_str());
            }
            row.insert_tsd = Some(Utc::now());
        }
    }
}

fn poisoned(op: StoreOperation) -> StoreError {
    StoreError::Rejected {
        op,
        reason: "store lock poisoned".into(),
    }
}

fn matches(row: &StoredRow, key: &NaturalKey) -> bool {
    row.kind() == key.kind() && row.fields.natural_key() == *key
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, key: &NaturalKey) -> StoreResult<Option<StoredRow>> {
        let tables = self.enter(StoreOperation::Select).await?;
        Ok(tables
            .current
            .get(&key.kind())
            .and_then(|rows| rows.iter().find(|row| matches(row, key)))
            .cloned())
    }

    async fn insert(&self, fields: &Fields) -> StoreResult<i64> {
        let mut tables = self.enter(StoreOperation::Insert).await?;
        let kind = fields.kind();

        let id = tables.last_id.entry(kind).or_insert(0);
        *id += 1;
        let id = *id;

        tables.current.entry(kind).or_default().push(StoredRow {
            id,
            insert_tsd: Some(Utc::now()),
            fields: fields.clone(),
        });
        Ok(id)
    }

    async fn archive(&self, row: &StoredRow) -> StoreResult<()> {
        self.enter(StoreOperation::Archive).await?.archive(row);
        Ok(())
    }

    async fn update(&self, key: &NaturalKey, dirty: &[DirtyField]) -> StoreResult<()> {
        self.enter(StoreOperation::Update).await?.update(key, dirty);
        Ok(())
    }

    /// Archive and update under one lock, so a failing update leaves no
    /// history row behind.
    async fn supersede(
        &self,
        row: &StoredRow,
        key: &NaturalKey,
        dirty: &[DirtyField],
    ) -> StoreResult<()> {
        let mut tables = self
            .enter_all(&[StoreOperation::Archive, StoreOperation::Update])
            .await?;
        tables.archive(row);
        tables.update(key, dirty);
        Ok(())
    }

    async fn log_error(&self, entry: &ErrorLogEntry) -> StoreResult<()> {
        let mut tables = self.enter(StoreOperation::LogError).await?;
        tables.error_log.push(LoggedError {
            entry: entry.clone(),
            insert_tsd: Utc::now(),
        });
        Ok(())
    }
}
