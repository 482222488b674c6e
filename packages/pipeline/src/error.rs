use thiserror::Error;

use crate::fields::NaturalKey;

/// A store operation, named in errors and used for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoreOperation {
    Select,
    Insert,
    Archive,
    Update,
    LogError,
}

/// Failure of a single store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op} failed: {source}")]
    Database {
        op: StoreOperation,
        #[source]
        source: sqlx::Error,
    },

    #[error("{op} rejected by store: {reason}")]
    Rejected { op: StoreOperation, reason: String },

    #[error("store returned identity {0} which does not fit in i64")]
    IdOverflow(u64),
}

impl StoreError {
    pub fn operation(&self) -> Option<StoreOperation> {
        match self {
            Self::Database { op, .. } | Self::Rejected { op, .. } => Some(*op),
            Self::IdOverflow(_) => None,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Reconciliation of one record failed.
#[derive(Debug, Error)]
#[error("reconciling {} [{key}] failed: {source}", key.kind())]
pub struct ReconcileError {
    pub key: NaturalKey,
    #[source]
    pub source: StoreError,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("harvester error: {0}")]
    Harvester(#[from] belex_harvester::HarvesterError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
