use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool, Row};

use super::{RecordStore, StoredRow};
use crate::error::{StoreError, StoreOperation, StoreResult};
use crate::error_log::ErrorLogEntry;
use crate::fields::{DirtyField, EntityKind, Fields, NaturalKey};

/// Store backed by the MySQL tables created by the migrations.
///
/// Column names in the generated statements come from the static field
/// tables; every value is bound.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Close the underlying pool, waiting for connections to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn database(op: StoreOperation) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |source| StoreError::Database { op, source }
}

fn column_list(kind: EntityKind) -> String {
    kind.fields()
        .iter()
        .map(|spec| format!("`{}`", spec.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Key columns compared with NULL read as empty.
fn key_predicate(kind: EntityKind) -> String {
    kind.key_fields()
        .map(|spec| format!("COALESCE(`{}`, '') = ?", spec.name))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn select_sql(kind: EntityKind) -> String {
    format!(
        "SELECT `{id}` AS row_id, `INSERT_TSD` AS row_tsd, {columns} FROM `{table}` WHERE {predicate} ORDER BY `{id}` LIMIT 1",
        id = kind.id_column(),
        columns = column_list(kind),
        table = kind.table(),
        predicate = key_predicate(kind),
    )
}

fn insert_sql(kind: EntityKind) -> String {
    format!(
        "INSERT INTO `{table}` ({columns}) VALUES ({values})",
        table = kind.table(),
        columns = column_list(kind),
        values = placeholders(kind.fields().len()),
    )
}

fn archive_sql(kind: EntityKind) -> String {
    format!(
        "INSERT INTO `{table}` (`{id}`, `INSERT_TSD`, {columns}, `archived_at`) VALUES (?, ?, {values}, CURRENT_TIMESTAMP)",
        table = kind.history_table(),
        id = kind.id_column(),
        columns = column_list(kind),
        values = placeholders(kind.fields().len()),
    )
}

fn update_sql(kind: EntityKind, dirty: &[DirtyField]) -> String {
    let assignments = dirty
        .iter()
        .map(|field| format!("`{}` = ?", field.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE `{table}` SET {assignments} WHERE {predicate}",
        table = kind.table(),
        predicate = key_predicate(kind),
    )
}

const LOG_ERROR_SQL: &str = "INSERT INTO `errorLog` (`srn`, `error_text`) VALUES (?, ?)";

fn bind_key<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    key: &'q NaturalKey,
) -> Query<'q, MySql, MySqlArguments> {
    for (_, value) in key.values() {
        query = query.bind(value.as_str());
    }
    query
}

fn bind_fields<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    fields: &'q Fields,
) -> Query<'q, MySql, MySqlArguments> {
    for (_, value) in fields.iter() {
        query = query.bind(value);
    }
    query
}

fn archive_query<'q>(sql: &'q str, row: &'q StoredRow) -> Query<'q, MySql, MySqlArguments> {
    let query = sqlx::query(sql).bind(row.id).bind(row.insert_tsd);
    bind_fields(query, &row.fields)
}

fn update_query<'q>(
    sql: &'q str,
    key: &'q NaturalKey,
    dirty: &'q [DirtyField],
) -> Query<'q, MySql, MySqlArguments> {
    let mut query = sqlx::query(sql);
    for field in dirty {
        query = query.bind(field.value.as_str());
    }
    bind_key(query, key)
}

fn decode_row(kind: EntityKind, row: &MySqlRow) -> Result<StoredRow, sqlx::Error> {
    let id: i32 = row.try_get("row_id")?;
    let insert_tsd: Option<DateTime<Utc>> = row.try_get("row_tsd")?;

    let mut values = Vec::with_capacity(kind.fields().len());
    for spec in kind.fields() {
        let value: Option<String> = row.try_get(spec.name)?;
        values.push(value);
    }
    let mut values = values.into_iter();
    let fields = Fields::from_fn(kind, |_| values.next().flatten());

    Ok(StoredRow {
        id: i64::from(id),
        insert_tsd,
        fields,
    })
}

#[async_trait]
impl RecordStore for MySqlStore {
    #[tracing::instrument(skip(self, key), fields(table = key.kind().table(), key = %key))]
    async fn select(&self, key: &NaturalKey) -> StoreResult<Option<StoredRow>> {
        let kind = key.kind();
        let sql = select_sql(kind);
        let row = bind_key(sqlx::query(&sql), key)
            .fetch_optional(&self.pool)
            .await
            .map_err(database(StoreOperation::Select))?;

        row.map(|row| decode_row(kind, &row))
            .transpose()
            .map_err(database(StoreOperation::Select))
    }

    #[tracing::instrument(skip(self, fields), fields(table = fields.kind().table()))]
    async fn insert(&self, fields: &Fields) -> StoreResult<i64> {
        let sql = insert_sql(fields.kind());
        let result = bind_fields(sqlx::query(&sql), fields)
            .execute(&self.pool)
            .await
            .map_err(database(StoreOperation::Insert))?;

        let id = result.last_insert_id();
        i64::try_from(id).map_err(|_| StoreError::IdOverflow(id))
    }

    #[tracing::instrument(skip(self, row), fields(table = row.kind().history_table(), id = row.id))]
    async fn archive(&self, row: &StoredRow) -> StoreResult<()> {
        let sql = archive_sql(row.kind());
        archive_query(&sql, row)
            .execute(&self.pool)
            .await
            .map_err(database(StoreOperation::Archive))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, key, dirty), fields(table = key.kind().table(), key = %key))]
    async fn update(&self, key: &NaturalKey, dirty: &[DirtyField]) -> StoreResult<()> {
        if dirty.is_empty() {
            return Ok(());
        }
        let sql = update_sql(key.kind(), dirty);
        update_query(&sql, key, dirty)
            .execute(&self.pool)
            .await
            .map_err(database(StoreOperation::Update))?;
        Ok(())
    }

    /// Archive and update in one transaction.
    #[tracing::instrument(skip(self, row, key, dirty), fields(table = row.kind().table(), id = row.id))]
    async fn supersede(
        &self,
        row: &StoredRow,
        key: &NaturalKey,
        dirty: &[DirtyField],
    ) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database(StoreOperation::Archive))?;

        let sql = archive_sql(row.kind());
        archive_query(&sql, row)
            .execute(&mut *tx)
            .await
            .map_err(database(StoreOperation::Archive))?;

        if !dirty.is_empty() {
            let sql = update_sql(key.kind(), dirty);
            update_query(&sql, key, dirty)
                .execute(&mut *tx)
                .await
                .map_err(database(StoreOperation::Update))?;
        }

        tx.commit().await.map_err(database(StoreOperation::Update))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, entry), fields(srn = %entry.srn))]
    async fn log_error(&self, entry: &ErrorLogEntry) -> StoreResult<()> {
        sqlx::query(LOG_ERROR_SQL)
            .bind(entry.srn.as_str())
            .bind(entry.error_text.as_str())
            .execute(&self.pool)
            .await
            .map_err(database(StoreOperation::LogError))?;
        Ok(())
    }
}
