//! Postgres-backed document store.
//!
//! Documents live in a single JSONB table:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS documents (
//!     tenant_id  UUID        NOT NULL,
//!     collection TEXT        NOT NULL,
//!     id         TEXT        NOT NULL,
//!     version    BIGINT      NOT NULL CHECK (version > 0),
//!     body       JSONB       NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (tenant_id, collection, id)
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx error | Code | `StoreError` |
//! |---|---|---|
//! | unique violation | `23505` | `Conflict` (concurrent first insert) |
//! | update matched no row | | `Conflict` |
//! | any other database error | | `Backend` |
//! | pool closed, IO, TLS | | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use bizdesk_core::{ExpectedVersion, TenantId};

use super::{DocumentStore, StoreError, StoredDocument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    tenant_id  UUID        NOT NULL,
    collection TEXT        NOT NULL,
    id         TEXT        NOT NULL,
    version    BIGINT      NOT NULL CHECK (version > 0),
    body       JSONB       NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (tenant_id, collection, id)
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `documents` table if it is missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<StoredDocument, StoreError> {
    let id: String = row.try_get("id").map_err(|e| map_sqlx_error("decode_row", e))?;
    let version: i64 = row.try_get("version").map_err(|e| map_sqlx_error("decode_row", e))?;
    let body: JsonValue = row.try_get("body").map_err(|e| map_sqlx_error("decode_row", e))?;
    Ok(StoredDocument {
        id,
        version: version as u64,
        body,
    })
}

fn conflict(expected: ExpectedVersion, actual: u64) -> StoreError {
    StoreError::Conflict(format!("expected {expected:?}, found {actual}"))
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, version, body
            FROM documents
            WHERE tenant_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(collection)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    async fn find_all(&self, tenant_id: TenantId, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, version, body
            FROM documents
            WHERE tenant_id = $1 AND collection = $2
            ORDER BY id ASC
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip(self, body), fields(tenant_id = %tenant_id), err)]
    async fn save(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        body: JsonValue,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let current: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT version
            FROM documents
            WHERE tenant_id = $1 AND collection = $2 AND id = $3
            FOR UPDATE
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("load_version", e))?;

        let current = current.map(|v| v as u64).unwrap_or(0);
        if !expected.matches(current) {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(conflict(expected, current));
        }

        let next = current + 1;
        let written = if current == 0 {
            // No row to lock yet: a racing first insert surfaces as 23505.
            sqlx::query(
                r#"
                INSERT INTO documents (tenant_id, collection, id, version, body)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(*tenant_id.as_uuid())
            .bind(collection)
            .bind(id)
            .bind(next as i64)
            .bind(&body)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_document", e))?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE documents
                SET version = $4, body = $5, updated_at = NOW()
                WHERE tenant_id = $1 AND collection = $2 AND id = $3 AND version = $6
                "#,
            )
            .bind(*tenant_id.as_uuid())
            .bind(collection)
            .bind(id)
            .bind(next as i64)
            .bind(&body)
            .bind(current as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_document", e))?
            .rows_affected()
        };

        if written != 1 {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(conflict(expected, current));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(next)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    async fn delete(
        &self,
        tenant_id: TenantId,
        collection: &str,
        id: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let current: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT version
            FROM documents
            WHERE tenant_id = $1 AND collection = $2 AND id = $3
            FOR UPDATE
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("load_version", e))?;

        let Some(current) = current.map(|v| v as u64) else {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(false);
        };
        if !expected.matches(current) {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(conflict(expected, current));
        }

        sqlx::query("DELETE FROM documents WHERE tenant_id = $1 AND collection = $2 AND id = $3")
            .bind(*tenant_id.as_uuid())
            .bind(collection)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_document", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(true)
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                // Two transactions raced to insert the same new document.
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}
