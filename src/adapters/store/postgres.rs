//! PostgreSQL implementation of the DocumentStore port.
//!
//! Documents live in a single `documents` table as JSONB, keyed by path.
//! Each batch runs in one SQL transaction. Updates lock their row with
//! `SELECT ... FOR UPDATE` before applying field changes, so increments from
//! concurrent batches serialize on the row.
//!
//! Scan order is the row's `seq`, assigned on first insert.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::ports::{
    apply_updates, CommitReceipt, Direction, Document, DocumentPath, DocumentStore, Query,
    StoreError, WriteBatch, WriteOp,
};

/// PostgreSQL-backed document store.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::backend(format!("Migration failed: {}", e)))
    }
}

/// Database row representation of a document.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    path: String,
    fields: Json<Map<String, Value>>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document::new(DocumentPath::new(row.path)?, row.fields.0))
    }
}

fn backend(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::backend(format!("{}: {}", context, e))
}

/// Field names are inlined as SQL literals so expression indexes on
/// `fields ->> 'name'` apply; only plain identifiers are accepted.
fn field_literal(field: &str) -> Result<String, StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::backend(format!(
            "Unsupported field name in query: {:?}",
            field
        )));
    }
    Ok(format!("'{}'", field))
}

fn select_query(query: &Query) -> Result<QueryBuilder<'_, Postgres>, StoreError> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT path, fields FROM documents WHERE collection = ");
    builder.push_bind(query.collection.as_str());

    if let Some(filter) = &query.filter {
        let field = field_literal(&filter.field)?;
        match (filter.ignore_case, filter.value.as_str()) {
            (true, Some(text)) => {
                builder
                    .push(format!(" AND lower(fields ->> {}) = lower(", field))
                    .push_bind(text)
                    .push(")");
            }
            (true, None) => {
                builder.push(" AND FALSE");
            }
            (false, Some(text)) => {
                builder
                    .push(format!(" AND fields ->> {} = ", field))
                    .push_bind(text);
            }
            (false, None) => {
                builder
                    .push(format!(" AND fields -> {} = ", field))
                    .push_bind(Json(&filter.value));
            }
        }
    }

    match &query.order_by {
        Some(order) => {
            let field = field_literal(&order.field)?;
            let direction = match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            // Non-numeric and missing values sort last in both directions.
            builder.push(format!(
                " ORDER BY CASE WHEN jsonb_typeof(fields -> {f}) = 'number' \
                 THEN (fields ->> {f})::numeric END {d} NULLS LAST, seq ASC",
                f = field,
                d = direction
            ));
        }
        None => {
            builder.push(" ORDER BY seq ASC");
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit as i64);
    }

    Ok(builder)
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT path, fields FROM documents WHERE path = $1")
                .bind(path.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend("Failed to read document"))?;

        row.map(Document::try_from).transpose()
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<DocumentRow> = select_query(query)?
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(backend("Failed to query documents"))?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let writes = batch.len();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(backend("Failed to start transaction"))?;

        for op in batch.into_ops() {
            match op {
                WriteOp::Set { path, fields } => {
                    sqlx::query(
                        r#"
                        INSERT INTO documents (path, collection, fields)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (path) DO UPDATE
                        SET fields = EXCLUDED.fields, updated_at = NOW()
                        "#,
                    )
                    .bind(path.as_str())
                    .bind(path.collection())
                    .bind(Json(&fields))
                    .execute(&mut *tx)
                    .await
                    .map_err(backend("Failed to write document"))?;
                }
                WriteOp::Update { path, updates } => {
                    let current: Option<(Json<Map<String, Value>>,)> =
                        sqlx::query_as("SELECT fields FROM documents WHERE path = $1 FOR UPDATE")
                            .bind(path.as_str())
                            .fetch_optional(&mut *tx)
                            .await
                            .map_err(backend("Failed to lock document"))?;

                    // Dropping `tx` rolls the batch back.
                    let mut fields = match current {
                        Some((Json(fields),)) => fields,
                        None => return Err(StoreError::MissingDocument(path.to_string())),
                    };
                    apply_updates(&path, &mut fields, &updates)?;

                    sqlx::query(
                        "UPDATE documents SET fields = $2, updated_at = NOW() WHERE path = $1",
                    )
                    .bind(path.as_str())
                    .bind(Json(&fields))
                    .execute(&mut *tx)
                    .await
                    .map_err(backend("Failed to update document"))?;
                }
                WriteOp::Delete { path } => {
                    sqlx::query("DELETE FROM documents WHERE path = $1")
                        .bind(path.as_str())
                        .execute(&mut *tx)
                        .await
                        .map_err(backend("Failed to delete document"))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(backend("Failed to commit transaction"))?;

        Ok(CommitReceipt { writes })
    }
}
