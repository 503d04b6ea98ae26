//! Document store port.
//!
//! Defines the contract for the transactional key-document store that owns
//! every account, ranking and verification record.
//!
//! # Guarantees
//!
//! - **Snapshot reads**: `get` and `query` return committed state only.
//! - **Atomic batches**: every operation in a [`WriteBatch`] lands, or none do.
//!   Readers never observe a half-applied batch.
//! - **No read-your-own-batch isolation**: a read taken before building a
//!   batch may be stale by the time the batch commits. There is no version
//!   check on commit.
//!
//! # Paths
//!
//! Paths alternate collection and document id: `users/U1`,
//! `verifications/U1/codes/abc`. The collection of a document is its path
//! minus the final segment.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Errors raised by document store implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// An `update` targeted a document that does not exist; the batch was rejected.
    #[error("Document not found: {0}")]
    MissingDocument(String),

    #[error("Document {path} could not be decoded: {reason}")]
    Decode { path: String, reason: String },

    /// Transport, commit or timeout failure in the backend.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }

    pub fn decode(path: &DocumentPath, reason: impl Into<String>) -> Self {
        StoreError::Decode {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Slash-separated document path with an even number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn new(path: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.into();
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 2
            || segments.len() % 2 != 0
            || segments.iter().any(|s| s.trim().is_empty())
        {
            return Err(StoreError::InvalidPath(path));
        }
        Ok(Self(path))
    }

    /// Builds the path of document `id` inside `collection`.
    pub fn in_collection(collection: &str, id: &str) -> Result<Self, StoreError> {
        Self::new(format!("{}/{}", collection, id))
    }

    /// The collection this document lives in.
    pub fn collection(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// The final path segment.
    pub fn id(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An untyped document as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(path: DocumentPath, fields: Map<String, Value>) -> Self {
        Self { path, fields }
    }

    pub fn id(&self) -> &str {
        self.path.id()
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering on a numeric field. Documents without the field sort last;
/// ties keep the store's scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filter on a top-level field.
///
/// With `ignore_case`, both sides are compared as lowercased strings and a
/// non-string field never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
    pub ignore_case: bool,
}

impl FieldFilter {
    /// Whether a document's `field` value passes this filter.
    pub fn matches(&self, candidate: Option<&Value>) -> bool {
        match (self.ignore_case, candidate) {
            (_, None) => false,
            (false, Some(value)) => value == &self.value,
            (true, Some(Value::String(value))) => self
                .value
                .as_str()
                .is_some_and(|wanted| wanted.to_lowercase() == value.to_lowercase()),
            (true, Some(_)) => false,
        }
    }
}

/// A single-collection query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: value.into(),
            ignore_case: false,
        });
        self
    }

    /// Case-insensitive string equality.
    pub fn where_eq_ignore_case(mut self, field: impl Into<String>, value: &str) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: Value::String(value.to_string()),
            ignore_case: true,
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Field-level mutation applied by an `update` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set(Value),
    /// Server-side atomic add. A missing field counts as zero.
    Increment(i64),
}

impl FieldUpdate {
    /// New value of `field` given its `current` value.
    ///
    /// # Errors
    ///
    /// `Decode` when incrementing a non-integer or overflowing `i64`.
    pub fn apply(
        &self,
        path: &DocumentPath,
        field: &str,
        current: Option<&Value>,
    ) -> Result<Value, StoreError> {
        match self {
            FieldUpdate::Set(value) => Ok(value.clone()),
            FieldUpdate::Increment(delta) => {
                let base = match current {
                    None | Some(Value::Null) => 0,
                    Some(value) => value.as_i64().ok_or_else(|| {
                        StoreError::decode(path, format!("field '{}' is not an integer", field))
                    })?,
                };
                base.checked_add(*delta)
                    .map(Value::from)
                    .ok_or_else(|| StoreError::decode(path, format!("field '{}' overflowed", field)))
            }
        }
    }
}

/// Applies `updates` in order to `fields`.
pub fn apply_updates(
    path: &DocumentPath,
    fields: &mut Map<String, Value>,
    updates: &[(String, FieldUpdate)],
) -> Result<(), StoreError> {
    for (field, update) in updates {
        let next = update.apply(path, field, fields.get(field))?;
        fields.insert(field.clone(), next);
    }
    Ok(())
}

/// One operation inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or fully replace a document.
    Set {
        path: DocumentPath,
        fields: Map<String, Value>,
    },
    /// Modify fields of an existing document. Fails the batch if it is missing.
    Update {
        path: DocumentPath,
        updates: Vec<(String, FieldUpdate)>,
    },
    Delete { path: DocumentPath },
}

impl WriteOp {
    pub fn path(&self) -> &DocumentPath {
        match self {
            WriteOp::Set { path, .. } | WriteOp::Update { path, .. } | WriteOp::Delete { path } => {
                path
            }
        }
    }
}

/// Ordered list of operations committed as one atomic unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: DocumentPath, fields: Map<String, Value>) -> &mut Self {
        self.ops.push(WriteOp::Set { path, fields });
        self
    }

    pub fn update(&mut self, path: DocumentPath, updates: Vec<(String, FieldUpdate)>) -> &mut Self {
        self.ops.push(WriteOp::Update { path, updates });
        self
    }

    pub fn delete(&mut self, path: DocumentPath) -> &mut Self {
        self.ops.push(WriteOp::Delete { path });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Acknowledgement of a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    pub writes: usize,
}

/// Port for the transactional document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Snapshot read of a single document. `Ok(None)` when absent.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Snapshot read of documents in one collection.
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Commits every operation atomically.
    ///
    /// # Errors
    ///
    /// - `MissingDocument` if an `update` targets an absent document
    /// - `Backend` on transport or commit failure
    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;
}
