//! In-memory document store.
//!
//! Used by unit tests and for running the service without PostgreSQL.
//! Batches are applied to a working copy and swapped in only when every
//! operation succeeds, so the all-or-nothing contract holds here too.
//!
//! Scan order is insertion order: a document keeps its position when it is
//! overwritten and a re-created document goes to the end.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::ports::{
    apply_updates, CommitReceipt, Direction, Document, DocumentPath, DocumentStore, Query,
    StoreError, WriteBatch, WriteOp,
};

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    fields: Map<String, Value>,
}

#[derive(Debug, Default, Clone)]
struct StoreState {
    documents: HashMap<DocumentPath, StoredDocument>,
    next_seq: u64,
}

/// Document store held entirely in process memory.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<StoreState>,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
    reads: AtomicUsize,
    commits: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Writes a document directly, bypassing batches and counters.
    ///
    /// # Panics
    ///
    /// Panics on an invalid path, a non-object value or a poisoned lock.
    pub fn insert(&self, path: &str, fields: Value) {
        let path = DocumentPath::new(path).expect("InMemoryDocumentStore: invalid path");
        let fields = match fields {
            Value::Object(map) => map,
            other => panic!("InMemoryDocumentStore: expected object, got {}", other),
        };
        let mut state = self
            .state
            .write()
            .expect("InMemoryDocumentStore: state lock poisoned");
        state.put(path, fields);
    }

    /// Current fields of a document, if present.
    pub fn fields(&self, path: &str) -> Option<Map<String, Value>> {
        let path = DocumentPath::new(path).ok()?;
        self.state
            .read()
            .expect("InMemoryDocumentStore: state lock poisoned")
            .documents
            .get(&path)
            .map(|doc| doc.fields.clone())
    }

    /// Number of documents directly inside `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.state
            .read()
            .expect("InMemoryDocumentStore: state lock poisoned")
            .documents
            .keys()
            .filter(|path| path.collection() == collection)
            .count()
    }

    /// Number of `get`/`query` calls served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of batches committed successfully.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `get`/`query` fail with a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `commit` fail with a backend error.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::backend("simulated read failure"));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl StoreState {
    fn put(&mut self, path: DocumentPath, fields: Map<String, Value>) {
        match self.documents.get_mut(&path) {
            Some(existing) => existing.fields = fields,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.documents.insert(path, StoredDocument { seq, fields });
            }
        }
    }

    fn apply(&mut self, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Set { path, fields } => self.put(path, fields),
            WriteOp::Update { path, updates } => {
                let doc = self
                    .documents
                    .get_mut(&path)
                    .ok_or_else(|| StoreError::MissingDocument(path.to_string()))?;
                apply_updates(&path, &mut doc.fields, &updates)?;
            }
            WriteOp::Delete { path } => {
                self.documents.remove(&path);
            }
        }
        Ok(())
    }
}

fn compare_field(a: &Map<String, Value>, b: &Map<String, Value>, field: &str) -> CmpOrdering {
    let a = a.get(field).and_then(Value::as_f64);
    let b = b.get(field).and_then(Value::as_f64);
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        self.check_reads()?;
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::backend("state lock poisoned"))?;
        Ok(state
            .documents
            .get(path)
            .map(|doc| Document::new(path.clone(), doc.fields.clone())))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check_reads()?;
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::backend("state lock poisoned"))?;

        let mut matched: Vec<(&DocumentPath, &StoredDocument)> = state
            .documents
            .iter()
            .filter(|(path, _)| path.collection() == query.collection)
            .filter(|(_, doc)| match &query.filter {
                Some(filter) => filter.matches(doc.fields.get(&filter.field)),
                None => true,
            })
            .collect();

        matched.sort_by_key(|(_, doc)| doc.seq);
        if let Some(order) = &query.order_by {
            // Stable: ties keep scan order. Missing fields sort last either way.
            matched.sort_by(|(_, a), (_, b)| {
                let by_value = compare_field(&a.fields, &b.fields, &order.field);
                let has_a = a.fields.get(&order.field).and_then(Value::as_f64).is_some();
                let has_b = b.fields.get(&order.field).and_then(Value::as_f64).is_some();
                match (order.direction, has_a, has_b) {
                    (Direction::Descending, true, true) => by_value.reverse(),
                    _ => by_value,
                }
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(path, doc)| Document::new(path.clone(), doc.fields.clone()))
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::backend("simulated commit failure"));
        }

        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::backend("state lock poisoned"))?;

        let writes = batch.len();
        let mut working = state.clone();
        for op in batch.into_ops() {
            working.apply(op)?;
        }
        *state = working;

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(CommitReceipt { writes })
    }
}
