//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the ledger core and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - transactional key-document store with atomic batches
//! - `MailSender` - transactional email delivery

mod document_store;
mod mail_sender;

pub use document_store::{
    apply_updates, CommitReceipt, Direction, Document, DocumentPath, DocumentStore, FieldFilter,
    FieldUpdate, OrderBy, Query, StoreError, WriteBatch, WriteOp,
};
pub use mail_sender::{MailError, MailSender, OutboundEmail};
