//! Ledger store adapter.
//!
//! Wraps the document store port with typed reads and the single atomic
//! write path used by every processor.

mod documents;
mod ledger_store;

pub use documents::{account_from_document, from_document, to_fields};
pub use ledger_store::LedgerStore;
