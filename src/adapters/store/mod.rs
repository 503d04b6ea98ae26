//! Document store adapters.
//!
//! - `PostgresDocumentStore` - JSONB documents, one transaction per batch
//! - `InMemoryDocumentStore` - process memory, for tests and local runs

mod in_memory;
mod postgres;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
