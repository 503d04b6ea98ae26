//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the ledger core to external systems:
//! - `store` - document store backends (Postgres JSONB, in-memory)
//! - `mail` - transactional mail (Resend, in-memory)
//! - `http` - axum REST surface
//! - `scheduler` - background leaderboard reset

pub mod http;
pub mod mail;
pub mod scheduler;
pub mod store;

pub use mail::{InMemoryMailSender, ResendConfig, ResendMailSender};
pub use scheduler::LeaderboardScheduler;
pub use store::{InMemoryDocumentStore, PostgresDocumentStore};
