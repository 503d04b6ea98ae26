//! HTTP middleware for axum.
//!
//! - `admin_key` - bearer admin key extractor for operator endpoints

pub mod admin_key;

pub use admin_key::{AdminKey, AdminKeyRejection, RequireAdmin};
