//! Verification domain module.
//!
//! Six-digit email verification codes stored under
//! `verifications/{uid}/codes/{autoId}`.

mod code;
mod errors;
mod record;
mod template;

pub use code::VerificationCode;
pub use errors::VerificationError;
pub use record::{SignupProfile, VerificationCodeRecord};
pub use template::VerificationEmail;

/// Parent collection; codes live in its `codes` subcollection.
pub const VERIFICATIONS_COLLECTION: &str = "verifications";
pub const CODES_SUBCOLLECTION: &str = "codes";

/// Code lifetime when none is configured.
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 15;
