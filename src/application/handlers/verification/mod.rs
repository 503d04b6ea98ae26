//! Verification handlers.

mod issue_verification_code;

pub use issue_verification_code::{
    IssueVerificationCodeCommand, IssueVerificationCodeHandler, IssueVerificationCodeResult,
};
