//! Mail adapters.
//!
//! - `ResendMailSender` - delivery through the Resend HTTP API
//! - `InMemoryMailSender` - records messages instead of sending them

mod in_memory;
mod resend;

pub use in_memory::InMemoryMailSender;
pub use resend::{ResendConfig, ResendMailSender};
