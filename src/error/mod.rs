//! Error handling
//!
//! Defines the error taxonomy and the escalation policy for it.

pub mod handlers;
pub mod types;

pub use handlers::{Severity, handle_error, is_retryable, severity};
pub use types::*;
