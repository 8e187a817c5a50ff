//! Shared error plumbing.

/// Grepable error code for structured logging and host-side handling.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
