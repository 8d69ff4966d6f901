//! Display helpers for callers that print client data.

pub mod format;

pub use format::{format_expiry, format_file_size, truncate};
