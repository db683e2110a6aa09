//! Data models
//!
//! Shared between booth-server and its clients (via API).
//! IDs are opaque strings (UUID v4 on creation).

pub mod print_request;

// Re-exports
pub use print_request::*;
