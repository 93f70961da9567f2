//! Utility modules.

/// Date/time serde helpers shared by both backends.
pub mod datetime;

/// Log sanitization so response bodies and tokens are never logged in full.
pub mod log_sanitizer;
