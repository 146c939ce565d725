//! Utility modules.

/// Log sanitization utilities to prevent password exposure.
pub mod log_sanitizer;
