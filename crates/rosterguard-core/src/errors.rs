//! Error type constants for logging.
//!
//! These constants provide consistent error classification across all crates.

/// Website identity store failure (query, pool, driver).
pub const ERROR_STORE: &str = "store";
/// Community platform failure (gateway, REST, permissions).
pub const ERROR_GATEWAY: &str = "gateway";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
