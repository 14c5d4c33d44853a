//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Sweep Defaults
// ============================================================================

/// Sweep interval used by the development profile.
pub const DEFAULT_DEV_CHECK_INTERVAL_MS: u64 = 5_000;
/// Sweep interval used by the production profile.
pub const DEFAULT_PROD_CHECK_INTERVAL_MS: u64 = 60_000;

// ============================================================================
// Website Store Defaults
// ============================================================================

/// Default WordPress table prefix.
pub const DEFAULT_TABLE_PREFIX: &str = "wp_";
/// Suffix appended to the table prefix to form the capabilities meta key.
pub const CAPABILITIES_META_SUFFIX: &str = "capabilities";
/// `usermeta` key under which a linked Discord id is stored.
pub const DEFAULT_EXTERNAL_ID_META_KEY: &str = "DiscordId";
/// Default MySQL port.
pub const DEFAULT_DB_PORT: u16 = 3306;
/// Default connection pool size.
pub const DEFAULT_DB_CONNECTION_LIMIT: u32 = 10;
/// Default pool acquire timeout in seconds.
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Serialized-role markers that grant premium status.
///
/// Matched as literal substrings of the PHP-serialized capabilities payload:
/// paid member, forum keymaster and site administrator.
pub const DEFAULT_PREMIUM_MARKERS: [&str; 3] = [
    r#"s:10:"paidmember""#,
    r#"s:13:"bbp_keymaster""#,
    r#"s:13:"administrator""#,
];

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
