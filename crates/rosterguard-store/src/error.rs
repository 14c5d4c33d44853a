//! Store error types.

/// Identity store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The connection URL does not name a supported database.
    #[error("unsupported database URL scheme")]
    UnsupportedUrl,

    /// Backend error (database, network, etc.).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::backend(err)
    }
}
