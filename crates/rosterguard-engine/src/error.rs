//! Engine error types.

use rosterguard_core::{ERROR_GATEWAY, ERROR_STORE};
use rosterguard_store::StoreError;

/// Community platform error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Platform call failed (network, permissions, rate limit, etc.).
    #[error("backend error: {0}")]
    Backend(String),

    /// An identifier could not be mapped to the platform's id format.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The platform connection has not finished starting up.
    #[error("gateway not ready")]
    NotReady,
}

impl GatewayError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A reconciliation step failed on one of its external calls.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),
    /// Joins cannot be judged before the premium list has been loaded.
    #[error("premium member list not loaded")]
    PremiumNotLoaded,
}

impl ReconcileError {
    /// Get the error type string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ReconcileError::Store(_) | ReconcileError::PremiumNotLoaded => ERROR_STORE,
            ReconcileError::Gateway(_) => ERROR_GATEWAY,
        }
    }
}
