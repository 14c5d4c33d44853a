//! Identity store trait.

use std::sync::Arc;

use async_trait::async_trait;
use rosterguard_core::{ExternalMemberId, WebsiteUserId};

use crate::error::StoreError;
use crate::record::RoleRecord;

/// Read-only queries against the website's user records.
///
/// Implementations must be thread-safe (`Send + Sync`): join events and the
/// periodic sweep share one store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// All role-capability rows stored under `meta_key`.
    async fn find_role_records(&self, meta_key: &str) -> Result<Vec<RoleRecord>, StoreError>;

    /// The website user linked to `external_id`, if any.
    ///
    /// Matching is an exact string comparison on the stored identifier.
    /// Returns `Ok(None)` when no user is linked.
    async fn find_user_id(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError>;
}

/// Blanket implementation for `Arc<S>` where `S: IdentityStore`.
#[async_trait]
impl<S: IdentityStore + ?Sized> IdentityStore for Arc<S> {
    #[inline]
    async fn find_role_records(&self, meta_key: &str) -> Result<Vec<RoleRecord>, StoreError> {
        (**self).find_role_records(meta_key).await
    }

    #[inline]
    async fn find_user_id(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError> {
        (**self).find_user_id(external_id).await
    }
}

/// Blanket implementation for `Box<S>` where `S: IdentityStore`.
#[async_trait]
impl<S: IdentityStore + ?Sized> IdentityStore for Box<S> {
    #[inline]
    async fn find_role_records(&self, meta_key: &str) -> Result<Vec<RoleRecord>, StoreError> {
        (**self).find_role_records(meta_key).await
    }

    #[inline]
    async fn find_user_id(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError> {
        (**self).find_user_id(external_id).await
    }
}
