//! Community platform gateway trait.

use std::sync::Arc;

use async_trait::async_trait;
use rosterguard_core::CommunityRoleId;

use crate::error::GatewayError;
use crate::member::CommunityMember;

/// Roster access and moderation actions on the community platform.
#[async_trait]
pub trait CommunityGateway: Send + Sync {
    /// Every current member of the guild.
    async fn fetch_members(&self) -> Result<Vec<CommunityMember>, GatewayError>;

    /// Remove a member from the guild.
    async fn remove_member(&self, member: &CommunityMember) -> Result<(), GatewayError>;

    /// Give a member a guild role.
    async fn grant_role(
        &self,
        member: &CommunityMember,
        role: CommunityRoleId,
    ) -> Result<(), GatewayError>;

    /// Optional: post an operational message to the log channel.
    ///
    /// Default implementation does nothing.
    #[inline]
    async fn announce(&self, _message: &str) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Blanket implementation for `Arc<G>` where `G: CommunityGateway`.
#[async_trait]
impl<G: CommunityGateway + ?Sized> CommunityGateway for Arc<G> {
    #[inline]
    async fn fetch_members(&self) -> Result<Vec<CommunityMember>, GatewayError> {
        (**self).fetch_members().await
    }

    #[inline]
    async fn remove_member(&self, member: &CommunityMember) -> Result<(), GatewayError> {
        (**self).remove_member(member).await
    }

    #[inline]
    async fn grant_role(
        &self,
        member: &CommunityMember,
        role: CommunityRoleId,
    ) -> Result<(), GatewayError> {
        (**self).grant_role(member, role).await
    }

    #[inline]
    async fn announce(&self, message: &str) -> Result<(), GatewayError> {
        (**self).announce(message).await
    }
}
