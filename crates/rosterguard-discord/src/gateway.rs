//! serenity-backed community gateway.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use rosterguard_core::{CommunityRoleId, ExternalMemberId};
use rosterguard_engine::{CommunityGateway, CommunityMember, GatewayError};
use serenity::http::Http;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use tracing::debug;

/// Largest page the guild member list endpoint returns.
const MEMBER_PAGE_LIMIT: u64 = 1000;

const GRANT_REASON: &str = "premium website member";
const KICK_REASON: &str = "no premium website membership";

/// Talks to one guild over the Discord REST API.
///
/// Announcements are refused with [`GatewayError::NotReady`] until
/// [`resolve_handles`](Self::resolve_handles) has confirmed the log channel.
pub struct DiscordGateway {
    http: Arc<Http>,
    guild_id: GuildId,
    log_channel_id: ChannelId,
    log_channel: OnceLock<ChannelId>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, guild_id: GuildId, log_channel_id: ChannelId) -> Self {
        Self {
            http,
            guild_id,
            log_channel_id,
            log_channel: OnceLock::new(),
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Fetch the configured guild and log channel, and enable announcements.
    ///
    /// Returns the guild name.
    pub async fn resolve_handles(&self) -> Result<String, GatewayError> {
        let guild = self
            .http
            .get_guild(self.guild_id)
            .await
            .map_err(GatewayError::backend)?;
        let channel = self
            .http
            .get_channel(self.log_channel_id)
            .await
            .map_err(GatewayError::backend)?;
        // A reconnect resolves the same channel again.
        let _ = self.log_channel.set(channel.id());
        Ok(guild.name)
    }
}

#[async_trait]
impl CommunityGateway for DiscordGateway {
    async fn fetch_members(&self) -> Result<Vec<CommunityMember>, GatewayError> {
        let mut roster = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = self
                .guild_id
                .members(&*self.http, Some(MEMBER_PAGE_LIMIT), after)
                .await
                .map_err(GatewayError::backend)?;
            let full = page.len() as u64 == MEMBER_PAGE_LIMIT;
            let last = page.last().map(|member| member.user.id);
            roster.extend(page.iter().map(community_member));

            match last {
                Some(id) if full => after = Some(id),
                _ => break,
            }
        }

        debug!(members = roster.len(), guild_id = %self.guild_id, "fetched guild members");
        Ok(roster)
    }

    async fn remove_member(&self, member: &CommunityMember) -> Result<(), GatewayError> {
        let user_id = user_id(&member.id)?;
        self.guild_id
            .kick_with_reason(&*self.http, user_id, KICK_REASON)
            .await
            .map_err(GatewayError::backend)
    }

    async fn grant_role(
        &self,
        member: &CommunityMember,
        role: CommunityRoleId,
    ) -> Result<(), GatewayError> {
        let user_id = user_id(&member.id)?;
        let role_id = role_id(role)?;
        self.http
            .add_member_role(self.guild_id, user_id, role_id, Some(GRANT_REASON))
            .await
            .map_err(GatewayError::backend)
    }

    async fn announce(&self, message: &str) -> Result<(), GatewayError> {
        let channel = self.log_channel.get().ok_or(GatewayError::NotReady)?;
        channel
            .say(&*self.http, message)
            .await
            .map(|_| ())
            .map_err(GatewayError::backend)
    }
}

impl std::fmt::Debug for DiscordGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordGateway")
            .field("guild_id", &self.guild_id)
            .field("log_channel_id", &self.log_channel_id)
            .field("ready", &self.log_channel.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Convert a serenity guild member into the engine's member record.
pub fn community_member(member: &Member) -> CommunityMember {
    CommunityMember {
        id: ExternalMemberId::new(member.user.id.to_string()),
        display_name: member.user.name.clone(),
        bot: member.user.bot,
        roles: member.roles.iter().map(|role| CommunityRoleId(role.get())).collect(),
    }
}

fn user_id(id: &ExternalMemberId) -> Result<UserId, GatewayError> {
    match id.as_str().parse::<u64>() {
        Ok(raw) if raw != 0 => Ok(UserId::new(raw)),
        _ => Err(GatewayError::InvalidId(id.to_string())),
    }
}

fn role_id(role: CommunityRoleId) -> Result<RoleId, GatewayError> {
    if role.0 == 0 {
        return Err(GatewayError::InvalidId(role.to_string()));
    }
    Ok(RoleId::new(role.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parsing() {
        assert_eq!(
            user_id(&"80351110224678912".into()).unwrap(),
            UserId::new(80351110224678912)
        );
        assert!(matches!(user_id(&"0".into()), Err(GatewayError::InvalidId(_))));
        assert!(matches!(user_id(&"U1".into()), Err(GatewayError::InvalidId(_))));
        assert!(matches!(user_id(&"".into()), Err(GatewayError::InvalidId(_))));
        assert!(matches!(user_id(&"-5".into()), Err(GatewayError::InvalidId(_))));
    }

    #[test]
    fn test_role_id_conversion() {
        assert_eq!(role_id(CommunityRoleId(42)).unwrap(), RoleId::new(42));
        assert!(role_id(CommunityRoleId(0)).is_err());
    }

    #[tokio::test]
    async fn test_announce_before_ready() {
        let gateway = DiscordGateway::new(
            Arc::new(Http::new("token")),
            GuildId::new(1),
            ChannelId::new(2),
        );
        assert!(matches!(
            gateway.announce("hello").await,
            Err(GatewayError::NotReady)
        ));
        assert!(format!("{gateway:?}").contains("ready: false"));
    }
}
