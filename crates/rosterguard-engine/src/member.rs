//! Community member records and classification outcomes.

use rosterguard_core::{CommunityRoleId, ExternalMemberId};

/// A guild member as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMember {
    pub id: ExternalMemberId,
    /// Name used in log lines and announcements.
    pub display_name: String,
    pub bot: bool,
    /// Roles held in the community itself.
    pub roles: Vec<CommunityRoleId>,
}

impl CommunityMember {
    pub fn new(id: impl Into<ExternalMemberId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            bot: false,
            roles: Vec::new(),
        }
    }

    /// Builder: mark as a bot account.
    pub fn bot(mut self) -> Self {
        self.bot = true;
        self
    }

    /// Builder: add a community role.
    pub fn with_role(mut self, role: CommunityRoleId) -> Self {
        self.roles.push(role);
        self
    }

    #[inline]
    pub fn has_role(&self, role: CommunityRoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// Where a member stands against the website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipVerdict {
    /// Linked, and the linked user holds a premium role.
    Premium,
    /// Linked, but the linked user is not premium.
    LinkedNotPremium,
    /// No website user is linked to this member.
    Unlinked,
}

impl MembershipVerdict {
    #[inline]
    pub fn is_premium(self) -> bool {
        matches!(self, MembershipVerdict::Premium)
    }

    /// Whether a website link was found, premium or not.
    #[inline]
    pub fn is_coupled(self) -> bool {
        !matches!(self, MembershipVerdict::Unlinked)
    }
}

/// What the engine did about one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Removed from the guild.
    Kicked { coupled: bool },
    /// Premium role granted (join path only).
    Granted,
    /// Premium member left in place (sweep path only).
    Kept,
    /// Bot or community admin; never classified.
    Exempt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_flags() {
        assert!(MembershipVerdict::Premium.is_premium());
        assert!(MembershipVerdict::Premium.is_coupled());
        assert!(!MembershipVerdict::LinkedNotPremium.is_premium());
        assert!(MembershipVerdict::LinkedNotPremium.is_coupled());
        assert!(!MembershipVerdict::Unlinked.is_premium());
        assert!(!MembershipVerdict::Unlinked.is_coupled());
    }

    #[test]
    fn member_builder() {
        let member = CommunityMember::new("1", "alice")
            .bot()
            .with_role(CommunityRoleId(9));
        assert!(member.bot);
        assert!(member.has_role(CommunityRoleId(9)));
        assert!(!member.has_role(CommunityRoleId(10)));
    }
}
