//! Membership classification.

use rosterguard_core::WebsiteUserId;

use crate::member::MembershipVerdict;
use crate::premium::PremiumSnapshot;

/// Classify a member from their resolved website link.
pub fn verdict_for(link: Option<WebsiteUserId>, snapshot: &PremiumSnapshot) -> MembershipVerdict {
    match link {
        None => MembershipVerdict::Unlinked,
        Some(user_id) if snapshot.contains(user_id) => MembershipVerdict::Premium,
        Some(_) => MembershipVerdict::LinkedNotPremium,
    }
}
