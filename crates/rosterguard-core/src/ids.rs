//! Identifier newtypes.
//!
//! Keeping the two identity spaces in distinct types makes it impossible to
//! look up a website id where a community id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account identifier issued by the community platform.
///
/// Opaque: compared and stored as the exact string the platform renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalMemberId(String);

impl ExternalMemberId {
    /// Wrap a raw platform identifier.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalMemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ExternalMemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// User identifier in the website's user table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WebsiteUserId(pub i64);

impl fmt::Display for WebsiteUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for WebsiteUserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Role identifier on the community platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommunityRoleId(pub u64);

impl fmt::Display for CommunityRoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_is_transparent() {
        let id = ExternalMemberId::from("123456789012345678");
        assert_eq!(id.as_str(), "123456789012345678");
        assert_eq!(id.to_string(), "123456789012345678");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#""123456789012345678""#
        );
    }

    #[test]
    fn website_id_displays_as_number() {
        assert_eq!(WebsiteUserId(42).to_string(), "42");
        let parsed: WebsiteUserId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, WebsiteUserId(42));
    }
}
