//! Role-capability rows.

use rosterguard_core::WebsiteUserId;
use serde::Serialize;

/// One capabilities row: a user and their serialized role payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRecord {
    pub user_id: WebsiteUserId,
    /// Raw serialized value, e.g. `a:1:{s:10:"paidmember";b:1;}`.
    pub payload: String,
}

impl RoleRecord {
    pub fn new(user_id: WebsiteUserId, payload: impl Into<String>) -> Self {
        Self {
            user_id,
            payload: payload.into(),
        }
    }

    /// Whether the payload contains any of `markers` as a literal substring.
    ///
    /// The payload is never deserialized; a marker matches wherever it occurs.
    #[inline]
    pub fn has_any_marker<S: AsRef<str>>(&self, markers: &[S]) -> bool {
        markers.iter().any(|m| self.payload.contains(m.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKERS: [&str; 3] = [
        r#"s:10:"paidmember""#,
        r#"s:13:"bbp_keymaster""#,
        r#"s:13:"administrator""#,
    ];

    #[test]
    fn matches_literal_markers() {
        let paid = RoleRecord::new(WebsiteUserId(1), r#"a:1:{s:10:"paidmember";b:1;}"#);
        let keymaster = RoleRecord::new(WebsiteUserId(2), r#"a:2:{s:10:"subscriber";b:1;s:13:"bbp_keymaster";b:1;}"#);
        let admin = RoleRecord::new(WebsiteUserId(3), r#"a:1:{s:13:"administrator";b:1;}"#);
        assert!(paid.has_any_marker(&MARKERS));
        assert!(keymaster.has_any_marker(&MARKERS));
        assert!(admin.has_any_marker(&MARKERS));
    }

    #[test]
    fn ignores_other_roles() {
        let subscriber = RoleRecord::new(WebsiteUserId(4), r#"a:1:{s:10:"subscriber";b:1;}"#);
        assert!(!subscriber.has_any_marker(&MARKERS));
    }

    #[test]
    fn length_prefix_is_part_of_the_marker() {
        // Same role name with a different serialized length does not match.
        let odd = RoleRecord::new(WebsiteUserId(5), r#"a:1:{s:11:"paidmember ";b:1;}"#);
        assert!(!odd.has_any_marker(&MARKERS));
    }

    #[test]
    fn marker_matches_even_when_granted_false() {
        let revoked = RoleRecord::new(WebsiteUserId(6), r#"a:1:{s:10:"paidmember";b:0;}"#);
        assert!(revoked.has_any_marker(&MARKERS));
    }
}
