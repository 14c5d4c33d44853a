//! Sweep behaviour switches.

use serde::{Deserialize, Serialize};

/// What a sweep does when one member's lookup or removal fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberErrorPolicy {
    /// Stop the sweep and report the error.
    #[default]
    Abort,
    /// Log the error, count it, and continue with the next member.
    Isolate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names() {
        assert_eq!(MemberErrorPolicy::default(), MemberErrorPolicy::Abort);
        let parsed: MemberErrorPolicy = serde_json::from_str("\"isolate\"").unwrap();
        assert_eq!(parsed, MemberErrorPolicy::Isolate);
        assert!(serde_json::from_str::<MemberErrorPolicy>("\"skip\"").is_err());
    }
}
