//! Snapshot of website users entitled to premium membership.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use rosterguard_core::WebsiteUserId;
use rosterguard_store::{IdentityStore, RoleRecord, StoreError};
use tracing::{debug, info};

/// Immutable set of premium website users.
#[derive(Debug, Clone)]
pub struct PremiumSnapshot {
    members: HashSet<WebsiteUserId>,
    taken_at: Instant,
}

impl PremiumSnapshot {
    /// Empty snapshot; nobody is premium.
    pub fn empty() -> Self {
        Self::from_iter(std::iter::empty())
    }

    /// Keep the users whose role payload contains any of `markers`.
    pub fn from_records<S: AsRef<str>>(records: &[RoleRecord], markers: &[S]) -> Self {
        records
            .iter()
            .filter(|record| record.has_any_marker(markers))
            .map(|record| record.user_id)
            .collect()
    }

    #[inline]
    pub fn contains(&self, user_id: WebsiteUserId) -> bool {
        self.members.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// When this snapshot was built.
    pub fn taken_at(&self) -> Instant {
        self.taken_at
    }
}

impl FromIterator<WebsiteUserId> for PremiumSnapshot {
    fn from_iter<I: IntoIterator<Item = WebsiteUserId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
            taken_at: Instant::now(),
        }
    }
}

impl Default for PremiumSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holder of the current [`PremiumSnapshot`].
///
/// Each refresh builds a new snapshot and swaps it in whole. Readers keep
/// the `Arc` they got, so a classification in flight never sees a half
/// updated set. Until the first snapshot is installed the set reports
/// itself as not loaded.
#[derive(Debug)]
pub struct PremiumSet {
    meta_key: String,
    markers: Vec<String>,
    current: RwLock<Arc<PremiumSnapshot>>,
    loaded: AtomicBool,
}

impl PremiumSet {
    /// Create an empty set reading role rows under `meta_key`.
    pub fn new(meta_key: impl Into<String>, markers: Vec<String>) -> Self {
        Self {
            meta_key: meta_key.into(),
            markers,
            current: RwLock::new(Arc::new(PremiumSnapshot::empty())),
            loaded: AtomicBool::new(false),
        }
    }

    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Whether a snapshot has been installed since creation.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<PremiumSnapshot> {
        self.current.read().clone()
    }

    /// Install `snapshot`, dropping the previous one.
    pub fn replace(&self, snapshot: PremiumSnapshot) -> Arc<PremiumSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = snapshot.clone();
        self.loaded.store(true, Ordering::Release);
        snapshot
    }

    /// Re-read every role row and replace the snapshot.
    ///
    /// On error the previous snapshot stays in effect.
    pub async fn refresh<S>(&self, store: &S) -> Result<Arc<PremiumSnapshot>, StoreError>
    where
        S: IdentityStore + ?Sized,
    {
        let records = store.find_role_records(&self.meta_key).await?;
        debug!(rows = records.len(), meta_key = %self.meta_key, "fetched role records");
        let snapshot = PremiumSnapshot::from_records(&records, self.markers.as_slice());
        let snapshot = self.replace(snapshot);
        info!(premium = snapshot.len(), "premium member list refreshed");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterguard_core::DEFAULT_PREMIUM_MARKERS;
    use rosterguard_store::MemoryIdentityStore;

    fn markers() -> Vec<String> {
        DEFAULT_PREMIUM_MARKERS.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_from_records_literal_match() {
        let records = vec![
            RoleRecord::new(WebsiteUserId(1), r#"a:1:{s:10:"subscriber";b:1;}"#),
            RoleRecord::new(WebsiteUserId(2), r#"a:1:{s:10:"paidmember";b:1;}"#),
            RoleRecord::new(WebsiteUserId(3), r#"a:1:{s:13:"administrator";b:1;}"#),
            RoleRecord::new(WebsiteUserId(4), r#"a:1:{s:13:"bbp_keymaster";b:1;}"#),
            RoleRecord::new(WebsiteUserId(5), r#"xx s:10:"paidmember" yy"#),
            RoleRecord::new(WebsiteUserId(6), "paidmember"),
        ];
        let snapshot = PremiumSnapshot::from_records(&records, markers().as_slice());
        assert_eq!(snapshot.len(), 4);
        for id in [2, 3, 4, 5] {
            assert!(snapshot.contains(WebsiteUserId(id)));
        }
        assert!(!snapshot.contains(WebsiteUserId(1)));
        assert!(!snapshot.contains(WebsiteUserId(6)));
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let store = MemoryIdentityStore::new();
        store.set_role_records(
            "wp_capabilities",
            vec![RoleRecord::new(WebsiteUserId(7), r#"s:10:"paidmember""#)],
        );
        let set = PremiumSet::new("wp_capabilities", markers());
        assert!(set.current().is_empty());
        assert!(!set.is_loaded());

        set.refresh(&store).await.unwrap();
        assert!(set.is_loaded());
        let before = set.current();
        assert!(before.contains(WebsiteUserId(7)));

        store.set_role_records(
            "wp_capabilities",
            vec![RoleRecord::new(WebsiteUserId(8), r#"s:10:"paidmember""#)],
        );
        set.refresh(&store).await.unwrap();

        let after = set.current();
        assert!(!after.contains(WebsiteUserId(7)));
        assert!(after.contains(WebsiteUserId(8)));
        // The old snapshot is untouched.
        assert!(before.contains(WebsiteUserId(7)));
        assert_eq!(store.role_queries(), 2);
    }

    #[tokio::test]
    async fn test_refresh_uses_meta_key() {
        let store = MemoryIdentityStore::new();
        store.add_role_record(
            "site_capabilities",
            RoleRecord::new(WebsiteUserId(3), r#"s:13:"administrator""#),
        );
        let set = PremiumSet::new("wp_capabilities", markers());
        assert!(set.refresh(&store).await.unwrap().is_empty());

        let set = PremiumSet::new("site_capabilities", markers());
        assert_eq!(set.refresh(&store).await.unwrap().len(), 1);
        assert_eq!(set.meta_key(), "site_capabilities");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous() {
        let store = MemoryIdentityStore::new();
        let set = PremiumSet::new("wp_capabilities", markers());

        store.set_unavailable(true);
        assert!(set.refresh(&store).await.is_err());
        assert!(!set.is_loaded());

        store.set_unavailable(false);
        store.add_role_record(
            "wp_capabilities",
            RoleRecord::new(WebsiteUserId(7), r#"s:10:"paidmember""#),
        );
        set.refresh(&store).await.unwrap();

        store.set_unavailable(true);
        assert!(set.refresh(&store).await.is_err());
        assert!(set.is_loaded());
        assert!(set.current().contains(WebsiteUserId(7)));
    }
}
