//! In-memory identity store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rosterguard_core::{ExternalMemberId, WebsiteUserId};

use crate::error::StoreError;
use crate::record::RoleRecord;
use crate::traits::IdentityStore;

/// Identity store backed by in-process maps.
///
/// Useful for dry runs and tests. Links and role rows can be changed at any
/// time through `&self`, and every query is counted so callers can observe
/// how often the store was actually consulted. Outages can be simulated for
/// the whole store or for single lookups.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    links: RwLock<HashMap<ExternalMemberId, WebsiteUserId>>,
    role_records: RwLock<HashMap<String, Vec<RoleRecord>>>,
    user_lookups: AtomicU64,
    role_queries: AtomicU64,
    unavailable: AtomicBool,
    failing_lookups: RwLock<HashSet<ExternalMemberId>>,
}

impl MemoryIdentityStore {
    /// Create a new empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a community id to a website user, replacing any previous link.
    pub fn link(&self, external_id: impl Into<ExternalMemberId>, user_id: WebsiteUserId) {
        self.links.write().insert(external_id.into(), user_id);
    }

    /// Remove a link. Returns `true` if one existed.
    pub fn unlink(&self, external_id: &ExternalMemberId) -> bool {
        self.links.write().remove(external_id).is_some()
    }

    /// Append a role row under `meta_key`.
    pub fn add_role_record(&self, meta_key: &str, record: RoleRecord) {
        self.role_records
            .write()
            .entry(meta_key.to_string())
            .or_default()
            .push(record);
    }

    /// Replace every role row under `meta_key`.
    pub fn set_role_records(&self, meta_key: &str, records: Vec<RoleRecord>) {
        self.role_records
            .write()
            .insert(meta_key.to_string(), records);
    }

    /// Make every query fail with [`StoreError::Backend`] until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Make lookups of `external_id` fail with [`StoreError::Backend`].
    pub fn fail_lookup(&self, external_id: impl Into<ExternalMemberId>) {
        self.failing_lookups.write().insert(external_id.into());
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(())
    }

    /// Number of `find_user_id` calls served so far.
    #[inline]
    pub fn user_lookups(&self) -> u64 {
        self.user_lookups.load(Ordering::Relaxed)
    }

    /// Number of `find_role_records` calls served so far.
    #[inline]
    pub fn role_queries(&self) -> u64 {
        self.role_queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_role_records(&self, meta_key: &str) -> Result<Vec<RoleRecord>, StoreError> {
        self.role_queries.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;
        Ok(self
            .role_records
            .read()
            .get(meta_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_user_id(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError> {
        self.user_lookups.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;
        if self.failing_lookups.read().contains(external_id) {
            return Err(StoreError::Backend(format!("lookup failed for {external_id}")));
        }
        Ok(self.links.read().get(external_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_and_lookup() {
        let store = MemoryIdentityStore::new();
        store.link("U1", WebsiteUserId(7));

        let found = store.find_user_id(&"U1".into()).await.unwrap();
        assert_eq!(found, Some(WebsiteUserId(7)));

        let missing = store.find_user_id(&"U2".into()).await.unwrap();
        assert_eq!(missing, None);
        assert_eq!(store.user_lookups(), 2);
    }

    #[tokio::test]
    async fn test_relink_and_unlink() {
        let store = MemoryIdentityStore::new();
        store.link("U1", WebsiteUserId(7));
        store.link("U1", WebsiteUserId(8));
        assert_eq!(
            store.find_user_id(&"U1".into()).await.unwrap(),
            Some(WebsiteUserId(8))
        );

        assert!(store.unlink(&"U1".into()));
        assert!(!store.unlink(&"U1".into()));
        assert_eq!(store.find_user_id(&"U1".into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_role_records_by_key() {
        let store = MemoryIdentityStore::new();
        store.add_role_record("wp_capabilities", RoleRecord::new(WebsiteUserId(1), "a"));
        store.add_role_record("wp_capabilities", RoleRecord::new(WebsiteUserId(2), "b"));
        store.add_role_record("other_capabilities", RoleRecord::new(WebsiteUserId(3), "c"));

        let rows = store.find_role_records("wp_capabilities").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(store.find_role_records("nope").await.unwrap().is_empty());

        store.set_role_records("wp_capabilities", vec![RoleRecord::new(WebsiteUserId(9), "z")]);
        let rows = store.find_role_records("wp_capabilities").await.unwrap();
        assert_eq!(rows, vec![RoleRecord::new(WebsiteUserId(9), "z")]);
        assert_eq!(store.role_queries(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_query() {
        let store = MemoryIdentityStore::new();
        store.link("U1", WebsiteUserId(7));
        store.set_unavailable(true);

        assert!(matches!(
            store.find_user_id(&"U1".into()).await,
            Err(StoreError::Backend(_))
        ));
        assert!(matches!(
            store.find_role_records("wp_capabilities").await,
            Err(StoreError::Backend(_))
        ));
        assert_eq!(store.user_lookups(), 1);
        assert_eq!(store.role_queries(), 1);

        store.set_unavailable(false);
        assert_eq!(
            store.find_user_id(&"U1".into()).await.unwrap(),
            Some(WebsiteUserId(7))
        );
    }

    #[tokio::test]
    async fn test_fail_single_lookup() {
        let store = MemoryIdentityStore::new();
        store.link("U1", WebsiteUserId(7));
        store.link("U2", WebsiteUserId(8));
        store.fail_lookup("U1");

        assert!(store.find_user_id(&"U1".into()).await.is_err());
        assert_eq!(
            store.find_user_id(&"U2".into()).await.unwrap(),
            Some(WebsiteUserId(8))
        );
        assert!(store.find_role_records("wp_capabilities").await.is_ok());
    }
}
