//! Process-lifetime identity cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rosterguard_core::{ExternalMemberId, WebsiteUserId};
use rosterguard_store::{IdentityStore, StoreError};
use tracing::debug;

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached links.
    pub size: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the store.
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in `[0.0, 1.0]`, or `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Links community members to website users.
///
/// Entries are added on the first successful lookup and are never evicted
/// or refreshed, so a link changed on the website after it was cached is not
/// observed until restart. Unlinked results are not cached: every lookup for
/// an unlinked member goes back to the store.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: RwLock<HashMap<ExternalMemberId, WebsiteUserId>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached link for `external_id`, without touching the store.
    pub fn get(&self, external_id: &ExternalMemberId) -> Option<WebsiteUserId> {
        self.entries.read().get(external_id).copied()
    }

    /// Record a link. An existing entry is kept as is.
    pub fn insert(&self, external_id: ExternalMemberId, user_id: WebsiteUserId) {
        self.entries.write().entry(external_id).or_insert(user_id);
    }

    /// Resolve `external_id`, asking `store` on a miss.
    pub async fn resolve<S>(
        &self,
        store: &S,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError>
    where
        S: IdentityStore + ?Sized,
    {
        if let Some(user_id) = self.get(external_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(external_id = %external_id, user_id = %user_id, "identity cache hit");
            return Ok(Some(user_id));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let found = store.find_user_id(external_id).await?;
        match found {
            Some(user_id) => {
                debug!(external_id = %external_id, user_id = %user_id, "identity resolved from store");
                self.insert(external_id.clone(), user_id);
            }
            None => debug!(external_id = %external_id, "no linked website user"),
        }
        Ok(found)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
