//! Join handling and full-roster sweeps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rosterguard_core::{CommunityRoleId, ExternalMemberId, MemberErrorPolicy};
use rosterguard_store::{IdentityStore, StoreError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, IdentityCache};
use crate::classifier::verdict_for;
use crate::error::ReconcileError;
use crate::gateway::CommunityGateway;
use crate::member::{Action, CommunityMember, MembershipVerdict};
use crate::premium::{PremiumSet, PremiumSnapshot};

/// Guild-side settings for a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerSettings {
    /// Role granted to premium members when they join.
    pub premium_role: CommunityRoleId,
    /// Members holding this role are never swept.
    pub admin_role: CommunityRoleId,
    pub on_member_error: MemberErrorPolicy,
}

/// Counts for one completed sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub kicked: usize,
    pub premium: usize,
    /// Bots and admins, skipped without classification.
    pub exempt: usize,
    /// Members whose check failed under [`MemberErrorPolicy::Isolate`].
    pub failed: usize,
}

impl SweepReport {
    /// Members looked at in total.
    pub fn total(&self) -> usize {
        self.kicked + self.premium + self.exempt + self.failed
    }
}

/// Clears the in-progress flag when a sweep ends, however it ends.
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SweepGuard(flag))
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keeps a community restricted to premium website users.
///
/// Shared between the join handler and the sweep scheduler, typically
/// behind an `Arc`. Every classify-then-act step for one member runs under a
/// single action lock, so a join and a sweep never act on the same member at
/// the same time. The lock is held per member, not for a whole sweep.
pub struct Reconciler<S, G> {
    store: S,
    gateway: G,
    cache: IdentityCache,
    premium: PremiumSet,
    settings: ReconcilerSettings,
    action_lock: Mutex<()>,
    sweeping: AtomicBool,
}

impl<S, G> Reconciler<S, G>
where
    S: IdentityStore,
    G: CommunityGateway,
{
    pub fn new(store: S, gateway: G, premium: PremiumSet, settings: ReconcilerSettings) -> Self {
        Self {
            store,
            gateway,
            cache: IdentityCache::new(),
            premium,
            settings,
            action_lock: Mutex::new(()),
            sweeping: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn premium_snapshot(&self) -> Arc<PremiumSnapshot> {
        self.premium.current()
    }

    pub fn is_premium_loaded(&self) -> bool {
        self.premium.is_loaded()
    }

    /// Whether a sweep is running right now.
    pub fn is_sweeping(&self) -> bool {
        self.sweeping.load(Ordering::Acquire)
    }

    /// Refresh the premium snapshot. Must succeed once before joins are
    /// handled; sweeps refresh it themselves.
    pub async fn refresh_premium(&self) -> Result<Arc<PremiumSnapshot>, StoreError> {
        self.premium.refresh(&self.store).await
    }

    /// Classify one member against the current snapshot.
    pub async fn classify(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<MembershipVerdict, StoreError> {
        let link = self.cache.resolve(&self.store, external_id).await?;
        Ok(verdict_for(link, &self.premium.current()))
    }

    /// Post to the log channel. Failures are logged, never returned.
    pub async fn announce(&self, message: &str) {
        if let Err(e) = self.gateway.announce(message).await {
            warn!(error = %e, "failed to post to log channel");
        }
    }

    /// React to a member joining: grant the premium role or remove them.
    ///
    /// Bots and admins are not exempt here; only the sweep skips them.
    /// Fails with [`ReconcileError::PremiumNotLoaded`], touching nothing,
    /// if the premium list has never been loaded.
    pub async fn handle_join(&self, member: &CommunityMember) -> Result<Action, ReconcileError> {
        if !self.premium.is_loaded() {
            return Err(ReconcileError::PremiumNotLoaded);
        }
        let _lock = self.action_lock.lock().await;
        let verdict = self.classify(&member.id).await?;

        if verdict.is_premium() {
            self.gateway
                .grant_role(member, self.settings.premium_role)
                .await?;
            info!(
                member = %member.display_name,
                external_id = %member.id,
                "premium member joined, role granted"
            );
            Ok(Action::Granted)
        } else {
            self.remove(member, verdict).await
        }
    }

    /// Check every guild member and remove those who are not premium.
    ///
    /// Returns `Ok(None)` without doing anything if another sweep is still
    /// running. The premium snapshot is refreshed first; bots and admins are
    /// counted as exempt and never classified. Premium members are left
    /// alone, their role is not re-granted.
    pub async fn run_sweep(&self) -> Result<Option<SweepReport>, ReconcileError> {
        let Some(_guard) = SweepGuard::try_acquire(&self.sweeping) else {
            debug!("sweep already in progress, skipping");
            return Ok(None);
        };

        self.refresh_premium().await?;
        let roster = self.gateway.fetch_members().await?;
        debug!(members = roster.len(), "fetched guild roster");

        let mut report = SweepReport::default();
        for member in &roster {
            if self.is_exempt(member) {
                report.exempt += 1;
                continue;
            }

            match self.sweep_member(member).await {
                Ok(Action::Kicked { .. }) => report.kicked += 1,
                Ok(_) => report.premium += 1,
                Err(e) => match self.settings.on_member_error {
                    MemberErrorPolicy::Abort => return Err(e),
                    MemberErrorPolicy::Isolate => {
                        warn!(
                            member = %member.display_name,
                            external_id = %member.id,
                            error = %e,
                            error_type = e.error_type(),
                            "member check failed, continuing sweep"
                        );
                        report.failed += 1;
                    }
                },
            }
        }

        let stats = self.cache.stats();
        info!(
            kicked = report.kicked,
            premium = report.premium,
            exempt = report.exempt,
            failed = report.failed,
            cached_links = stats.size,
            "sweep complete"
        );
        Ok(Some(report))
    }

    fn is_exempt(&self, member: &CommunityMember) -> bool {
        member.bot || member.has_role(self.settings.admin_role)
    }

    async fn sweep_member(&self, member: &CommunityMember) -> Result<Action, ReconcileError> {
        let _lock = self.action_lock.lock().await;
        let verdict = self.classify(&member.id).await?;
        if verdict.is_premium() {
            Ok(Action::Kept)
        } else {
            self.remove(member, verdict).await
        }
    }

    async fn remove(
        &self,
        member: &CommunityMember,
        verdict: MembershipVerdict,
    ) -> Result<Action, ReconcileError> {
        let coupled = verdict.is_coupled();
        self.announce(&format!("Kicked {}", member.display_name)).await;
        if coupled {
            info!(
                member = %member.display_name,
                external_id = %member.id,
                "removing linked member without a premium role"
            );
        } else {
            info!(
                member = %member.display_name,
                external_id = %member.id,
                "removing member with no linked website account"
            );
        }
        self.gateway.remove_member(member).await?;
        Ok(Action::Kicked { coupled })
    }
}

impl<S, G> std::fmt::Debug for Reconciler<S, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("settings", &self.settings)
            .field("cache", &self.cache.stats())
            .field("premium", &self.premium.current().len())
            .field("sweeping", &self.sweeping.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_guard_exclusive() {
        let flag = AtomicBool::new(false);
        let guard = SweepGuard::try_acquire(&flag);
        assert!(guard.is_some());
        assert!(SweepGuard::try_acquire(&flag).is_none());
        drop(guard);
        assert!(SweepGuard::try_acquire(&flag).is_some());
    }

    #[test]
    fn test_report_total() {
        let report = SweepReport {
            kicked: 1,
            premium: 2,
            exempt: 3,
            failed: 4,
        };
        assert_eq!(report.total(), 10);
    }
}
