/// Token revocation tracking
///
/// Logout puts a token on the blacklist until its natural expiry; after that
/// the codec rejects it as expired anyway, so entries are swept lazily rather
/// than on every lookup. Tokens are stored as SHA-256 digests so live
/// credentials never sit in memory.
///
/// Process-local by design. Multi-instance deployments need a shared store
/// with TTL semantics instead; that store is an external collaborator.
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Duration;
use sha2::{Digest, Sha256};

use crate::clock::Clock;

pub struct RevocationRegistry {
    /// sha256(token) -> expiry (Unix seconds)
    entries: RwLock<HashMap<String, i64>>,
    last_sweep: AtomicI64,
    sweep_interval_secs: i64,
    clock: Arc<dyn Clock>,
}

impl RevocationRegistry {
    pub fn new(sweep_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now().timestamp();
        Self {
            entries: RwLock::new(HashMap::new()),
            last_sweep: AtomicI64::new(now),
            sweep_interval_secs: sweep_interval.num_seconds(),
            clock,
        }
    }

    /// Record a token as revoked until `expires_at`. Idempotent; revoking the
    /// same token twice leaves a single entry.
    pub fn revoke(&self, raw: &str, expires_at: i64) {
        let digest = sha256_hash(raw);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(digest, expires_at);
    }

    /// Membership check against unexpired entries only. Opportunistically
    /// sweeps at most once per configured interval to keep lookups O(1)
    /// amortized.
    pub fn is_revoked(&self, raw: &str) -> bool {
        let now = self.clock.now().timestamp();
        self.maybe_sweep(now);

        let digest = sha256_hash(raw);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&digest).is_some_and(|exp| *exp >= now)
    }

    /// Drop all entries that have outlived their token's expiry.
    pub fn sweep(&self, now: i64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, exp| *exp >= now);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Swept expired revocation entries");
        }
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn maybe_sweep(&self, now: i64) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now - last >= self.sweep_interval_secs
            && self
                .last_sweep
                .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            self.sweep(now);
        }
    }
}

fn sha256_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Utc;

    fn registry(clock: Arc<ManualClock>) -> RevocationRegistry {
        RevocationRegistry::new(Duration::hours(1), clock)
    }

    #[test]
    fn test_revoked_token_is_flagged() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let reg = registry(clock.clone());
        let exp = clock.now().timestamp() + 600;

        reg.revoke("some-token", exp);
        assert!(reg.is_revoked("some-token"));
        assert!(!reg.is_revoked("another-token"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let reg = registry(clock.clone());
        let exp = clock.now().timestamp() + 600;

        reg.revoke("some-token", exp);
        reg.revoke("some-token", exp);
        assert!(reg.is_revoked("some-token"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_entry_lapses_with_token_expiry() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let reg = registry(clock.clone());
        let exp = clock.now().timestamp() + 600;

        reg.revoke("some-token", exp);
        clock.advance(Duration::seconds(601));
        // Entry may still be stored until a sweep runs, but membership
        // already excludes it.
        assert!(!reg.is_revoked("some-token"));
    }

    #[test]
    fn test_sweep_drops_only_expired_entries() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let reg = registry(clock.clone());
        let now = clock.now().timestamp();

        reg.revoke("expired", now + 10);
        reg.revoke("live", now + 1000);
        assert_eq!(reg.len(), 2);

        reg.sweep(now + 11);
        assert_eq!(reg.len(), 1);
        assert!(reg.is_revoked("live"));
    }

    #[test]
    fn test_opportunistic_sweep_after_interval() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let reg = registry(clock.clone());
        let now = clock.now().timestamp();

        reg.revoke("short-lived", now + 60);
        clock.advance(Duration::seconds(61));
        assert!(!reg.is_revoked("short-lived"));
        assert_eq!(reg.len(), 1); // interval not elapsed, no sweep yet

        clock.advance(Duration::hours(1));
        reg.is_revoked("anything");
        assert!(reg.is_empty());
    }
}
