//! Single-value TTL cache slot.
//!
//! State per slot:
//! - `Empty` → `Fresh`:  refresh succeeds
//! - `Fresh` → `Stale`:  `ttl` has elapsed since the last store
//! - `Stale` → `Fresh`:  refresh succeeds
//! - `Empty`/`Stale` unchanged when a refresh fails
//!
//! Concurrent misses are not coalesced: every caller that sees a miss runs
//! its own refresh and the last store wins.

use std::future::Future;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

/// A value together with the instant it was stored.
#[derive(Debug, Clone)]
struct CachedValue<T> {
    value: T,
    timestamp: Instant,
}

/// Thread-safe slot holding at most one TTL-bounded value.
#[derive(Debug)]
pub struct CachedSlot<T> {
    label: &'static str,
    ttl: Duration,
    inner: RwLock<Option<CachedValue<T>>>,
}

impl<T: Clone> CachedSlot<T> {
    /// Create an empty slot whose values stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self::labeled("value", ttl)
    }

    /// Create an empty slot whose cache hits are logged under `label`.
    pub fn labeled(label: &'static str, ttl: Duration) -> Self {
        Self {
            label,
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Time-to-live applied to stored values.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a copy of the value if it is younger than the TTL.
    pub fn get(&self) -> Option<T> {
        self.inner
            .read()
            .as_ref()
            .filter(|cached| cached.timestamp.elapsed() < self.ttl)
            .map(|cached| cached.value.clone())
    }

    /// Return a copy of the last stored value regardless of age.
    pub fn peek(&self) -> Option<T> {
        self.inner.read().as_ref().map(|cached| cached.value.clone())
    }

    /// Returns `true` if a value is present and younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        self.inner
            .read()
            .as_ref()
            .is_some_and(|cached| cached.timestamp.elapsed() < self.ttl)
    }

    /// Store `value`, stamping it with the current instant.
    pub fn store(&self, value: T) {
        *self.inner.write() = Some(CachedValue {
            value,
            timestamp: Instant::now(),
        });
    }

    /// Drop the stored value, returning the slot to `Empty`.
    pub fn invalidate(&self) {
        *self.inner.write() = None;
    }

    /// Serve a fresh value, or await `refresh` and store its result.
    ///
    /// `refresh` runs outside any lock. On failure the slot is left as it
    /// was and the error is returned.
    pub async fn get_or_refresh<E, F>(&self, refresh: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get() {
            tracing::debug!(slot = self.label, "returned from cache");
            return Ok(value);
        }
        let value = refresh.await?;
        self.store(value.clone());
        Ok(value)
    }
}
