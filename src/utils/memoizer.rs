use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use tracing::debug;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

struct CacheEntry<T> {
    value: T,
    /// `None` when `now + ttl` is not representable; the value never expires.
    expires_at: Option<SystemTime>,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: SystemTime) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }
}

type Producer<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;

/// Caches the result of a zero-argument producer until a fixed expiry.
///
/// Every memoizer owns exactly one slot. The staleness check, the refresh and
/// the read all happen under the same lock, so concurrent callers share a
/// single producer run per window. Failed runs are not stored: the next call
/// runs the producer again.
pub struct ExpiringMemoizer<T, E> {
    name: &'static str,
    producer: Producer<T, E>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T, E> ExpiringMemoizer<T, E>
where
    T: Clone,
{
    pub fn new<F>(name: &'static str, ttl: Duration, producer: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::with_clock(name, ttl, Arc::new(SystemClock), producer)
    }

    pub fn with_clock<F>(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>, producer: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name,
            producer: Box::new(producer),
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    pub fn call(&self) -> Result<T, E> {
        // The slot is written only after the producer succeeds, so a poisoned
        // lock still guards a consistent value.
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if let Some(entry) = slot.as_ref() {
            if !entry.is_expired(now) {
                return Ok(entry.value.clone());
            }
        }

        debug!(memoizer = self.name, "Cache empty or expired, refreshing");
        let value = (self.producer)()?;
        *slot = Some(CacheEntry {
            value: value.clone(),
            expires_at: now.checked_add(self.ttl),
        });
        Ok(value)
    }
}
