//! Per-key cooldown tracking

use std::collections::HashMap;

use tracing::debug;

/// Last-fired timestamps by alert key.
///
/// Timestamps are monotonically non-decreasing per key; a rule may fire
/// again only after its cooldown has elapsed since the recorded time.
/// An absent key counts as eligible.
#[derive(Debug, Default)]
pub struct CooldownRegistry {
    last_fired: HashMap<&'static str, u64>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` may fire at `now_ms` given `cooldown_ms`.
    pub fn eligible(&self, key: &'static str, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_fired.get(key) {
            Some(&last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        }
    }

    /// Record a firing. Never moves a key's timestamp backwards.
    pub fn record(&mut self, key: &'static str, now_ms: u64) {
        let entry = self.last_fired.entry(key).or_insert(now_ms);
        if now_ms > *entry {
            *entry = now_ms;
        }
        debug!(key, now_ms, "cooldown recorded");
    }

    /// Last-fired timestamp for `key`, if any
    pub fn last(&self, key: &'static str) -> Option<u64> {
        self.last_fired.get(key).copied()
    }

    /// Forget all keys (session stop)
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}
