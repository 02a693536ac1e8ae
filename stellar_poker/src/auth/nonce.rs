//! Per-session monotonic nonce source.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues strictly increasing nonces seeded from wall-clock microseconds.
///
/// Two calls inside the same clock tick still get distinct values: the
/// candidate is `max(now, last + 1)`, applied with a single atomic update.
#[derive(Debug, Default)]
pub struct NonceSession {
    last: AtomicU64,
}

impl NonceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce using the current wall clock.
    pub fn next(&self) -> u64 {
        self.next_at(now_micros())
    }

    /// Next nonce given an explicit clock reading.
    pub fn next_at(&self, now_micros: u64) -> u64 {
        let candidate = |last: u64| now_micros.max(last.saturating_add(1));
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate(last))
            }) {
            Ok(previous) | Err(previous) => candidate(previous),
        }
    }

    /// Most recently issued nonce, or 0 if none yet.
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

fn now_micros() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_micros()).unwrap_or(0)
}
