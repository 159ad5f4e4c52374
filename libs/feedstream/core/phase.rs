//! Lock-free connection phase and feed counters.
//!
//! The subscription task and the presentation layer observe the same phase
//! cell from different scheduling contexts, so both it and the counters are
//! plain atomics rather than locked state.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Connection lifecycle of the feed subscription
///
/// `Idle → Connecting → Connected → (Reconnecting → Connecting…)* → Closed`
///
/// `Closed` is terminal and only ever entered by `stop()`; the subscription
/// task can never transition out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FeedPhase {
    Idle = 0,
    Connecting = 1,
    Connected = 2,
    Reconnecting = 3,
    Closed = 4,
}

impl FeedPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => FeedPhase::Idle,
            1 => FeedPhase::Connecting,
            2 => FeedPhase::Connected,
            3 => FeedPhase::Reconnecting,
            _ => FeedPhase::Closed,
        }
    }
}

/// Atomic cell holding the current [`FeedPhase`]
#[derive(Debug)]
pub struct AtomicFeedPhase {
    inner: AtomicU8,
}

impl AtomicFeedPhase {
    pub fn new(phase: FeedPhase) -> Self {
        Self {
            inner: AtomicU8::new(phase as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> FeedPhase {
        FeedPhase::from_u8(self.inner.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, phase: FeedPhase) {
        self.inner.store(phase as u8, Ordering::Release);
    }

    /// Transition `current -> next` atomically
    ///
    /// Returns the phase that was actually observed on failure.
    pub fn compare_exchange(
        &self,
        current: FeedPhase,
        next: FeedPhase,
    ) -> std::result::Result<FeedPhase, FeedPhase> {
        self.inner
            .compare_exchange(
                current as u8,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(FeedPhase::from_u8)
            .map_err(FeedPhase::from_u8)
    }

    /// Set `next` unless the cell already reads `Closed`
    ///
    /// The subscription task uses this for every transition so that a
    /// concurrent `stop()` can never be overwritten. Returns `false` when the
    /// phase was terminal and unchanged.
    pub fn set_unless_closed(&self, next: FeedPhase) -> bool {
        let mut current = self.get();
        loop {
            if current == FeedPhase::Closed {
                return false;
            }
            match self.compare_exchange(current, next) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == FeedPhase::Connected
    }

    /// Connecting or reconnecting
    #[inline]
    pub fn is_connecting(&self) -> bool {
        matches!(self.get(), FeedPhase::Connecting | FeedPhase::Reconnecting)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.get() == FeedPhase::Closed
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.get() == FeedPhase::Idle
    }
}

/// Atomic feed counters
#[derive(Debug, Default)]
pub struct AtomicFeedMetrics {
    events_received: AtomicU64,
    events_discarded: AtomicU64,
    reconnects: AtomicU64,
}

impl AtomicFeedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_discarded(&self) {
        self.events_discarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_reconnects(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_received(&self) -> u64 {
        self.events_received.load(Ordering::Relaxed)
    }

    pub fn events_discarded(&self) -> u64 {
        self.events_discarded.load(Ordering::Relaxed)
    }

    pub fn reconnect_count(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }
}

/// Feed counters snapshot
#[derive(Debug, Clone)]
pub struct FeedMetrics {
    pub events_received: u64,
    pub events_discarded: u64,
    pub reconnect_count: u64,
    pub phase: FeedPhase,
}
