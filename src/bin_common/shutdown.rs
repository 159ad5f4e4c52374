//! Graceful teardown for the presentation session binaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

/// Session-wide stop flag wired to Ctrl+C
///
/// The same flag can be handed to a feed consumer via the builder's
/// `run_flag`, so one signal tears down the subscription together with the
/// binary's own loop.
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
}

impl ShutdownManager {
    /// Create a new manager in the running state
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn a Ctrl+C handler that clears the flag
    pub fn spawn_signal_handler(&self) {
        let flag = Arc::clone(&self.flag);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("received shutdown signal, tearing down session");
                flag.store(false, Ordering::Release);
            }
        });
    }

    /// Check if the session should continue running
    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Request teardown programmatically
    pub fn stop(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Clone of the flag for sharing with async components
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Sleep up to `duration`, waking early on shutdown
    ///
    /// Returns whether the session is still running afterwards, so callers
    /// can use it directly as a loop condition.
    pub async fn interruptible_sleep(&self, duration: Duration) -> bool {
        let check_interval = Duration::from_millis(50);
        let mut elapsed = Duration::ZERO;

        while elapsed < duration && self.is_running() {
            sleep(check_interval).await;
            elapsed += check_interval;
        }
        self.is_running()
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
