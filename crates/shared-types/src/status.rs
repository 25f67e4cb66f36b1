//! # Service Status
//!
//! Node-wide availability flag consulted by request-serving collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Shared running flag.
///
/// Cleared on shutdown or when a subscriber hits an unrecoverable failure.
#[derive(Debug)]
pub struct ServiceStatus {
    running: AtomicBool,
}

impl ServiceStatus {
    #[must_use]
    pub fn new(running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        let previous = self.running.swap(running, Ordering::AcqRel);
        if previous != running {
            info!(running, "Service status changed");
        }
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::new(true)
    }
}
