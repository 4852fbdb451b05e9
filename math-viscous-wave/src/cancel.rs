//! Cooperative cancellation shared between a caller and running sweeps

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Clonable flag polled between grid points and between blocks of
/// subintervals.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// New, not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Cancel from a background thread once `limit` has elapsed.
    ///
    /// Running integrals notice within one block of subintervals, so the
    /// limit also applies inside a single long evaluation.
    pub fn cancel_after(&self, limit: Duration) -> JoinHandle<()> {
        let token = self.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            log::debug!("Time limit of {:.3}s reached, cancelling", limit.as_secs_f64());
            token.cancel();
        })
    }

    /// True once [`cancel`](Self::cancel) was called on any clone
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
