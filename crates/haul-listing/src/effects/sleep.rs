use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

/// A retry wait was cancelled before it ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("wait interrupted")]
pub struct Interrupted;

/// Blocks the calling thread between retries.
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`, or return `Err(Interrupted)` if the wait was
    /// cancelled.
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// Plain `std::thread::sleep`; never interrupted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        std::thread::sleep(duration);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// A sleeper whose waits can be cut short from another thread through a
/// [`CancelHandle`].
///
/// Once cancelled it stays cancelled: every later wait fails immediately.
#[derive(Debug, Clone, Default)]
pub struct CancellableSleeper {
    state: Arc<CancelState>,
}

/// Cancels the waits of the [`CancellableSleeper`] it came from.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancellableSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        // A poisoned flag still carries a usable bool.
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cancelled = true;
        self.state.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sleeper for CancellableSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now().checked_add(duration);
        let mut cancelled = self.state.cancelled.lock().map_err(|_| Interrupted)?;

        loop {
            if *cancelled {
                return Err(Interrupted);
            }

            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => duration,
            };
            if remaining.is_zero() {
                return Ok(());
            }

            let (guard, _) = self
                .state
                .wake
                .wait_timeout(cancelled, remaining)
                .map_err(|_| Interrupted)?;
            cancelled = guard;
        }
    }
}
