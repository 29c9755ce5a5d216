//! Repeating backup loop with cooperative cancellation

use crate::Result;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cloneable flag that stops a running schedule and wakes it from its sleep.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        cvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `timeout` or until cancelled. Returns `true` when cancelled.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Run `job` now and then once per `interval` until `token` is cancelled.
///
/// Fatal errors (see [`crate::Error::is_fatal`]) end the loop and are returned;
/// any other error is logged and the next run is still scheduled. Returns the
/// number of times `job` was invoked.
pub fn run_schedule<T, F>(interval: Duration, token: &CancellationToken, mut job: F) -> Result<u64>
where
    F: FnMut() -> Result<T>,
{
    let mut runs = 0u64;

    while !token.is_cancelled() {
        runs += 1;
        match job() {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => log::error!("Backup run {runs} failed: {e}"),
        }

        log::info!("Next backup in {}s", interval.as_secs());
        if token.wait_timeout(interval) {
            break;
        }
    }

    log::info!("Automatic backup stopped after {runs} run(s)");
    Ok(runs)
}
