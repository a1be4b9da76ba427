//! Debounced refresh of the calendar

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Bursts of changes closer than this trigger a single refresh
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs a refresh callback once things have been quiet for a while.
///
/// Every call to [`RefreshScheduler::schedule`] cancels the pending refresh (if any) and starts waiting again.
/// This must be used from within a Tokio runtime.
pub struct RefreshScheduler {
    callback: Arc<dyn Fn() + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Run the callback after `delay`, unless something else is scheduled in the meantime
    ///
    /// Outside of a Tokio runtime, the callback is run right away, and may itself use this scheduler.
    pub fn schedule(&self, delay: Duration) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                log::warn!("No async runtime to debounce the refresh ({}), refreshing now", err);
                self.cancel();
                (self.callback)();
                return;
            }
        };

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let callback = self.callback.clone();
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            log::debug!("Refreshing the calendar");
            callback();
        }));
    }

    /// Drop the pending refresh, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take() {
            previous.abort();
        }
    }

    /// Whether a refresh is waiting to run
    pub fn is_pending(&self) -> bool {
        self.pending.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|handle| handle.is_finished() == false)
            .unwrap_or(false)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
