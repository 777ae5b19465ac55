use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cancellable delayed task.
///
/// Every call to [`schedule`](Self::schedule) restarts the quiet window and
/// replaces the pending callback, so a burst of calls fires exactly once,
/// `window` after the last one. The callback runs synchronously on the timer
/// task; anything that has to await must be spawned from inside it.
///
/// Must be used from within a Tokio runtime.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            fire();
        });

        let previous = self.pending.lock().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drops the pending callback, if any. Returns whether one was waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
