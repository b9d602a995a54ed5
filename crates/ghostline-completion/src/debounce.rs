//! Per-key delayed execution with cancel-and-replace
//!
//! Each key holds at most one pending execution. Scheduling again for the
//! same key cancels the previous timer task before it fires, so a burst of
//! keystrokes collapses into the single most recent request. Finished
//! entries are swept from the table on every schedule.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct PendingRequest {
    timer: JoinHandle<()>,
    token: CancellationToken,
}

impl PendingRequest {
    fn cancel(self) {
        self.token.cancel();
        self.timer.abort();
    }
}

/// Delayed-execution scheduler keyed by request identity
pub struct RequestDebouncer {
    pending: Mutex<HashMap<String, PendingRequest>>,
}

impl RequestDebouncer {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule `work` to run after `delay`, replacing any pending execution
    /// for the same key
    ///
    /// The returned receiver resolves with the work's output once it runs. A
    /// superseded or cancelled execution drops its sender instead, so the
    /// receiver resolves to an error that callers treat as "no result".
    pub fn schedule<T, F>(&self, key: &str, delay: Duration, work: F) -> oneshot::Receiver<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let token = CancellationToken::new();
        let task_token = token.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Cancelled while sleeping; abort() usually gets here first but
            // the token closes the race.
            if task_token.is_cancelled() {
                return;
            }
            let value = work.await;
            let _ = sender.send(value);
        });

        let mut pending = self.lock_pending();
        pending.retain(|_, request| !request.timer.is_finished());
        if let Some(previous) = pending.insert(key.to_string(), PendingRequest { timer, token }) {
            previous.cancel();
            debug!("Superseded pending completion request for key {}", key);
        }
        receiver
    }

    /// Cancel the pending execution for a key, if any
    pub fn cancel(&self, key: &str) -> bool {
        let removed = self.lock_pending().remove(key);
        match removed {
            Some(request) => {
                request.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending execution
    pub fn cancel_all(&self) {
        let drained: Vec<PendingRequest> = {
            let mut pending = self.lock_pending();
            pending.drain().map(|(_, request)| request).collect()
        };
        for request in drained {
            request.cancel();
        }
    }

    /// Number of not-yet-finished scheduled executions
    pub fn pending_count(&self) -> usize {
        let mut pending = self.lock_pending();
        pending.retain(|_, request| !request.timer.is_finished());
        pending.len()
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<String, PendingRequest>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RequestDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestDebouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_schedule_runs_after_delay() {
        let debouncer = RequestDebouncer::new();
        let receiver = debouncer.schedule("k", Duration::from_millis(20), async { 7 });
        assert_eq!(receiver.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let debouncer = RequestDebouncer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first_calls = calls.clone();
        let first = debouncer.schedule("k", Duration::from_millis(40), async move {
            first_calls.fetch_add(1, Ordering::SeqCst);
            "first"
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second_calls = calls.clone();
        let second = debouncer.schedule("k", Duration::from_millis(40), async move {
            second_calls.fetch_add(1, Ordering::SeqCst);
            "second"
        });

        assert!(first.await.is_err());
        assert_eq!(second.await.unwrap(), "second");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let debouncer = RequestDebouncer::new();
        let a = debouncer.schedule("a", Duration::from_millis(10), async { 1 });
        let b = debouncer.schedule("b", Duration::from_millis(10), async { 2 });

        assert_eq!(a.await.unwrap(), 1);
        assert_eq!(b.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_prevents_execution() {
        let debouncer = RequestDebouncer::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let task_ran = ran.clone();
        let receiver = debouncer.schedule("k", Duration::from_millis(30), async move {
            task_ran.fetch_add(1, Ordering::SeqCst);
        });

        assert!(debouncer.cancel("k"));
        assert!(receiver.await.is_err());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel("k"));
    }

    #[tokio::test]
    async fn test_pending_count_sweeps_finished() {
        let debouncer = RequestDebouncer::new();
        let receiver = debouncer.schedule("k", Duration::from_millis(10), async { "done" });
        assert_eq!(debouncer.pending_count(), 1);

        receiver.await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let debouncer = RequestDebouncer::new();
        let a = debouncer.schedule("a", Duration::from_millis(30), async { 1 });
        let b = debouncer.schedule("b", Duration::from_millis(30), async { 2 });

        debouncer.cancel_all();

        assert!(a.await.is_err());
        assert!(b.await.is_err());
        assert_eq!(debouncer.pending_count(), 0);
    }
}
