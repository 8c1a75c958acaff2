//! Browser automation port and scoped session handling

use crate::validators::error::AdapterError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Opens isolated browser sessions
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn open_session(&self) -> Result<Arc<dyn BrowserSession>, AdapterError>;
}

/// One isolated browser session (its own cookies, storage, and window)
#[async_trait]
pub trait BrowserSession: Send + Sync {
    fn id(&self) -> &str;

    async fn navigate(&self, url: &str) -> Result<(), AdapterError>;

    /// Click the first element matching a CSS selector
    async fn click(&self, css_selector: &str) -> Result<(), AdapterError>;

    async fn current_url(&self) -> Result<String, AdapterError>;

    async fn page_source(&self) -> Result<String, AdapterError>;

    async fn close(&self) -> Result<(), AdapterError>;
}

/// Closes its session exactly once, including when the owning future is
/// dropped mid-evaluation (timeout or cancellation)
///
/// Closes started from `Drop` run on `tracker`; the owner of the tracker must
/// [`drain_session_closes`] before the runtime shuts down or they are lost.
pub struct SessionGuard {
    session: Arc<dyn BrowserSession>,
    tracker: TaskTracker,
    closed: bool,
}

impl SessionGuard {
    pub fn new(session: Arc<dyn BrowserSession>, tracker: TaskTracker) -> Self {
        Self {
            session,
            tracker,
            closed: false,
        }
    }

    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Close the session now; close errors are logged, never returned
    pub async fn close(mut self) {
        self.closed = true;
        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session {}: {}", self.session.id(), e);
        } else {
            debug!("Closed browser session {}", self.session.id());
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Closing abandoned browser session {}", session.id());
                self.tracker.spawn_on(
                    async move {
                        if let Err(e) = session.close().await {
                            warn!("Failed to close abandoned session {}: {}", session.id(), e);
                        }
                    },
                    &handle,
                );
            }
            Err(_) => warn!(
                "Browser session {} leaked: no runtime available to close it",
                session.id()
            ),
        }
    }
}

/// Wait up to `bound` for closes started by dropped guards
///
/// Returns `false` when some sessions were still closing at the deadline.
pub async fn drain_session_closes(tracker: &TaskTracker, bound: Duration) -> bool {
    tracker.close();
    if tracker.is_empty() {
        return true;
    }
    debug!("Waiting for {} abandoned browser sessions to close", tracker.len());
    match tokio::time::timeout(bound, tracker.wait()).await {
        Ok(()) => true,
        Err(_) => {
            warn!(
                "{} browser sessions still closing after {:?}",
                tracker.len(),
                bound
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSession {
        closes: AtomicUsize,
        close_delay: Duration,
    }

    impl CountingSession {
        fn new(close_delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                closes: AtomicUsize::new(0),
                close_delay,
            })
        }
    }

    #[async_trait]
    impl BrowserSession for CountingSession {
        fn id(&self) -> &str {
            "counting"
        }
        async fn navigate(&self, _url: &str) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn click(&self, _css_selector: &str) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn current_url(&self) -> Result<String, AdapterError> {
            Ok(String::new())
        }
        async fn page_source(&self) -> Result<String, AdapterError> {
            Ok(String::new())
        }
        async fn close(&self) -> Result<(), AdapterError> {
            tokio::time::sleep(self.close_delay).await;
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_explicit_close_closes_once() {
        let session = CountingSession::new(Duration::ZERO);
        let tracker = TaskTracker::new();
        let guard = SessionGuard::new(session.clone(), tracker.clone());
        guard.close().await;
        assert!(drain_session_closes(&tracker, Duration::from_millis(100)).await);
        assert_eq!(session.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_closes_in_background() {
        let session = CountingSession::new(Duration::ZERO);
        let tracker = TaskTracker::new();
        drop(SessionGuard::new(session.clone(), tracker.clone()));
        assert!(drain_session_closes(&tracker, Duration::from_secs(1)).await);
        assert_eq!(session.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_guard_closes_before_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let session = CountingSession::new(Duration::from_millis(20));
        let tracker = TaskTracker::new();

        runtime.block_on(async {
            drop(SessionGuard::new(session.clone(), tracker.clone()));
        });
        let drained =
            runtime.block_on(drain_session_closes(&tracker, Duration::from_secs(2)));
        drop(runtime);

        assert!(drained);
        assert_eq!(session.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_bound() {
        let session = CountingSession::new(Duration::from_secs(30));
        let tracker = TaskTracker::new();
        drop(SessionGuard::new(session.clone(), tracker.clone()));

        assert!(!drain_session_closes(&tracker, Duration::from_millis(20)).await);
        assert_eq!(session.closes.load(Ordering::SeqCst), 0);
    }
}
