//! Cooperative cancellation for in-flight operations.
//!
//! An [`AbortController`] is held by whoever may cancel (a view being torn
//! down, a Ctrl-C handler); the matching [`AbortSignal`] travels with the
//! operation and is raced against the network call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

struct AbortInner {
    aborted: AtomicBool,
    notify: Notify,
}

impl AbortInner {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            aborted: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }
}

/// Owner side: triggers cancellation.
pub struct AbortController {
    inner: Arc<AbortInner>,
}

impl AbortController {
    pub fn new() -> Self {
        Self {
            inner: AbortInner::new(),
        }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Abort every operation holding a signal from this controller.
    /// Calling it again is a no-op.
    pub fn abort(&self) {
        if !self.inner.aborted.swap(true, Ordering::SeqCst) {
            tracing::debug!("abort requested");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::SeqCst)
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

/// Operation side: observed while a request is in flight.
#[derive(Clone)]
pub struct AbortSignal {
    inner: Arc<AbortInner>,
}

impl AbortSignal {
    /// A signal nobody can trigger.
    pub fn never() -> Self {
        Self {
            inner: AbortInner::new(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once the controller aborts; immediately if it already has.
    pub async fn aborted(&self) {
        // Register with Notify before reading the flag so an abort landing
        // in between is not lost.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_aborted() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
