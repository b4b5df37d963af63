//! Cooperative shutdown signalling.
//!
//! The engine checks a [`ShutdownCoordinator`] between units of work (never
//! mid-window), so Ctrl-C stops the harvest at a checkpoint boundary and the
//! next start resumes cleanly from the persisted cursor.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared handle to a shutdown coordinator.
pub type SharedShutdown = Arc<ShutdownCoordinator>;

static GLOBAL_SHUTDOWN: OnceCell<SharedShutdown> = OnceCell::new();

/// Register the process-wide shutdown handle; later calls are ignored.
pub fn install_global(handle: SharedShutdown) {
    let _ = GLOBAL_SHUTDOWN.set(handle);
}

/// The process-wide shutdown handle, if one has been installed.
pub fn global() -> Option<SharedShutdown> {
    GLOBAL_SHUTDOWN.get().cloned()
}

/// Single-shot shutdown flag tasks can poll or await.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownCoordinator {
    /// New coordinator wrapped for sharing.
    pub fn shared() -> SharedShutdown {
        Arc::new(Self::default())
    }

    /// Request shutdown; waiters are woken exactly once.
    pub fn request_shutdown(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is requested; returns immediately if it already
    /// has been.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a request landing in
        // between still wakes this waiter.
        notified.as_mut().enable();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}
