use std::future::Future;
use tokio::task::JoinHandle;

/// A spawned task bound to the lifetime of its owner.
///
/// Dropping the `ScopedTask` aborts the task, so timers and pipelines owned by
/// a view or service never outlive it.
#[derive(Debug)]
pub struct ScopedTask {
    handle: JoinHandle<()>,
}

impl ScopedTask {
    /// Spawn `future` on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort now instead of waiting for the drop.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::trace!("aborting scoped task");
        }
        self.handle.abort();
    }
}
