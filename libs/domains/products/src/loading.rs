use dataflow::Subject;
use std::future::Future;
use tokio::sync::watch;

/// Global loading indicator.
///
/// Counts tracked operations in flight; the indicator is on while the count is
/// non-zero, so overlapping fetches keep it on until the last one finishes.
#[derive(Debug, Clone, Default)]
pub struct LoadingService {
    active: Subject<usize>,
}

impl LoadingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.active.value() > 0
    }

    /// Number of tracked operations in flight
    pub fn active(&self) -> usize {
        self.active.value()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.active.subscribe()
    }

    /// Turn the indicator on until the returned guard is dropped.
    pub fn track(&self) -> LoadingGuard {
        self.active.update(|count| *count += 1);
        LoadingGuard {
            active: self.active.clone(),
        }
    }

    /// Keep the indicator on for the whole life of `operation`.
    ///
    /// The indicator turns on immediately, not at the first poll.
    pub fn show_loader_until_completed<F>(&self, operation: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        let guard = self.track();
        async move {
            let output = operation.await;
            drop(guard);
            output
        }
    }
}

/// Releases one unit of loading state on drop
#[derive(Debug)]
pub struct LoadingGuard {
    active: Subject<usize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active.update(|count| *count = count.saturating_sub(1));
    }
}
