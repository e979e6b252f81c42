use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A value node in a dataflow graph.
///
/// Holds the latest value and wakes every subscriber when it changes. Late
/// subscribers see the current value immediately, so a `Subject` behaves like
/// a cell rather than an event bus. Clones share the same cell.
pub struct Subject<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("value", &*self.tx.borrow())
            .field("observers", &self.tx.receiver_count())
            .finish()
    }
}

impl<T> Subject<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers, even if nobody is listening.
    pub fn next(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Clone of the current value
    pub fn value(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Stream starting with the current value, then every change.
    pub fn stream(&self) -> WatchStream<T> {
        WatchStream::new(self.tx.subscribe())
    }

    /// Stream of changes made after this call; the current value is skipped.
    pub fn changes(&self) -> WatchStream<T> {
        WatchStream::from_changes(self.tx.subscribe())
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Default for Subject<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}
