use futures::future::{BoxFuture, Shared};
use futures::stream::{self, BoxStream};
use futures::{Future, FutureExt, StreamExt};

/// A future whose output is computed once and cloned to every awaiter.
pub type SharedFuture<T> = Shared<BoxFuture<'static, T>>;

/// Multicast `future`: the first poll drives it, later clones replay the
/// stored output instead of running it again.
pub fn share<F>(future: F) -> SharedFuture<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Clone,
{
    future.boxed().shared()
}

/// One-item stream view of a shared future.
pub fn replay<T>(shared: SharedFuture<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + Sync + 'static,
{
    stream::once(shared).boxed()
}
