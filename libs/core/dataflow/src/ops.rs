//! Pure stream stages.

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, future};
use std::time::Duration;
use tokio::time::Instant;

enum Step<T> {
    Item(T),
    Quiet,
    Finished,
}

/// Emit an item only once `period` has passed without a newer one.
///
/// Every arrival restarts the quiet window and replaces the pending item. When
/// the source ends, a pending item is flushed immediately.
pub fn debounce<S>(source: S, period: Duration) -> BoxStream<'static, S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut source = Box::pin(source);
        let mut pending: Option<S::Item> = None;
        let quiet = tokio::time::sleep(period);
        tokio::pin!(quiet);

        loop {
            let step = tokio::select! {
                biased;
                item = source.next() => match item {
                    Some(item) => Step::Item(item),
                    None => Step::Finished,
                },
                () = &mut quiet, if pending.is_some() => Step::Quiet,
            };

            match step {
                Step::Item(item) => {
                    pending = Some(item);
                    quiet.as_mut().reset(Instant::now() + period);
                }
                Step::Quiet => {
                    if let Some(item) = pending.take() {
                        yield item;
                    }
                }
                Step::Finished => {
                    if let Some(item) = pending.take() {
                        yield item;
                    }
                    break;
                }
            }
        }
    })
}

/// Drop items equal to the previously emitted one.
pub fn distinct_until_changed<S>(source: S) -> BoxStream<'static, S::Item>
where
    S: Stream + Send + 'static,
    S::Item: PartialEq + Clone + Send + 'static,
{
    let mut last: Option<S::Item> = None;
    source
        .filter(move |item| {
            let fresh = last.as_ref() != Some(item);
            if fresh {
                last = Some(item.clone());
            }
            future::ready(fresh)
        })
        .boxed()
}

/// Emit `first` before anything from `source`.
pub fn start_with<S>(source: S, first: S::Item) -> BoxStream<'static, S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    stream::once(future::ready(first)).chain(source).boxed()
}

/// Method-style access to the stages, so pipelines read top to bottom.
pub trait FlowExt: Stream + Sized + Send + 'static
where
    Self::Item: Send + 'static,
{
    fn debounce(self, period: Duration) -> BoxStream<'static, Self::Item> {
        debounce(self, period)
    }

    fn distinct_until_changed(self) -> BoxStream<'static, Self::Item>
    where
        Self::Item: PartialEq + Clone,
    {
        distinct_until_changed(self)
    }

    fn start_with(self, first: Self::Item) -> BoxStream<'static, Self::Item> {
        start_with(self, first)
    }
}

impl<S> FlowExt for S
where
    S: Stream + Sized + Send + 'static,
    S::Item: Send + 'static,
{
}
