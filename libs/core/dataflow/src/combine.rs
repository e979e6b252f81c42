use futures::stream::{BoxStream, FusedStream};
use futures::{Stream, StreamExt};

enum Side<L, R> {
    Left(Option<L>),
    Right(Option<R>),
}

/// Pair the most recent values of two streams.
///
/// Nothing is emitted until both sides have produced a value; after that every
/// new value on either side emits a fresh pair. The combined stream ends when
/// both inputs have ended, or as soon as one side ends without ever producing
/// a value (no pair can be formed any more).
pub fn combine_latest<A, B>(left: A, right: B) -> BoxStream<'static, (A::Item, B::Item)>
where
    A: Stream + Send + 'static,
    B: Stream + Send + 'static,
    A::Item: Clone + Send + 'static,
    B::Item: Clone + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut left = Box::pin(left).fuse();
        let mut right = Box::pin(right).fuse();
        let mut latest_left: Option<A::Item> = None;
        let mut latest_right: Option<B::Item> = None;

        loop {
            let event = tokio::select! {
                biased;
                value = left.next(), if !left.is_terminated() => Side::Left(value),
                value = right.next(), if !right.is_terminated() => Side::Right(value),
                else => break,
            };

            let changed = match event {
                Side::Left(Some(value)) => {
                    latest_left = Some(value);
                    true
                }
                Side::Right(Some(value)) => {
                    latest_right = Some(value);
                    true
                }
                Side::Left(None) | Side::Right(None) => false,
            };

            if (left.is_terminated() && latest_left.is_none())
                || (right.is_terminated() && latest_right.is_none())
            {
                break;
            }

            if !changed {
                continue;
            }
            if let (Some(l), Some(r)) = (&latest_left, &latest_right) {
                yield (l.clone(), r.clone());
            }
        }
    })
}
