//! Dataflow primitives
//!
//! Small building blocks for wiring state through a UI-style pipeline without a
//! reactive runtime.
//!
//! ## Nodes and stages
//!
//! - **`Subject<T>`**: a value cell that remembers its latest value and
//!   notifies subscribers (backed by `tokio::sync::watch`)
//! - **Stages** (`FlowExt`): `debounce`, `distinct_until_changed`, `start_with`
//! - **`combine_latest`**: pairs the most recent values of two streams
//! - **`share`**: runs a future once and hands its output to every awaiter
//! - **`ScopedTask`**: a spawned task that is aborted when its owner drops it
//!
//! ## Example
//!
//! ```ignore
//! use dataflow::{combine_latest, FlowExt, ScopedTask, Subject};
//! use futures::StreamExt;
//! use std::time::Duration;
//!
//! let input = Subject::new(String::new());
//! let output = Subject::new(Vec::<String>::new());
//!
//! let filters = input
//!     .changes()
//!     .debounce(Duration::from_millis(500))
//!     .distinct_until_changed()
//!     .start_with(String::new());
//!
//! let sink = output.clone();
//! let _pipeline = ScopedTask::spawn(async move {
//!     let mut pairs = combine_latest(catalog, filters);
//!     while let Some((items, filter)) = pairs.next().await {
//!         sink.next(apply(&items, &filter));
//!     }
//! });
//! ```

mod combine;
mod ops;
mod shared;
mod subject;
mod task;

pub use combine::combine_latest;
pub use ops::{FlowExt, debounce, distinct_until_changed, start_with};
pub use shared::{SharedFuture, replay, share};
pub use subject::Subject;
pub use task::ScopedTask;
