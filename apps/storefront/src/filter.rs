//! Filter acceptance policy and stages

use dataflow::FlowExt;
use domain_products::Product;
use futures::stream::BoxStream;
use futures::{future, Stream, StreamExt};
use std::time::Duration;

use crate::config::ViewConfig;

/// Decides which filter edits reach the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub debounce: Duration,
    pub min_len: usize,
}

impl FilterPolicy {
    /// Trimmed `raw`, if it is empty or at least `min_len` characters long.
    pub fn accept(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        (len == 0 || len >= self.min_len).then(|| trimmed.to_string())
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        ViewConfig::default().into()
    }
}

impl From<ViewConfig> for FilterPolicy {
    fn from(config: ViewConfig) -> Self {
        Self {
            debounce: config.debounce,
            min_len: config.min_filter_len,
        }
    }
}

/// Products whose name contains `filter`, ignoring case
pub fn apply_filter(products: &[Product], filter: &str) -> Vec<Product> {
    let needle = filter.to_lowercase();
    products
        .iter()
        .filter(|product| product.name_contains(&needle))
        .cloned()
        .collect()
}

/// Raw edits in, accepted filters out: debounced, trimmed, length-gated and
/// without consecutive duplicates.
///
/// The stream carries no initial value; callers seed it with the empty filter.
pub fn accepted_filters<S>(raw: S, policy: FilterPolicy) -> BoxStream<'static, String>
where
    S: Stream<Item = String> + Send + 'static,
{
    raw.debounce(policy.debounce)
        .filter_map(move |text| future::ready(policy.accept(&text)))
        .distinct_until_changed()
}
