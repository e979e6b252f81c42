//! Favourites Service - transient "added to favourites" notifications

use dataflow::{ScopedTask, Subject};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::config::FavouriteConfig;
use crate::models::{Product, ProductId};

/// In-memory favourites, keyed by product id.
///
/// The set only grows; its size is what the UI shows. Each addition is also
/// published on a notification subject that clears itself after
/// `notification_ttl`. Every addition arms its own clear timer and timers never
/// cancel each other, so the earliest pending one wins even if newer additions
/// happened in between. Dropping the service cancels all pending clears.
pub struct FavouriteService {
    config: FavouriteConfig,
    favourites: Mutex<HashSet<ProductId>>,
    notification: Subject<Option<Product>>,
    pending_clears: Mutex<Vec<ScopedTask>>,
}

impl FavouriteService {
    pub fn new(config: FavouriteConfig) -> Self {
        Self {
            config,
            favourites: Mutex::new(HashSet::new()),
            notification: Subject::new(None),
            pending_clears: Mutex::new(Vec::new()),
        }
    }

    /// Add `product` and announce it.
    ///
    /// Returns `false` when the product was already a favourite; it is still
    /// announced again. Must run inside a tokio runtime (the clear timer is a
    /// spawned task).
    #[instrument(skip(self, product), fields(product_id = product.id))]
    pub fn add_to_favourites(&self, product: Product) -> bool {
        let inserted = self
            .favourites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id);

        self.notification.next(Some(product));

        let notification = self.notification.clone();
        let ttl = self.config.notification_ttl;
        let clear = ScopedTask::spawn(async move {
            tokio::time::sleep(ttl).await;
            notification.next(None);
        });

        let mut pending = self
            .pending_clears
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.retain(|task| !task.is_finished());
        pending.push(clear);
        drop(pending);

        debug!(inserted, total = self.favourites_nb(), "Favourite added");
        inserted
    }

    /// Number of distinct favourites
    pub fn favourites_nb(&self) -> usize {
        self.favourites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_favourite(&self, id: ProductId) -> bool {
        self.favourites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Most recent addition, until its notification window closes
    pub fn current_notification(&self) -> Option<Product> {
        self.notification.value()
    }

    pub fn favourite_added(&self) -> watch::Receiver<Option<Product>> {
        self.notification.subscribe()
    }
}

impl Default for FavouriteService {
    fn default() -> Self {
        Self::new(FavouriteConfig::default())
    }
}
