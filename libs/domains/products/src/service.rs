//! Product Service - the catalog Data Service

use dataflow::{replay, share, ScopedTask, SharedFuture};
use futures::stream::BoxStream;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use validator::Validate;

use crate::config::CatalogConfig;
use crate::error::{ProductError, ProductResult};
use crate::loading::LoadingService;
use crate::models::{NewProduct, Product, ProductId};
use crate::repository::ProductRepository;
use crate::retry::{retry_with_delay, RetryPolicy};

/// Multicast result of one catalog fetch
pub type SharedProducts = SharedFuture<ProductResult<Arc<Vec<Product>>>>;

/// Product service: fetches the catalog once per initialisation and shares
/// the result with every subscriber.
///
/// Only the list fetch is retried and paced; inserts and deletes run once.
/// Every remote failure is logged with its detail and surfaced as
/// [`ProductError::Unavailable`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    loading: LoadingService,
    retry: RetryPolicy,
    emit_delay: Duration,
    products: RwLock<SharedProducts>,
    loader: Mutex<Option<ScopedTask>>,
}

impl<R: ProductRepository + 'static> ProductService<R> {
    /// Create the service and start the first catalog fetch.
    ///
    /// # Panics
    /// Panics outside a tokio runtime.
    pub fn new(repository: R, loading: LoadingService, config: &CatalogConfig) -> Self {
        let repository = Arc::new(repository);
        let products = Self::fetch(Arc::clone(&repository), config.retry, config.emit_delay);

        let service = Self {
            repository,
            loading,
            retry: config.retry,
            emit_delay: config.emit_delay,
            products: RwLock::new(products.clone()),
            loader: Mutex::new(None),
        };
        service.register_loader(products);
        service
    }

    /// Start a fresh catalog fetch and make it the shared result.
    ///
    /// Subscribers that already hold the previous result keep it; callers of
    /// [`products`](Self::products) from now on get the new one.
    #[instrument(skip(self))]
    pub fn init_products(&self) -> SharedProducts {
        let products = Self::fetch(Arc::clone(&self.repository), self.retry, self.emit_delay);
        *self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = products.clone();
        self.register_loader(products.clone());
        products
    }

    /// Current shared result; never issues a request by itself.
    pub fn products(&self) -> SharedProducts {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// [`products`](Self::products) as a one-item stream
    pub fn products_stream(&self) -> BoxStream<'static, ProductResult<Arc<Vec<Product>>>> {
        replay(self.products())
    }

    pub fn loading(&self) -> &LoadingService {
        &self.loading
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn insert_product(&self, input: NewProduct) -> ProductResult<Product> {
        input.validate()?;

        let product = self.repository.create(input).await.map_err(handle_error)?;
        info!(product_id = product.id, "Product inserted");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> ProductResult<()> {
        self.repository.delete(id).await.map_err(handle_error)?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    fn fetch(repository: Arc<R>, retry: RetryPolicy, emit_delay: Duration) -> SharedProducts {
        share(async move {
            let products = retry_with_delay(
                || {
                    let repository = Arc::clone(&repository);
                    async move { repository.list().await }
                },
                retry,
            )
            .await
            .map_err(handle_error)?;

            tokio::time::sleep(emit_delay).await;

            info!(count = products.len(), "Catalog loaded");
            for product in &products {
                debug!(id = product.id, name = %product.name, price = product.price, "catalog entry");
            }
            Ok(Arc::new(products))
        })
    }

    /// Drive `products` under the loading indicator. The previous registration
    /// is aborted, which also releases its share of the indicator.
    fn register_loader(&self, products: SharedProducts) {
        let tracked = self.loading.show_loader_until_completed(products);
        let task = ScopedTask::spawn(async move {
            let _ = tracked.await;
        });
        *self.loader.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
    }
}

/// Log the detailed failure and collapse it into the user-facing error.
fn handle_error(err: ProductError) -> ProductError {
    if err.is_user_facing() {
        return err;
    }
    match &err {
        ProductError::Backend { status, .. } => {
            error!(status = *status, error = %err, "Catalog backend returned an error");
        }
        _ => error!(error = %err, "Catalog request failed on the client side"),
    }
    ProductError::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::USER_FACING_MESSAGE;
    use crate::repository::MockProductRepository;
    use tokio::time::Instant;

    fn product(id: ProductId, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: 1.0,
            description: None,
            image_url: None,
            discontinued: false,
            fixed_price: false,
            modified_date: None,
        }
    }

    fn config() -> CatalogConfig {
        CatalogConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_products_are_fetched_once_and_shared() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|| Ok(vec![product(1, "Phone"), product(2, "Tablet")]));

        let service = ProductService::new(repo, LoadingService::new(), &config());

        let first = service.products().await.unwrap();
        let second = service.products().await.unwrap();
        let streamed = futures::StreamExt::collect::<Vec<_>>(service.products_stream()).await;

        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(streamed.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_fetch_waits_for_emit_delay() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![product(1, "Phone")]));

        let started = Instant::now();
        let service = ProductService::new(repo, LoadingService::new(), &config());
        service.products().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_surfaces_single_user_message() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .times(4)
            .returning(|| Err(ProductError::Network("connection refused".into())));

        let service = ProductService::new(repo, LoadingService::new(), &config());

        let err = service.products().await.unwrap_err();
        assert_eq!(err, ProductError::Unavailable);
        assert_eq!(err.to_string(), USER_FACING_MESSAGE);

        // Replayed, not re-fetched
        assert_eq!(service.products().await.unwrap_err(), ProductError::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_recovers_before_retries_run_out() {
        let mut repo = MockProductRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_list()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| {
                Err(ProductError::Backend {
                    status: 500,
                    body: "oops".into(),
                })
            });
        repo.expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![product(1, "Phone")]));

        let service = ProductService::new(repo, LoadingService::new(), &config());
        assert_eq!(service.products().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_products_refetches() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .times(2)
            .returning(|| Ok(vec![product(1, "Phone")]));

        let service = ProductService::new(repo, LoadingService::new(), &config());
        service.products().await.unwrap();

        let refreshed = service.init_products();
        assert_eq!(refreshed.await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_indicator_follows_fetch() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));

        let loading = LoadingService::new();
        let service = ProductService::new(repo, loading.clone(), &config());
        assert!(loading.is_loading());

        service.products().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!loading.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_service_releases_loading_indicator() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));

        let loading = LoadingService::new();
        let service = ProductService::new(repo, loading.clone(), &config());
        assert!(loading.is_loading());

        drop(service);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!loading.is_loading());
    }

    #[tokio::test]
    async fn test_insert_validates_before_calling_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));
        repo.expect_create().never();

        let config = CatalogConfig::immediate(Default::default());
        let service = ProductService::new(repo, LoadingService::new(), &config);
        let err = service
            .insert_product(NewProduct::new("", 10.0))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_insert_returns_created_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));
        repo.expect_create()
            .withf(|input| input.name == "Desk lamp")
            .times(1)
            .returning(|input| Ok(product(99, &input.name)));

        let config = CatalogConfig::immediate(Default::default());
        let service = ProductService::new(repo, LoadingService::new(), &config);
        let created = service
            .insert_product(NewProduct::new("Desk lamp", 25.0))
            .await
            .unwrap();

        assert_eq!(created.id, 99);
    }

    #[tokio::test]
    async fn test_insert_failure_is_not_retried() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));
        repo.expect_create().times(1).returning(|_| {
            Err(ProductError::Backend {
                status: 409,
                body: "duplicate".into(),
            })
        });

        let service = ProductService::new(repo, LoadingService::new(), &config());
        let err = service
            .insert_product(NewProduct::new("Desk lamp", 25.0))
            .await
            .unwrap_err();

        assert_eq!(err, ProductError::Unavailable);
    }

    #[tokio::test]
    async fn test_delete_maps_errors() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));
        repo.expect_delete()
            .withf(|id| *id == 5)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_delete()
            .withf(|id| *id == 6)
            .times(1)
            .returning(|_| Err(ProductError::Network("timeout".into())));

        let service = ProductService::new(repo, LoadingService::new(), &config());

        assert!(service.delete_product(5).await.is_ok());
        assert_eq!(
            service.delete_product(6).await.unwrap_err(),
            ProductError::Unavailable
        );
    }

    #[test]
    fn test_handle_error_passes_validation_through() {
        let err = handle_error(ProductError::Validation("name".into()));
        assert_eq!(err, ProductError::Validation("name".into()));
        assert_eq!(
            handle_error(ProductError::Decode("bad json".into())),
            ProductError::Unavailable
        );
        assert_eq!(
            handle_error(ProductError::Unavailable),
            ProductError::Unavailable
        );
    }
}
