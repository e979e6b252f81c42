//! Product List View
//!
//! Dataflow:
//!
//! ```text
//! filter input ─► debounce ─► trim/gate ─► distinct ─► reset page ─► start with ""
//!                                                                        │
//! ProductService::products_stream() ──────────────────────────► combine_latest
//!                                                                        │
//!                                             name filter, clamp ─► ListState
//! ```
//!
//! The pipeline runs in a [`ScopedTask`] owned by the view, so dropping the
//! view stops it.

use dataflow::{combine_latest, FlowExt, ScopedTask, Subject};
use domain_products::{
    FavouriteService, Product, ProductId, ProductRepository, ProductResult, ProductService,
};
use futures::StreamExt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::config::ViewConfig;
use crate::filter::{accepted_filters, apply_filter, FilterPolicy};
use crate::pagination::Pagination;
use crate::router::{Route, Router};

/// Derived state of the list, republished on every pipeline step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Products matching `filter`
    pub filtered: Vec<Product>,
    /// Last accepted filter
    pub filter: String,
    /// A product list has been received
    pub loaded: bool,
    /// User-facing message of a failed fetch
    pub error: Option<String>,
}

/// Everything the list screen shows, read at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub page: Vec<Product>,
    pub products_number: usize,
    pub current_page: usize,
    pub page_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub filter: String,
    pub loaded: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub favourites: usize,
    /// Ids on `page` that are favourites
    pub favourite_ids: Vec<ProductId>,
    pub notification: Option<Product>,
    pub selected: Option<Product>,
}

pub struct ProductListView<R: ProductRepository + 'static> {
    service: Arc<ProductService<R>>,
    favourites: Arc<FavouriteService>,
    router: Router,
    filter_input: Subject<String>,
    state: Subject<ListState>,
    pagination: Subject<Pagination>,
    selected: Mutex<Option<Product>>,
    _pipeline: ScopedTask,
}

impl<R: ProductRepository + 'static> ProductListView<R> {
    /// Build the view and start its pipeline on the service's current result.
    ///
    /// # Panics
    /// Panics outside a tokio runtime.
    pub fn new(
        service: Arc<ProductService<R>>,
        favourites: Arc<FavouriteService>,
        router: Router,
        config: ViewConfig,
    ) -> Self {
        let filter_input = Subject::new(String::new());
        let state = Subject::new(ListState::default());
        let pagination = Subject::new(Pagination::new(config.page_size));

        let reset = pagination.clone();
        let filters = accepted_filters(filter_input.changes(), FilterPolicy::from(config))
            .inspect(move |filter| {
                debug!(%filter, "Filter accepted");
                reset.update(Pagination::reset);
            })
            .start_with(String::new());

        let combined = combine_latest(service.products_stream(), filters);
        let pipeline = ScopedTask::spawn(run_pipeline(combined, state.clone(), pagination.clone()));

        Self {
            service,
            favourites,
            router,
            filter_input,
            state,
            pagination,
            selected: Mutex::new(None),
            _pipeline: pipeline,
        }
    }

    /// Feed a raw edit of the filter box.
    pub fn set_filter(&self, text: impl Into<String>) {
        self.filter_input.next(text.into());
    }

    pub fn state(&self) -> ListState {
        self.state.value()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination.value()
    }

    /// Number of products matching the filter; 0 until the first load
    pub fn products_number(&self) -> usize {
        self.state.with(|state| state.filtered.len())
    }

    pub fn is_filtered(&self) -> bool {
        self.state.with(|state| !state.filter.is_empty())
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|state| state.error.clone())
    }

    /// Products in the current page window
    pub fn page(&self) -> Vec<Product> {
        let pagination = self.pagination();
        self.state
            .with(|state| state.filtered[pagination.window(state.filtered.len())].to_vec())
    }

    /// Product with `id` among the filtered list, if loaded
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.state
            .with(|state| state.filtered.iter().find(|product| product.id == id).cloned())
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination().has_next(self.products_number())
    }

    pub fn has_previous_page(&self) -> bool {
        self.pagination().has_previous()
    }

    /// Advance one page. Refused (returns `false`) on the last page.
    pub fn next_page(&self) -> bool {
        let total = self.products_number();
        let mut moved = false;
        self.pagination.update(|pagination| moved = pagination.next_page(total));
        if moved {
            self.clear_selection();
        }
        moved
    }

    /// Go back one page. Refused (returns `false`) on the first page.
    pub fn previous_page(&self) -> bool {
        let mut moved = false;
        self.pagination.update(|pagination| moved = pagination.previous_page());
        if moved {
            self.clear_selection();
        }
        moved
    }

    pub fn selected(&self) -> Option<Product> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Select `product` and open its detail route.
    #[instrument(skip(self, product), fields(product_id = product.id))]
    pub fn on_select(&self, product: Product) {
        let route = Route::ProductDetail(product.id);
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(product);
        self.router.navigate(route);
    }

    /// Refetch the catalog and re-enter `/products`.
    ///
    /// This view keeps showing the previous result; the shell replaces it with
    /// a fresh view when it sees the navigation.
    #[instrument(skip(self))]
    pub fn refresh(&self) {
        self.service.init_products();
        self.router.navigate(Route::Products);
    }

    pub fn favourites(&self) -> usize {
        self.favourites.favourites_nb()
    }

    pub fn add_to_favourites(&self, product: Product) -> bool {
        self.favourites.add_to_favourites(product)
    }

    pub fn favourite_added(&self) -> watch::Receiver<Option<Product>> {
        self.favourites.favourite_added()
    }

    pub fn is_loading(&self) -> bool {
        self.service.loading().is_loading()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<usize> {
        self.service.loading().subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state();
        let pagination = self.pagination();
        let total = state.filtered.len();
        let page = state.filtered[pagination.window(total)].to_vec();
        let favourite_ids = page
            .iter()
            .map(|product| product.id)
            .filter(|id| self.favourites.is_favourite(*id))
            .collect();

        ListSnapshot {
            page,
            products_number: total,
            current_page: pagination.current_page(),
            page_count: pagination.page_count(total),
            has_previous: pagination.has_previous(),
            has_next: pagination.has_next(total),
            filter: state.filter,
            loaded: state.loaded,
            loading: self.is_loading(),
            error: state.error,
            favourites: self.favourites(),
            favourite_ids,
            notification: self.favourites.current_notification(),
            selected: self.selected(),
        }
    }

    fn clear_selection(&self) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

async fn run_pipeline<S>(mut combined: S, state: Subject<ListState>, pagination: Subject<Pagination>)
where
    S: futures::Stream<Item = (ProductResult<Arc<Vec<Product>>>, String)> + Unpin,
{
    while let Some((products, filter)) = combined.next().await {
        match products {
            Ok(products) => {
                let filtered = apply_filter(&products, &filter);
                let total = filtered.len();
                debug!(%filter, total, "Filtered products");

                pagination.update(|pagination| pagination.clamp(total));
                state.next(ListState {
                    filtered,
                    filter,
                    loaded: true,
                    error: None,
                });
            }
            Err(err) => state.update(|state| {
                state.filter = filter;
                state.error = Some(err.to_string());
            }),
        }
    }
    debug!("List pipeline finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_products::{
        CatalogConfig, LoadingService, NewProduct, ProductError, ProductId, USER_FACING_MESSAGE,
    };
    use std::time::Duration;

    struct StaticCatalog(Result<Vec<Product>, ProductError>);

    #[async_trait]
    impl ProductRepository for StaticCatalog {
        async fn list(&self) -> ProductResult<Vec<Product>> {
            self.0.clone()
        }

        async fn create(&self, _input: NewProduct) -> ProductResult<Product> {
            Err(ProductError::Unavailable)
        }

        async fn delete(&self, _id: ProductId) -> ProductResult<()> {
            Ok(())
        }
    }

    fn product(id: ProductId, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: 10.0,
            description: None,
            image_url: None,
            discontinued: false,
            fixed_price: false,
            modified_date: None,
        }
    }

    fn catalog(count: i64) -> Vec<Product> {
        (1..=count).map(|id| product(id, &format!("Item {}", id))).collect()
    }

    fn view(products: Result<Vec<Product>, ProductError>) -> ProductListView<StaticCatalog> {
        let config = CatalogConfig::default();
        let service = Arc::new(ProductService::new(
            StaticCatalog(products),
            LoadingService::new(),
            &config,
        ));
        ProductListView::new(
            service,
            Arc::new(FavouriteService::default()),
            Router::new(),
            ViewConfig::default(),
        )
    }

    async fn settle(view: &ProductListView<StaticCatalog>) {
        let mut rx = view.subscribe();
        let _ = rx.wait_for(|state| state.loaded || state.error.is_some()).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_are_zero_before_load() {
        let view = view(Ok(catalog(3)));

        assert_eq!(view.products_number(), 0);
        assert!(view.page().is_empty());
        assert!(view.is_loading());

        settle(&view).await;
        assert_eq!(view.products_number(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pages_through_filtered_list() {
        let view = view(Ok(catalog(12)));
        settle(&view).await;

        assert_eq!(view.page().len(), 5);
        assert!(!view.has_previous_page());
        assert!(view.next_page());
        assert!(view.next_page());
        assert_eq!(view.page().iter().map(|p| p.id).collect::<Vec<_>>(), [11, 12]);
        assert!(!view.next_page());
        assert_eq!(view.pagination().current_page(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_filter_is_ignored() {
        let view = view(Ok(vec![product(1, "Nokia Lumia"), product(2, "iPhone")]));
        settle(&view).await;

        view.set_filter("lu");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(view.products_number(), 2);
        assert!(!view.is_filtered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_filter_narrows_and_resets_page() {
        let mut products = catalog(10);
        products.push(product(11, "Nokia Lumia"));
        let view = view(Ok(products));
        settle(&view).await;

        assert!(view.next_page());
        view.set_filter("  LUMIA ");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(view.is_filtered());
        assert_eq!(view.products_number(), 1);
        assert_eq!(view.pagination().current_page(), 1);
        assert_eq!(view.page()[0].name, "Nokia Lumia");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_reported_once() {
        let view = view(Err(ProductError::Network("refused".into())));
        settle(&view).await;

        assert_eq!(view.error().as_deref(), Some(USER_FACING_MESSAGE));
        assert_eq!(view.products_number(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_navigates_and_paging_clears_selection() {
        let view = view(Ok(catalog(7)));
        settle(&view).await;
        let mut navigation = view.router.subscribe();

        view.on_select(product(3, "Item 3"));
        navigation.changed().await.unwrap();
        assert_eq!(navigation.borrow().route, Route::ProductDetail(3));
        assert_eq!(view.selected().map(|p| p.id), Some(3));

        assert!(view.next_page());
        assert!(view.selected().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_reenters_product_route() {
        let view = view(Ok(catalog(2)));
        settle(&view).await;
        let before = view.router.current().id;

        view.refresh();

        let after = view.router.current();
        assert_eq!(after.route, Route::Products);
        assert_eq!(after.id, before + 1);
        assert!(view.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_favourites_are_delegated() {
        let view = view(Ok(catalog(2)));

        assert!(view.add_to_favourites(product(1, "Item 1")));
        assert_eq!(view.favourites(), 1);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.notification.map(|p| p.id), Some(1));
        assert_eq!(snapshot.favourite_ids, Vec::<ProductId>::new());

        settle(&view).await;
        assert_eq!(view.snapshot().favourite_ids, vec![1]);
        assert_eq!(view.find(2).map(|p| p.name), Some("Item 2".to_string()));
        assert!(view.find(3).is_none());

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(view.favourite_added().borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_view_stops_pipeline() {
        let view = view(Ok(catalog(2)));
        let input = view.filter_input.clone();
        assert!(input.observer_count() >= 1);

        drop(view);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(input.observer_count(), 0);
    }
}
