//! Shell hosting the list view: command dispatch, navigation and rendering

use domain_products::{FavouriteService, ProductRepository, ProductService};
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::Command;
use crate::config::ViewConfig;
use crate::render::{help, render_detail, render_list};
use crate::router::{Navigation, Route, Router};
use crate::view::ProductListView;

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Redraw the current screen
    Render,
    /// Show a one-off message, then redraw
    Message(String),
    Quit,
}

pub struct Storefront<R: ProductRepository + 'static> {
    service: Arc<ProductService<R>>,
    favourites: Arc<FavouriteService>,
    router: Router,
    config: ViewConfig,
    view: ProductListView<R>,
    seen: Navigation,
    generation: u64,
}

impl<R: ProductRepository + 'static> Storefront<R> {
    pub fn new(
        service: Arc<ProductService<R>>,
        favourites: Arc<FavouriteService>,
        config: ViewConfig,
    ) -> Self {
        let router = Router::new();
        let view = ProductListView::new(
            Arc::clone(&service),
            Arc::clone(&favourites),
            router.clone(),
            config,
        );
        let seen = router.current();

        Self {
            service,
            favourites,
            router,
            config,
            view,
            seen,
            generation: 0,
        }
    }

    pub fn view(&self) -> &ProductListView<R> {
        &self.view
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Number of list view rebuilds so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        debug!(?command, "Handling command");

        let outcome = match command {
            Command::Filter(text) => {
                self.view.set_filter(text);
                Outcome::Render
            }
            Command::NextPage => self.moved(self.view.next_page(), "Already on the last page"),
            Command::PreviousPage => {
                self.moved(self.view.previous_page(), "Already on the first page")
            }
            Command::Select(row) => match self.row(row) {
                Ok(product) => {
                    self.view.on_select(product);
                    Outcome::Render
                }
                Err(message) => message,
            },
            Command::Favourite(row) => match self.row(row) {
                Ok(product) => {
                    let name = product.name.clone();
                    if self.view.add_to_favourites(product) {
                        Outcome::Render
                    } else {
                        Outcome::Message(format!("{} is already a favourite", name))
                    }
                }
                Err(message) => message,
            },
            Command::Refresh => {
                self.view.refresh();
                Outcome::Render
            }
            Command::Back => {
                self.router.navigate(Route::Products);
                Outcome::Render
            }
            Command::Go(path) => match self.router.navigate_by_url(&path) {
                Ok(_) => Outcome::Render,
                Err(e) => Outcome::Message(e.to_string()),
            },
            Command::Help => Outcome::Message(help().to_string()),
            Command::Quit => Outcome::Quit,
        };

        self.sync_route();
        outcome
    }

    /// Rebuild the list view when `/products` was (re-)entered since the last
    /// call. Returns whether a rebuild happened.
    pub fn sync_route(&mut self) -> bool {
        let current = self.router.current();
        if current.id == self.seen.id {
            return false;
        }
        self.seen = current;

        if current.route != Route::Products {
            return false;
        }

        // The old view is dropped here, which stops its pipeline.
        self.view = ProductListView::new(
            Arc::clone(&self.service),
            Arc::clone(&self.favourites),
            self.router.clone(),
            self.config,
        );
        self.generation += 1;
        info!(generation = self.generation, "Product list rebuilt");
        true
    }

    pub fn render(&self) -> String {
        match self.router.route() {
            Route::Products => render_list(&self.view.snapshot()),
            Route::ProductDetail(id) => {
                let product = self
                    .view
                    .selected()
                    .filter(|product| product.id == id)
                    .or_else(|| self.view.find(id));
                render_detail(product.as_ref())
            }
        }
    }

    fn moved(&self, moved: bool, refusal: &str) -> Outcome {
        if moved {
            Outcome::Render
        } else {
            Outcome::Message(refusal.to_string())
        }
    }

    fn row(&self, row: usize) -> Result<domain_products::Product, Outcome> {
        row.checked_sub(1)
            .and_then(|index| self.view.page().into_iter().nth(index))
            .ok_or_else(|| Outcome::Message(format!("No product on row {}", row)))
    }
}
