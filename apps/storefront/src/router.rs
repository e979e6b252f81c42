//! In-process router for the list and detail screens

use dataflow::Subject;
use domain_products::ProductId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/products`
    Products,
    /// `/products/:id`
    ProductDetail(ProductId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No route matches '{0}'")]
    NotFound(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Products => "/products".to_string(),
            Route::ProductDetail(id) => format!("/products/{}", id),
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let not_found = || RouteError::NotFound(path.to_string());
        let trimmed = path.trim().trim_end_matches('/');

        let rest = trimmed.strip_prefix("/products").ok_or_else(not_found)?;
        match rest {
            "" => Ok(Route::Products),
            _ => rest
                .strip_prefix('/')
                .and_then(|id| id.parse().ok())
                .map(Route::ProductDetail)
                .ok_or_else(not_found),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

/// One navigation event. `id` grows on every navigation, so re-entering the
/// current route is still a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub id: u64,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub struct Router {
    current: Subject<Navigation>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Subject::new(Navigation {
                id: 0,
                route: Route::Products,
            }),
        }
    }

    pub fn navigate(&self, route: Route) {
        self.current.update(|navigation| {
            navigation.id += 1;
            navigation.route = route;
        });
        info!(%route, "Navigated");
    }

    pub fn navigate_by_url(&self, path: &str) -> Result<Route, RouteError> {
        let route = Route::parse(path)?;
        self.navigate(route);
        Ok(route)
    }

    pub fn current(&self) -> Navigation {
        self.current.value()
    }

    pub fn route(&self) -> Route {
        self.current.with(|navigation| navigation.route)
    }

    pub fn subscribe(&self) -> watch::Receiver<Navigation> {
        self.current.subscribe()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
