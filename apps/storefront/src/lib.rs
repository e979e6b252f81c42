//! Storefront - terminal product catalog browser
//!
//! Hosts the Product List View on top of the products domain services:
//!
//! - [`view::ProductListView`]: debounced filter, combine-latest with the
//!   shared catalog, clamped pagination, selection
//! - [`router::Router`]: `/products` and `/products/:id`, observable navigation
//! - [`app::Storefront`]: command dispatch and view rebuilds on navigation
//! - [`render`]: plain-text screens

pub mod app;
pub mod command;
pub mod config;
pub mod filter;
pub mod pagination;
pub mod render;
pub mod router;
pub mod view;

pub use app::{Outcome, Storefront};
pub use command::{Command, CommandError};
pub use config::{Config, ViewConfig};
pub use filter::{accepted_filters, apply_filter, FilterPolicy};
pub use pagination::Pagination;
pub use router::{Navigation, Route, RouteError, Router};
pub use view::{ListSnapshot, ListState, ProductListView};
