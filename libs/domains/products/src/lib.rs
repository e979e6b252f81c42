//! Products Domain
//!
//! Client-side catalog services: the product Data Service, favourites and the
//! shared loading indicator, on top of a remote REST resource.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Service / Favourites     │  ← Retry, sharing, notifications, loading state
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Repository               │  ← Data access (trait + reqwest implementation)
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Models                   │  ← Entities, payloads
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_products::{CatalogConfig, HttpProductRepository, LoadingService, ProductService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CatalogConfig::from_env()?;
//! let repository = HttpProductRepository::new(&config.http)?;
//! let service = ProductService::new(repository, LoadingService::new(), &config);
//!
//! let products = service.products().await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod favourites;
pub mod http;
pub mod loading;
pub mod models;
pub mod repository;
pub mod retry;
pub mod service;

// Re-export commonly used types
pub use config::{CatalogConfig, FavouriteConfig};
pub use error::{ProductError, ProductResult, USER_FACING_MESSAGE};
pub use favourites::FavouriteService;
pub use http::HttpProductRepository;
pub use loading::{LoadingGuard, LoadingService};
pub use models::{NewProduct, Product, ProductId};
pub use repository::ProductRepository;
pub use retry::RetryPolicy;
pub use service::{ProductService, SharedProducts};
