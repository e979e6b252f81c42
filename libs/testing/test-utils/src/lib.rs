//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the workspace crates:
//! - `CatalogServer`: in-process fake of the catalog REST resource, with
//!   request recording and failure injection
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{CatalogServer, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_catalog_test() {
//!     let builder = TestDataBuilder::from_test_name("my_catalog_test");
//!     let server = CatalogServer::start(builder.catalog(&["Phone", "Tablet"])).await;
//!
//!     // Point the HTTP client at server.base_url()
//!     server.fail_next(2, 500, "boom");
//! }
//! ```

mod catalog;

pub use catalog::{CatalogServer, RecordedRequest};

use serde_json::{Value, json};

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by deriving every generated value from
/// a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_list_products");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Price in `[1.00, 100.99]`, stable for a given seed and id
    pub fn price(&self, id: i64) -> f64 {
        let mixed = self.seed.wrapping_mul(31).wrapping_add(id as u64);
        1.0 + (mixed % 100) as f64 + (mixed % 100) as f64 / 100.0
    }

    /// Catalog wire representation of one product
    pub fn product(&self, id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "price": self.price(id),
            "description": format!("{} description", name),
            "imageUrl": format!("https://images.example.com/{}.png", id),
            "discontinued": false,
            "fixedPrice": id % 2 == 0,
            "modifiedDate": format!("2024-01-{:02}T10:00:00", (id % 28) + 1),
        })
    }

    /// Products with ids `1..=names.len()`, in the given order
    pub fn catalog(&self, names: &[&str]) -> Vec<Value> {
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| self.product(id, name))
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    use serde_json::Value;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert the `name` fields of wire products, in order
    pub fn assert_names(products: &[Value], expected: &[&str], context: &str) {
        let names: Vec<&str> = products
            .iter()
            .filter_map(|p| p.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, expected, "{}: unexpected product names", context);
    }
}
