//! Integration tests for the products Data Service
//!
//! These tests run `ProductService` on top of the real HTTP repository and the
//! fake catalog, covering retry, sharing and error collapsing end to end.

use core_config::http::HttpClientConfig;
use domain_products::*;
use std::time::Duration;
use test_utils::{CatalogServer, TestDataBuilder};

fn fast_config(server: &CatalogServer) -> CatalogConfig {
    CatalogConfig {
        http: HttpClientConfig::new(server.base_url()).with_timeout(Duration::from_secs(5)),
        retry: RetryPolicy::new().with_delay(Duration::from_millis(10)),
        emit_delay: Duration::ZERO,
    }
}

fn service(server: &CatalogServer) -> ProductService<HttpProductRepository> {
    let config = fast_config(server);
    let repository = HttpProductRepository::new(&config.http).unwrap();
    ProductService::new(repository, LoadingService::new(), &config)
}

#[tokio::test]
async fn test_service_lists_catalog() {
    let builder = TestDataBuilder::from_test_name("service_lists");
    let server = CatalogServer::start(builder.catalog(&["Phone", "Tablet"])).await;

    let products = service(&server).products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_concurrent_subscribers_share_one_request() {
    let builder = TestDataBuilder::from_test_name("service_shares");
    let server = CatalogServer::start(builder.catalog(&["Phone"])).await;
    let service = service(&server);

    let (a, b, c) = tokio::join!(service.products(), service.products(), service.products());

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let builder = TestDataBuilder::from_test_name("service_retries");
    let server = CatalogServer::start(builder.catalog(&["Phone"])).await;
    server.fail_next(2, 500, "warming up");

    let products = service(&server).products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(server.request_count(), 3);
}

#[tokio::test]
async fn test_persistent_failure_yields_single_user_message() {
    let server = CatalogServer::start(vec![]).await;
    server.fail_next(10, 500, "down");
    let service = service(&server);

    let err = service.products().await.unwrap_err();

    assert_eq!(err.to_string(), USER_FACING_MESSAGE);
    // One initial attempt plus three retries
    assert_eq!(server.request_count(), 4);
}

#[tokio::test]
async fn test_refresh_issues_new_request_and_sees_changes() {
    let builder = TestDataBuilder::from_test_name("service_refresh");
    let server = CatalogServer::start(builder.catalog(&["Phone"])).await;
    let service = service(&server);
    service.products().await.unwrap();

    service
        .insert_product(NewProduct::new("Tablet", 199.0))
        .await
        .unwrap();
    let refreshed = service.init_products().await.unwrap();

    assert_eq!(refreshed.len(), 2);
    assert_eq!(refreshed[0].name, "Tablet");
}

#[tokio::test]
async fn test_failed_delete_is_not_retried() {
    let builder = TestDataBuilder::from_test_name("service_delete");
    let server = CatalogServer::start(builder.catalog(&["Phone"])).await;
    let service = service(&server);
    service.products().await.unwrap();
    let before = server.request_count();

    let err = service.delete_product(42).await.unwrap_err();

    assert_eq!(err, ProductError::Unavailable);
    assert_eq!(server.request_count(), before + 1);
}
