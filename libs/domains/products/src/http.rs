//! HTTP implementation of [`ProductRepository`].

use async_trait::async_trait;
use core_config::http::HttpClientConfig;
use reqwest::{Client, Response, Url};
use tracing::{debug, instrument};

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductId};
use crate::repository::ProductRepository;

/// OData ordering applied to every list request.
pub const ORDER_BY_MODIFIED_DESC: &str = "$orderby=ModifiedDate%20desc";

/// Catalog client for the REST collection at `base_url`
#[derive(Debug, Clone)]
pub struct HttpProductRepository {
    client: Client,
    base_url: Url,
}

impl HttpProductRepository {
    pub fn new(config: &HttpClientConfig) -> ProductResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ProductError::Config(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ProductError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}?$orderby=ModifiedDate%20desc`
    pub fn list_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(ORDER_BY_MODIFIED_DESC));
        url
    }

    /// `{base}{id}`
    pub fn item_url(&self, id: ProductId) -> ProductResult<Url> {
        self.base_url
            .join(&id.to_string())
            .map_err(|e| ProductError::Config(e.to_string()))
    }

    /// Turn non-2xx responses into [`ProductError::Backend`], keeping the body.
    async fn ensure_success(response: Response) -> ProductResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProductError::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ProductRepository for HttpProductRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let response = self.client.get(self.list_url()).send().await?;
        let products: Vec<Product> = Self::ensure_success(response).await?.json().await?;

        debug!(count = products.len(), "Fetched catalog page");
        Ok(products)
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let response = self
            .client
            .post(self.base_url.clone())
            .json(&input)
            .send()
            .await?;

        let product: Product = Self::ensure_success(response).await?.json().await?;
        debug!(product_id = product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> ProductResult<()> {
        let response = self.client.delete(self.item_url(id)?).send().await?;
        Self::ensure_success(response).await?;

        debug!(product_id = id, "Deleted product");
        Ok(())
    }
}
