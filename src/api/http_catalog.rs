//! Implements the `Catalog` trait with a `reqwest::Client`.

use crate::api::{Catalog, Product, ProductsResponse};
use crate::Result;
use anyhow::{anyhow, bail, Context};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Talks to an HTTP product catalog rooted at `url`:
/// - `GET {url}?limit=N` answers `{ "products": [ ... ] }`
/// - `GET {url}/{id}` answers a single product
/// - `GET {url}/search?q=...` answers `{ "products": [ ... ] }`
///
/// Each request is a single attempt bounded by `timeout`.
pub struct HttpCatalog {
    url: Url,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid catalog URL '{url}'"))?;
        if url.cannot_be_a_base() {
            bail!("Invalid catalog URL '{url}'");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { url, client })
    }

    /// The request URL for `limit` products.
    pub(crate) fn products_url(&self, limit: u32) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        url
    }

    /// The request URL for the product with `id`.
    pub(crate) fn product_url(&self, id: u32) -> Result<Url> {
        self.child_url(&id.to_string())
    }

    /// The request URL for a search on `query`. The query is percent-encoded.
    pub(crate) fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self.child_url("search")?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    fn child_url(&self, segment: &str) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("The catalog URL '{}' cannot have a path", self.url))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Sends a GET. A 404 is `None`, any other non-2xx status is an error.
    async fn get<T>(&self, url: Url) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            bail!("Request to {url} returned status {status}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Unable to read the response body from {url}"))?;
        let parsed = serde_json::from_str(&body)
            .with_context(|| format!("Unable to parse the response from {url}"))?;
        Ok(Some(parsed))
    }
}

#[async_trait::async_trait]
impl Catalog for HttpCatalog {
    async fn products(&self, limit: u32) -> Result<Vec<Product>> {
        let url = self.products_url(limit);
        match self.get::<ProductsResponse>(url.clone()).await? {
            Some(response) => Ok(response.products),
            None => bail!("Request to {url} returned status {}", StatusCode::NOT_FOUND),
        }
    }

    async fn product(&self, id: u32) -> Result<Option<Product>> {
        self.get(self.product_url(id)?).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let response: Option<ProductsResponse> = self.get(self.search_url(query)?).await?;
        Ok(response.map(|r| r.products).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(url: &str) -> HttpCatalog {
        HttpCatalog::new(url, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_products_url() {
        assert_eq!(
            catalog("https://dummyjson.com/products")
                .products_url(100)
                .as_str(),
            "https://dummyjson.com/products?limit=100"
        );
    }

    #[test]
    fn test_products_url_keeps_existing_query() {
        assert_eq!(
            catalog("http://localhost:8080/items?select=id")
                .products_url(5)
                .as_str(),
            "http://localhost:8080/items?select=id&limit=5"
        );
    }

    #[test]
    fn test_product_url() {
        let c = catalog("https://dummyjson.com/products");
        assert_eq!(
            c.product_url(101).unwrap().as_str(),
            "https://dummyjson.com/products/101"
        );
        let c = catalog("https://dummyjson.com/products/");
        assert_eq!(
            c.product_url(7).unwrap().as_str(),
            "https://dummyjson.com/products/7"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        let c = catalog("https://dummyjson.com/products");
        assert_eq!(
            c.search_url("usb cable&co").unwrap().as_str(),
            "https://dummyjson.com/products/search?q=usb+cable%26co"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(HttpCatalog::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpCatalog::new("mailto:sales@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        // Nothing listens on port 9 of the loopback interface.
        let catalog =
            HttpCatalog::new("http://127.0.0.1:9/products", Duration::from_secs(2)).unwrap();
        assert!(catalog.products(10).await.is_err());
        assert!(catalog.product(1).await.is_err());
        assert!(catalog.search("laptop").await.is_err());
    }
}
