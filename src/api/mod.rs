//! Access to the external product catalog.
//!
//! The `Catalog` trait is the seam between the pipeline and the network. `HttpCatalog` talks to
//! the real catalog over HTTP; `TestCatalog` serves an in-memory product list so the whole program
//! can run offline.

mod catalog_test_client;
mod http_catalog;

use crate::model::{ProductInfo, ProductMetadata};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use catalog_test_client::TestCatalog;
pub use http_catalog::HttpCatalog;

/// When this environment variable is set and non-empty the program uses `TestCatalog` instead of
/// making HTTP requests.
pub const OFFLINE_ENV: &str = "SALES_REPORT_OFFLINE";

/// A source of product records.
#[async_trait::async_trait]
pub trait Catalog {
    /// Fetch up to `limit` products in a single attempt.
    async fn products(&self, limit: u32) -> Result<Vec<Product>>;

    /// Fetch one product by its catalog id. `None` when the catalog has no such product.
    async fn product(&self, id: u32) -> Result<Option<Product>>;

    /// Products whose text matches `query`.
    async fn search(&self, query: &str) -> Result<Vec<Product>>;
}

/// Selects which `Catalog` implementation to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Http,
    Offline,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Offline` if `SALES_REPORT_OFFLINE` is set to a non-empty value, otherwise
    /// `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(OFFLINE_ENV) {
            Ok(v) if !v.is_empty() => Mode::Offline,
            _ => Mode::Http,
        }
    }
}

/// One product as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// The body of a product listing response: `{ "products": [ ... ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProductsResponse {
    #[serde(default)]
    pub(crate) products: Vec<Product>,
}

/// Create the `Catalog` for `mode`.
pub fn catalog(config: &Config, mode: Mode) -> Result<Box<dyn Catalog + Send + Sync>> {
    match mode {
        Mode::Http => Ok(Box::new(HttpCatalog::new(
            config.catalog_url(),
            config.catalog_timeout(),
        )?)),
        Mode::Offline => Ok(Box::new(TestCatalog::default())),
    }
}

/// Fetch the product list, treating any failure as an empty list. A failed fetch is logged but
/// never stops the run.
pub async fn fetch_all_products(catalog: &(dyn Catalog + Send + Sync), limit: u32) -> Vec<Product> {
    match catalog.products(limit).await {
        Ok(products) => {
            debug!("Fetched {} products from the catalog", products.len());
            products
        }
        Err(e) => {
            warn!("Unable to fetch products from the catalog, continuing without them: {e:#}");
            Vec::new()
        }
    }
}

/// Key the products by their catalog id. A later duplicate id replaces an earlier one.
pub fn create_product_mapping(products: impl IntoIterator<Item = Product>) -> ProductMetadata {
    products
        .into_iter()
        .map(|p| {
            (
                p.id,
                ProductInfo {
                    title: p.title,
                    category: p.category,
                    brand: p.brand,
                    rating: p.rating,
                },
            )
        })
        .collect()
}
