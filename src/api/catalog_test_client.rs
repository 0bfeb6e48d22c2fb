//! Implements the `Catalog` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without reaching the network.

use crate::api::{Catalog, Product, ProductsResponse};
use crate::Result;
use anyhow::Context;

/// An implementation of the `Catalog` trait that does not use HTTP. It can hold any products in
/// memory and, by default, is seeded with some existing data.
pub struct TestCatalog {
    products: Vec<Product>,
}

impl TestCatalog {
    /// Create a new `TestCatalog` that serves `products`.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait::async_trait]
impl Catalog for TestCatalog {
    async fn products(&self, limit: u32) -> Result<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn product(&self, id: u32) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    /// Case-insensitive substring match on the title, category or brand.
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| {
                [&p.title, &p.category, &p.brand]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }
}

impl Default for TestCatalog {
    /// Loads seed data from this module.
    fn default() -> Self {
        // The seed is a constant in this file and is covered by `test_seed_data_parses`.
        Self::new(load_json(PRODUCT_DATA).unwrap_or_default())
    }
}

/// Loads products from a catalog-shaped JSON string.
fn load_json(json: &str) -> Result<Vec<Product>> {
    let response: ProductsResponse =
        serde_json::from_str(json).context("Unable to parse seed product data")?;
    Ok(response.products)
}

/// Seed product data, shaped like a catalog listing response.
const PRODUCT_DATA: &str = r##"{
  "products": [
    {"id": 101, "title": "Laptop Pro 14", "category": "laptops", "brand": "Apple", "rating": 4.56},
    {"id": 102, "title": "Wireless Mouse", "category": "mobile-accessories", "brand": "Logitech", "rating": 4.21},
    {"id": 103, "title": "Mechanical Keyboard", "category": "mobile-accessories", "brand": "Keychron", "rating": 4.73},
    {"id": 104, "title": "27in Monitor", "category": "laptops", "brand": "Dell", "rating": 4.38},
    {"id": 105, "title": "HD Webcam", "category": "mobile-accessories", "rating": 3.92},
    {"id": 106, "title": "Noise Cancelling Headphones", "category": "mobile-accessories", "brand": "Sony", "rating": 4.81},
    {"id": 107, "title": "USB-C Cable", "category": "mobile-accessories", "brand": "Anker", "rating": 4.05}
  ],
  "total": 7,
  "skip": 0,
  "limit": 7
}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_data_parses() {
        let products = load_json(PRODUCT_DATA).unwrap();
        assert_eq!(products.len(), 7);
        assert_eq!(products[0].id, 101);
        assert_eq!(products[4].brand, None);
    }

    #[tokio::test]
    async fn test_limit() {
        let catalog = TestCatalog::default();
        assert_eq!(catalog.products(3).await.unwrap().len(), 3);
        assert_eq!(catalog.products(100).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let catalog = TestCatalog::default();
        let product = catalog.product(105).await.unwrap().unwrap();
        assert_eq!(product.title.as_deref(), Some("HD Webcam"));
        assert_eq!(product.brand, None);
        assert!(catalog.product(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search() {
        let catalog = TestCatalog::default();
        let found = catalog.search("LAPTOP").await.unwrap();
        let ids: Vec<u32> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![101, 104]);

        let found = catalog.search("sony").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 106);

        assert!(catalog.search("toaster").await.unwrap().is_empty());
    }
}
