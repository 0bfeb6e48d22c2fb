use crate::api::{self, Catalog, Mode, Product};
use crate::commands::Out;
use crate::{Config, Result};

/// Looks up a single catalog product by its id.
///
/// # Errors
/// - Returns an error if the catalog client cannot be built or the request fails.
pub async fn product(config: Config, id: u32, mode: Mode) -> Result<Out<Option<Product>>> {
    let catalog: Box<dyn Catalog + Send + Sync> = api::catalog(&config, mode)?;
    let product = catalog.product(id).await?;
    let message = match &product {
        Some(p) => format!("Product {id}: {}", describe(p)),
        None => format!("Product {id} was not found in the catalog"),
    };
    Ok(Out::new(message, product))
}

/// Searches the catalog for products matching `query`.
///
/// # Errors
/// - Returns an error if the catalog client cannot be built or the request fails.
pub async fn search(config: Config, query: &str, mode: Mode) -> Result<Out<Vec<Product>>> {
    let catalog: Box<dyn Catalog + Send + Sync> = api::catalog(&config, mode)?;
    let products = catalog.search(query).await?;
    let mut message = format!("Found {} products matching '{query}'", products.len());
    for p in &products {
        message.push_str(&format!("\n  {}: {}", p.id, describe(p)));
    }
    Ok(Out::new(message, products))
}

fn describe(p: &Product) -> String {
    format!(
        "{} (category: {}, brand: {}, rating: {})",
        p.title.as_deref().unwrap_or("untitled"),
        p.category.as_deref().unwrap_or("-"),
        p.brand.as_deref().unwrap_or("-"),
        p.rating.map_or_else(|| "-".to_string(), |r| r.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn config() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path().join("sales")).await.unwrap();
        (dir, config)
    }

    #[tokio::test]
    async fn test_product_found() {
        let (_dir, config) = config().await;
        let out = product(config, 101, Mode::Offline).await.unwrap();
        let found = out.structure().unwrap().as_ref().unwrap();
        assert_eq!(found.id, 101);
        assert!(out.message().contains("Laptop Pro 14"));
        assert!(out.message().contains("brand: Apple"));
    }

    #[tokio::test]
    async fn test_product_missing() {
        let (_dir, config) = config().await;
        let out = product(config, 4242, Mode::Offline).await.unwrap();
        assert!(out.structure().unwrap().is_none());
        assert!(out.message().contains("not found"));
    }

    #[tokio::test]
    async fn test_search() {
        let (_dir, config) = config().await;
        let out = search(config, "webcam", Mode::Offline).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 1);
        assert!(out.message().starts_with("Found 1 products matching 'webcam'"));
        assert!(out.message().contains("105: HD Webcam"));
        assert!(out.message().contains("brand: -"));
    }
}
