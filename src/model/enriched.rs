use crate::model::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The column headers of the enriched-data file, in order.
pub const ENRICHED_HEADERS: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// The catalog details we keep for a single product. The catalog does not guarantee that every
/// field is present, so each one is optional.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
}

/// Product catalog metadata keyed by the catalog's numeric product id.
pub type ProductMetadata = BTreeMap<u32, ProductInfo>;

/// A valid `Transaction` annotated with whatever the product catalog knows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub(crate) transaction: Transaction,
    pub(crate) api_category: Option<String>,
    pub(crate) api_brand: Option<String>,
    pub(crate) api_rating: Option<f64>,
    pub(crate) api_match: bool,
}

impl EnrichedTransaction {
    /// A transaction for which the catalog lookup succeeded.
    pub fn matched(transaction: Transaction, info: &ProductInfo) -> Self {
        Self {
            transaction,
            api_category: info.category.clone(),
            api_brand: info.brand.clone(),
            api_rating: info.rating,
            api_match: true,
        }
    }

    /// A transaction the catalog knows nothing about.
    pub fn unmatched(transaction: Transaction) -> Self {
        Self {
            transaction,
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn api_category(&self) -> Option<&str> {
        self.api_category.as_deref()
    }

    pub fn api_brand(&self) -> Option<&str> {
        self.api_brand.as_deref()
    }

    pub fn api_rating(&self) -> Option<f64> {
        self.api_rating
    }

    pub fn api_match(&self) -> bool {
        self.api_match
    }
}
