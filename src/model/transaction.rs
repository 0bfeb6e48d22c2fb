use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The column headers of the sales feed, in order.
pub const TRANSACTION_HEADERS: [&str; 8] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
];

/// Represents a single parsed row of the sales feed.
///
/// `Display` renders the row back into its pipe-delimited form, which the parser accepts.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionID")]
    pub(crate) transaction_id: String,
    #[serde(rename = "Date")]
    pub(crate) date: String,
    #[serde(rename = "ProductID")]
    pub(crate) product_id: String,
    #[serde(rename = "ProductName")]
    pub(crate) product_name: String,
    #[serde(rename = "Quantity")]
    pub(crate) quantity: i64,
    #[serde(rename = "UnitPrice")]
    pub(crate) unit_price: f64,
    #[serde(rename = "CustomerID")]
    pub(crate) customer_id: String,
    #[serde(rename = "Region")]
    pub(crate) region: String,
}

impl Transaction {
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// The date token exactly as it appeared in the feed. Only equality and lexicographic order
    /// are meaningful.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// `quantity × unit_price`, computed on demand.
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// The string-typed fields, used by the "no empty field" validity rule.
    pub(crate) fn text_fields(&self) -> [&str; 6] {
        [
            &self.transaction_id,
            &self.date,
            &self.product_id,
            &self.product_name,
            &self.customer_id,
            &self.region,
        ]
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.transaction_id,
            self.date,
            self.product_id,
            self.product_name,
            self.quantity,
            self.unit_price,
            self.customer_id,
            self.region
        )
    }
}
