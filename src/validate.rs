//! Business-rule validation and the optional user filters applied after it.

use crate::model::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Optional filters supplied by the user. A `None` means "not provided"; a bound of `0.0` is a
/// real bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Keep only transactions in exactly this region.
    pub region: Option<String>,
    /// Keep only transactions whose total price is at least this much.
    pub min_amount: Option<f64>,
    /// Keep only transactions whose total price is at most this much.
    pub max_amount: Option<f64>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }

    /// Returns true if `transaction` passes every provided filter. Bounds are inclusive.
    pub fn accepts(&self, transaction: &Transaction) -> bool {
        if let Some(region) = &self.region {
            if transaction.region() != region {
                return false;
            }
        }
        let total = transaction.total_price();
        if let Some(min) = self.min_amount {
            if total < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if total > max {
                return false;
            }
        }
        true
    }
}

/// Counts describing one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid_count: usize,
    pub final_count: usize,
}

/// The output of [`validate_and_filter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Validated {
    pub transactions: Vec<Transaction>,
    /// Everything excluded by either validity or the filters.
    pub invalid_count: usize,
    pub summary: ValidationSummary,
}

/// Returns true when all of the fixed business rules hold:
/// - quantity and unit price are positive
/// - transaction, product and customer ids start with `T`, `P` and `C`
/// - no text field is empty
pub fn is_valid(t: &Transaction) -> bool {
    t.quantity() > 0
        && t.unit_price() > 0.0
        && t.transaction_id().starts_with('T')
        && t.product_id().starts_with('P')
        && t.customer_id().starts_with('C')
        && t.text_fields().iter().all(|s| !s.is_empty())
}

/// Keeps the transactions that are valid and pass `filters`, in their original order.
pub fn validate_and_filter(transactions: Vec<Transaction>, filters: &Filters) -> Validated {
    let total_input = transactions.len();
    let valid: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| is_valid(t) && filters.accepts(t))
        .collect();

    let invalid_count = total_input - valid.len();
    let summary = ValidationSummary {
        total_input,
        invalid_count,
        final_count: valid.len(),
    };

    info!("Total records parsed: {total_input}");
    info!("Invalid records removed: {invalid_count}");
    info!("Valid records after cleaning: {}", valid.len());

    Validated {
        transactions: valid,
        invalid_count,
        summary,
    }
}

/// What the user can filter on, computed from the parsed (not yet validated) transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct regions, sorted.
    pub regions: Vec<String>,
    /// The smallest and largest total price, or `None` when there are no transactions.
    pub amount_range: Option<(f64, f64)>,
}

impl FilterOptions {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let regions: BTreeSet<&str> = transactions.iter().map(|t| t.region()).collect();
        let amount_range = transactions
            .iter()
            .map(|t| t.total_price())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Self {
            regions: regions.into_iter().map(String::from).collect(),
            amount_range,
        }
    }
}
