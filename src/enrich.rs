//! Joins valid transactions to product catalog metadata.

use crate::model::{EnrichedTransaction, ProductMetadata, Transaction};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Derives the catalog id from a local product id by stripping the leading `P` and parsing the
/// remaining digits, e.g. `P101` -> `101`. Returns `None` for anything else.
pub fn catalog_key(product_id: &str) -> Option<u32> {
    let digits = product_id.strip_prefix('P')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Annotates every transaction with catalog metadata. Transactions whose key cannot be derived or
/// is not in `metadata` are marked unmatched. Output order and length match the input.
pub fn enrich_sales_data(
    transactions: &[Transaction],
    metadata: &ProductMetadata,
) -> Vec<EnrichedTransaction> {
    let enriched: Vec<EnrichedTransaction> = transactions
        .iter()
        .map(|t| enrich_one(t.clone(), metadata))
        .collect();
    debug!(
        "Enriched {} of {} transactions",
        enriched.iter().filter(|e| e.api_match()).count(),
        enriched.len()
    );
    enriched
}

fn enrich_one(transaction: Transaction, metadata: &ProductMetadata) -> EnrichedTransaction {
    match catalog_key(transaction.product_id()).and_then(|key| metadata.get(&key)) {
        Some(info) => EnrichedTransaction::matched(transaction, info),
        None => EnrichedTransaction::unmatched(transaction),
    }
}

/// How well the enrichment went.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub matched: usize,
    /// `matched / total × 100`, or zero when there is nothing to enrich.
    pub success_rate: f64,
    /// Distinct product ids that did not match, sorted.
    pub unmatched_product_ids: Vec<String>,
}

impl EnrichmentSummary {
    pub fn from_enriched(enriched: &[EnrichedTransaction]) -> Self {
        let total = enriched.len();
        let matched = enriched.iter().filter(|e| e.api_match()).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64 * 100.0
        };
        let unmatched: BTreeSet<&str> = enriched
            .iter()
            .filter(|e| !e.api_match())
            .map(|e| e.transaction().product_id())
            .collect();
        Self {
            total,
            matched,
            success_rate,
            unmatched_product_ids: unmatched.into_iter().map(String::from).collect(),
        }
    }
}
