//! Types that represent the core data model, such as `Transaction` and `EnrichedTransaction`.
mod amount;
mod enriched;
mod transaction;

pub use amount::{Amount, AmountError};
pub use enriched::{EnrichedTransaction, ProductInfo, ProductMetadata, ENRICHED_HEADERS};
pub use transaction::{Transaction, TRANSACTION_HEADERS};
