//! Converts raw pipe-delimited lines from the sales feed into `Transaction` records.

use crate::model::{Amount, Transaction, TRANSACTION_HEADERS};
use serde::Serialize;
use std::str::FromStr;
use tracing::trace;

const DELIMITER: char = '|';

/// The result of parsing a batch of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parsed {
    /// Successfully parsed rows, in input order.
    pub transactions: Vec<Transaction>,
    /// The number of lines that were discarded as malformed.
    pub dropped: usize,
}

/// Parses every line, discarding lines that have the wrong number of fields or whose quantity or
/// price cannot be converted. The header must already have been removed.
///
/// Output order matches input order, but the feed is not guaranteed to be chronological.
pub fn parse_transactions<S>(lines: impl IntoIterator<Item = S>) -> Parsed
where
    S: AsRef<str>,
{
    let mut parsed = Parsed::default();
    for line in lines {
        match parse_line(line.as_ref()) {
            Some(transaction) => parsed.transactions.push(transaction),
            None => parsed.dropped += 1,
        }
    }
    parsed
}

/// Parses a single line. Returns `None` if the line is malformed.
pub fn parse_line(line: &str) -> Option<Transaction> {
    let values: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if values.len() != TRANSACTION_HEADERS.len() {
        trace!("Dropping line with {} fields: {line}", values.len());
        return None;
    }

    let quantity = match i64::from_str(&values[4].replace(',', "")) {
        Ok(q) => q,
        Err(e) => {
            trace!("Dropping line with bad quantity '{}': {e}", values[4]);
            return None;
        }
    };

    let unit_price = match Amount::from_str(values[5]) {
        Ok(a) => a.value(),
        Err(e) => {
            trace!("Dropping line with bad price '{}': {e}", values[5]);
            return None;
        }
    };

    Some(Transaction {
        transaction_id: values[0].to_string(),
        date: values[1].to_string(),
        product_id: values[2].to_string(),
        product_name: values[3].replace(',', ""),
        quantity,
        unit_price,
        customer_id: values[6].to_string(),
        region: values[7].to_string(),
    })
}
