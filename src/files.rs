//! Reading the sales feed and writing the enriched data and report files.

use crate::model::{EnrichedTransaction, ENRICHED_HEADERS};
use crate::{utils, Result};
use anyhow::{anyhow, Context};
use serde::{Serialize, Serializer};
use std::io;
use std::path::Path;
use tracing::{debug, error};

/// Reads the sales feed at `path` and returns its data lines, trimmed, with the header line and
/// blank lines removed.
///
/// A file that is missing or cannot be read yields no lines; the problem is logged so that the
/// caller can report "nothing to process" instead of failing.
pub async fn read_sales_data(path: &Path) -> Vec<String> {
    match utils::read_bytes(path).await {
        Ok(bytes) => data_lines(&decode(bytes)),
        Err(e) if is_not_found(&e) => {
            error!("The file '{}' was not found", path.display());
            Vec::new()
        }
        Err(e) => {
            error!("{e:#}");
            Vec::new()
        }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}

/// Decodes the file contents as UTF-8, falling back to Latin-1 when the bytes are not valid
/// UTF-8. Latin-1 maps every byte to a char, so this never fails.
pub(crate) fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            debug!("Input is not valid UTF-8, decoding as Latin-1: {e}");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Skips the header line and drops blank lines.
pub(crate) fn data_lines(contents: &str) -> Vec<String> {
    contents
        .trim_start_matches('\u{feff}')
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// A row of the enriched-data file. Field order matches `ENRICHED_HEADERS`.
#[derive(Debug, Serialize)]
struct EnrichedRow<'a> {
    transaction_id: &'a str,
    date: &'a str,
    product_id: &'a str,
    product_name: &'a str,
    quantity: i64,
    unit_price: f64,
    customer_id: &'a str,
    region: &'a str,
    api_category: Option<&'a str>,
    api_brand: Option<&'a str>,
    api_rating: Option<f64>,
    #[serde(serialize_with = "serialize_match")]
    api_match: bool,
}

/// `API_Match` is written as `True` or `False`.
fn serialize_match<S>(matched: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *matched { "True" } else { "False" })
}

impl<'a> From<&'a EnrichedTransaction> for EnrichedRow<'a> {
    fn from(e: &'a EnrichedTransaction) -> Self {
        let t = e.transaction();
        Self {
            transaction_id: t.transaction_id(),
            date: t.date(),
            product_id: t.product_id(),
            product_name: t.product_name(),
            quantity: t.quantity(),
            unit_price: t.unit_price(),
            customer_id: t.customer_id(),
            region: t.region(),
            api_category: e.api_category(),
            api_brand: e.api_brand(),
            api_rating: e.api_rating(),
            api_match: e.api_match(),
        }
    }
}

/// Renders the enriched transactions as pipe-delimited text with a header row. Missing values are
/// written as empty fields.
pub fn enriched_to_string(enriched: &[EnrichedTransaction]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(ENRICHED_HEADERS)
        .context("Unable to write the enriched data header")?;
    for e in enriched {
        writer.serialize(EnrichedRow::from(e)).with_context(|| {
            format!(
                "Unable to write enriched transaction {}",
                e.transaction().transaction_id()
            )
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Unable to flush the enriched data: {}", e.error()))?;
    String::from_utf8(bytes).context("The enriched data is not valid UTF-8")
}

/// Writes the enriched transactions to `path`, creating its directory if needed.
pub async fn save_enriched_data(path: &Path, enriched: &[EnrichedTransaction]) -> Result<()> {
    let data = enriched_to_string(enriched)?;
    utils::write_with_parent(path, data)
        .await
        .context("Unable to save the enriched data")?;
    debug!("Saved {} enriched records to {}", enriched.len(), path.display());
    Ok(())
}

/// Writes the report text to `path`, creating its directory if needed.
pub async fn save_report(path: &Path, report: &str) -> Result<()> {
    utils::write_with_parent(path, report)
        .await
        .context("Unable to save the report")
}
