use crate::api::{self, Mode};
use crate::args::ReportArgs;
use crate::commands::Out;
use crate::enrich::{enrich_sales_data, EnrichmentSummary};
use crate::files::{read_sales_data, save_enriched_data, save_report};
use crate::parse::parse_transactions;
use crate::prompt::prompt_filters;
use crate::report::compose_report;
use crate::validate::{validate_and_filter, FilterOptions, ValidationSummary};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// What one run of the pipeline did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Lines read from the feed, excluding the header and blank lines.
    pub lines: usize,
    /// Lines discarded as malformed.
    pub dropped: usize,
    pub validation: ValidationSummary,
    pub enrichment: EnrichmentSummary,
    pub enriched_path: PathBuf,
    pub report_path: PathBuf,
}

/// Runs the whole pipeline: read, parse, validate and filter, enrich, then write the enriched
/// records and the report.
///
/// A missing or empty feed is not an error. The command returns a message saying there is
/// nothing to process and writes no files.
///
/// # Errors
/// - Returns an error if the catalog client cannot be built, e.g. the configured URL is invalid.
/// - Returns an error if the interactive prompt cannot read or write the terminal.
/// - Returns an error if either output file cannot be written.
pub async fn report(config: Config, args: ReportArgs, mode: Mode) -> Result<Out<RunSummary>> {
    let input = match args.input() {
        Some(path) => path.to_path_buf(),
        None => config.input_path(),
    };

    info!("Reading sales data from {}", input.display());
    let lines = read_sales_data(&input).await;
    if lines.is_empty() {
        return Ok(format!("No sales data to process in {}", input.display()).into());
    }
    info!("Read {} lines", lines.len());

    let parsed = parse_transactions(&lines);
    info!(
        "Parsed {} records, dropped {} malformed lines",
        parsed.transactions.len(),
        parsed.dropped
    );

    let options = FilterOptions::from_transactions(&parsed.transactions);
    info!("Available regions: {}", options.regions.join(", "));
    if let Some((min, max)) = options.amount_range {
        info!("Transaction amount range: {min:.2} - {max:.2}");
    }

    let filters = if args.interactive() {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        prompt_filters(&mut stdin.lock(), &mut stdout, &options)
            .context("Unable to read the filters")?
    } else {
        args.filters()
    };
    if !filters.is_empty() {
        debug!("Applying filters {filters:?}");
    }

    let validated = validate_and_filter(parsed.transactions, &filters);

    info!("Fetching products from the catalog ({mode} mode)");
    let catalog = api::catalog(&config, mode)?;
    let products = api::fetch_all_products(catalog.as_ref(), config.catalog_limit()).await;
    let mapping = api::create_product_mapping(products);
    info!("Loaded {} catalog products", mapping.len());

    let enriched = enrich_sales_data(&validated.transactions, &mapping);
    let enrichment = EnrichmentSummary::from_enriched(&enriched);
    info!(
        "Enriched {}/{} transactions",
        enrichment.matched, enrichment.total
    );

    let enriched_path = config.enriched_path();
    save_enriched_data(&enriched_path, &enriched).await?;
    info!("Enriched data saved to {}", enriched_path.display());

    let generated_at = chrono::Local::now().naive_local();
    let text = compose_report(
        &validated.transactions,
        &enriched,
        &config.report_options(),
        generated_at,
    );
    let report_path = config.report_path();
    save_report(&report_path, &text).await?;

    let summary = RunSummary {
        lines: lines.len(),
        dropped: parsed.dropped,
        validation: validated.summary,
        enrichment,
        enriched_path,
        report_path,
    };
    Ok(Out::new(
        format!("Report saved to {}", summary.report_path.display()),
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use crate::validate::Filters;
    use tempfile::TempDir;

    const FEED: &str = "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-12-01|P101|Laptop|2|45000|C001|North
T002|2024-12-01|P102|Mouse|5|500|C002|South

T003|2024-12-02|P101|Laptop|1|45,000|C003|North
T004|2024-12-02|P199|Cable|0|100|C001|East
T005|broken line
T006|2024-12-03|P999|Widget|3|250|C004|West
";

    async fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path().join("sales")).await.unwrap();
        utils::write(config.input_path(), FEED).await.unwrap();
        (dir, config)
    }

    #[tokio::test]
    async fn test_report_offline() {
        let (_dir, config) = setup().await;
        let out = report(config.clone(), ReportArgs::default(), Mode::Offline)
            .await
            .unwrap();
        let summary = out.structure().unwrap();

        assert_eq!(summary.lines, 6);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.validation.total_input, 5);
        assert_eq!(summary.validation.invalid_count, 1);
        assert_eq!(summary.validation.final_count, 4);
        assert_eq!(summary.enrichment.total, 4);
        assert_eq!(summary.enrichment.matched, 3);
        assert_eq!(summary.enrichment.unmatched_product_ids, vec!["P999"]);

        let enriched = utils::read(&summary.enriched_path).await.unwrap();
        let mut rows = enriched.lines();
        assert!(rows.next().unwrap().starts_with("TransactionID|Date|"));
        assert_eq!(rows.count(), 4);

        let text = utils::read(&summary.report_path).await.unwrap();
        assert!(text.contains("Records Processed: 4"));
        assert!(text.contains("API ENRICHMENT SUMMARY"));
        assert!(text.contains("P999"));
    }

    #[tokio::test]
    async fn test_report_with_region_filter() {
        let (_dir, config) = setup().await;
        let filters = Filters {
            region: Some("North".into()),
            ..Filters::default()
        };
        let out = report(config, ReportArgs::new(None, filters), Mode::Offline)
            .await
            .unwrap();
        let summary = out.structure().unwrap();
        assert_eq!(summary.validation.final_count, 2);
        assert_eq!(summary.validation.invalid_count, 3);
        assert_eq!(summary.enrichment.matched, 2);
    }

    #[tokio::test]
    async fn test_report_missing_input() {
        let (dir, config) = setup().await;
        let args = ReportArgs::new(Some(dir.path().join("nope.txt")), Filters::default());
        let out = report(config.clone(), args, Mode::Offline).await.unwrap();
        assert!(out.structure().is_none());
        assert!(out.message().contains("No sales data"));
        assert!(!config.report_path().exists());
        assert!(!config.enriched_path().exists());
    }
}
