//! Renders the analytics report text.
//!
//! Composition is pure: the caller supplies the generation timestamp and writes the result.

use crate::analysis::{
    customer_analysis, daily_sales_trend, find_peak_sales_day, low_performing_products,
    overall_summary, region_wise_sales, top_selling_products, DEFAULT_LOW_THRESHOLD,
    DEFAULT_TOP_N,
};
use crate::enrich::EnrichmentSummary;
use crate::model::{Amount, EnrichedTransaction, Transaction};
use chrono::NaiveDateTime;

const WIDTH: usize = 60;
const NOT_AVAILABLE: &str = "N/A";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings that change how the report is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Rows in the top products and top customers tables.
    pub top_n: usize,
    /// Products selling fewer units than this count as low performers.
    pub low_threshold: i64,
    /// Prefix for every currency value.
    pub currency: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            currency: "₹".to_string(),
        }
    }
}

impl ReportOptions {
    fn money(&self, value: f64) -> String {
        Amount::new(value).with_symbol(&self.currency)
    }
}

/// Builds the full report. Given the same inputs and `generated_at`, the output is identical.
pub fn compose_report(
    transactions: &[Transaction],
    enriched: &[EnrichedTransaction],
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> String {
    let rule = "=".repeat(WIDTH);
    let summary = overall_summary(transactions);
    let mut lines: Vec<String> = vec![
        rule.clone(),
        "           SALES ANALYTICS REPORT".to_string(),
        format!("        Generated: {}", generated_at.format(TIMESTAMP_FORMAT)),
        format!("        Records Processed: {}", summary.transaction_count),
        rule,
    ];

    section(&mut lines, "OVERALL SUMMARY");
    lines.push(format!(
        "Total Revenue:       {}",
        options.money(summary.total_revenue)
    ));
    lines.push(format!("Total Transactions:  {}", summary.transaction_count));
    lines.push(format!(
        "Average Order Value: {}",
        options.money(summary.average_order_value)
    ));
    lines.push(match &summary.date_range {
        Some((first, last)) => format!("Date Range:          {first} to {last}"),
        None => format!("Date Range:          {NOT_AVAILABLE}"),
    });

    section(&mut lines, "REGION-WISE PERFORMANCE");
    lines.push(format!(
        "{:<12} {:<18} {:<10} {}",
        "Region", "Sales", "% Total", "Transactions"
    ));
    for (region, stats) in region_wise_sales(transactions) {
        lines.push(format!(
            "{:<12} {:<18} {:<10} {}",
            region,
            options.money(stats.total_sales),
            format!("{:.2}%", stats.percentage),
            stats.transaction_count
        ));
    }

    section(&mut lines, &format!("TOP {} PRODUCTS", options.top_n));
    lines.push(format!(
        "{:<6} {:<24} {:<10} {}",
        "Rank", "Product Name", "Qty", "Revenue"
    ));
    for (rank, product) in top_selling_products(transactions, options.top_n)
        .iter()
        .enumerate()
    {
        lines.push(format!(
            "{:<6} {:<24} {:<10} {}",
            rank + 1,
            product.name,
            product.quantity,
            options.money(product.revenue)
        ));
    }

    section(&mut lines, &format!("TOP {} CUSTOMERS", options.top_n));
    lines.push(format!(
        "{:<6} {:<15} {:<18} {}",
        "Rank", "Customer ID", "Spent", "Orders"
    ));
    for (rank, (customer, stats)) in customer_analysis(transactions)
        .iter()
        .take(options.top_n)
        .enumerate()
    {
        lines.push(format!(
            "{:<6} {:<15} {:<18} {}",
            rank + 1,
            customer,
            options.money(stats.total_spent),
            stats.purchase_count
        ));
    }

    section(&mut lines, "DAILY SALES TREND");
    lines.push(format!(
        "{:<15} {:<18} {:<10} {}",
        "Date", "Revenue", "Txns", "Unique Cust"
    ));
    for (date, stats) in daily_sales_trend(transactions) {
        lines.push(format!(
            "{:<15} {:<18} {:<10} {}",
            date,
            options.money(stats.revenue),
            stats.transaction_count,
            stats.unique_customers
        ));
    }

    section(&mut lines, "PRODUCT PERFORMANCE ANALYSIS");
    lines.push(match find_peak_sales_day(transactions) {
        Some(peak) => format!(
            "Best Selling Day: {} ({} with {} txns)",
            peak.date,
            options.money(peak.revenue),
            peak.transaction_count
        ),
        None => format!("Best Selling Day: {NOT_AVAILABLE}"),
    });
    let low = low_performing_products(transactions, options.low_threshold);
    lines.push(format!(
        "Low Performing Products: {} items found below threshold",
        low.len()
    ));

    let enrichment = EnrichmentSummary::from_enriched(enriched);
    section(&mut lines, "API ENRICHMENT SUMMARY");
    lines.push(format!("Total Products Enriched: {}", enrichment.matched));
    lines.push(format!(
        "Success Rate:            {:.2}%",
        enrichment.success_rate
    ));
    let not_enriched = if enrichment.unmatched_product_ids.is_empty() {
        "None".to_string()
    } else {
        enrichment.unmatched_product_ids.join(", ")
    };
    lines.push(format!("Not Enriched:            {not_enriched}"));

    // No trailing newline after the last line.
    lines.join("\n")
}

/// A blank line, the title and a dashed rule.
fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_sales_data;
    use crate::model::{ProductInfo, ProductMetadata};
    use crate::test::{sample_transactions, timestamp, transaction};

    fn metadata() -> ProductMetadata {
        let mut map = ProductMetadata::new();
        map.insert(101, ProductInfo::default());
        map
    }

    #[test]
    fn test_report_is_deterministic() {
        let transactions = sample_transactions();
        let enriched = enrich_sales_data(&transactions, &metadata());
        let options = ReportOptions::default();
        let a = compose_report(&transactions, &enriched, &options, timestamp());
        let b = compose_report(&transactions, &enriched, &options, timestamp());
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_sections_in_order() {
        let transactions = sample_transactions();
        let enriched = enrich_sales_data(&transactions, &metadata());
        let report = compose_report(
            &transactions,
            &enriched,
            &ReportOptions::default(),
            timestamp(),
        );
        let sections = [
            "SALES ANALYTICS REPORT",
            "OVERALL SUMMARY",
            "REGION-WISE PERFORMANCE",
            "TOP 5 PRODUCTS",
            "TOP 5 CUSTOMERS",
            "DAILY SALES TREND",
            "PRODUCT PERFORMANCE ANALYSIS",
            "API ENRICHMENT SUMMARY",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| report.find(s).unwrap_or_else(|| panic!("missing {s}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.contains("Generated: 2024-12-31 18:30:00"));
    }

    #[test]
    fn test_report_values() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P101", "Laptop", 2, 45000.0, "C001", "North"),
            transaction("T002", "2024-12-02", "P102", "Mouse", 4, 500.0, "C002", "South"),
        ];
        let enriched = enrich_sales_data(&transactions, &metadata());
        let report = compose_report(
            &transactions,
            &enriched,
            &ReportOptions::default(),
            timestamp(),
        );
        assert!(report.contains("Records Processed: 2"));
        assert!(report.contains("Total Revenue:       ₹92,000.00"));
        assert!(report.contains("Average Order Value: ₹46,000.00"));
        assert!(report.contains("Date Range:          2024-12-01 to 2024-12-02"));
        assert!(report.contains("97.83%"));
        assert!(report.contains("Best Selling Day: 2024-12-01 (₹90,000.00 with 1 txns)"));
        assert!(report.contains("Low Performing Products: 2 items found below threshold"));
        assert!(report.contains("Total Products Enriched: 1"));
        assert!(report.contains("Success Rate:            50.00%"));
        assert!(report.ends_with("Not Enriched:            P102"));
    }

    #[test]
    fn test_report_all_matched_says_none() {
        let transactions = vec![transaction(
            "T001", "2024-12-01", "P101", "Laptop", 2, 45000.0, "C001", "North",
        )];
        let enriched = enrich_sales_data(&transactions, &metadata());
        let report = compose_report(
            &transactions,
            &enriched,
            &ReportOptions::default(),
            timestamp(),
        );
        assert!(report.ends_with("Not Enriched:            None"));
        assert!(report.contains("Success Rate:            100.00%"));
    }

    #[test]
    fn test_report_layout() {
        let report = compose_report(&[], &[], &ReportOptions::default(), timestamp());
        let rule = "=".repeat(WIDTH);
        assert!(report.starts_with(&format!("{rule}\n           SALES ANALYTICS REPORT\n")));
        assert!(report.contains(&format!("\n\nOVERALL SUMMARY\n{}\n", "-".repeat(WIDTH))));
        assert!(!report.ends_with('\n'));
        assert!(!report.contains("\n\n\n"));
    }

    #[test]
    fn test_report_empty() {
        let report = compose_report(&[], &[], &ReportOptions::default(), timestamp());
        assert!(report.contains("Records Processed: 0"));
        assert!(report.contains("Total Revenue:       ₹0.00"));
        assert!(report.contains("Average Order Value: ₹0.00"));
        assert!(report.contains("Date Range:          N/A"));
        assert!(report.contains("Best Selling Day: N/A"));
        assert!(report.contains("Success Rate:            0.00%"));
        assert!(report.ends_with("Not Enriched:            None"));
    }

    #[test]
    fn test_report_options() {
        let transactions = sample_transactions();
        let options = ReportOptions {
            top_n: 2,
            low_threshold: 1,
            currency: "$".to_string(),
        };
        let report = compose_report(&transactions, &[], &options, timestamp());
        assert!(report.contains("TOP 2 PRODUCTS"));
        assert!(report.contains("TOP 2 CUSTOMERS"));
        assert!(report.contains("Total Revenue:       $"));
        assert!(!report.contains('₹'));
        assert!(report.contains("Low Performing Products: 0 items found below threshold"));
    }
}
