//! Analytical views over a set of valid transactions.
//!
//! Every function here is independent: each one builds its own accumulator from the slice it is
//! given and never mutates it.

use crate::model::Transaction;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The default number of products in [`top_selling_products`].
pub const DEFAULT_TOP_N: usize = 5;

/// The default quantity threshold for [`low_performing_products`].
pub const DEFAULT_LOW_THRESHOLD: i64 = 10;

/// Sales for a single region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegionStats {
    pub total_sales: f64,
    /// Share of the grand total, rounded to two decimals.
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Aggregate quantity and revenue for one product name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i128,
    pub revenue: f64,
}

/// Spend for a single customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total_spent: f64,
    pub purchase_count: usize,
}

/// Sales for a single date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyStats {
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// The date with the highest revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Headline numbers for the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total_revenue: f64,
    pub transaction_count: usize,
    /// Zero when there are no transactions.
    pub average_order_value: f64,
    /// Lexicographic min and max of the date strings.
    pub date_range: Option<(String, String)>,
}

pub fn overall_summary(transactions: &[Transaction]) -> OverallSummary {
    let total_revenue = total_revenue(transactions);
    let transaction_count = transactions.len();
    let average_order_value = if transaction_count == 0 {
        0.0
    } else {
        total_revenue / transaction_count as f64
    };
    let min = transactions.iter().map(|t| t.date()).min();
    let max = transactions.iter().map(|t| t.date()).max();
    let date_range = min.zip(max).map(|(a, b)| (a.to_string(), b.to_string()));
    OverallSummary {
        total_revenue,
        transaction_count,
        average_order_value,
        date_range,
    }
}

/// Sum of `total_price` over all transactions.
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::total_price).sum()
}

/// Groups sales by region, sorted by total sales descending (ties by region name).
///
/// When the grand total is zero every percentage is zero.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<(String, RegionStats)> {
    let grand_total = total_revenue(transactions);
    let mut by_region: BTreeMap<&str, RegionStats> = BTreeMap::new();
    for t in transactions {
        let stats = by_region.entry(t.region()).or_default();
        stats.total_sales += t.total_price();
        stats.transaction_count += 1;
    }

    let mut regions: Vec<(String, RegionStats)> = by_region
        .into_iter()
        .map(|(region, mut stats)| {
            stats.percentage = if grand_total == 0.0 {
                0.0
            } else {
                round2(stats.total_sales / grand_total * 100.0)
            };
            (region.to_string(), stats)
        })
        .collect();
    regions.sort_by(|(a_name, a), (b_name, b)| {
        b.total_sales
            .total_cmp(&a.total_sales)
            .then_with(|| a_name.cmp(b_name))
    });
    regions
}

/// The `n` products with the highest revenue. Ties are broken by higher quantity, then by name.
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_totals(transactions);
    products.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| b.quantity.cmp(&a.quantity))
            .then_with(|| a.name.cmp(&b.name))
    });
    products.truncate(n);
    products
}

/// Every customer ranked by total spend descending (ties by customer id).
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<(String, CustomerStats)> {
    let mut by_customer: HashMap<&str, CustomerStats> = HashMap::new();
    for t in transactions {
        let stats = by_customer.entry(t.customer_id()).or_default();
        stats.total_spent += t.total_price();
        stats.purchase_count += 1;
    }
    let mut customers: Vec<(String, CustomerStats)> = by_customer
        .into_iter()
        .map(|(id, stats)| (id.to_string(), stats))
        .collect();
    customers.sort_by(|(a_id, a), (b_id, b)| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then_with(|| a_id.cmp(b_id))
    });
    customers
}

/// Revenue, transaction count and distinct customers per date, ordered by date ascending.
pub fn daily_sales_trend(transactions: &[Transaction]) -> BTreeMap<String, DailyStats> {
    let mut customers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut trend: BTreeMap<String, DailyStats> = BTreeMap::new();
    for t in transactions {
        let stats = trend.entry(t.date().to_string()).or_default();
        stats.revenue += t.total_price();
        stats.transaction_count += 1;
        customers.entry(t.date()).or_default().insert(t.customer_id());
    }
    for (date, stats) in trend.iter_mut() {
        stats.unique_customers = customers.get(date.as_str()).map_or(0, BTreeSet::len);
    }
    trend
}

/// The date with the most revenue; the earliest date wins a tie. `None` when there are no
/// transactions.
pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let trend = daily_sales_trend(transactions);
    let mut peak: Option<(&String, &DailyStats)> = None;
    // Ascending date order, so only a strictly greater revenue replaces the current peak.
    for (date, stats) in &trend {
        match peak {
            Some((_, best)) if stats.revenue.total_cmp(&best.revenue) != Ordering::Greater => {}
            _ => peak = Some((date, stats)),
        }
    }
    peak.map(|(date, stats)| PeakDay {
        date: date.clone(),
        revenue: stats.revenue,
        transaction_count: stats.transaction_count,
    })
}

/// Products whose total quantity is strictly below `threshold`, ascending by quantity (ties by
/// name).
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let mut low: Vec<ProductSales> = product_totals(transactions)
        .into_iter()
        .filter(|p| p.quantity < i128::from(threshold))
        .collect();
    low.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.name.cmp(&b.name)));
    low
}

/// Quantity and revenue summed per product name, in name order.
fn product_totals(transactions: &[Transaction]) -> Vec<ProductSales> {
    // i128 holds the sum of any number of i64 quantities.
    let mut by_name: BTreeMap<&str, (i128, f64)> = BTreeMap::new();
    for t in transactions {
        let entry = by_name.entry(t.product_name()).or_insert((0, 0.0));
        entry.0 += i128::from(t.quantity());
        entry.1 += t.total_price();
    }
    by_name
        .into_iter()
        .map(|(name, (quantity, revenue))| ProductSales {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_transactions, transaction};

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_region_totals_sum_to_grand_total() {
        let transactions = sample_transactions();
        let regions = region_wise_sales(&transactions);
        let sum: f64 = regions.iter().map(|(_, s)| s.total_sales).sum();
        assert!((sum - total_revenue(&transactions)).abs() < EPSILON);
        let count: usize = regions.iter().map(|(_, s)| s.transaction_count).sum();
        assert_eq!(count, transactions.len());
    }

    #[test]
    fn test_region_percentages_and_order() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "A", 1, 300.0, "C1", "North"),
            transaction("T002", "2024-12-01", "P1", "A", 1, 100.0, "C1", "South"),
            transaction("T003", "2024-12-01", "P1", "A", 2, 100.0, "C1", "South"),
            transaction("T004", "2024-12-01", "P1", "A", 1, 300.0, "C1", "East"),
        ];
        let regions = region_wise_sales(&transactions);
        let names: Vec<&str> = regions.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(names, vec!["East", "North", "South"]);
        assert_eq!(regions[0].1.percentage, 33.33);
        assert_eq!(regions[2].1.transaction_count, 2);
    }

    #[test]
    fn test_region_empty_input() {
        assert!(region_wise_sales(&[]).is_empty());
    }

    #[test]
    fn test_top_selling_products_tie_breaks() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "Zeta", 1, 100.0, "C1", "North"),
            transaction("T002", "2024-12-01", "P2", "Alpha", 1, 100.0, "C1", "North"),
            transaction("T003", "2024-12-01", "P3", "Beta", 4, 25.0, "C1", "North"),
            transaction("T004", "2024-12-01", "P4", "Laptop", 1, 5000.0, "C1", "North"),
        ];
        let top = top_selling_products(&transactions, 3);
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Beta", "Alpha"]);
        assert_eq!(top[1].quantity, 4);
        assert_eq!(top[1].revenue, 100.0);
    }

    #[test]
    fn test_top_selling_products_aggregates_by_name() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "Mouse", 2, 10.0, "C1", "North"),
            transaction("T002", "2024-12-02", "P1", "Mouse", 3, 10.0, "C2", "South"),
        ];
        let top = top_selling_products(&transactions, DEFAULT_TOP_N);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].quantity, 5);
        assert_eq!(top[0].revenue, 50.0);
    }

    #[test]
    fn test_customer_analysis() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "A", 1, 100.0, "C2", "North"),
            transaction("T002", "2024-12-01", "P1", "A", 1, 50.0, "C1", "North"),
            transaction("T003", "2024-12-02", "P1", "A", 1, 50.0, "C1", "North"),
            transaction("T004", "2024-12-02", "P1", "A", 1, 20.0, "C3", "North"),
        ];
        let customers = customer_analysis(&transactions);
        assert_eq!(customers.len(), 3);
        // C1 and C2 tie on spend; id order decides.
        assert_eq!(customers[0].0, "C1");
        assert_eq!(customers[0].1.purchase_count, 2);
        assert_eq!(customers[1].0, "C2");
        assert_eq!(customers[2].0, "C3");
        assert_eq!(customers[2].1.total_spent, 20.0);
    }

    #[test]
    fn test_daily_sales_trend() {
        let transactions = vec![
            transaction("T001", "2024-12-02", "P1", "A", 1, 100.0, "C1", "North"),
            transaction("T002", "2024-12-01", "P1", "A", 2, 50.0, "C1", "North"),
            transaction("T003", "2024-12-02", "P1", "A", 1, 10.0, "C1", "North"),
            transaction("T004", "2024-12-02", "P1", "A", 1, 10.0, "C2", "North"),
        ];
        let trend = daily_sales_trend(&transactions);
        let dates: Vec<&String> = trend.keys().collect();
        assert_eq!(dates, vec!["2024-12-01", "2024-12-02"]);
        let day = trend["2024-12-02"];
        assert_eq!(day.revenue, 120.0);
        assert_eq!(day.transaction_count, 3);
        assert_eq!(day.unique_customers, 2);
        assert_eq!(trend["2024-12-01"].unique_customers, 1);
    }

    #[test]
    fn test_peak_sales_day_earliest_wins_tie() {
        let transactions = vec![
            transaction("T001", "2024-12-03", "P1", "A", 1, 100.0, "C1", "North"),
            transaction("T002", "2024-12-02", "P1", "A", 1, 100.0, "C1", "North"),
            transaction("T003", "2024-12-01", "P1", "A", 1, 40.0, "C1", "North"),
        ];
        let peak = find_peak_sales_day(&transactions).unwrap();
        assert_eq!(peak.date, "2024-12-02");
        assert_eq!(peak.revenue, 100.0);
        assert_eq!(peak.transaction_count, 1);
    }

    #[test]
    fn test_peak_sales_day_empty() {
        assert!(find_peak_sales_day(&[]).is_none());
    }

    #[test]
    fn test_low_performing_mouse() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "Mouse", 3, 500.0, "C1", "North"),
            transaction("T002", "2024-12-02", "P1", "Mouse", 4, 500.0, "C2", "North"),
            transaction("T003", "2024-12-03", "P1", "Mouse", 2, 500.0, "C3", "North"),
            transaction("T004", "2024-12-03", "P2", "Laptop", 12, 45000.0, "C3", "North"),
        ];
        let low = low_performing_products(&transactions, DEFAULT_LOW_THRESHOLD);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Mouse");
        assert_eq!(low[0].quantity, 9);
        assert_eq!(low[0].revenue, 4500.0);
    }

    #[test]
    fn test_low_performing_sorted_and_below_threshold() {
        let transactions = sample_transactions();
        for k in [0, 1, 3, 5, 10, 100] {
            let low = low_performing_products(&transactions, k);
            assert!(low.iter().all(|p| p.quantity < i128::from(k)));
            assert!(low.windows(2).all(|w| w[0].quantity <= w[1].quantity));
        }
    }

    #[test]
    fn test_quantity_totals_beyond_i64() {
        let transactions = vec![
            transaction("T001", "2024-12-01", "P1", "Laptop", i64::MAX, 1.0, "C1", "North"),
            transaction("T002", "2024-12-01", "P1", "Laptop", 1, 1.0, "C1", "North"),
        ];
        let top = top_selling_products(&transactions, 5);
        assert_eq!(top[0].quantity, i128::from(i64::MAX) + 1);
        assert!(low_performing_products(&transactions, i64::MAX).is_empty());
    }

    #[test]
    fn test_overall_summary() {
        let transactions = vec![
            transaction("T001", "2024-12-03", "P1", "A", 1, 100.0, "C1", "North"),
            transaction("T002", "2024-11-30", "P1", "A", 2, 100.0, "C1", "North"),
        ];
        let summary = overall_summary(&transactions);
        assert_eq!(summary.total_revenue, 300.0);
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.average_order_value, 150.0);
        assert_eq!(
            summary.date_range,
            Some(("2024-11-30".to_string(), "2024-12-03".to_string()))
        );
    }

    #[test]
    fn test_overall_summary_empty() {
        let summary = overall_summary(&[]);
        assert_eq!(summary.average_order_value, 0.0);
        assert!(summary.date_range.is_none());
    }
}
