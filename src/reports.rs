use crate::chart::{self, Band, Canvas, MonthlyBuckets, Series};
use crate::grouper::Partition;
use crate::models::Transaction;

pub const DEFAULT_BAR_WIDTH: f64 = 300.0;

// ---------------------------------------------------------------------------
// Lifetime summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub count: usize,
    /// All-time net sum.
    pub sum: f64,
    /// `sum / 12`.
    pub monthly: f64,
    /// Horizontal bar on a shared zero axis.
    pub bar_offset: f64,
    pub bar_width: f64,
}

/// Summaries for every grouping in order, with bars scaled so the span from
/// the most negative sum (or zero) to the most positive sum (or zero) fills
/// `bar_width`.
pub fn summaries(partition: &Partition, bar_width: f64) -> Vec<GroupSummary> {
    let sums: Vec<f64> = partition
        .groups
        .iter()
        .map(|(_, rows)| rows.iter().map(|t| t.amount).sum())
        .collect();
    // The axis always includes zero, so bars never outgrow `bar_width`.
    let min_sum = sums.iter().copied().fold(0.0, f64::min);
    let max_sum = sums.iter().copied().fold(0.0, f64::max);
    let div = if max_sum - min_sum > 0.0 {
        max_sum - min_sum
    } else {
        1.0
    };

    partition
        .groups
        .iter()
        .zip(sums)
        .map(|((grouping, rows), sum)| {
            let rel = sum / div;
            GroupSummary {
                name: grouping.name.clone(),
                count: rows.len(),
                sum,
                monthly: sum / 12.0,
                bar_width: rel.abs() * bar_width,
                bar_offset: (-min_sum / div + rel.min(0.0)) * bar_width,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Rows ordered by description for display; ties keep their date order.
pub fn sorted_by_description(rows: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.description.cmp(&b.description));
    sorted
}

pub fn net(rows: &[Transaction]) -> f64 {
    rows.iter().map(|t| t.amount).sum()
}

// ---------------------------------------------------------------------------
// Chart input
// ---------------------------------------------------------------------------

/// Chart series for the groupings after the first `skip`, leaving out
/// groupings with no transactions.
pub fn chart_series(partition: &Partition, skip: usize) -> Vec<Series> {
    partition
        .groups
        .iter()
        .skip(skip)
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(g, rows)| {
            let mut points: Vec<_> = rows.iter().map(Transaction::point).collect();
            points.sort_by_key(|p| p.0);
            Series::new(g.name.clone(), points)
        })
        .collect()
}

pub struct StackedChart {
    pub buckets: MonthlyBuckets,
    pub bands: Vec<Band>,
}

pub fn stacked_chart(
    partition: &Partition,
    skip: usize,
    canvas: Canvas,
    floor: f64,
) -> Option<StackedChart> {
    let buckets = chart::monthly_buckets(&chart_series(partition, skip))?;
    let bands = chart::stacked_bands(&buckets, canvas, floor);
    Some(StackedChart { buckets, bands })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::partition;
    use crate::models::Grouping;
    use chrono::NaiveDate;

    fn txn(m: u32, desc: &str, amount: f64) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2021, m, 1).unwrap(), desc, amount)
    }

    fn grouping(name: &str, searches: &[&str]) -> Grouping {
        Grouping::new(name, searches.iter().map(|s| s.to_string()).collect())
    }

    fn sample() -> Partition {
        let txns = vec![
            txn(1, "Salary", 300.0),
            txn(1, "ICA", -50.0),
            txn(2, "Rent", -100.0),
            txn(3, "ICA", -50.0),
        ];
        let groupings = vec![
            grouping("Income", &["Salary"]),
            grouping("Food", &["ICA"]),
            grouping("Housing", &["Rent"]),
            grouping("Unused", &["Nothing"]),
        ];
        partition(&txns, &groupings, &[]).unwrap()
    }

    #[test]
    fn test_summary_sums_and_monthly() {
        let s = summaries(&sample(), 300.0);
        assert_eq!(s.len(), 4);
        assert_eq!(s[0].sum, 300.0);
        assert_eq!(s[0].monthly, 25.0);
        assert_eq!(s[1].sum, -100.0);
        assert_eq!(s[1].count, 2);
        assert_eq!(s[3].sum, 0.0);
    }

    #[test]
    fn test_summary_bars_share_zero_axis() {
        let s = summaries(&sample(), 400.0);
        // div = 300 - (-100) = 400, zero axis at 100.
        assert_eq!(s[0].bar_offset, 100.0);
        assert_eq!(s[0].bar_width, 300.0);
        assert_eq!(s[1].bar_offset, 0.0);
        assert_eq!(s[1].bar_width, 100.0);
        assert_eq!(s[2].bar_offset, 0.0);
        assert_eq!(s[3].bar_width, 0.0);
        assert_eq!(s[3].bar_offset, 100.0);
    }

    #[test]
    fn test_single_summary_stays_finite() {
        let txns = vec![txn(1, "ICA", -50.0)];
        let p = partition(&txns, &[grouping("Food", &["ICA"])], &[]).unwrap();
        let s = summaries(&p, 300.0);
        assert_eq!(s[0].bar_width, 300.0);
        assert_eq!(s[0].bar_offset, 0.0);
    }

    #[test]
    fn test_all_positive_bars_fit_width() {
        let txns = vec![txn(1, "Salary", 100.0), txn(1, "Bonus", 200.0)];
        let groupings = vec![grouping("Salary", &["Salary"]), grouping("Bonus", &["Bonus"])];
        let p = partition(&txns, &groupings, &[]).unwrap();
        let s = summaries(&p, 300.0);
        assert_eq!(s[0].bar_width, 150.0);
        assert_eq!(s[1].bar_width, 300.0);
        assert_eq!(s[0].bar_offset, 0.0);
        assert_eq!(s[1].bar_offset, 0.0);
    }

    #[test]
    fn test_all_negative_bars_end_at_zero() {
        let txns = vec![txn(1, "ICA", -100.0), txn(1, "Rent", -400.0)];
        let groupings = vec![grouping("Food", &["ICA"]), grouping("Rent", &["Rent"])];
        let p = partition(&txns, &groupings, &[]).unwrap();
        let s = summaries(&p, 300.0);
        assert_eq!(s[0].bar_width, 75.0);
        assert_eq!(s[0].bar_offset, 225.0);
        assert_eq!(s[1].bar_width, 300.0);
        assert_eq!(s[1].bar_offset, 0.0);
    }

    #[test]
    fn test_sorted_by_description() {
        let rows = vec![txn(1, "b", 1.0), txn(2, "a", 2.0), txn(3, "b", 3.0)];
        let sorted = sorted_by_description(&rows);
        let amounts: Vec<f64> = sorted.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2.0, 1.0, 3.0]);
        assert_eq!(rows[0].description, "b");
    }

    #[test]
    fn test_chart_series_skips_first_and_empty() {
        let series = chart_series(&sample(), 1);
        let names: Vec<_> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Housing"]);
    }

    #[test]
    fn test_stacked_chart() {
        let chart = stacked_chart(&sample(), 1, Canvas::default(), chart::DEFAULT_FLOOR).unwrap();
        assert_eq!(chart.bands.len(), 2);
        assert_eq!(chart.buckets.values[0], vec![-50.0, 0.0, -50.0]);
        assert_eq!(chart.bands[1].top, vec![-50.0, -100.0, -50.0]);
    }

    #[test]
    fn test_stacked_chart_without_data() {
        let p = partition(&[], &[grouping("Food", &["ICA"])], &[]).unwrap();
        assert!(stacked_chart(&p, 0, Canvas::default(), chart::DEFAULT_FLOOR).is_none());
    }
}
