use thiserror::Error;

use crate::matcher::{CompiledMatcher, PatternError};
use crate::models::{Grouping, Transaction};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Grouping #{index} '{name}' has an invalid pattern: {source}")]
pub struct GroupingError {
    pub index: usize,
    pub name: String,
    pub source: PatternError,
}

/// Result of splitting a transaction list across groupings.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// One entry per grouping, in grouping order.
    pub groups: Vec<(Grouping, Vec<Transaction>)>,
    pub leftover: Vec<Transaction>,
    /// Leftover rows matching the current search. `None` when no search is
    /// active or the search did not compile.
    pub current: Option<Vec<Transaction>>,
    pub search_error: Option<PatternError>,
}

impl Partition {
    pub fn total_len(&self) -> usize {
        self.groups.iter().map(|(_, rows)| rows.len()).sum::<usize>()
            + self.leftover.len()
            + self.current.as_ref().map_or(0, Vec::len)
    }
}

pub fn compile_groupings(groupings: &[Grouping]) -> Result<Vec<CompiledMatcher>, GroupingError> {
    groupings
        .iter()
        .enumerate()
        .map(|(index, g)| {
            CompiledMatcher::compile(&g.searches).map_err(|source| GroupingError {
                index,
                name: g.name.clone(),
                source,
            })
        })
        .collect()
}

/// Bucket every transaction into the first grouping whose pattern matches,
/// then split the leftovers by the current search.
pub fn partition(
    transactions: &[Transaction],
    groupings: &[Grouping],
    current_searches: &[String],
) -> Result<Partition, GroupingError> {
    let matchers = compile_groupings(groupings)?;

    let mut buckets: Vec<Vec<Transaction>> = vec![Vec::new(); groupings.len()];
    let mut leftover = Vec::new();
    for txn in transactions {
        match matchers.iter().position(|m| m.is_match(&txn.description)) {
            Some(i) => buckets[i].push(txn.clone()),
            None => leftover.push(txn.clone()),
        }
    }

    let mut current = None;
    let mut search_error = None;
    if !current_searches.is_empty() {
        match CompiledMatcher::compile(current_searches) {
            Ok(matcher) => {
                tracing::debug!(pattern = matcher.as_str(), "applying current search");
                let (hits, rest): (Vec<_>, Vec<_>) = leftover
                    .into_iter()
                    .partition(|t| matcher.is_match(&t.description));
                current = Some(hits);
                leftover = rest;
            }
            Err(e) => {
                tracing::debug!("current search ignored: {e}");
                search_error = Some(e);
            }
        }
    }

    let partition = Partition {
        groups: groupings.iter().cloned().zip(buckets).collect(),
        leftover,
        current,
        search_error,
    };
    tracing::debug!(
        transactions = transactions.len(),
        groupings = groupings.len(),
        leftover = partition.leftover.len(),
        "partitioned transactions"
    );
    debug_assert_eq!(partition.total_len(), transactions.len());
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(day: u32, desc: &str, amount: f64) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2021, 1, day).unwrap(), desc, amount)
    }

    fn grouping(name: &str, searches: &[&str]) -> Grouping {
        Grouping::new(name, searches.iter().map(|s| s.to_string()).collect())
    }

    fn descriptions(rows: &[Transaction]) -> Vec<&str> {
        rows.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn test_first_match_wins() {
        let txns = vec![txn(1, "Coffee Shop", -30.0), txn(2, "Rent", -8000.0), txn(3, "Salary", 30000.0)];
        let groupings = vec![grouping("Food", &["Coffee"]), grouping("All", &[])];
        let p = partition(&txns, &groupings, &[]).unwrap();
        assert_eq!(descriptions(&p.groups[0].1), vec!["Coffee Shop"]);
        assert_eq!(descriptions(&p.groups[1].1), vec!["Rent", "Salary"]);
        assert!(p.leftover.is_empty());
        assert!(p.current.is_none());
    }

    #[test]
    fn test_earlier_grouping_has_priority() {
        let txns = vec![txn(1, "ICA Coffee", -30.0)];
        let groupings = vec![grouping("Groceries", &["ICA"]), grouping("Coffee", &["Coffee"])];
        let p = partition(&txns, &groupings, &[]).unwrap();
        assert_eq!(p.groups[0].1.len(), 1);
        assert!(p.groups[1].1.is_empty());
    }

    #[test]
    fn test_empty_searches_match_everything() {
        let txns = vec![txn(1, "A", 1.0), txn(2, "B", 2.0)];
        let p = partition(&txns, &[grouping("Everything", &[])], &[]).unwrap();
        assert_eq!(p.groups[0].1.len(), 2);
        assert!(p.leftover.is_empty());
    }

    #[test]
    fn test_current_search_splits_leftover() {
        let txns = vec![txn(1, "Coffee Shop", -30.0), txn(2, "Rent", -8000.0)];
        let p = partition(&txns, &[], &["Coffee".to_string()]).unwrap();
        assert_eq!(descriptions(p.current.as_ref().unwrap()), vec!["Coffee Shop"]);
        assert_eq!(descriptions(&p.leftover), vec!["Rent"]);
        assert!(p.search_error.is_none());
    }

    #[test]
    fn test_invalid_current_search_leaves_leftover_unpartitioned() {
        let txns = vec![txn(1, "Coffee Shop", -30.0), txn(2, "Rent", -8000.0)];
        let p = partition(&txns, &[], &["Coffee[".to_string()]).unwrap();
        assert!(p.current.is_none());
        assert_eq!(p.leftover.len(), 2);
        assert!(p.search_error.is_some());
    }

    #[test]
    fn test_invalid_grouping_is_reported() {
        let groupings = vec![grouping("Ok", &["a"]), grouping("Broken", &["(x"])];
        let err = partition(&[txn(1, "a", 1.0)], &groupings, &[]).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.name, "Broken");
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let txns: Vec<Transaction> = [
            "Coffee Shop", "ICA Nara", "Rent", "Salary", "Coffee ICA", "SL Access", "Netflix",
        ]
        .iter()
        .enumerate()
        .map(|(i, d)| txn(i as u32 + 1, d, -(i as f64)))
        .collect();
        let groupings = vec![grouping("Food", &["Coffee", "ICA"]), grouping("Travel", &["SL"])];
        let p = partition(&txns, &groupings, &["Net".to_string()]).unwrap();
        assert_eq!(p.total_len(), txns.len());

        let mut seen: Vec<&str> = p
            .groups
            .iter()
            .flat_map(|(_, rows)| descriptions(rows))
            .chain(descriptions(&p.leftover))
            .chain(p.current.as_deref().map(descriptions).unwrap_or_default())
            .collect();
        seen.sort();
        let mut expected = descriptions(&txns);
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_preserves_input_order_within_group() {
        let txns = vec![txn(1, "ICA 1", -1.0), txn(2, "Rent", -2.0), txn(3, "ICA 2", -3.0)];
        let p = partition(&txns, &[grouping("Food", &["ICA"])], &[]).unwrap();
        assert_eq!(descriptions(&p.groups[0].1), vec!["ICA 1", "ICA 2"]);
    }
}
