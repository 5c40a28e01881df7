use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One normalized ledger line. Built once during ingestion and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }

    /// The `(date, amount)` point this record contributes to a chart series.
    pub fn point(&self) -> (NaiveDate, f64) {
        (self.date, self.amount)
    }

    /// Space-separated words of the description, as offered for click-to-search.
    pub fn words(&self) -> Vec<&str> {
        self.description.split(' ').filter(|w| !w.is_empty()).collect()
    }
}

/// A named, ordered set of search terms. The position of a grouping in its
/// list is its match priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub name: String,
    pub searches: Vec<String>,
}

impl Grouping {
    pub fn new(name: impl Into<String>, searches: Vec<String>) -> Self {
        Self {
            name: name.into(),
            searches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_skip_repeated_spaces() {
        let t = Transaction::new(
            NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
            "ICA  Nara Solna",
            -45.0,
        );
        assert_eq!(t.words(), vec!["ICA", "Nara", "Solna"]);
    }

    #[test]
    fn test_grouping_json_shape() {
        let g = Grouping::new("Food", vec!["Coffee".to_string(), "ICA".to_string()]);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r#"{"name":"Food","searches":["Coffee","ICA"]}"#);
    }
}
