use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::{Result, TallyError};
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Numeric cell text: blank reads as zero, and only digits, sign, decimal
/// point and exponent are accepted, so words like `inf` or `NaN` do not parse.
fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Decimal-comma amount such as `1.234,56`: drop the `.` thousands separators,
/// then turn the comma into a decimal point. Unparseable input gives NaN.
pub fn parse_amount_decimal_comma(raw: &str) -> f64 {
    parse_number(&raw.replace('.', "").replace(',', "."))
}

/// Plain numeric amount such as `-123.45`. Unparseable input gives NaN.
pub fn parse_amount_plain(raw: &str) -> f64 {
    parse_number(raw)
}

pub fn parse_date_ymd(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Drop the card-purchase marker and the word following it.
fn strip_card_purchase(description: &str, marker: &str) -> String {
    if description.contains(marker) {
        description.split(' ').skip(2).collect::<Vec<_>>().join(" ")
    } else {
        description.to_string()
    }
}

// ---------------------------------------------------------------------------
// Bank formats, one descriptor per export layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStyle {
    /// `1.234,56`
    DecimalComma,
    /// `1234.56`
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankFormat {
    pub key: &'static str,
    pub name: &'static str,
    pub date_col: usize,
    pub description_col: usize,
    pub amount_col: usize,
    pub amount_style: AmountStyle,
    /// When the description contains this marker, the first two words are dropped.
    pub strip_marker: Option<&'static str>,
    pub skip_head: usize,
    pub skip_tail: usize,
}

pub const NORDEA: BankFormat = BankFormat {
    key: "nordea",
    name: "Nordea (format A)",
    date_col: 0,
    description_col: 1,
    amount_col: 3,
    amount_style: AmountStyle::DecimalComma,
    strip_marker: Some("Kortköp "),
    skip_head: 2,
    skip_tail: 2,
};

pub const SWEDBANK: BankFormat = BankFormat {
    key: "swedbank",
    name: "Swedbank (format B)",
    date_col: 5,
    description_col: 9,
    amount_col: 10,
    amount_style: AmountStyle::Plain,
    strip_marker: None,
    skip_head: 2,
    skip_tail: 2,
};

const ALL_FORMATS: &[BankFormat] = &[NORDEA, SWEDBANK];

pub fn get_by_key(key: &str) -> Option<BankFormat> {
    ALL_FORMATS.iter().find(|f| f.key == key).copied()
}

pub fn format_keys() -> Vec<&'static str> {
    ALL_FORMATS.iter().map(|f| f.key).collect()
}

/// Pick the layout for a data source: `swedbank*` sources use format B,
/// everything else format A.
pub fn format_for_source(source_name: &str) -> BankFormat {
    if source_name.starts_with("swedbank") {
        SWEDBANK
    } else {
        NORDEA
    }
}

impl BankFormat {
    fn min_columns(&self) -> usize {
        self.date_col.max(self.description_col).max(self.amount_col) + 1
    }

    fn parse_amount(&self, raw: &str) -> f64 {
        match self.amount_style {
            AmountStyle::DecimalComma => parse_amount_decimal_comma(raw),
            AmountStyle::Plain => parse_amount_plain(raw),
        }
    }

    /// Validate one row against this layout and normalize it.
    ///
    /// `row_number` is the 1-based line in the source file, used for reporting.
    pub fn parse_row(
        &self,
        row_number: usize,
        row: &[String],
    ) -> std::result::Result<Transaction, MalformedRowError> {
        if row.len() < self.min_columns() {
            return Err(MalformedRowError {
                row: row_number,
                reason: format!(
                    "expected at least {} columns, found {}",
                    self.min_columns(),
                    row.len()
                ),
            });
        }
        let raw_date = &row[self.date_col];
        let date = parse_date_ymd(raw_date).ok_or_else(|| MalformedRowError {
            row: row_number,
            reason: format!("invalid date '{raw_date}'"),
        })?;
        let description = match self.strip_marker {
            Some(marker) => strip_card_purchase(&row[self.description_col], marker),
            None => row[self.description_col].clone(),
        };
        let amount = self.parse_amount(&row[self.amount_col]);
        if amount.is_nan() {
            tracing::warn!(
                row = row_number,
                raw = %row[self.amount_col],
                "amount is not a number"
            );
        }
        Ok(Transaction::new(date, description, amount))
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed row {row}: {reason}")]
pub struct MalformedRowError {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    /// Oldest first.
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<MalformedRowError>,
}

/// Turn raw CSV rows (newest first, with header and footer rows) into
/// transactions ordered oldest first.
pub fn ingest_rows(rows: &[Vec<String>], format: &BankFormat) -> Ingested {
    let end = rows.len().saturating_sub(format.skip_tail);
    if end <= format.skip_head {
        tracing::debug!(rows = rows.len(), "no usable rows after trimming header/footer");
        return Ingested::default();
    }

    let mut ingested = Ingested::default();
    for (i, row) in rows[format.skip_head..end].iter().enumerate().rev() {
        match format.parse_row(format.skip_head + i + 1, row) {
            Ok(txn) => ingested.transactions.push(txn),
            Err(e) => {
                tracing::warn!("{e}");
                ingested.rejected.push(e);
            }
        }
    }
    ingested
}

/// Read every record of a CSV file as raw text cells.
///
/// Cells that are not valid UTF-8 (Latin-1 exports) are decoded lossily. A file
/// ending in a newline yields one trailing empty record, so footer trimming
/// counts that empty line like any other.
pub fn read_rows(file_path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    if bytes.ends_with(b"\n") {
        rows.push(vec![String::new()]);
    }
    Ok(rows)
}

pub fn load_file(file_path: &Path, format: &BankFormat) -> Result<Ingested> {
    let rows = read_rows(file_path)?;
    let ingested = ingest_rows(&rows, format);
    tracing::info!(
        file = %file_path.display(),
        format = format.key,
        transactions = ingested.transactions.len(),
        rejected = ingested.rejected.len(),
        "loaded transactions"
    );
    Ok(ingested)
}

/// Resolve an explicit format key, falling back to the source-name rule.
pub fn resolve_format(format_key: Option<&str>, source_name: &str) -> Result<BankFormat> {
    match format_key {
        Some(key) => get_by_key(key).ok_or_else(|| {
            TallyError::UnknownFormat(format!(
                "{key} (expected one of: {})",
                format_keys().join(", ")
            ))
        }),
        None => Ok(format_for_source(source_name)),
    }
}
