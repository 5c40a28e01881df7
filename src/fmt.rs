use chrono::NaiveDate;

/// Format a number the way an `en` locale does: thousands separators and at
/// most three fraction digits, trailing zeros dropped. 1234.5 -> "1,234.5"
pub fn amount(val: f64) -> String {
    if val.is_nan() {
        return "NaN".to_string();
    }
    if val.is_infinite() {
        return if val < 0.0 { "-∞".to_string() } else { "∞".to_string() };
    }
    let rounded = format!("{:.3}", val.abs());
    let (int_part, dec_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let dec_part = dec_part.trim_end_matches('0');

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let negative = val < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    if dec_part.is_empty() {
        format!("{sign}{with_commas}")
    } else {
        format!("{sign}{with_commas}.{dec_part}")
    }
}

/// `dd/MM/yyyy`
pub fn date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(1234.56), "1,234.56");
        assert_eq!(amount(-500.0), "-500");
        assert_eq!(amount(0.0), "0");
        assert_eq!(amount(1000000.99), "1,000,000.99");
        assert_eq!(amount(12.3456), "12.346");
        assert_eq!(amount(42.10), "42.1");
    }

    #[test]
    fn test_amount_tiny_negative_is_zero() {
        assert_eq!(amount(-0.0001), "0");
    }

    #[test]
    fn test_amount_nan() {
        assert_eq!(amount(f64::NAN), "NaN");
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(date(NaiveDate::from_ymd_opt(2021, 1, 5).unwrap()), "05/01/2021");
    }
}
