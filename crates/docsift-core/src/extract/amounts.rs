//! Amount normalization helpers.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a matched amount literal into a decimal.
///
/// The extracted field keeps the literal substring; this is for consumers
/// that need arithmetic over it, like batch totals. Handles comma thousands
/// separators ("1,250.00") and the lone-comma decimal style ("1250,00").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        // A single comma with exactly two trailing digits is a decimal
        // mark; everything else is thousands grouping.
        match cleaned.rsplit_once(',') {
            Some((_, fraction))
                if fraction.len() == 2 && cleaned.matches(',').count() == 1 =>
            {
                cleaned.replace(',', ".")
            }
            _ => cleaned.replace(',', ""),
        }
    } else {
        cleaned.replace(',', "")
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_separated_amounts() {
        assert_eq!(parse_amount("1,250.00"), Decimal::from_str("1250.00").ok());
        assert_eq!(
            parse_amount("12,345,678.90"),
            Decimal::from_str("12345678.90").ok()
        );
    }

    #[test]
    fn parses_plain_and_comma_decimal_amounts() {
        assert_eq!(parse_amount("950"), Decimal::from_str("950").ok());
        assert_eq!(parse_amount("1250,00"), Decimal::from_str("1250.00").ok());
    }

    #[test]
    fn ignores_currency_noise() {
        assert_eq!(parse_amount("$ 4,000"), Decimal::from_str("4000").ok());
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(parse_amount("Not Found"), None);
        assert_eq!(parse_amount(""), None);
    }
}
