//! Tier pattern tables for field extraction, English and Arabic.
//!
//! Each field keeps its tiers in precedence order: label-anchored patterns
//! first, unlabeled heuristics last. Patterns scan the full page text rather
//! than anchoring to lines, because OCR output collapses and rearranges line
//! breaks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Name tiers.
    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?i)\b(?:name|customer|client|recipient|الاسم|العميل|السيد)\b\s*[:：\-]?\s*([\p{L}][\p{L} .'\-]{1,60})"
    ).unwrap();

    // Capitalized two- or three-word run. Deliberately case-sensitive.
    pub static ref NAME_CAPITALIZED: Regex = Regex::new(
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\b"
    ).unwrap();

    // Run of three Arabic letter tokens, no label required. The class
    // intersection keeps Arabic-Indic digits out of the tokens.
    pub static ref NAME_ARABIC_RUN: Regex = Regex::new(
        r"([\p{Arabic}&&\p{L}]{2,}\s+[\p{Arabic}&&\p{L}]{2,}\s+[\p{Arabic}&&\p{L}]{2,})"
    ).unwrap();

    // Date tiers.
    pub static ref DATE_LABELED: Regex = Regex::new(
        r"(?i)\b(?:date|dated|issued|تاريخ|التاريخ)\b\s*[:：\-]?\s*(\d{1,4}[./\-]\d{1,2}[./\-]\d{2,4}|\d{1,2}\s+\p{L}+,?\s+\d{2,4})"
    ).unwrap();

    // Bare numeric date. Field order (day-first vs month-first) is not
    // disambiguated; the literal substring is returned as matched.
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,4}[-/]\d{1,2}[-/]\d{2,4})\b"
    ).unwrap();

    // Amount: label-anchored, optional currency marker, thousands
    // separators, optional two-decimal fraction.
    pub static ref AMOUNT_LABELED: Regex = Regex::new(
        r"(?i)\b(?:total|amount|balance|sum|due|المبلغ|الإجمالي|المجموع|الرصيد)\b\s*[:：\-]?\s*(?:(?:[$€£]|USD|EUR|GBP|SAR|AED|EGP|ريال|درهم|ج\.م)\s*)?(\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_name_captures_the_run() {
        let caps = NAME_LABELED.captures("Customer: Jane Doe").unwrap();
        assert_eq!(&caps[1], "Jane Doe");
    }

    #[test]
    fn labeled_name_matches_arabic_label() {
        let caps = NAME_LABELED.captures("الاسم: محمد علي").unwrap();
        assert_eq!(&caps[1], "محمد علي");
    }

    #[test]
    fn capitalized_run_requires_capitalization() {
        assert!(NAME_CAPITALIZED.is_match("John Smith"));
        assert!(!NAME_CAPITALIZED.is_match("john smith"));
    }

    #[test]
    fn numeric_date_accepts_both_separator_styles() {
        assert_eq!(&DATE_NUMERIC.captures("2023-11-05").unwrap()[1], "2023-11-05");
        assert_eq!(&DATE_NUMERIC.captures("5/11/2023").unwrap()[1], "5/11/2023");
    }

    #[test]
    fn amount_accepts_currency_and_separators() {
        let caps = AMOUNT_LABELED.captures("Total: $1,250.00").unwrap();
        assert_eq!(&caps[1], "1,250.00");

        let caps = AMOUNT_LABELED.captures("الإجمالي: 950.00").unwrap();
        assert_eq!(&caps[1], "950.00");
    }

    #[test]
    fn amount_does_not_split_on_thousands_separator() {
        let caps = AMOUNT_LABELED.captures("Amount due 12,345,678.90").unwrap();
        assert_eq!(&caps[1], "12,345,678.90");
    }
}
