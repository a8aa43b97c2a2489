//! Confidence-ordered field extraction over recovered page text.

mod amounts;
pub mod patterns;

pub use amounts::parse_amount;

use regex::Regex;

use crate::models::config::ExtractConfig;
use crate::models::record::{CustomField, FieldSet, FieldValue};

use patterns::{
    AMOUNT_LABELED, DATE_LABELED, DATE_NUMERIC, NAME_ARABIC_RUN, NAME_CAPITALIZED, NAME_LABELED,
};

/// Pattern-tier engine: per field, an ordered list of matchers evaluated
/// highest-precision first. The first tier whose capture survives trimming
/// and the minimum-length gate wins; later tiers are never consulted.
///
/// `extract` is a pure function, total over any input string.
pub struct FieldExtractionEngine {
    min_field_len: usize,
}

impl FieldExtractionEngine {
    pub fn new() -> Self {
        Self::from_config(&ExtractConfig::default())
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            min_field_len: config.min_field_len,
        }
    }

    /// Extract every field from one page's text.
    ///
    /// A field no tier matches is `NotFound` - never an empty string and
    /// never an error. The custom slot appears only when `custom_label` is
    /// given.
    pub fn extract(&self, text: &str, custom_label: Option<&str>) -> FieldSet {
        let name_tiers: &[&Regex] = &[&NAME_LABELED, &NAME_CAPITALIZED, &NAME_ARABIC_RUN];
        let date_tiers: &[&Regex] = &[&DATE_LABELED, &DATE_NUMERIC];
        let amount_tiers: &[&Regex] = &[&AMOUNT_LABELED];

        FieldSet {
            name: self.first_match(text, name_tiers),
            date: self.first_match(text, date_tiers),
            amount: self.first_match(text, amount_tiers),
            custom: custom_label.map(|label| CustomField {
                label: label.to_string(),
                value: self.match_custom(text, label),
            }),
        }
    }

    /// Fold over one field's tiers in precedence order.
    ///
    /// Within a tier, the first capture that passes the length gate wins; a
    /// tier whose every capture is too short does not block later tiers.
    fn first_match(&self, text: &str, tiers: &[&Regex]) -> FieldValue {
        for tier in tiers {
            for caps in tier.captures_iter(text) {
                if let Some(group) = caps.get(1) {
                    let value = group.as_str().trim();
                    if value.chars().count() >= self.min_field_len {
                        return FieldValue::from_capture(value);
                    }
                }
            }
        }
        FieldValue::NotFound
    }

    /// Single label-anchored tier built from the caller's literal label.
    fn match_custom(&self, text: &str, label: &str) -> FieldValue {
        let pattern = format!(
            r"(?i){}\s*[:：\-]?\s*([\p{{L}}\p{{N}}][\p{{L}}\p{{N}} ,./\-]{{0,60}})",
            regex::escape(label)
        );
        match Regex::new(&pattern) {
            Ok(tier) => self.first_match(text, &[&tier]),
            Err(_) => FieldValue::NotFound,
        }
    }
}

impl Default for FieldExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}
