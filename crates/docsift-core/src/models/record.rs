//! Result models: acquisition output, field sets, records, and batches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a page's text was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    /// Embedded text layer of a born-digital document.
    DigitalLayer,
    /// Document-oriented cloud OCR.
    CloudOcr,
    /// Local OCR engine.
    LocalOcr,
}

impl AcquisitionMethod {
    /// Stable column value for tabular export.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DigitalLayer => "digital_layer",
            Self::CloudOcr => "cloud_ocr",
            Self::LocalOcr => "local_ocr",
        }
    }
}

impl fmt::Display for AcquisitionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence hint for the source that produced a page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfidence {
    /// Primary source for its tier (digital layer, cloud OCR).
    High,
    /// Produced after a higher-trust source was skipped or failed.
    Fallback,
}

/// Text recovered for one page, with the path that produced it.
///
/// `text` may be empty - that is a valid "nothing recovered" outcome, never
/// an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionResult {
    /// 1-based page index within the document.
    pub page_index: u32,
    /// Recovered text, possibly empty.
    pub text: String,
    /// Which source actually produced the text.
    pub method: AcquisitionMethod,
    /// Confidence hint for that source.
    pub confidence: SourceConfidence,
}

/// An extracted field value: the literal matched substring, or an explicit
/// miss. A found value is always non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The trimmed substring a pattern tier captured.
    Found(String),
    /// No tier matched. Serializes as `null`.
    NotFound,
}

impl FieldValue {
    /// Wrap a captured substring, trimming it. Captures that trim to empty
    /// collapse to `NotFound`, preserving the non-empty invariant.
    pub fn from_capture(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::NotFound
        } else {
            Self::Found(trimmed.to_string())
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Column text for tabular export.
    pub fn column_text(&self) -> &str {
        match self {
            Self::Found(value) => value,
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_text())
    }
}

/// A caller-defined field: the label that anchored it and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    pub value: FieldValue,
}

/// Fixed-shape set of fields extracted from one page.
///
/// The custom slot exists only when the caller supplied a label; without a
/// label it is omitted entirely rather than set to `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    pub name: FieldValue,
    pub date: FieldValue,
    pub amount: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomField>,
}

impl FieldSet {
    /// A field set with every mandatory field missing.
    pub fn empty() -> Self {
        Self {
            name: FieldValue::NotFound,
            date: FieldValue::NotFound,
            amount: FieldValue::NotFound,
            custom: None,
        }
    }
}

/// A recognized entity span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// The matched span text.
    pub text: String,
    /// Recognizer category label (e.g. PERSON, ORG, DATE).
    pub category: String,
}

/// Auxiliary attributes derived from a page's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Deduplicated entities from the external recognizer.
    pub entities: Vec<Entity>,
    /// Saturating keyword score, 0..=100.
    pub risk_score: u8,
    /// Model-generated abstract, when a summarizer is configured and the
    /// text is long enough to summarize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One row of the final batch: a page's recovered text plus its structured
/// fields. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Caller-supplied document identifier.
    pub document_id: String,
    /// 1-based page index within the document.
    pub page_index: u32,
    /// Which acquisition path produced `raw_text`.
    pub method: AcquisitionMethod,
    /// Structured fields extracted from `raw_text`.
    pub fields: FieldSet,
    /// Full recovered text for the page.
    pub raw_text: String,
    /// Auxiliary attributes, when enrichment ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

/// Ordered sequence of extraction records handed to the export layer.
///
/// Insertion order is document arrival order, then page order. Every record
/// carries the same field names, so the batch serializes to a flat table
/// without per-row schema negotiation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    pub records: Vec<ExtractionRecord>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtractionRecord> {
        self.records.iter()
    }

    /// The custom label shared by this batch's records, if any.
    ///
    /// One processing request applies at most one label, so the first record
    /// that carries one speaks for the whole batch.
    pub fn custom_label(&self) -> Option<&str> {
        self.records
            .iter()
            .find_map(|r| r.fields.custom.as_ref())
            .map(|c| c.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_from_capture_trims() {
        assert_eq!(
            FieldValue::from_capture("  John Smith "),
            FieldValue::Found("John Smith".to_string())
        );
    }

    #[test]
    fn field_value_from_capture_rejects_whitespace() {
        assert_eq!(FieldValue::from_capture("   "), FieldValue::NotFound);
        assert_eq!(FieldValue::from_capture(""), FieldValue::NotFound);
    }

    #[test]
    fn field_value_serializes_as_string_or_null() {
        let found = serde_json::to_string(&FieldValue::Found("x".into())).unwrap();
        assert_eq!(found, "\"x\"");

        let missing = serde_json::to_string(&FieldValue::NotFound).unwrap();
        assert_eq!(missing, "null");
    }

    #[test]
    fn field_set_omits_custom_slot_without_label() {
        let json = serde_json::to_value(FieldSet::empty()).unwrap();
        assert!(json.get("custom").is_none());
        assert!(json.get("name").unwrap().is_null());
    }

    #[test]
    fn batch_custom_label_comes_from_records() {
        let mut fields = FieldSet::empty();
        fields.custom = Some(CustomField {
            label: "Policy No".to_string(),
            value: FieldValue::NotFound,
        });

        let batch = Batch {
            records: vec![ExtractionRecord {
                document_id: "a".to_string(),
                page_index: 1,
                method: AcquisitionMethod::LocalOcr,
                fields,
                raw_text: String::new(),
                enrichment: None,
            }],
        };

        assert_eq!(batch.custom_label(), Some("Policy No"));
    }
}
