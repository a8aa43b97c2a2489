//! Configuration structures for the docsift pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the docsift pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Page text acquisition configuration.
    pub acquire: AcquireConfig,

    /// Field extraction configuration.
    pub extract: ExtractConfig,

    /// Enrichment configuration.
    pub enrich: EnrichConfig,
}

/// Page text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Minimum non-whitespace characters for the embedded text layer to be
    /// accepted as the sole source for a document.
    pub min_digital_chars: usize,

    /// Language hint passed to the local OCR engine.
    pub ocr_language: String,

    /// Use the cloud OCR client when one is configured.
    pub prefer_cloud: bool,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            min_digital_chars: 10,
            ocr_language: "eng+ara".to_string(),
            prefer_cloud: true,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum trimmed length for a capture to count as a field value.
    /// Rejects spurious one- and two-character captures.
    pub min_field_len: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_field_len: 3 }
    }
}

/// Enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Risk points added per keyword hit.
    pub risk_weight: u8,

    /// Keyword set scanned for the risk score. Matching is case-insensitive.
    pub risk_keywords: Vec<String>,

    /// Maximum characters of text handed to the entity recognizer.
    pub entity_text_cap: usize,

    /// Minimum word count before the summarizer is invoked.
    pub summary_min_words: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            risk_weight: 15,
            risk_keywords: default_risk_keywords(),
            entity_text_cap: 5000,
            summary_min_words: 40,
        }
    }
}

/// Legal and financial alarm words, English and Arabic.
fn default_risk_keywords() -> Vec<String> {
    [
        "fine",
        "penalty",
        "court",
        "lawsuit",
        "overdue",
        "debt",
        "seizure",
        "غرامة",
        "محكمة",
        "قضية",
        "مخالفة",
        "متأخرات",
        "حجز",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl DocsiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_documented_thresholds() {
        let config = DocsiftConfig::default();
        assert_eq!(config.acquire.min_digital_chars, 10);
        assert_eq!(config.extract.min_field_len, 3);
        assert_eq!(config.enrich.risk_weight, 15);
        assert_eq!(config.enrich.entity_text_cap, 5000);
        assert_eq!(config.enrich.summary_min_words, 40);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DocsiftConfig =
            serde_json::from_str(r#"{"acquire": {"ocr_language": "eng"}}"#).unwrap();
        assert_eq!(config.acquire.ocr_language, "eng");
        assert_eq!(config.acquire.min_digital_chars, 10);
        assert_eq!(config.extract.min_field_len, 3);
    }

    #[test]
    fn keyword_set_is_bilingual() {
        let config = EnrichConfig::default();
        assert!(config.risk_keywords.iter().any(|k| k == "lawsuit"));
        assert!(config.risk_keywords.iter().any(|k| k == "محكمة"));
    }
}
