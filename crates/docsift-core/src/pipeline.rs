//! End-to-end pipeline wiring acquisition, extraction, and enrichment.

use tracing::{info, warn};

use crate::acquire::PageTextSource;
use crate::aggregate::RecordAggregator;
use crate::enrich::EnrichmentAnalyzer;
use crate::error::SourceError;
use crate::extract::FieldExtractionEngine;
use crate::document::Document;
use crate::models::record::{Batch, ExtractionRecord};

/// Outcome of a batch run: the assembled records plus the documents that
/// could not be decoded at all.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub batch: Batch,
    /// Document id paired with the decode failure that excluded it.
    pub failures: Vec<(String, SourceError)>,
}

/// Per-request processing pipeline. Stateless across requests; every
/// collaborator is injected, never reached for as an ambient global.
pub struct DocumentPipeline {
    source: PageTextSource,
    engine: FieldExtractionEngine,
    analyzer: Option<EnrichmentAnalyzer>,
    custom_label: Option<String>,
}

impl DocumentPipeline {
    pub fn new(source: PageTextSource, engine: FieldExtractionEngine) -> Self {
        Self {
            source,
            engine,
            analyzer: None,
            custom_label: None,
        }
    }

    /// Attach enrichment; without it records carry no auxiliary attributes.
    pub fn with_enrichment(mut self, analyzer: EnrichmentAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Extract one extra caller-labeled field from every page.
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    /// Process one document into records, one per acquired page.
    ///
    /// Errors only when the bytes cannot be decoded. A page whose OCR failed
    /// still yields a record with empty text and all fields missing.
    pub fn process(&self, document: &Document) -> Result<Vec<ExtractionRecord>, SourceError> {
        let acquisitions = self.source.acquire(document)?;
        info!(
            document = %document.id,
            pages = acquisitions.len(),
            "acquired page text"
        );

        let mut aggregator = RecordAggregator::new();
        for acquisition in acquisitions {
            let fields = self
                .engine
                .extract(&acquisition.text, self.custom_label.as_deref());
            let enrichment = self
                .analyzer
                .as_ref()
                .map(|analyzer| analyzer.analyze(&acquisition.text));
            aggregator.push(&document.id, acquisition, fields, enrichment);
        }

        Ok(aggregator.finish().records)
    }

    /// Process documents in arrival order into one batch.
    ///
    /// A document that cannot be decoded is reported in the outcome and the
    /// rest of the batch still runs.
    pub fn process_batch(&self, documents: &[Document]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for document in documents {
            match self.process(document) {
                Ok(mut records) => outcome.batch.records.append(&mut records),
                Err(e) => {
                    warn!(document = %document.id, "excluded from batch: {e}");
                    outcome.failures.push((document.id.clone(), e));
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use image::DynamicImage;

    use crate::acquire::OcrBackend;
    use crate::error::OcrError;
    use crate::document::MediaKind;
    use crate::models::config::{AcquireConfig, EnrichConfig, ExtractConfig};
    use crate::models::record::{AcquisitionMethod, FieldValue};

    struct FixedOcr(&'static str);

    impl OcrBackend for FixedOcr {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingOcr;

    impl OcrBackend for FailingOcr {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Err(OcrError::Unavailable("outage".to_string()))
        }
    }

    fn png_document(id: &str) -> Document {
        let image = DynamicImage::new_rgb8(8, 8);
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        Document::new(id, MediaKind::Image, bytes)
    }

    fn pipeline_with(local: Arc<dyn OcrBackend>) -> DocumentPipeline {
        DocumentPipeline::new(
            PageTextSource::new(local, AcquireConfig::default()),
            FieldExtractionEngine::from_config(&ExtractConfig::default()),
        )
    }

    #[test]
    fn end_to_end_over_a_stubbed_page() {
        let pipeline = pipeline_with(Arc::new(FixedOcr(
            "Invoice Date: 2023-11-05 Total: 1,250.00 Name: John Smith",
        )));
        let records = pipeline.process(&png_document("doc")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_id, "doc");
        assert_eq!(records[0].method, AcquisitionMethod::LocalOcr);
        assert_eq!(
            records[0].fields.name,
            FieldValue::Found("John Smith".to_string())
        );
        assert_eq!(
            records[0].fields.date,
            FieldValue::Found("2023-11-05".to_string())
        );
        assert_eq!(
            records[0].fields.amount,
            FieldValue::Found("1,250.00".to_string())
        );
    }

    #[test]
    fn failed_ocr_still_yields_a_record() {
        let pipeline = pipeline_with(Arc::new(FailingOcr));
        let records = pipeline.process(&png_document("doc")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_text, "");
        assert_eq!(records[0].fields.name, FieldValue::NotFound);
        assert_eq!(records[0].fields.date, FieldValue::NotFound);
        assert_eq!(records[0].fields.amount, FieldValue::NotFound);
    }

    #[test]
    fn undecodable_document_is_reported_without_aborting_batch() {
        let pipeline = pipeline_with(Arc::new(FixedOcr("Date: 2024-01-01")));
        let documents = vec![
            Document::new("bad", MediaKind::Image, b"garbage".to_vec()),
            png_document("good"),
        ];

        let outcome = pipeline.process_batch(&documents);

        assert_eq!(outcome.batch.len(), 1);
        assert_eq!(outcome.batch.records[0].document_id, "good");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "bad");
    }

    #[test]
    fn enrichment_rides_along_when_attached() {
        let pipeline = pipeline_with(Arc::new(FixedOcr("pay the fine to the court")))
            .with_enrichment(EnrichmentAnalyzer::new(EnrichConfig::default()));

        let records = pipeline.process(&png_document("doc")).unwrap();
        let enrichment = records[0].enrichment.as_ref().unwrap();
        assert_eq!(enrichment.risk_score, 30);
    }

    #[test]
    fn custom_label_flows_to_every_record() {
        let pipeline =
            pipeline_with(Arc::new(FixedOcr("Case Ref: X99"))).with_custom_label("Case Ref");
        let records = pipeline.process(&png_document("doc")).unwrap();

        let custom = records[0].fields.custom.as_ref().unwrap();
        assert_eq!(custom.label, "Case Ref");
        assert_eq!(custom.value, FieldValue::Found("X99".to_string()));
    }
}
