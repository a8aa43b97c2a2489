//! Core library for docsift document processing.
//!
//! This crate provides:
//! - Document decoding (PDF text layer and scanned-page image recovery)
//! - Tiered page text acquisition (digital layer, cloud OCR, local OCR)
//! - Confidence-ordered field extraction (name, date, amount, custom label)
//! - Keyword risk scoring with optional entity/summary enrichment
//! - Batch record aggregation for tabular review and export

pub mod acquire;
pub mod aggregate;
pub mod document;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;

pub use acquire::{CloudVisionOcr, ImagePreprocessor, OcrBackend, PageTextSource, TesseractOcr};
pub use aggregate::RecordAggregator;
pub use document::{Document, MediaKind, PdfSource};
pub use enrich::{EnrichmentAnalyzer, EntityRecognizer, Summarizer};
pub use error::{DocsiftError, EnrichError, OcrError, Result, SourceError};
pub use extract::{FieldExtractionEngine, parse_amount};
pub use models::config::DocsiftConfig;
pub use models::record::{
    AcquisitionMethod, AcquisitionResult, Batch, CustomField, Enrichment, Entity,
    ExtractionRecord, FieldSet, FieldValue, SourceConfidence,
};
pub use pipeline::{BatchOutcome, DocumentPipeline};
