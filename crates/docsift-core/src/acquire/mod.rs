//! Tiered page text acquisition: digital layer, cloud OCR, local OCR.

mod cloud;
mod preprocess;
mod tesseract;

pub use cloud::CloudVisionOcr;
pub use preprocess::ImagePreprocessor;
pub use tesseract::TesseractOcr;

use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::document::{Document, MediaKind, PdfSource};
use crate::error::{OcrError, SourceError};
use crate::models::config::AcquireConfig;
use crate::models::record::{AcquisitionMethod, AcquisitionResult, SourceConfidence};

/// Capability interface for an OCR engine.
///
/// Implemented by the cloud client and the local engine; [`PageTextSource`]
/// depends only on this trait, so tests substitute stubs and deployments
/// swap engines without touching the fallback policy.
pub trait OcrBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Recognize text in a preprocessed page image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Produces per-page text for a document by trying sources in order of
/// trust: embedded text layer, cloud OCR, local OCR.
///
/// Owns the fallback policy. Acquisition never raises for OCR-level
/// failures; only bytes that cannot be decoded at all are an error.
pub struct PageTextSource {
    cloud: Option<Arc<dyn OcrBackend>>,
    local: Arc<dyn OcrBackend>,
    preprocessor: ImagePreprocessor,
    config: AcquireConfig,
}

impl PageTextSource {
    pub fn new(local: Arc<dyn OcrBackend>, config: AcquireConfig) -> Self {
        Self {
            cloud: None,
            local,
            preprocessor: ImagePreprocessor::new(),
            config,
        }
    }

    /// Attach a cloud OCR client. Without one, every OCR page goes straight
    /// to the local engine.
    pub fn with_cloud(mut self, cloud: Arc<dyn OcrBackend>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    /// Acquire text for every page of a document.
    ///
    /// Returns one result per page, or a single whole-document result when
    /// the embedded text layer is substantial enough. Errors only when the
    /// bytes cannot be decoded; per-page OCR failures degrade that page to
    /// empty text and the rest of the document still runs.
    pub fn acquire(&self, document: &Document) -> Result<Vec<AcquisitionResult>, SourceError> {
        match document.kind {
            MediaKind::Paginated => self.acquire_paginated(document),
            MediaKind::Image => {
                let image = image::load_from_memory(&document.bytes)
                    .map_err(|e| SourceError::Decode(e.to_string()))?;
                Ok(vec![self.acquire_page(1, &image)])
            }
        }
    }

    fn acquire_paginated(&self, document: &Document) -> Result<Vec<AcquisitionResult>, SourceError> {
        let pdf = PdfSource::load(&document.bytes)?;

        // Digital-layer attempt for the whole document, before any
        // rasterization cost is paid.
        if let Some(text) = pdf.text_layer() {
            if digital_layer_accepted(&text, self.config.min_digital_chars) {
                debug!(document = %document.id, "digital text layer accepted");
                return Ok(vec![AcquisitionResult {
                    page_index: 1,
                    text,
                    method: AcquisitionMethod::DigitalLayer,
                    confidence: SourceConfidence::High,
                }]);
            }
            debug!(document = %document.id, "digital text layer too sparse, rasterizing");
        }

        let pages = pdf.page_images();
        if pages.is_empty() {
            // Nothing recoverable. Emit one empty page so the document still
            // appears in the batch instead of being dropped silently.
            warn!(document = %document.id, "no page images recovered");
            return Ok(vec![AcquisitionResult {
                page_index: 1,
                text: String::new(),
                method: AcquisitionMethod::LocalOcr,
                confidence: SourceConfidence::Fallback,
            }]);
        }

        Ok(pages
            .iter()
            .enumerate()
            .map(|(i, image)| self.acquire_page(i as u32 + 1, image))
            .collect())
    }

    /// Run the OCR fallback chain on a single page. Never fails.
    fn acquire_page(&self, page_index: u32, image: &DynamicImage) -> AcquisitionResult {
        let prepared = self.preprocessor.prepare(image);

        if self.config.prefer_cloud {
            if let Some(cloud) = &self.cloud {
                match cloud.recognize(&prepared) {
                    Ok(text) => {
                        return AcquisitionResult {
                            page_index,
                            text,
                            method: AcquisitionMethod::CloudOcr,
                            confidence: SourceConfidence::High,
                        };
                    }
                    Err(e) => {
                        warn!(page = page_index, backend = cloud.name(), "cloud OCR failed, falling back: {e}");
                    }
                }
            }
        }

        let text = match self.local.recognize(&prepared) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = page_index, backend = self.local.name(), "local OCR failed: {e}");
                String::new()
            }
        };

        AcquisitionResult {
            page_index,
            text,
            method: AcquisitionMethod::LocalOcr,
            confidence: SourceConfidence::Fallback,
        }
    }
}

/// Whether an embedded text layer is substantial enough to stand as the
/// sole source. Counts non-whitespace characters so a layer of stray
/// newlines never passes.
fn digital_layer_accepted(text: &str, min_chars: usize) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() > min_chars
}
