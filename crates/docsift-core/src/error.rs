//! Error types for the docsift-core library.

use thiserror::Error;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// Document decoding error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// OCR backend error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Enrichment collaborator error.
    #[error("enrichment error: {0}")]
    Enrich(#[from] EnrichError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while decoding a document into pages.
///
/// This is the only error class that surfaces to the caller: no fallback
/// chain can recover from bytes that cannot be decoded at all.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document bytes could not be parsed.
    #[error("failed to decode document: {0}")]
    Decode(String),

    /// The declared media kind is not supported.
    #[error("unsupported media kind: {0}")]
    UnsupportedKind(String),

    /// The document is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("document has no pages")]
    NoPages,
}

/// Errors raised by an OCR backend.
///
/// These never escape acquisition; they select the next source in the
/// fallback chain or degrade the page to empty text.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The backend cannot be reached (transport, auth, quota).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Text recognition failed.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised by enrichment collaborators.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// Entity recognition failed.
    #[error("entity recognition failed: {0}")]
    Recognition(String),

    /// Summarization failed.
    #[error("summarization failed: {0}")]
    Summarization(String),
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;
