//! Document decoding: media kinds and the PDF source.

mod pdf;

pub use pdf::PdfSource;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Declared media kind of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Single raster image (PNG, JPEG, TIFF, ...).
    Image,
    /// Paginated format with a potential embedded text layer (PDF).
    Paginated,
}

impl MediaKind {
    /// Infer the media kind from a file extension.
    pub fn from_extension(ext: &str) -> Result<Self, SourceError> {
        match ext.to_lowercase().as_str() {
            "pdf" => Ok(Self::Paginated),
            "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Ok(Self::Image),
            other => Err(SourceError::UnsupportedKind(other.to_string())),
        }
    }
}

/// An uploaded document: opaque bytes plus a declared kind.
///
/// Owned by the caller and never persisted; the pipeline only reads it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Caller-supplied identifier, carried through to every record.
    pub id: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(id: impl Into<String>, kind: MediaKind, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            kind,
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_maps_to_kind() {
        assert_eq!(MediaKind::from_extension("pdf").unwrap(), MediaKind::Paginated);
        assert_eq!(MediaKind::from_extension("PNG").unwrap(), MediaKind::Image);
        assert_eq!(MediaKind::from_extension("jpeg").unwrap(), MediaKind::Image);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(matches!(
            MediaKind::from_extension("docx"),
            Err(SourceError::UnsupportedKind(_))
        ));
    }
}
