//! Local OCR backend driving the system Tesseract binary.

use std::path::Path;
use std::process::Command;

use image::DynamicImage;
use tracing::debug;

use super::OcrBackend;
use crate::error::OcrError;

/// Local OCR engine. Always constructible; recognition shells out to the
/// `tesseract` binary on PATH with a configurable language hint.
pub struct TesseractOcr {
    language: String,
    binary: String,
}

impl TesseractOcr {
    /// Create a backend with the given language hint (e.g. `"eng+ara"`).
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            binary: "tesseract".to_string(),
        }
    }

    /// Override the binary path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn run(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(out) if out.status.success() => {
                Ok(String::from_utf8_lossy(&out.stdout).to_string())
            }
            Ok(out) => Err(OcrError::Recognition(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::Unavailable(
                format!("{} not found on PATH (install tesseract-ocr)", self.binary),
            )),
            Err(e) => Err(OcrError::Recognition(e.to_string())),
        }
    }
}

impl OcrBackend for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let dir = tempfile::tempdir().map_err(|e| OcrError::Recognition(e.to_string()))?;
        let path = dir.path().join("page.png");
        image
            .save(&path)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let text = self.run(&path)?;
        debug!(chars = text.len(), lang = %self.language, "tesseract returned");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_maps_to_unavailable() {
        let backend = TesseractOcr::new("eng").with_binary("definitely-not-a-real-binary");
        let image = DynamicImage::new_luma8(4, 4);
        assert!(matches!(
            backend.recognize(&image),
            Err(OcrError::Unavailable(_))
        ));
    }
}
