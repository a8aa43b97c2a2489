//! Cloud OCR client backed by the Google Cloud Vision REST API.

use std::io::Cursor;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::OcrBackend;
use crate::error::OcrError;

const ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Document-oriented text detection via Google Cloud Vision.
///
/// Requests `DOCUMENT_TEXT_DETECTION` rather than sparse `TEXT_DETECTION`:
/// dense documents need layout-aware recognition. Every failure - transport,
/// auth, quota - maps to [`OcrError::Unavailable`] so the caller falls back
/// instead of retrying.
pub struct CloudVisionOcr {
    client: reqwest::blocking::Client,
    api_key: String,
    language_hints: Vec<String>,
}

impl CloudVisionOcr {
    /// Build a client with a 30 second request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, OcrError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OcrError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            language_hints: vec!["en".to_string(), "ar".to_string()],
        })
    }

    pub fn with_language_hints(mut self, hints: Vec<String>) -> Self {
        self.language_hints = hints;
        self
    }

    fn encode_png(image: &DynamicImage) -> Result<String, OcrError> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        Ok(BASE64.encode(buffer))
    }
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<FullTextAnnotation>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct FullTextAnnotation {
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OcrBackend for CloudVisionOcr {
    fn name(&self) -> &'static str {
        "cloud-vision"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let content = Self::encode_png(image)?;
        let body = json!({
            "requests": [{
                "image": { "content": content },
                "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }],
                "imageContext": { "languageHints": self.language_hints },
            }]
        });

        let response = self
            .client
            .post(ANNOTATE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| OcrError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Unavailable(format!("HTTP {status}")));
        }

        let parsed: AnnotateResponse = response
            .json()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        let first = parsed
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| OcrError::Recognition("empty annotate response".to_string()))?;

        if let Some(error) = first.error {
            return Err(OcrError::Unavailable(error.message));
        }

        let text = first
            .full_text_annotation
            .map(|annotation| annotation.text)
            .unwrap_or_default();

        debug!(chars = text.len(), "cloud OCR returned");
        Ok(text)
    }
}
