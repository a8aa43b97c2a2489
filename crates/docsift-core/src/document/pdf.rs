//! PDF text-layer extraction and scanned-page image recovery.
//!
//! Uses lopdf for document structure and embedded image streams, and
//! pdf-extract for the digital text layer.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use crate::error::SourceError;

/// A loaded PDF, ready for text-layer extraction or page image recovery.
pub struct PdfSource {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfSource {
    /// Load a PDF from bytes.
    ///
    /// PDFs encrypted with an empty password are decrypted transparently;
    /// anything else encrypted is rejected.
    pub fn load(data: &[u8]) -> Result<Self, SourceError> {
        let mut document =
            Document::load_mem(data).map_err(|e| SourceError::Decode(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes, not the originals.
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| SourceError::Decode(e.to_string()))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(SourceError::NoPages);
        }

        Ok(Self { document, raw_data })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract the embedded text layer for the whole document at once.
    ///
    /// Returns `None` when the document carries no extractable layer; the
    /// caller decides whether what came back is substantial enough to trust.
    pub fn text_layer(&self) -> Option<String> {
        match pdf_extract::extract_text_from_mem(&self.raw_data) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("no text layer extracted: {e}");
                None
            }
        }
    }

    /// Recover the scanned page images, in page order.
    ///
    /// A scanned PDF stores each page as one full-page image XObject; this
    /// takes the first image found on each page. Pages without a directly
    /// referenced image fall back to a whole-document object scan, which
    /// covers writers that attach images outside the page resource tree.
    pub fn page_images(&self) -> Vec<DynamicImage> {
        let pages = self.document.get_pages();
        let mut images = Vec::with_capacity(pages.len());

        for (_, page_id) in pages.iter() {
            if let Some(image) = self.first_page_image(*page_id) {
                images.push(image);
            }
        }

        if images.is_empty() {
            debug!("no page-referenced images, scanning all objects");
            images = self.scan_all_images();
        }

        debug!("recovered {} page images", images.len());
        images
    }

    /// First decodable image XObject referenced by a page's resources.
    fn first_page_image(&self, page_id: ObjectId) -> Option<DynamicImage> {
        let resources = self.page_resources(page_id)?;
        let xobjects = resources.get(b"XObject").ok()?;
        let (_, xobjects) = self.document.dereference(xobjects).ok()?;

        if let Object::Dictionary(dict) = xobjects {
            for (_, entry) in dict.iter() {
                if let Ok((_, object)) = self.document.dereference(entry) {
                    if let Some(image) = self.decode_image_object(object) {
                        return Some(image);
                    }
                }
            }
        }
        None
    }

    /// Every decodable image stream in the document, in object order.
    fn scan_all_images(&self) -> Vec<DynamicImage> {
        self.document
            .objects
            .values()
            .filter_map(|object| self.decode_image_object(object))
            .collect()
    }

    /// Resources dictionary for a page, walking up the page tree for
    /// inherited entries.
    fn page_resources(&self, node_id: ObjectId) -> Option<Dictionary> {
        let node = self.document.get_object(node_id).ok()?;
        let Object::Dictionary(dict) = node else {
            return None;
        };

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(resources))) = self.document.dereference(resources) {
                return Some(resources.clone());
            }
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            return self.page_resources(*parent_id);
        }
        None
    }

    /// Decode an image XObject stream into a raster image.
    fn decode_image_object(&self, object: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = object else {
            return None;
        };
        let dict = &stream.dict;

        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
        trace!("image XObject {}x{}", width, height);

        // Compressed raster filters first: JPEG streams decode directly.
        if let Some(filter) = self.stream_filter(dict) {
            match filter.as_slice() {
                b"DCTDecode" => {
                    return image::load_from_memory_with_format(
                        &stream.content,
                        image::ImageFormat::Jpeg,
                    )
                    .ok();
                }
                b"JPXDecode" | b"CCITTFaxDecode" | b"JBIG2Decode" => {
                    warn!(
                        "unsupported image filter {}",
                        String::from_utf8_lossy(&filter)
                    );
                    return None;
                }
                _ => {}
            }
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);
        if bits != 8 {
            trace!("unsupported bits per component: {bits}");
            return None;
        }

        match self.color_space(dict).as_slice() {
            b"DeviceGray" | b"G" => {
                let expected = (width * height) as usize;
                (data.len() >= expected)
                    .then(|| GrayImage::from_raw(width, height, data[..expected].to_vec()))
                    .flatten()
                    .map(DynamicImage::ImageLuma8)
            }
            b"DeviceRGB" | b"RGB" => {
                let expected = (width * height * 3) as usize;
                (data.len() >= expected)
                    .then(|| RgbImage::from_raw(width, height, data[..expected].to_vec()))
                    .flatten()
                    .map(DynamicImage::ImageRgb8)
            }
            other => {
                trace!("unsupported color space {}", String::from_utf8_lossy(other));
                None
            }
        }
    }

    fn stream_filter(&self, dict: &Dictionary) -> Option<Vec<u8>> {
        match dict.get(b"Filter").ok()? {
            Object::Name(name) => Some(name.clone()),
            Object::Array(filters) => filters
                .first()
                .and_then(|o| o.as_name().ok())
                .map(|n| n.to_vec()),
            _ => None,
        }
    }

    fn color_space(&self, dict: &Dictionary) -> Vec<u8> {
        dict.get(b"ColorSpace")
            .ok()
            .and_then(|object| match object {
                Object::Name(name) => Some(name.clone()),
                Object::Array(entries) => entries
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| n.to_vec()),
                Object::Reference(id) => self
                    .document
                    .get_object(*id)
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| n.to_vec()),
                _ => None,
            })
            .unwrap_or_else(|| b"DeviceRGB".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let result = PdfSource::load(b"not a pdf at all");
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[test]
    fn empty_input_is_a_decode_error() {
        assert!(matches!(PdfSource::load(b""), Err(SourceError::Decode(_))));
    }
}
