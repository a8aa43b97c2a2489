//! Image preprocessing applied before any OCR call.

use image::{DynamicImage, GrayImage};

/// Grayscale conversion followed by an auto-contrast stretch.
///
/// Every OCR call sees a prepared image; recognition rates on scanned input
/// drop sharply without this step, so it is not optional tuning.
pub struct ImagePreprocessor {
    /// Fraction of the histogram clipped at each end before stretching.
    cutoff: f32,
}

impl ImagePreprocessor {
    pub fn new() -> Self {
        Self { cutoff: 0.01 }
    }

    /// Set the histogram clip fraction (0.0 = pure min/max stretch).
    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff.clamp(0.0, 0.4);
        self
    }

    /// Prepare a page image for recognition.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let gray = image.to_luma8();
        DynamicImage::ImageLuma8(self.stretch_contrast(&gray))
    }

    /// Linear contrast stretch over the clipped histogram range.
    fn stretch_contrast(&self, image: &GrayImage) -> GrayImage {
        let total = (image.width() as u64) * (image.height() as u64);
        if total == 0 {
            return image.clone();
        }

        let mut histogram = [0u64; 256];
        for pixel in image.pixels() {
            histogram[pixel[0] as usize] += 1;
        }

        let clip = (total as f32 * self.cutoff) as u64;

        let mut low = 0usize;
        let mut seen = 0u64;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > clip {
                low = value;
                break;
            }
        }

        let mut high = 255usize;
        let mut seen = 0u64;
        for (value, &count) in histogram.iter().enumerate().rev() {
            seen += count;
            if seen > clip {
                high = value;
                break;
            }
        }

        if high <= low {
            // Flat image; stretching would divide by zero.
            return image.clone();
        }

        let scale = 255.0 / (high - low) as f32;
        let mut stretched = image.clone();
        for pixel in stretched.pixels_mut() {
            let clamped = (pixel[0] as usize).clamp(low, high);
            pixel[0] = (((clamped - low) as f32) * scale).round() as u8;
        }
        stretched
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn stretch_expands_narrow_range_to_full() {
        // 4x1 ramp confined to the 100..=160 band.
        let mut image = GrayImage::new(4, 1);
        for (x, value) in [100u8, 120, 140, 160].iter().enumerate() {
            image.put_pixel(x as u32, 0, Luma([*value]));
        }

        let stretched = ImagePreprocessor::new().with_cutoff(0.0).stretch_contrast(&image);

        assert_eq!(stretched.get_pixel(0, 0)[0], 0);
        assert_eq!(stretched.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn flat_image_is_left_alone() {
        let image = GrayImage::from_pixel(3, 3, Luma([128]));
        let stretched = ImagePreprocessor::new().stretch_contrast(&image);
        assert_eq!(stretched.get_pixel(1, 1)[0], 128);
    }

    #[test]
    fn prepare_outputs_grayscale() {
        let rgb = DynamicImage::new_rgb8(2, 2);
        let prepared = ImagePreprocessor::new().prepare(&rgb);
        assert!(matches!(prepared, DynamicImage::ImageLuma8(_)));
    }
}
