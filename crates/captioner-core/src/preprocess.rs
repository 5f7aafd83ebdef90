//! Image preprocessing: file path to normalized NCHW tensor.
//!
//! The scoring model expects:
//! - Input size: `H × W` from the configured input shape
//! - Normalization: pixels scaled to [0, 1] via `pixel / 255`
//! - Channel order: RGB
//! - Tensor layout: NCHW \[batch, channels, height, width\]

use std::path::Path;

use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::{CaptionError, Result};

/// Fallback input shape when the configured shape is unusable.
const DEFAULT_SHAPE: [i64; 4] = [1, 3, 224, 224];

/// Prepares image files for the scoring model.
pub struct ImagePreprocessor {
    input_shape: [usize; 4],
}

impl ImagePreprocessor {
    /// Create a preprocessor for the given NCHW input shape.
    ///
    /// A shape without exactly 4 dimensions falls back to
    /// `[1, 3, 224, 224]`; the config loader rejects such shapes upstream,
    /// so this only fires for hand-constructed shapes.
    pub fn new(input_shape: &[i64]) -> Self {
        let shape: [i64; 4] = match input_shape.try_into() {
            Ok(shape) => shape,
            Err(_) => {
                tracing::error!("Invalid input shape: expected 4 dimensions (N, C, H, W)");
                DEFAULT_SHAPE
            }
        };
        Self {
            input_shape: shape.map(|d| d as usize),
        }
    }

    /// Decode an image and produce the model input tensor.
    ///
    /// Resizes to the configured `W × H` (bilinear), converts to RGB,
    /// scales pixels to [0, 1], and lays the data out NCHW.
    pub fn preprocess(&self, image_path: &Path) -> Result<Array4<f32>> {
        let image = image::open(image_path).map_err(|e| {
            tracing::error!("Failed to load image {}: {}", image_path.display(), e);
            CaptionError::ImageLoad {
                path: image_path.to_path_buf(),
            }
        })?;

        let [n, c, h, w] = self.input_shape;
        let resized = image.resize_exact(w as u32, h as u32, FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let mut tensor = Array4::<f32>::zeros((n, c, h, w));

        // Fill the flat buffer directly instead of 4D indexing per pixel.
        // A freshly allocated Array4 is always in standard layout.
        let raw = rgb.as_raw();
        let tensor_data = tensor.as_slice_mut().unwrap();
        for (i, pixel) in raw.chunks_exact(3).enumerate() {
            let y = i / w;
            let x = i % w;
            // Only the configured number of channels is written; a shape
            // with fewer than 3 keeps the leading RGB channels.
            for (channel, &val) in pixel.iter().take(c).enumerate() {
                // NCHW layout: offset = channel * h * w + y * w + x
                let idx = channel * h * w + y * w + x;
                tensor_data[idx] = val as f32 / 255.0;
            }
        }

        tracing::debug!("Image preprocessed successfully: {}", image_path.display());
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn save_image(dir: &tempfile::TempDir, image: RgbImage, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        DynamicImage::ImageRgb8(image).save(&path).unwrap();
        path
    }

    #[test]
    fn test_preprocess_shape_matches_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_image(&dir, RgbImage::new(64, 48), "test.png");

        let pre = ImagePreprocessor::new(&[1, 3, 224, 224]);
        let tensor = pre.preprocess(&path).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_normalization_range() {
        let dir = tempfile::tempdir().unwrap();
        // White image (255) -> 1.0
        let path = save_image(
            &dir,
            RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])),
            "white.png",
        );
        let pre = ImagePreprocessor::new(&[1, 3, 8, 8]);
        let tensor = pre.preprocess(&path).unwrap();
        let max_val = tensor.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((max_val - 1.0).abs() < 0.01);

        // Black image (0) -> 0.0
        let path = save_image(
            &dir,
            RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])),
            "black.png",
        );
        let tensor = pre.preprocess(&path).unwrap();
        let min_val = tensor.iter().cloned().fold(f32::INFINITY, f32::min);
        assert!(min_val.abs() < 0.01);
    }

    #[test]
    fn test_preprocess_channel_layout() {
        let dir = tempfile::tempdir().unwrap();
        // Pure red: R channel 1.0, G and B 0.0 after normalization.
        let path = save_image(
            &dir,
            RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])),
            "red.png",
        );
        let pre = ImagePreprocessor::new(&[1, 3, 4, 4]);
        let tensor = pre.preprocess(&path).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);
        assert!(tensor[[0, 1, 0, 0]].abs() < 0.01);
        assert!(tensor[[0, 2, 0, 0]].abs() < 0.01);
    }

    #[test]
    fn test_preprocess_single_channel_shape() {
        // A 4-dimensional shape with one channel passes config validation;
        // the fill must stay inside the smaller buffer and keep channel 0.
        let dir = tempfile::tempdir().unwrap();
        let path = save_image(
            &dir,
            RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])),
            "red.png",
        );
        let pre = ImagePreprocessor::new(&[1, 1, 8, 8]);
        let tensor = pre.preprocess(&path).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 8, 8]);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_preprocess_unreadable_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");
        let pre = ImagePreprocessor::new(&[1, 3, 224, 224]);
        let err = pre.preprocess(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("failed to load image: {}", path.display())
        );
    }

    #[test]
    fn test_bad_shape_falls_back_to_default() {
        let pre = ImagePreprocessor::new(&[3, 224, 224]);
        assert_eq!(pre.input_shape, [1, 3, 224, 224]);
    }
}
