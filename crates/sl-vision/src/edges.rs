//! Grayscale conversion and Canny edge detection.

use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::edges::canny;

/// Collapse an RGB image to a single luma plane.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    DynamicImage::ImageRgb8(image.clone()).to_luma8()
}

/// Detect edges using the Canny detector.
///
/// Output pixels are either 0 or 255. The thresholds may be given in either
/// order; the smaller one is used as the hysteresis low bound.
pub fn detect_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (low, high) = if low_threshold > high_threshold {
        tracing::debug!(low_threshold, high_threshold, "Swapping inverted Canny thresholds");
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };
    canny(image, low, high)
}
