//! The structure analysis pipeline.
//!
//! decode → enhance → grayscale → Canny → external contours → bounding
//! boxes → annotate → detect. Every step is synchronous and CPU-bound;
//! async callers should run it on a blocking thread.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use sl_core::config::{AnalysisConfig, MAX_BOX_THICKNESS};
use sl_core::{Error, Result};
use utoipa::ToSchema;

use crate::annotate::draw_boxes;
use crate::contours::{bounding_rect, external_contours, BoundingBox};
use crate::detect::{DetectedObject, ObjectDetector};
use crate::edges::{detect_edges, to_grayscale};
use crate::enhance::enhance;

/// Tunable parameters for [`analyze_image`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    pub canny_low: f32,
    pub canny_high: f32,
    pub box_color: Rgb<u8>,
    pub box_thickness: u32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            canny_low: config.canny_low,
            canny_high: config.canny_high,
            box_color: Rgb(config.box_color),
            box_thickness: config.box_thickness.min(MAX_BOX_THICKNESS),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The enhanced image with every bounding box drawn on it.
    pub annotated: RgbImage,
    /// Number of external contours found.
    pub number_of_parts: usize,
    /// One box per contour, in contour order.
    pub bounding_boxes: Vec<BoundingBox>,
    pub detected_objects: Vec<DetectedObject>,
}

/// Serializable summary of an [`Analysis`] once the annotated image has been
/// written somewhere.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReport {
    /// File name of the annotated image.
    pub output_image: String,
    pub number_of_parts: usize,
    pub bounding_boxes: Vec<BoundingBox>,
    pub detected_objects: Vec<DetectedObject>,
}

impl Analysis {
    /// Drop the pixel data and keep the summary.
    pub fn into_report(self, output_image: impl Into<String>) -> AnalysisReport {
        AnalysisReport {
            output_image: output_image.into(),
            number_of_parts: self.number_of_parts,
            bounding_boxes: self.bounding_boxes,
            detected_objects: self.detected_objects,
        }
    }
}

/// Decode raw image bytes, rejecting anything the codecs cannot read.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(data).map_err(|e| {
        tracing::debug!("Image decode failed: {e}");
        Error::validation("Invalid image file")
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(Error::validation("Image has no pixels"));
    }

    Ok(img)
}

/// Run the full pipeline on a decoded image.
pub fn analyze_image(
    image: &DynamicImage,
    params: &AnalysisParams,
    detector: &dyn ObjectDetector,
) -> Analysis {
    let started = Instant::now();

    let enhanced = enhance(&image.to_rgb8());
    let gray = to_grayscale(&enhanced);
    let edges = detect_edges(&gray, params.canny_low, params.canny_high);

    let contours = external_contours(&edges);
    let bounding_boxes: Vec<BoundingBox> = contours.iter().filter_map(bounding_rect).collect();

    let mut annotated = enhanced.clone();
    draw_boxes(
        &mut annotated,
        &bounding_boxes,
        params.box_color,
        params.box_thickness,
    );

    let detected_objects = detector.detect(&enhanced);

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        parts = contours.len(),
        detector = detector.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Structure analysis finished"
    );

    Analysis {
        annotated,
        number_of_parts: contours.len(),
        bounding_boxes,
        detected_objects,
    }
}

/// Read an image from disk and run the pipeline on it.
pub fn analyze_file(
    path: &Path,
    params: &AnalysisParams,
    detector: &dyn ObjectDetector,
) -> Result<Analysis> {
    let data = std::fs::read(path)?;
    let image = decode_image(&data)?;
    Ok(analyze_image(&image, params, detector))
}
