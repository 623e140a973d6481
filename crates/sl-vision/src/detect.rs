//! Object detection.
//!
//! There is no trained model behind this yet: [`PlaceholderDetector`] reports
//! the same three structural elements for every image so clients can be built
//! against the final response shape.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A detected object in the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectedObject {
    /// Object label/class
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl DetectedObject {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Something that can label objects in an enhanced image.
pub trait ObjectDetector: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn detect(&self, image: &RgbImage) -> Vec<DetectedObject>;
}

/// Fixed-output detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderDetector;

impl ObjectDetector for PlaceholderDetector {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn detect(&self, _image: &RgbImage) -> Vec<DetectedObject> {
        vec![
            DetectedObject::new("Window", 0.95),
            DetectedObject::new("Door", 0.90),
            DetectedObject::new("Beam", 0.85),
        ]
    }
}
