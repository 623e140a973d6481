//! sl-vision: the structure analysis pipeline.
//!
//! Contrast enhancement in Lab space, Canny edge detection, external contour
//! extraction, bounding-box annotation, and a placeholder object detector,
//! wired together by [`pipeline::analyze_image`].

pub mod annotate;
pub mod contours;
pub mod detect;
pub mod edges;
pub mod enhance;
pub mod pipeline;

pub use contours::BoundingBox;
pub use detect::{DetectedObject, ObjectDetector, PlaceholderDetector};
pub use pipeline::{
    analyze_file, analyze_image, decode_image, Analysis, AnalysisParams, AnalysisReport,
};
