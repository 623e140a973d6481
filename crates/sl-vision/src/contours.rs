//! External contour extraction and bounding rectangles.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Axis-aligned bounding box of a contour, in pixels.
///
/// `width` and `height` count pixels inclusively, so a single-pixel contour
/// has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Find the outermost contours of the foreground (non-zero) pixels.
///
/// Holes and every border nested inside another contour are discarded.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

/// Compute the bounding box of a contour's points.
///
/// Returns `None` for a contour without points.
pub fn bounding_rect(contour: &Contour<i32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(BoundingBox {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}
