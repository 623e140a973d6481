//! Drawing detected bounding boxes onto an image.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::contours::BoundingBox;

/// Draw each box as a hollow rectangle `thickness` pixels wide.
///
/// The innermost ring traces the box's own border pixels; extra rings grow
/// outward. Anything past the image edge is clipped, so rings are never drawn
/// further out than the canvas reaches.
pub fn draw_boxes(canvas: &mut RgbImage, boxes: &[BoundingBox], color: Rgb<u8>, thickness: u32) {
    let (width, height) = canvas.dimensions();
    let thickness = thickness.min(width.max(height));

    for bbox in boxes {
        if bbox.width == 0 || bbox.height == 0 {
            continue;
        }
        for t in 0..thickness {
            let x = i64::from(bbox.x) - i64::from(t);
            let y = i64::from(bbox.y) - i64::from(t);
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                break;
            };
            let rect = Rect::at(x, y).of_size(
                bbox.width.saturating_add(t.saturating_mul(2)),
                bbox.height.saturating_add(t.saturating_mul(2)),
            );
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}
