use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const BOX_THICKNESS: u32 = 2;

/// Draws a hollow rectangle for each box onto a copy of the frame.
///
/// Single-channel frames (e.g. edge maps) are promoted to RGB so the
/// overlay color survives. Returns `None` for unsupported channel counts.
pub fn annotate(frame: &Frame, boxes: &[BoundingBox]) -> Option<Frame> {
    let mut canvas = frame.to_dynamic_image()?.to_rgb8();
    for bbox in boxes {
        for inset in 0..BOX_THICKNESS {
            let w = bbox.width().saturating_sub(2 * inset);
            let h = bbox.height().saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at((bbox.x1() + inset) as i32, (bbox.y1() + inset) as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }
    }
    Some(Frame::from_rgb_image(canvas, frame.index()))
}
