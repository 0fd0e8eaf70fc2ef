//! Translucent object overlays on display bitmaps.
//!
//! The preview dialogs tint every pixel a segmented object owns with the
//! object's color, blended over the displayed bitmap with fixed-point
//! alpha arithmetic. The bitmap is in display space; the label mask is in
//! original space, so each display pixel is mapped back through the
//! resize mapper before the mask lookup. Pixels that map outside the mask
//! are skipped rather than indexed.

use image::RgbaImage;

use crate::geometry::{Point, Rect};
use crate::mask::LabelMask;
use crate::palette::Rgb8;
use crate::zoom::ResizeMapper;

/// Blend one channel: `fg * alpha + bg * (1 - alpha)` in fixed point,
/// truncated.
fn blend_channel(fg: u8, bg: u8, alpha: u8) -> u8 {
    ((fg as u32 * alpha as u32 + bg as u32 * (255 - alpha as u32)) / 255) as u8
}

/// Tint the labeled pixels of `mask` onto `bitmap` with `color`.
///
/// * `bitmap` - the displayed image, display space.
/// * `region` - display-space rectangle to touch (clipped to the bitmap).
/// * `mask` - per-pixel labels, original space; entries > 0 are tinted.
/// * `mask_origin` - original-space position of the mask's `(0, 0)` (the
///   crop origin for masks sized to a bordered preview).
/// * `mapper` - the display↔original mapping in effect.
/// * `alpha` - blend numerator over 255.
///
/// Returns the number of pixels written.
pub fn blend_mask_overlay(
    bitmap: &mut RgbaImage,
    region: Rect,
    mask: &LabelMask,
    mask_origin: Point,
    mapper: &ResizeMapper,
    color: Rgb8,
    alpha: u8,
) -> usize {
    let bounds = Rect::new(0, 0, bitmap.width(), bitmap.height());
    let Some(clipped) = region.intersect(&bounds) else {
        return 0;
    };

    let mut written = 0;
    for dy in clipped.y..clipped.bottom() {
        for dx in clipped.x..clipped.right() {
            let original = mapper.to_original_point(Point::new(dx, dy));
            let mx = original.x - mask_origin.x;
            let my = original.y - mask_origin.y;
            if !mask.is_labeled(mx, my) {
                continue;
            }
            let pixel = bitmap.get_pixel_mut(dx as u32, dy as u32);
            for c in 0..3 {
                pixel.0[c] = blend_channel(color[c], pixel.0[c], alpha);
            }
            written += 1;
        }
    }
    written
}
