//! Bordered preview crops around an object's bounding box.
//!
//! When an object is opened for preview or editing, the crop shown is the
//! object's box plus a margin of context. Each side of the margin clamps
//! independently to the frame edge, and the per-side insets are reported
//! back so the object can be re-located inside the crop.

use crate::constants::MIN_PREVIEW_BORDER;
use crate::geometry::{Point, Rect, Size};

/// Per-side margins actually applied around an object's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderInsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// An object's box expanded by clamped insets, plus the insets themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderedRegion {
    /// The expanded crop rectangle, in original space, always inside the
    /// frame.
    pub rect: Rect,
    /// The margins that were actually applied on each side.
    pub insets: BorderInsets,
}

impl BorderedRegion {
    /// Position of the object's top-left corner inside the crop.
    pub fn object_position(&self) -> Point {
        Point::new(self.insets.left as i32, self.insets.top as i32)
    }
}

/// Expand `object` by `border_px` on every side, clamping each side
/// independently so the result never leaves the frame.
///
/// A requested border below [`MIN_PREVIEW_BORDER`] is clamped up. An
/// object touching a frame edge gets a zero inset on that side; an object
/// close to an edge gets exactly the available margin.
pub fn bordered_region(object: Rect, frame: Size, border_px: u32) -> BorderedRegion {
    let border = border_px.max(MIN_PREVIEW_BORDER);

    let left = border.min(object.x.max(0) as u32);
    let top = border.min(object.y.max(0) as u32);
    let right = border.min((frame.width as i64 - object.right() as i64).max(0) as u32);
    let bottom = border.min((frame.height as i64 - object.bottom() as i64).max(0) as u32);

    BorderedRegion {
        rect: Rect::new(
            object.x - left as i32,
            object.y - top as i32,
            object.width + left + right,
            object.height + top + bottom,
        ),
        insets: BorderInsets {
            left,
            top,
            right,
            bottom,
        },
    }
}
