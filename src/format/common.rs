//! Shared utilities for dataset format conversions.

use crate::geometry::{Point, Polygon, Rect, Size};

/// Metadata about a single frame in a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// The image or frame filename (e.g., "frame_000123.png").
    pub file_name: String,
    /// Frame dimensions in pixels.
    pub size: Size,
    /// Index of the frame within its source video, if any.
    pub frame_index: Option<u32>,
}

impl FrameInfo {
    pub fn new(file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            file_name: file_name.into(),
            size: Size::new(width, height),
            frame_index: None,
        }
    }

    /// Tag this frame with its position in the source video.
    pub fn with_frame_index(mut self, index: u32) -> Self {
        self.frame_index = Some(index);
        self
    }

    /// Base name (without extension) of the frame file.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .unwrap_or(&self.file_name)
    }
}

// ============================================================================
// Coordinate Conversion
// ============================================================================

/// Convert a box to normalized YOLO form (x_center, y_center, width,
/// height), all as fractions of the frame size.
pub fn rect_to_yolo(rect: &Rect, frame: Size) -> (f32, f32, f32, f32) {
    let fw = frame.width as f32;
    let fh = frame.height as f32;
    let x_center = (rect.x as f32 + rect.width as f32 / 2.0) / fw;
    let y_center = (rect.y as f32 + rect.height as f32 / 2.0) / fh;
    (x_center, y_center, rect.width as f32 / fw, rect.height as f32 / fh)
}

/// Convert normalized YOLO center form back to an integer box, clamped
/// so the top-left corner never goes negative.
pub fn yolo_to_rect(x_center: f32, y_center: f32, w: f32, h: f32, frame: Size) -> Rect {
    let width = (w * frame.width as f32).round();
    let height = (h * frame.height as f32).round();
    let x = (x_center * frame.width as f32 - width / 2.0).round().max(0.0);
    let y = (y_center * frame.height as f32 - height / 2.0).round().max(0.0);
    Rect::new(x as i32, y as i32, width.max(0.0) as u32, height.max(0.0) as u32)
}

/// Normalize polygon vertices to [0, 1] fractions of the frame size.
pub fn normalize_polygon(poly: &Polygon, frame: Size) -> Vec<(f32, f32)> {
    poly.vertices
        .iter()
        .map(|p| {
            (
                p.x as f32 / frame.width as f32,
                p.y as f32 / frame.height as f32,
            )
        })
        .collect()
}

/// Build a closed polygon from normalized [0, 1] vertex fractions,
/// clamped to non-negative pixel coordinates.
pub fn denormalize_polygon(coords: &[(f32, f32)], frame: Size) -> Polygon {
    let vertices = coords
        .iter()
        .map(|&(x, y)| {
            Point::new(
                (x * frame.width as f32).round().max(0.0) as i32,
                (y * frame.height as f32).round().max(0.0) as i32,
            )
        })
        .collect();
    Polygon::closed_from(vertices)
}
