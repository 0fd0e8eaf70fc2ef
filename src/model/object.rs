//! Labeled-object data model.
//!
//! An object is one annotated thing in a frame: a box, a polygon outline,
//! or a scribble-seeded segmentation with a per-pixel mask. The shape is
//! an explicit sum type with capability queries, so callers branch on
//! what a shape *can do* rather than on what it *is*.

use std::collections::HashMap;

use crate::geometry::{Point, Polygon, Rect};
use crate::mask::LabelMask;
use crate::palette::Rgb8;

/// Discriminant of an [`ObjectShape`], for format-support checks and
/// statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    BBox,
    Polygon,
    Scribble,
}

/// Geometry of a labeled object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// An axis-aligned bounding box.
    BBox(Rect),
    /// A polygon outline.
    Polygon(Polygon),
    /// A scribble-segmented object: crop bounds plus the per-pixel mask
    /// produced by the segmentation step. The mask's `(0, 0)` sits at
    /// `bounds`' top-left corner, and both live in original space.
    Scribble { bounds: Rect, mask: LabelMask },
}

impl ObjectShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ObjectShape::BBox(_) => ShapeKind::BBox,
            ObjectShape::Polygon(_) => ShapeKind::Polygon,
            ObjectShape::Scribble { .. } => ShapeKind::Scribble,
        }
    }

    /// The outer bounding box. Every shape has one; an empty polygon
    /// collapses to a zero-size box at the origin.
    pub fn outer_box(&self) -> Rect {
        match self {
            ObjectShape::BBox(rect) => *rect,
            ObjectShape::Polygon(poly) => {
                poly.bounding_box().unwrap_or(Rect::new(0, 0, 0, 0))
            }
            ObjectShape::Scribble { bounds, .. } => *bounds,
        }
    }

    /// True for shapes carrying a polygon outline.
    pub fn has_polygon(&self) -> bool {
        matches!(self, ObjectShape::Polygon(_))
    }

    /// True for shapes carrying a per-pixel mask.
    pub fn has_pixel_mask(&self) -> bool {
        matches!(self, ObjectShape::Scribble { .. })
    }

    /// The per-pixel mask, where one exists.
    pub fn mask(&self) -> Option<&LabelMask> {
        match self {
            ObjectShape::Scribble { mask, .. } => Some(mask),
            _ => None,
        }
    }

    pub fn mask_mut(&mut self) -> Option<&mut LabelMask> {
        match self {
            ObjectShape::Scribble { mask, .. } => Some(mask),
            _ => None,
        }
    }

    /// Original-space position of the mask's `(0, 0)`, where a mask
    /// exists.
    pub fn mask_origin(&self) -> Option<Point> {
        match self {
            ObjectShape::Scribble { bounds, .. } => Some(bounds.top_left()),
            _ => None,
        }
    }
}

/// One annotated object in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledObject {
    /// Session-unique id, also used as the mask label value.
    pub id: u32,
    /// Class name, e.g. "car" or "pedestrian".
    pub label: String,
    /// Overlay color, unique within the frame.
    pub color: Rgb8,
    pub shape: ObjectShape,
    /// Free-form semantic attributes ("occluded" = "true", ...).
    pub attributes: HashMap<String, String>,
}

impl LabeledObject {
    pub fn new(id: u32, label: impl Into<String>, color: Rgb8, shape: ObjectShape) -> Self {
        Self {
            id,
            label: label.into(),
            color,
            shape,
            attributes: HashMap::new(),
        }
    }

    /// Attach a semantic attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
