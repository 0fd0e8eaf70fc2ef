//! Per-frame editing session.
//!
//! A [`FrameSession`] owns the objects annotated on one frame: it hands
//! out ids, keeps overlay colors collision-free against the frame's color
//! registry, clamps committed boxes to the frame, and records every
//! mutation for undo/redo. All state is explicit; nothing here reaches
//! for globals, so a session is as testable as the pure helpers it
//! composes.

use std::collections::{BTreeMap, HashSet};

use image::RgbaImage;

use crate::blend::blend_mask_overlay;
use crate::border::{BorderedRegion, bordered_region};
use crate::constants::{DEFAULT_UNDO_DEPTH, RESERVED_COLORS};
use crate::geometry::{Rect, Size};
use crate::model::{LabeledObject, ObjectShape};
use crate::palette::{PaletteError, Rgb8, object_color, resolve_color};
use crate::undo::{Command, UndoStack};
use crate::zoom::ResizeMapper;

/// All annotation state for a single frame.
#[derive(Debug, Clone)]
pub struct FrameSession {
    frame: Size,
    /// Ordered by id so iteration (and thus export output) is stable.
    objects: BTreeMap<u32, LabeledObject>,
    next_id: u32,
    undo: UndoStack,
}

impl FrameSession {
    pub fn new(frame: Size) -> Self {
        Self::with_undo_depth(frame, DEFAULT_UNDO_DEPTH)
    }

    pub fn with_undo_depth(frame: Size, depth: usize) -> Self {
        Self {
            frame,
            objects: BTreeMap::new(),
            next_id: 1,
            undo: UndoStack::new(depth),
        }
    }

    pub fn frame_size(&self) -> Size {
        self.frame
    }

    // ------------------------------------------------------------------
    // Object accounting
    // ------------------------------------------------------------------

    /// Add an object with an automatically assigned, collision-free
    /// color. Returns the new object's id.
    pub fn add_object(
        &mut self,
        label: impl Into<String>,
        shape: ObjectShape,
    ) -> Result<u32, PaletteError> {
        let id = self.next_id;
        let candidate = object_color(id);
        self.add_object_with_color(label, shape, candidate)
    }

    /// Add an object with a preferred color; the color is still resolved
    /// against the frame's registry and the reserved palette.
    pub fn add_object_with_color(
        &mut self,
        label: impl Into<String>,
        shape: ObjectShape,
        color: Rgb8,
    ) -> Result<u32, PaletteError> {
        let color = resolve_color(color, &self.used_colors(), RESERVED_COLORS)?;
        let id = self.next_id;
        self.next_id += 1;

        let object = LabeledObject::new(id, label, color, shape);
        self.undo.push(Command::AddObject {
            object: object.clone(),
        });
        self.objects.insert(id, object);
        log::debug!("added object {id} with color {color:?}");
        Ok(id)
    }

    /// Remove an object, returning it.
    pub fn remove_object(&mut self, id: u32) -> Option<LabeledObject> {
        let object = self.objects.remove(&id)?;
        self.undo.push(Command::RemoveObject {
            object: object.clone(),
        });
        Some(object)
    }

    pub fn get(&self, id: u32) -> Option<&LabeledObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &LabeledObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Colors currently assigned in this frame.
    pub fn used_colors(&self) -> HashSet<Rgb8> {
        self.objects.values().map(|o| o.color).collect()
    }

    /// Resolve a candidate color against this frame's registry and the
    /// reserved palette, without assigning it.
    pub fn resolve_candidate(&self, candidate: Rgb8) -> Result<Rgb8, PaletteError> {
        resolve_color(candidate, &self.used_colors(), RESERVED_COLORS)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Commit an edited bounding box back onto a box-shaped object,
    /// clamped to the frame. Returns the clamped rect, or `None` if the
    /// object is missing or not box-shaped.
    pub fn commit_box(&mut self, id: u32, rect: Rect) -> Option<Rect> {
        let object = self.objects.get_mut(&id)?;
        let ObjectShape::BBox(old) = object.shape else {
            return None;
        };
        let clamped = rect.clamp_to(self.frame);
        object.shape = ObjectShape::BBox(clamped);
        self.undo.push(Command::ModifyShape {
            object_id: id,
            old_shape: ObjectShape::BBox(old),
            new_shape: ObjectShape::BBox(clamped),
        });
        Some(clamped)
    }

    /// Replace an object's shape. Returns false if the object is missing.
    pub fn update_shape(&mut self, id: u32, shape: ObjectShape) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        let old_shape = std::mem::replace(&mut object.shape, shape.clone());
        self.undo.push(Command::ModifyShape {
            object_id: id,
            old_shape,
            new_shape: shape,
        });
        true
    }

    /// Set a semantic attribute on an object. Attribute edits are
    /// metadata, not geometry, and are not recorded in the undo history.
    /// Returns false if the object is missing.
    pub fn set_attribute(
        &mut self,
        id: u32,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        object.attributes.insert(key.into(), value.into());
        true
    }

    /// Set an object's overlay color. The caller resolves collisions
    /// first (see [`resolve_candidate`](Self::resolve_candidate)).
    /// Returns false if the object is missing.
    pub fn set_color(&mut self, id: u32, color: Rgb8) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        let old_color = std::mem::replace(&mut object.color, color);
        self.undo.push(Command::ModifyColor {
            object_id: id,
            old_color,
            new_color: color,
        });
        true
    }

    // ------------------------------------------------------------------
    // Previews
    // ------------------------------------------------------------------

    /// Bordered preview crop for an object, in original space.
    pub fn bordered_preview(&self, id: u32, border_px: u32) -> Option<BorderedRegion> {
        let object = self.objects.get(&id)?;
        Some(bordered_region(
            object.shape.outer_box(),
            self.frame,
            border_px,
        ))
    }

    /// Tint an object's segmentation mask onto a display bitmap. A no-op
    /// (returning 0) for objects without a pixel mask.
    pub fn render_object_overlay(
        &self,
        id: u32,
        bitmap: &mut RgbaImage,
        mapper: &ResizeMapper,
        alpha: u8,
    ) -> usize {
        let Some(object) = self.objects.get(&id) else {
            return 0;
        };
        let (Some(mask), Some(origin)) = (object.shape.mask(), object.shape.mask_origin()) else {
            return 0;
        };
        let region = mapper.to_display_rect(object.shape.outer_box());
        blend_mask_overlay(bitmap, region, mask, origin, mapper, object.color, alpha)
    }

    // ------------------------------------------------------------------
    // Undo / Redo
    // ------------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Reverse the most recent edit. Returns false with empty history.
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.undo.pop_undo() else {
            return false;
        };
        match cmd {
            Command::AddObject { object } => {
                self.objects.remove(&object.id);
            }
            Command::RemoveObject { object } => {
                self.objects.insert(object.id, object);
            }
            Command::ModifyShape {
                object_id,
                old_shape,
                ..
            } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.shape = old_shape;
                }
            }
            Command::ModifyColor {
                object_id,
                old_color,
                ..
            } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.color = old_color;
                }
            }
        }
        true
    }

    /// Re-apply the most recently undone edit. Returns false with empty
    /// redo history.
    pub fn redo(&mut self) -> bool {
        let Some(cmd) = self.undo.pop_redo() else {
            return false;
        };
        match cmd {
            Command::AddObject { object } => {
                self.objects.insert(object.id, object);
            }
            Command::RemoveObject { object } => {
                self.objects.remove(&object.id);
            }
            Command::ModifyShape {
                object_id,
                new_shape,
                ..
            } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.shape = new_shape;
                }
            }
            Command::ModifyColor {
                object_id,
                new_color,
                ..
            } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.color = new_color;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_BLEND_ALPHA;
    use crate::mask::LabelMask;

    const FRAME: Size = Size::new(640, 480);

    fn bbox(x: i32, y: i32, w: u32, h: u32) -> ObjectShape {
        ObjectShape::BBox(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_add_and_remove() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(10, 10, 50, 50)).unwrap();

        assert_eq!(session.len(), 1);
        assert_eq!(session.get(id).unwrap().label, "car");

        let removed = session.remove_object(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(session.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut session = FrameSession::new(FRAME);
        let a = session.add_object("a", bbox(0, 0, 5, 5)).unwrap();
        let b = session.add_object("b", bbox(0, 0, 5, 5)).unwrap();
        session.remove_object(a);
        let c = session.add_object("c", bbox(0, 0, 5, 5)).unwrap();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn test_colors_stay_unique_and_unreserved() {
        let mut session = FrameSession::new(FRAME);
        for i in 0..20 {
            session
                .add_object(format!("obj{i}"), bbox(0, 0, 5, 5))
                .unwrap();
        }

        let colors = session.used_colors();
        assert_eq!(colors.len(), 20);
        for reserved in RESERVED_COLORS {
            assert!(!colors.contains(reserved));
        }
    }

    #[test]
    fn test_preferred_color_collision_is_resolved() {
        let mut session = FrameSession::new(FRAME);
        let a = session
            .add_object_with_color("a", bbox(0, 0, 5, 5), [10, 200, 50])
            .unwrap();
        let b = session
            .add_object_with_color("b", bbox(0, 0, 5, 5), [10, 200, 50])
            .unwrap();
        assert_ne!(session.get(a).unwrap().color, session.get(b).unwrap().color);
    }

    #[test]
    fn test_commit_box_clamps_to_frame() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(10, 10, 50, 50)).unwrap();

        let committed = session.commit_box(id, Rect::new(620, 460, 50, 50)).unwrap();
        assert_eq!(committed, Rect::new(590, 430, 50, 50));
        assert_eq!(session.get(id).unwrap().shape.outer_box(), committed);
    }

    #[test]
    fn test_commit_box_rejects_non_box_shapes() {
        let mut session = FrameSession::new(FRAME);
        let id = session
            .add_object(
                "blob",
                ObjectShape::Scribble {
                    bounds: Rect::new(0, 0, 10, 10),
                    mask: LabelMask::new(Size::new(10, 10)),
                },
            )
            .unwrap();
        assert_eq!(session.commit_box(id, Rect::new(0, 0, 5, 5)), None);
    }

    #[test]
    fn test_undo_redo_add() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(10, 10, 50, 50)).unwrap();

        assert!(session.undo());
        assert!(session.get(id).is_none());

        assert!(session.redo());
        assert_eq!(session.get(id).unwrap().label, "car");
    }

    #[test]
    fn test_undo_redo_shape_edit() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(10, 10, 50, 50)).unwrap();
        session.commit_box(id, Rect::new(20, 20, 40, 40));

        assert!(session.undo());
        assert_eq!(
            session.get(id).unwrap().shape.outer_box(),
            Rect::new(10, 10, 50, 50)
        );

        assert!(session.redo());
        assert_eq!(
            session.get(id).unwrap().shape.outer_box(),
            Rect::new(20, 20, 40, 40)
        );
    }

    #[test]
    fn test_undo_redo_color_edit() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(0, 0, 5, 5)).unwrap();
        let original = session.get(id).unwrap().color;

        let next = session.resolve_candidate([42, 99, 200]).unwrap();
        assert!(session.set_color(id, next));
        assert_eq!(session.get(id).unwrap().color, next);

        assert!(session.undo());
        assert_eq!(session.get(id).unwrap().color, original);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut session = FrameSession::new(FRAME);
        assert!(!session.undo());
        assert!(!session.redo());
    }

    #[test]
    fn test_bordered_preview() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(100, 100, 50, 40)).unwrap();

        let region = session.bordered_preview(id, 20).unwrap();
        assert_eq!(region.rect, Rect::new(80, 80, 90, 80));
        assert!(session.bordered_preview(999, 20).is_none());
    }

    #[test]
    fn test_overlay_noop_without_mask() {
        let mut session = FrameSession::new(FRAME);
        let id = session.add_object("car", bbox(0, 0, 4, 4)).unwrap();
        let mut bitmap = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]));

        let written = session.render_object_overlay(
            id,
            &mut bitmap,
            &ResizeMapper::identity(),
            DEFAULT_BLEND_ALPHA,
        );
        assert_eq!(written, 0);
    }

    #[test]
    fn test_overlay_renders_scribble_mask() {
        let mut session = FrameSession::new(FRAME);
        let mut mask = LabelMask::new(Size::new(4, 4));
        mask.fill_rect(Rect::new(0, 0, 4, 4), 1);
        let id = session
            .add_object(
                "blob",
                ObjectShape::Scribble {
                    bounds: Rect::new(2, 2, 4, 4),
                    mask,
                },
            )
            .unwrap();

        let mut bitmap = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]));
        let written = session.render_object_overlay(
            id,
            &mut bitmap,
            &ResizeMapper::identity(),
            DEFAULT_BLEND_ALPHA,
        );
        assert_eq!(written, 16);

        // A pixel inside the object's bounds got tinted.
        let color = session.get(id).unwrap().color;
        let expected_r = (color[0] as u32 * DEFAULT_BLEND_ALPHA as u32 / 255) as u8;
        assert_eq!(bitmap.get_pixel(3, 3).0[0], expected_r);
        // And one outside stayed black.
        assert_eq!(bitmap.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
