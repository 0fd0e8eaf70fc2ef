//! Scale mapping between original frame pixels and display pixels.
//!
//! Every preview dialog renders a region of the source frame at some
//! scale, draws overlays in display space, and maps pointer positions
//! back to original pixels. [`ResizeMapper`] owns that mapping: a pair of
//! base scale factors (independent per axis, so a fit-to-panel resize can
//! distort) and an integer zoom index into [`ZOOM_FACTORS`].
//!
//! Stepping the index is exact by construction: zoom in then out restores
//! the previous scale bit-for-bit. The limit checks are plain boolean
//! guards the caller consults before stepping; stepping itself never
//! fails, it saturates at the table ends.

use thiserror::Error;

use crate::constants::{NEUTRAL_ZOOM_INDEX, ZOOM_FACTORS};
use crate::geometry::{Point, Polygon, Rect, Size};

/// Errors from constructing a mapper with unusable scale factors.
#[derive(Debug, Error, PartialEq)]
pub enum MapperError {
    /// Scale factors must be finite and strictly positive.
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidScale(f64),

    /// Fitting requires nonzero source and target dimensions.
    #[error("cannot derive a scale from an empty size ({width}x{height})")]
    EmptySize { width: u32, height: u32 },
}

/// Maps geometry between original space and display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMapper {
    /// Scale at the neutral zoom step, X axis.
    base_x: f64,
    /// Scale at the neutral zoom step, Y axis.
    base_y: f64,
    /// Index into [`ZOOM_FACTORS`].
    zoom: usize,
}

impl ResizeMapper {
    /// Create a mapper with explicit per-axis base scales, starting at
    /// the neutral zoom step.
    pub fn new(scale_x: f64, scale_y: f64) -> Result<Self, MapperError> {
        for s in [scale_x, scale_y] {
            if !s.is_finite() || s <= 0.0 {
                return Err(MapperError::InvalidScale(s));
            }
        }
        Ok(Self {
            base_x: scale_x,
            base_y: scale_y,
            zoom: NEUTRAL_ZOOM_INDEX,
        })
    }

    /// 1:1 mapping at the neutral zoom step.
    pub fn identity() -> Self {
        Self {
            base_x: 1.0,
            base_y: 1.0,
            zoom: NEUTRAL_ZOOM_INDEX,
        }
    }

    /// Derive per-axis base scales that map `original` onto `target`
    /// exactly (aspect ratio is not preserved; the preview panel decides
    /// its own shape).
    pub fn fit(original: Size, target: Size) -> Result<Self, MapperError> {
        if original.is_empty() {
            return Err(MapperError::EmptySize {
                width: original.width,
                height: original.height,
            });
        }
        if target.is_empty() {
            return Err(MapperError::EmptySize {
                width: target.width,
                height: target.height,
            });
        }
        Self::new(
            target.width as f64 / original.width as f64,
            target.height as f64 / original.height as f64,
        )
    }

    // ------------------------------------------------------------------
    // Scale state
    // ------------------------------------------------------------------

    /// Current zoom multiplier relative to the neutral step.
    pub fn zoom_multiplier(&self) -> f64 {
        ZOOM_FACTORS[self.zoom]
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom
    }

    /// Effective original→display scale on the X axis.
    pub fn scale_x(&self) -> f64 {
        self.base_x * ZOOM_FACTORS[self.zoom]
    }

    /// Effective original→display scale on the Y axis.
    pub fn scale_y(&self) -> f64 {
        self.base_y * ZOOM_FACTORS[self.zoom]
    }

    /// Display dimensions of an original-space size at the current scale.
    pub fn display_size(&self, original: Size) -> Size {
        Size::new(
            (original.width as f64 * self.scale_x()).floor() as u32,
            (original.height as f64 * self.scale_y()).floor() as u32,
        )
    }

    // ------------------------------------------------------------------
    // Zoom stepping
    // ------------------------------------------------------------------

    /// True unless the next zoom step would push the display size of
    /// `original` past `screen` in either dimension, or the factor table
    /// is exhausted. Check before calling [`step_zoom`](Self::step_zoom)
    /// with a positive delta.
    pub fn can_zoom_in(&self, original: Size, screen: Size) -> bool {
        let Some(next) = self.at_index(self.zoom + 1) else {
            return false;
        };
        screen.fits(next.display_size(original))
    }

    /// True unless the next zoom step would shrink the display size of
    /// `original` below one pixel in either dimension, or the factor
    /// table is exhausted.
    pub fn can_zoom_out(&self, original: Size) -> bool {
        if self.zoom == 0 {
            return false;
        }
        let Some(next) = self.at_index(self.zoom - 1) else {
            return false;
        };
        !next.display_size(original).is_empty()
    }

    /// Move the zoom index one step in the direction of `delta` and
    /// return the new zoom multiplier. Saturates at the table ends; a
    /// zero delta is a no-op. The caller is responsible for honoring the
    /// `can_zoom_*` guards first.
    pub fn step_zoom(&mut self, delta: i32) -> f64 {
        let next = match delta.signum() {
            1 => (self.zoom + 1).min(ZOOM_FACTORS.len() - 1),
            -1 => self.zoom.saturating_sub(1),
            _ => self.zoom,
        };
        self.zoom = next;
        self.zoom_multiplier()
    }

    /// Step one zoom level in. See [`step_zoom`](Self::step_zoom).
    pub fn zoom_in(&mut self) -> f64 {
        self.step_zoom(1)
    }

    /// Step one zoom level out. See [`step_zoom`](Self::step_zoom).
    pub fn zoom_out(&mut self) -> f64 {
        self.step_zoom(-1)
    }

    /// Copy of this mapper at a different zoom index, if in range.
    fn at_index(&self, index: usize) -> Option<Self> {
        (index < ZOOM_FACTORS.len()).then_some(Self {
            base_x: self.base_x,
            base_y: self.base_y,
            zoom: index,
        })
    }

    // ------------------------------------------------------------------
    // Coordinate mapping
    // ------------------------------------------------------------------

    /// Map an original-space point to display space.
    pub fn to_display_point(&self, p: Point) -> Point {
        Point::new(
            (p.x as f64 * self.scale_x()).floor() as i32,
            (p.y as f64 * self.scale_y()).floor() as i32,
        )
    }

    /// Map a display-space point back to original space.
    pub fn to_original_point(&self, p: Point) -> Point {
        Point::new(
            (p.x as f64 / self.scale_x()).floor() as i32,
            (p.y as f64 / self.scale_y()).floor() as i32,
        )
    }

    /// Map an original-space rectangle to display space. Position and
    /// size scale independently, so a sequence of mapped rects stays
    /// consistent with mapped points.
    pub fn to_display_rect(&self, r: Rect) -> Rect {
        let pos = self.to_display_point(r.top_left());
        Rect::new(
            pos.x,
            pos.y,
            (r.width as f64 * self.scale_x()).floor() as u32,
            (r.height as f64 * self.scale_y()).floor() as u32,
        )
    }

    /// Map a display-space rectangle back to original space.
    pub fn to_original_rect(&self, r: Rect) -> Rect {
        let pos = self.to_original_point(r.top_left());
        Rect::new(
            pos.x,
            pos.y,
            (r.width as f64 / self.scale_x()).floor() as u32,
            (r.height as f64 / self.scale_y()).floor() as u32,
        )
    }

    /// Map every vertex of a polygon to display space.
    pub fn to_display_polygon(&self, poly: &Polygon) -> Polygon {
        Polygon {
            vertices: poly
                .vertices
                .iter()
                .map(|&p| self.to_display_point(p))
                .collect(),
            closed: poly.closed,
        }
    }

    /// Map every vertex of a polygon back to original space.
    pub fn to_original_polygon(&self, poly: &Polygon) -> Polygon {
        Polygon {
            vertices: poly
                .vertices
                .iter()
                .map(|&p| self.to_original_point(p))
                .collect(),
            closed: poly.closed,
        }
    }
}

impl Default for ResizeMapper {
    fn default() -> Self {
        Self::identity()
    }
}
