//! Global constants for the Pixie editing core.

/// Blend coefficient for mask overlays, as a numerator over 255.
///
/// 120/255 keeps the underlying image readable while the segmented
/// region stays clearly visible.
pub const DEFAULT_BLEND_ALPHA: u8 = 120;

/// Minimum border, in pixels, around an object's box when building a
/// preview crop. Requested borders below this are clamped up.
pub const MIN_PREVIEW_BORDER: u32 = 2;

/// Zoom multipliers selectable by the resize mapper, in ascending order.
///
/// The mapper steps through this table by index, so an increment followed
/// by a decrement restores the exact previous scale.
pub const ZOOM_FACTORS: &[f64] = &[
    0.125, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0, 4.0, 6.0, 8.0,
];

/// Index of the neutral (1.0) entry in [`ZOOM_FACTORS`].
pub const NEUTRAL_ZOOM_INDEX: usize = 4;

/// Colors never assigned to objects: UI chrome and the selection
/// highlight must stay distinguishable from every object overlay.
pub const RESERVED_COLORS: &[[u8; 3]] = &[[0, 0, 0], [255, 255, 255], [255, 0, 0]];

/// Attempts the color resolver makes before reporting the palette
/// as exhausted.
pub const MAX_COLOR_ATTEMPTS: usize = 64;

/// Default bound on undo history depth per editing session.
pub const DEFAULT_UNDO_DEPTH: usize = 100;
