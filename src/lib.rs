//! Pixie core: the portable heart of the Pixie image/video annotation
//! tool.
//!
//! Pixie lets users draw bounding boxes, polygons, and scribble-seeded
//! segmentation masks over frames, attach semantic attributes to each
//! object, and export the results for ML training pipelines. This crate
//! is everything under the GUI: geometry and coordinate mapping between
//! original frame pixels and the display, bordered preview crops, mask
//! overlay compositing, object color management, per-frame editing
//! sessions with undo, and dataset export/import (YOLO, COCO, Pascal
//! VOC, `.npy` masks).
//!
//! The GUI layer (dialogs, event loops, file choosers) and the external
//! segmentation algorithm live elsewhere and call in through plain
//! functions taking explicit state.

pub mod blend;
pub mod border;
pub mod config;
pub mod constants;
pub mod format;
pub mod geometry;
pub mod mask;
pub mod model;
pub mod ops;
pub mod palette;
pub mod session;
pub mod undo;
pub mod zoom;

pub use blend::blend_mask_overlay;
pub use border::{BorderInsets, BorderedRegion, bordered_region};
pub use config::{EditorConfig, EditorPreferences};
pub use geometry::{Point, Polygon, Rect, Size};
pub use mask::LabelMask;
pub use model::{LabeledObject, ObjectShape, ShapeKind};
pub use palette::{PaletteError, Rgb8};
pub use session::FrameSession;
pub use zoom::{MapperError, ResizeMapper};
