//! Dataset export/import for ML training pipelines.
//!
//! Supported formats:
//!
//! - **YOLO**: one `.txt` per frame plus `classes.txt` (detection and
//!   segmentation variants)
//! - **COCO**: a single JSON file for the whole dataset
//! - **Pascal VOC**: one XML file per frame, bounding boxes only
//! - **`.npy` masks**: per-object label masks as NumPy arrays (see
//!   [`mask_npy`])
//!
//! All formats implement the [`AnnotationFormat`] trait, which is
//! dataset-oriented: export takes every frame at once (formats share
//! class lists across frames), import produces per-frame sessions.
//! Conversion is string-level; file I/O belongs to the caller.
//!
//! Class ids are derived from the sorted set of distinct object labels,
//! so the same dataset always exports with the same class numbering.

mod common;
mod error;

mod coco;
pub mod mask_npy;
mod voc;
mod yolo;

pub use coco::CocoFormat;
pub use common::{
    FrameInfo, denormalize_polygon, normalize_polygon, rect_to_yolo, yolo_to_rect,
};
pub use error::FormatError;
pub use voc::VocFormat;
pub use yolo::YoloFormat;

use std::collections::{BTreeSet, HashMap};

use crate::geometry::Size;
use crate::model::ObjectShape;
use crate::session::FrameSession;

/// Result of exporting a dataset.
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Filename → file content.
    pub files: HashMap<String, String>,
    /// Warnings encountered during export (skipped shapes, etc.).
    pub warnings: Vec<String>,
}

impl ExportResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        log::warn!("export: {warning}");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Result of importing a dataset.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Per-frame sessions, keyed by frame filename or base name.
    pub sessions: HashMap<String, FrameSession>,
    /// Distinct class labels seen, sorted.
    pub labels: Vec<String>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, frame_name: impl Into<String>, session: FrameSession) {
        self.sessions.insert(frame_name.into(), session);
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
            self.labels.sort();
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        log::warn!("import: {warning}");
        self.warnings.push(warning);
    }

    /// Total number of objects across all frames.
    pub fn total_objects(&self) -> usize {
        self.sessions.values().map(FrameSession::len).sum()
    }
}

/// A dataset format that can export and import annotations.
pub trait AnnotationFormat {
    /// Human-readable name of the format (e.g., "YOLO", "COCO").
    fn name(&self) -> &'static str;

    /// File extension(s) this format uses.
    fn extensions(&self) -> &[&'static str];

    /// Whether this format can represent the given shape natively.
    fn supports_shape(&self, shape: &ObjectShape) -> bool;

    /// Export annotations for a set of frames.
    fn export_dataset(
        &self,
        frames: &[(FrameInfo, &FrameSession)],
    ) -> Result<ExportResult, FormatError>;

    /// Import annotations from format files.
    ///
    /// `dims` supplies frame dimensions (keyed by label-file base name)
    /// for formats that store only normalized coordinates; formats that
    /// carry dimensions in-file ignore it.
    fn import_dataset(
        &self,
        files: &HashMap<String, String>,
        dims: &HashMap<String, Size>,
    ) -> Result<ImportResult, FormatError>;
}

/// Distinct object labels across all frames, sorted, paired with their
/// class index.
pub(crate) fn class_index(frames: &[(FrameInfo, &FrameSession)]) -> Vec<String> {
    let labels: BTreeSet<String> = frames
        .iter()
        .flat_map(|(_, session)| session.iter().map(|o| o.label.clone()))
        .collect();
    labels.into_iter().collect()
}

/// Get a list of all available format names.
pub fn available_formats() -> Vec<&'static str> {
    vec!["COCO", "YOLO", "YOLO Segmentation", "Pascal VOC"]
}

/// Create a format by name.
pub fn format_by_name(name: &str) -> Option<Box<dyn AnnotationFormat>> {
    match name.to_lowercase().as_str() {
        "coco" => Some(Box::new(CocoFormat::new())),
        "yolo" => Some(Box::new(YoloFormat::detection())),
        "yolo segmentation" | "yolo-seg" => Some(Box::new(YoloFormat::segmentation())),
        "pascal voc" | "voc" => Some(Box::new(VocFormat::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_format_by_name() {
        assert!(format_by_name("coco").is_some());
        assert!(format_by_name("COCO").is_some());
        assert!(format_by_name("yolo").is_some());
        assert!(format_by_name("yolo-seg").is_some());
        assert!(format_by_name("voc").is_some());
        assert!(format_by_name("unknown").is_none());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert!(formats.contains(&"COCO"));
        assert!(formats.contains(&"YOLO"));
        assert!(formats.contains(&"Pascal VOC"));
    }

    #[test]
    fn test_class_index_is_sorted_and_distinct() {
        let mut a = FrameSession::new(Size::new(100, 100));
        a.add_object("zebra", ObjectShape::BBox(Rect::new(0, 0, 5, 5)))
            .unwrap();
        a.add_object("ant", ObjectShape::BBox(Rect::new(0, 0, 5, 5)))
            .unwrap();
        let mut b = FrameSession::new(Size::new(100, 100));
        b.add_object("ant", ObjectShape::BBox(Rect::new(0, 0, 5, 5)))
            .unwrap();

        let frames = vec![
            (FrameInfo::new("a.png", 100, 100), &a),
            (FrameInfo::new("b.png", 100, 100), &b),
        ];
        assert_eq!(class_index(&frames), vec!["ant", "zebra"]);
    }

    #[test]
    fn test_export_result() {
        let mut result = ExportResult::new();
        assert!(result.is_empty());
        result.add_file("classes.txt", "car");
        assert!(!result.is_empty());
    }
}
