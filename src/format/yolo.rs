//! YOLO format support.
//!
//! YOLO uses one `.txt` file per frame plus a `classes.txt` file for
//! class names.
//!
//! # Detection Format (Bounding Boxes)
//!
//! Each line in the label file:
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! All coordinates are normalized to [0, 1] relative to the frame size.
//!
//! # Segmentation Format (Polygons)
//!
//! Each line in the label file:
//! ```text
//! <class_id> <x1> <y1> <x2> <y2> ... <xn> <yn>
//! ```
//!
//! Scribble-segmented objects have no polygon outline, so both variants
//! degrade them to their outer box with a warning.

use std::collections::HashMap;

use super::{
    AnnotationFormat, ExportResult, FormatError, ImportResult, class_index,
    common::{FrameInfo, denormalize_polygon, normalize_polygon, rect_to_yolo, yolo_to_rect},
};
use crate::geometry::Size;
use crate::model::ObjectShape;
use crate::session::FrameSession;

/// YOLO format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YoloVariant {
    /// Standard detection format (bounding boxes only).
    Detection,
    /// Segmentation format (polygons and bounding boxes).
    Segmentation,
}

/// YOLO format implementation.
#[derive(Debug, Clone)]
pub struct YoloFormat {
    variant: YoloVariant,
}

impl YoloFormat {
    /// Create a YOLO detection format handler (bounding boxes only).
    pub fn detection() -> Self {
        Self {
            variant: YoloVariant::Detection,
        }
    }

    /// Create a YOLO segmentation format handler (polygons supported).
    pub fn segmentation() -> Self {
        Self {
            variant: YoloVariant::Segmentation,
        }
    }

    pub fn variant(&self) -> YoloVariant {
        self.variant
    }
}

impl AnnotationFormat for YoloFormat {
    fn name(&self) -> &'static str {
        match self.variant {
            YoloVariant::Detection => "YOLO",
            YoloVariant::Segmentation => "YOLO Segmentation",
        }
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn supports_shape(&self, shape: &ObjectShape) -> bool {
        match (self.variant, shape) {
            (_, ObjectShape::BBox(_)) => true,
            (YoloVariant::Segmentation, ObjectShape::Polygon(_)) => true,
            (YoloVariant::Detection, ObjectShape::Polygon(_)) => false, // converted to bbox
            (_, ObjectShape::Scribble { .. }) => false, // converted to bbox
        }
    }

    fn export_dataset(
        &self,
        frames: &[(FrameInfo, &FrameSession)],
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::new();

        let classes = class_index(frames);
        result.add_file("classes.txt", classes.join("\n"));

        let index_of: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        for (info, session) in frames {
            let mut lines: Vec<String> = Vec::new();

            for object in session.iter() {
                // Labels come from the sessions themselves, so the index
                // lookup cannot miss.
                let Some(&class_idx) = index_of.get(object.label.as_str()) else {
                    continue;
                };

                match &object.shape {
                    ObjectShape::BBox(rect) => {
                        let (x, y, w, h) = rect_to_yolo(rect, info.size);
                        lines.push(format!("{class_idx} {x:.6} {y:.6} {w:.6} {h:.6}"));
                    }
                    ObjectShape::Polygon(poly) => {
                        if self.variant == YoloVariant::Segmentation {
                            let coords = normalize_polygon(poly, info.size);
                            let coord_str: String = coords
                                .iter()
                                .map(|(x, y)| format!("{x:.6} {y:.6}"))
                                .collect::<Vec<_>>()
                                .join(" ");
                            lines.push(format!("{class_idx} {coord_str}"));
                        } else {
                            let (x, y, w, h) =
                                rect_to_yolo(&object.shape.outer_box(), info.size);
                            lines.push(format!("{class_idx} {x:.6} {y:.6} {w:.6} {h:.6}"));
                            result.add_warning(format!(
                                "Converted polygon object {} to bounding box",
                                object.id
                            ));
                        }
                    }
                    ObjectShape::Scribble { .. } => {
                        let (x, y, w, h) = rect_to_yolo(&object.shape.outer_box(), info.size);
                        lines.push(format!("{class_idx} {x:.6} {y:.6} {w:.6} {h:.6}"));
                        result.add_warning(format!(
                            "Exported scribble object {} as its outer box (no outline)",
                            object.id
                        ));
                    }
                }
            }

            result.add_file(format!("{}.txt", info.base_name()), lines.join("\n"));
        }

        log::info!(
            "YOLO export: {} frame(s), {} class(es)",
            frames.len(),
            classes.len()
        );
        Ok(result)
    }

    fn import_dataset(
        &self,
        files: &HashMap<String, String>,
        dims: &HashMap<String, Size>,
    ) -> Result<ImportResult, FormatError> {
        let mut result = ImportResult::new();

        let classes: Vec<String> = files
            .get("classes.txt")
            .map(|content| {
                content
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        for name in &classes {
            result.add_label(name.clone());
        }

        for (filename, content) in files {
            if filename == "classes.txt" || !filename.ends_with(".txt") {
                continue;
            }
            let base_name = filename.trim_end_matches(".txt");

            let Some(&frame_size) = dims.get(base_name) else {
                result.add_warning(format!(
                    "{filename}: no frame dimensions supplied, skipped"
                ));
                continue;
            };

            let mut session = FrameSession::new(frame_size);

            for (line_num, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let parts: Vec<&str> = line.split_whitespace().collect();

                let class_idx: usize = match parts[0].parse() {
                    Ok(idx) => idx,
                    Err(_) => {
                        result.add_warning(format!(
                            "{}:{}: Invalid class id '{}'",
                            filename,
                            line_num + 1,
                            parts[0]
                        ));
                        continue;
                    }
                };
                let label = classes
                    .get(class_idx)
                    .cloned()
                    .unwrap_or_else(|| format!("class_{class_idx}"));
                result.add_label(label.clone());

                let coords: Vec<f32> = parts[1..].iter().filter_map(|s| s.parse().ok()).collect();

                let shape = if coords.len() == 4 {
                    Some(ObjectShape::BBox(yolo_to_rect(
                        coords[0], coords[1], coords[2], coords[3], frame_size,
                    )))
                } else if coords.len() >= 6 && coords.len() % 2 == 0 {
                    let points: Vec<(f32, f32)> =
                        coords.chunks(2).map(|c| (c[0], c[1])).collect();
                    Some(ObjectShape::Polygon(denormalize_polygon(
                        &points, frame_size,
                    )))
                } else {
                    result.add_warning(format!(
                        "{}:{}: Invalid coordinate count ({})",
                        filename,
                        line_num + 1,
                        coords.len()
                    ));
                    None
                };

                if let Some(shape) = shape {
                    if let Err(e) = session.add_object(label, shape) {
                        result.add_warning(format!("{filename}: {e}"));
                    }
                }
            }

            result.add_session(base_name.to_string(), session);
        }

        Ok(result)
    }
}
