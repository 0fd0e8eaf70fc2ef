//! Pascal VOC format support.
//!
//! Pascal VOC uses one XML file per frame with bounding box annotations:
//!
//! ```xml
//! <annotation>
//!   <folder>JPEGImages</folder>
//!   <filename>image1.jpg</filename>
//!   <size>
//!     <width>640</width>
//!     <height>480</height>
//!     <depth>3</depth>
//!   </size>
//!   <object>
//!     <name>person</name>
//!     <pose>Unspecified</pose>
//!     <truncated>0</truncated>
//!     <difficult>0</difficult>
//!     <bndbox>
//!       <xmin>100</xmin>
//!       <ymin>100</ymin>
//!       <xmax>200</xmax>
//!       <ymax>200</ymax>
//!     </bndbox>
//!   </object>
//! </annotation>
//! ```
//!
//! VOC only represents boxes; polygons and scribbles export as their
//! outer box with a warning.

use std::collections::HashMap;

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};

use super::{
    AnnotationFormat, ExportResult, FormatError, ImportResult, common::FrameInfo,
};
use crate::geometry::{Rect, Size};
use crate::model::ObjectShape;
use crate::session::FrameSession;

/// Pascal VOC format implementation.
#[derive(Debug, Clone)]
pub struct VocFormat {
    /// Folder name recorded in each annotation (default "JPEGImages").
    pub folder: String,
}

impl VocFormat {
    pub fn new() -> Self {
        Self {
            folder: "JPEGImages".to_string(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

impl Default for VocFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationFormat for VocFormat {
    fn name(&self) -> &'static str {
        "Pascal VOC"
    }

    fn extensions(&self) -> &[&'static str] {
        &["xml"]
    }

    fn supports_shape(&self, shape: &ObjectShape) -> bool {
        matches!(shape, ObjectShape::BBox(_))
    }

    fn export_dataset(
        &self,
        frames: &[(FrameInfo, &FrameSession)],
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::new();

        for (info, session) in frames {
            let mut voc_ann = VocAnnotation {
                folder: self.folder.clone(),
                filename: info.file_name.clone(),
                size: VocSize {
                    width: info.size.width as i32,
                    height: info.size.height as i32,
                    depth: 3,
                },
                objects: Vec::new(),
            };

            for object in session.iter() {
                if !matches!(object.shape, ObjectShape::BBox(_)) {
                    result.add_warning(format!(
                        "Exported object {} as its outer box (VOC only supports boxes)",
                        object.id
                    ));
                }
                let rect = object.shape.outer_box();
                let truncated = object
                    .attributes
                    .get("truncated")
                    .is_some_and(|v| v == "true") as i32;
                let difficult = object
                    .attributes
                    .get("difficult")
                    .is_some_and(|v| v == "true") as i32;

                voc_ann.objects.push(VocObject {
                    name: object.label.clone(),
                    pose: "Unspecified".to_string(),
                    truncated,
                    difficult,
                    bndbox: VocBndbox {
                        xmin: rect.x,
                        ymin: rect.y,
                        xmax: rect.right(),
                        ymax: rect.bottom(),
                    },
                });
            }

            let xml = to_string(&voc_ann).map_err(|e| FormatError::Xml(e.to_string()))?;
            let content = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{xml}");
            result.add_file(format!("{}.xml", info.base_name()), content);
        }

        log::info!("VOC export: {} frame(s)", frames.len());
        Ok(result)
    }

    fn import_dataset(
        &self,
        files: &HashMap<String, String>,
        _dims: &HashMap<String, Size>,
    ) -> Result<ImportResult, FormatError> {
        let mut result = ImportResult::new();

        for (filename, content) in files {
            if !filename.ends_with(".xml") {
                continue;
            }
            if !content.trim_start().starts_with('<') {
                continue;
            }

            let voc_ann: VocAnnotation = from_str(content)
                .map_err(|e| FormatError::Xml(format!("Failed to parse {filename}: {e}")))?;

            let frame = Size::new(
                voc_ann.size.width.max(0) as u32,
                voc_ann.size.height.max(0) as u32,
            );
            let mut session = FrameSession::new(frame);

            for obj in &voc_ann.objects {
                result.add_label(obj.name.clone());

                let rect = Rect::new(
                    obj.bndbox.xmin.max(0),
                    obj.bndbox.ymin.max(0),
                    (obj.bndbox.xmax - obj.bndbox.xmin).max(0) as u32,
                    (obj.bndbox.ymax - obj.bndbox.ymin).max(0) as u32,
                );

                match session.add_object(obj.name.clone(), ObjectShape::BBox(rect)) {
                    Ok(id) => {
                        // Round-trip the VOC flags as attributes.
                        if obj.truncated != 0 {
                            session.set_attribute(id, "truncated", "true");
                        }
                        if obj.difficult != 0 {
                            session.set_attribute(id, "difficult", "true");
                        }
                    }
                    Err(e) => result.add_warning(format!("{filename}: {e}")),
                }
            }

            let frame_name = if voc_ann.filename.is_empty() {
                filename.trim_end_matches(".xml").to_string()
            } else {
                voc_ann.filename.clone()
            };
            result.add_session(frame_name, session);
        }

        Ok(result)
    }
}

// ============================================================================
// Pascal VOC XML Structures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "annotation")]
struct VocAnnotation {
    folder: String,
    filename: String,
    size: VocSize,
    #[serde(rename = "object", default)]
    objects: Vec<VocObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocSize {
    width: i32,
    height: i32,
    depth: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocObject {
    name: String,
    #[serde(default = "default_pose")]
    pose: String,
    #[serde(default)]
    truncated: i32,
    #[serde(default)]
    difficult: i32,
    bndbox: VocBndbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocBndbox {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

fn default_pose() -> String {
    "Unspecified".to_string()
}
