//! COCO format support.
//!
//! COCO stores an entire dataset in a single JSON file: an `images`
//! array, an `annotations` array, and a `categories` array. Category ids
//! are 1-based, assigned here from the sorted set of object labels.
//!
//! Boxes export as `[x, y, width, height]`; polygons additionally carry
//! a `segmentation` entry of flat vertex coordinates. Scribble objects
//! export as their outer box with a warning (the pixel mask travels
//! separately, see [`super::mask_npy`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    AnnotationFormat, ExportResult, FormatError, ImportResult, class_index, common::FrameInfo,
};
use crate::geometry::{Point, Polygon, Rect, Size};
use crate::model::ObjectShape;
use crate::session::FrameSession;

/// COCO format implementation.
#[derive(Debug, Clone, Default)]
pub struct CocoFormat;

impl CocoFormat {
    pub fn new() -> Self {
        Self
    }

    /// Name of the single JSON file produced by export.
    pub const FILE_NAME: &'static str = "annotations.json";
}

impl AnnotationFormat for CocoFormat {
    fn name(&self) -> &'static str {
        "COCO"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn supports_shape(&self, shape: &ObjectShape) -> bool {
        matches!(shape, ObjectShape::BBox(_) | ObjectShape::Polygon(_))
    }

    fn export_dataset(
        &self,
        frames: &[(FrameInfo, &FrameSession)],
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::new();

        let classes = class_index(frames);
        let category_of: HashMap<&str, u32> = classes
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx as u32 + 1))
            .collect();

        let mut doc = CocoDataset {
            images: Vec::new(),
            annotations: Vec::new(),
            categories: classes
                .iter()
                .enumerate()
                .map(|(idx, name)| CocoCategory {
                    id: idx as u32 + 1,
                    name: name.clone(),
                })
                .collect(),
        };

        let mut next_annotation_id: u64 = 1;
        for (image_id, (info, session)) in frames.iter().enumerate() {
            let image_id = image_id as u64 + 1;
            doc.images.push(CocoImage {
                id: image_id,
                file_name: info.file_name.clone(),
                width: info.size.width,
                height: info.size.height,
            });

            for object in session.iter() {
                let Some(&category_id) = category_of.get(object.label.as_str()) else {
                    continue;
                };

                let bbox = object.shape.outer_box();
                let segmentation = match &object.shape {
                    ObjectShape::Polygon(poly) => Some(vec![
                        poly.vertices
                            .iter()
                            .flat_map(|p| [p.x as f32, p.y as f32])
                            .collect(),
                    ]),
                    ObjectShape::Scribble { .. } => {
                        result.add_warning(format!(
                            "Exported scribble object {} as its outer box (mask not embedded)",
                            object.id
                        ));
                        None
                    }
                    ObjectShape::BBox(_) => None,
                };

                doc.annotations.push(CocoAnnotation {
                    id: next_annotation_id,
                    image_id,
                    category_id,
                    bbox: [
                        bbox.x as f32,
                        bbox.y as f32,
                        bbox.width as f32,
                        bbox.height as f32,
                    ],
                    segmentation,
                    area: bbox.area() as f32,
                    iscrowd: 0,
                });
                next_annotation_id += 1;
            }
        }

        result.add_file(Self::FILE_NAME, serde_json::to_string_pretty(&doc)?);
        log::info!(
            "COCO export: {} image(s), {} annotation(s)",
            doc.images.len(),
            doc.annotations.len()
        );
        Ok(result)
    }

    fn import_dataset(
        &self,
        files: &HashMap<String, String>,
        _dims: &HashMap<String, Size>,
    ) -> Result<ImportResult, FormatError> {
        let mut result = ImportResult::new();

        // Accept any .json file; datasets in the wild rarely use our
        // export name.
        let Some((filename, content)) = files
            .iter()
            .find(|(name, _)| name.ends_with(".json"))
        else {
            return Err(FormatError::MissingField {
                field: "a .json dataset file".to_string(),
            });
        };

        let doc: CocoDataset = serde_json::from_str(content)?;
        log::debug!("COCO import from {filename}: {} image(s)", doc.images.len());

        let label_of: HashMap<u32, String> = doc
            .categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();
        for category in &doc.categories {
            result.add_label(category.name.clone());
        }

        let mut sessions: HashMap<u64, (String, FrameSession)> = doc
            .images
            .iter()
            .map(|img| {
                (
                    img.id,
                    (
                        img.file_name.clone(),
                        FrameSession::new(Size::new(img.width, img.height)),
                    ),
                )
            })
            .collect();

        for ann in &doc.annotations {
            let Some((_, session)) = sessions.get_mut(&ann.image_id) else {
                result.add_warning(format!(
                    "Annotation {} references unknown image {}",
                    ann.id, ann.image_id
                ));
                continue;
            };
            let label = match label_of.get(&ann.category_id) {
                Some(name) => name.clone(),
                None => {
                    result.add_warning(format!(
                        "Annotation {} references unknown category {}",
                        ann.id, ann.category_id
                    ));
                    format!("category_{}", ann.category_id)
                }
            };

            let shape = match ann.segmentation.as_ref().and_then(|s| s.first()) {
                Some(flat) if flat.len() >= 6 && flat.len() % 2 == 0 => {
                    let vertices = flat
                        .chunks(2)
                        .map(|c| Point::new(c[0].max(0.0) as i32, c[1].max(0.0) as i32))
                        .collect();
                    ObjectShape::Polygon(Polygon::closed_from(vertices))
                }
                _ => ObjectShape::BBox(Rect::new(
                    ann.bbox[0].max(0.0) as i32,
                    ann.bbox[1].max(0.0) as i32,
                    ann.bbox[2].max(0.0) as u32,
                    ann.bbox[3].max(0.0) as u32,
                )),
            };

            if let Err(e) = session.add_object(label, shape) {
                result.add_warning(format!("Annotation {}: {e}", ann.id));
            }
        }

        for (_, (file_name, session)) in sessions {
            result.add_session(file_name, session);
        }
        Ok(result)
    }
}

// ============================================================================
// COCO JSON Structures
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct CocoDataset {
    images: Vec<CocoImage>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoImage {
    id: u64,
    file_name: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u32,
    bbox: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    segmentation: Option<Vec<Vec<f32>>>,
    area: f32,
    #[serde(default)]
    iscrowd: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoCategory {
    id: u32,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Size = Size::new(640, 480);

    fn test_session() -> FrameSession {
        let mut session = FrameSession::new(FRAME);
        session
            .add_object("car", ObjectShape::BBox(Rect::new(100, 100, 200, 100)))
            .unwrap();
        session
            .add_object(
                "shape",
                ObjectShape::Polygon(Polygon::closed_from(vec![
                    Point::new(10, 10),
                    Point::new(110, 10),
                    Point::new(60, 90),
                ])),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_export_structure() {
        let format = CocoFormat::new();
        let session = test_session();
        let info = FrameInfo::new("test.jpg", 640, 480);

        let result = format.export_dataset(&[(info, &session)]).unwrap();
        let json = &result.files[CocoFormat::FILE_NAME];

        assert!(json.contains("\"file_name\": \"test.jpg\""));
        assert!(json.contains("\"width\": 640"));
        assert!(json.contains("\"car\""));
        assert!(json.contains("\"segmentation\""));
        assert!(json.contains("\"iscrowd\": 0"));
    }

    #[test]
    fn test_category_ids_are_stable() {
        let format = CocoFormat::new();
        let session = test_session();
        let info = FrameInfo::new("test.jpg", 640, 480);

        let result = format
            .export_dataset(&[(info, &session)])
            .unwrap();
        let doc: CocoDataset =
            serde_json::from_str(&result.files[CocoFormat::FILE_NAME]).unwrap();

        // Sorted labels: car = 1, shape = 2.
        assert_eq!(doc.categories.len(), 2);
        assert_eq!(doc.categories[0].name, "car");
        assert_eq!(doc.categories[0].id, 1);
        assert_eq!(doc.categories[1].name, "shape");
        assert_eq!(doc.categories[1].id, 2);
    }

    #[test]
    fn test_round_trip() {
        let format = CocoFormat::new();
        let session = test_session();
        let info = FrameInfo::new("rt.jpg", 640, 480);

        let exported = format.export_dataset(&[(info, &session)]).unwrap();
        let imported = format
            .import_dataset(&exported.files, &HashMap::new())
            .unwrap();

        let back = &imported.sessions["rt.jpg"];
        assert_eq!(back.frame_size(), FRAME);
        assert_eq!(back.len(), session.len());

        for (a, b) in session.iter().zip(back.iter()) {
            assert_eq!(a.label, b.label);
            assert_eq!(a.shape.outer_box(), b.shape.outer_box());
            assert_eq!(a.shape.has_polygon(), b.shape.has_polygon());
        }
    }

    #[test]
    fn test_import_requires_json_file() {
        let format = CocoFormat::new();
        let files = HashMap::new();
        assert!(matches!(
            format.import_dataset(&files, &HashMap::new()),
            Err(FormatError::MissingField { .. })
        ));
    }

    #[test]
    fn test_import_warns_on_dangling_references() {
        let json = r#"{
            "images": [{"id": 1, "file_name": "a.jpg", "width": 100, "height": 100}],
            "annotations": [
                {"id": 1, "image_id": 99, "category_id": 1, "bbox": [0, 0, 10, 10], "area": 100.0},
                {"id": 2, "image_id": 1, "category_id": 42, "bbox": [0, 0, 10, 10], "area": 100.0}
            ],
            "categories": [{"id": 1, "name": "car"}]
        }"#;
        let mut files = HashMap::new();
        files.insert("annotations.json".to_string(), json.to_string());

        let format = CocoFormat::new();
        let result = format.import_dataset(&files, &HashMap::new()).unwrap();

        assert_eq!(result.warnings.len(), 2);
        // The dangling-category annotation still lands with a fallback label.
        assert_eq!(result.sessions["a.jpg"].len(), 1);
    }
}
