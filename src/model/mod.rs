//! Data model for annotated objects.

mod object;

pub use object::{LabeledObject, ObjectShape, ShapeKind};
