//! Label mask serialization as NumPy `.npy` arrays.
//!
//! Training pipelines consume per-object segmentation masks directly as
//! `uint16` arrays of shape `(height, width)`. Conversion is in-memory;
//! the caller decides where the bytes go.

use std::io::Cursor;

use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};

use super::FormatError;
use crate::mask::LabelMask;

/// Encode a mask as `.npy` bytes (uint16, shape `(height, width)`).
pub fn mask_to_npy(mask: &LabelMask) -> Result<Vec<u8>, FormatError> {
    let mut bytes = Vec::new();
    mask.as_array()
        .write_npy(&mut bytes)
        .map_err(|e| FormatError::Npy(e.to_string()))?;
    Ok(bytes)
}

/// Decode a mask from `.npy` bytes. The array must be 2-D `uint16`.
pub fn mask_from_npy(bytes: &[u8]) -> Result<LabelMask, FormatError> {
    let cursor = Cursor::new(bytes);
    let array =
        Array2::<u16>::read_npy(cursor).map_err(|e| FormatError::Npy(e.to_string()))?;
    Ok(LabelMask::from_array(array))
}
