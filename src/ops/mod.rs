//! Pixel-level image operations used by previews.

mod equalize;

pub use equalize::{equalize_gray, equalize_rgb};
