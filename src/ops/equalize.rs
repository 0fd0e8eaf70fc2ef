//! Histogram equalization for preview enhancement.
//!
//! Low-contrast frames (dim video, backlit scenes) are hard to annotate;
//! equalizing the value distribution before display makes object borders
//! visible without touching the stored pixels. Classic 256-bin CDF
//! remapping, applied per channel for color images.

use image::{GrayImage, RgbImage};

/// Build the equalization lookup table for one 256-bin histogram.
///
/// Returns the identity mapping for a constant channel (every pixel in
/// one bin leaves nothing to stretch).
fn equalization_lut(histogram: &[u32; 256], total: u32) -> [u8; 256] {
    let mut lut = [0u8; 256];

    // First nonzero bin anchors the black point.
    let cdf_min = histogram
        .iter()
        .scan(0u32, |acc, &count| {
            *acc += count;
            Some(*acc)
        })
        .find(|&cdf| cdf > 0)
        .unwrap_or(0);

    if total == 0 || total == cdf_min {
        for (v, entry) in lut.iter_mut().enumerate() {
            *entry = v as u8;
        }
        return lut;
    }

    let mut cdf = 0u32;
    for (v, entry) in lut.iter_mut().enumerate() {
        cdf += histogram[v];
        if cdf == 0 {
            continue;
        }
        let scaled =
            (cdf - cdf_min) as f64 / (total - cdf_min) as f64 * 255.0;
        *entry = scaled.round() as u8;
    }
    lut
}

/// Equalize an 8-bit grayscale image.
pub fn equalize_gray(image: &GrayImage) -> GrayImage {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    let lut = equalization_lut(&histogram, image.width() * image.height());

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}

/// Equalize an 8-bit RGB image, each channel independently.
pub fn equalize_rgb(image: &RgbImage) -> RgbImage {
    let total = image.width() * image.height();
    let mut histograms = [[0u32; 256]; 3];
    for pixel in image.pixels() {
        for c in 0..3 {
            histograms[c][pixel.0[c] as usize] += 1;
        }
    }
    let luts: Vec<[u8; 256]> = histograms
        .iter()
        .map(|h| equalization_lut(h, total))
        .collect();

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for c in 0..3 {
            pixel.0[c] = luts[c][pixel.0[c] as usize];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_constant_image_is_unchanged() {
        let image = GrayImage::from_pixel(8, 8, Luma([77]));
        let out = equalize_gray(&image);
        assert_eq!(out, image);
    }

    #[test]
    fn test_two_level_image_stretches_to_full_range() {
        // Half the pixels at 100, half at 150.
        let mut image = GrayImage::from_pixel(8, 8, Luma([100]));
        for y in 0..8 {
            for x in 0..4 {
                image.put_pixel(x, y, Luma([150]));
            }
        }

        let out = equalize_gray(&image);
        let mut values: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
        values.sort_unstable();
        values.dedup();

        // The darker level anchors at 0 and the brighter stretches to 255.
        assert_eq!(values, vec![0, 255]);
    }

    #[test]
    fn test_monotonicity_is_preserved() {
        let mut image = GrayImage::new(16, 1);
        for x in 0..16 {
            image.put_pixel(x, 0, Luma([(x * 10) as u8]));
        }

        let out = equalize_gray(&image);
        let values: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_rgb_channels_equalize_independently() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([100, 0, 0]));
        for x in 0..4 {
            image.put_pixel(x, 0, Rgb([150, 0, 0]));
        }

        let out = equalize_rgb(&image);
        // Red stretched, green/blue constant-zero channels untouched.
        let reds: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
        assert!(reds.contains(&0) && reds.contains(&255));
        assert!(out.pixels().all(|p| p.0[1] == 0 && p.0[2] == 0));
    }
}
