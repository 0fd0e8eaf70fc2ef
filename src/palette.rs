//! Object color assignment and collision avoidance.
//!
//! Every object in a frame gets its own overlay color. New objects start
//! from a golden-angle hue curve (well spread for small counts), and any
//! candidate that exactly matches a color already in use, or one of the
//! reserved UI colors, is deterministically rotated around the hue wheel
//! until it is free. The rotation is bounded so a pathological registry
//! reports exhaustion instead of spinning forever.

use std::collections::HashSet;

use thiserror::Error;

use crate::constants::MAX_COLOR_ATTEMPTS;

/// An RGB color with 8-bit channels.
pub type Rgb8 = [u8; 3];

/// Hue step between perturbation attempts, in degrees. The golden angle
/// revisits no hue for a long time.
const GOLDEN_ANGLE: f32 = 137.5;

/// Failure to find a distinguishable color.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// Every perturbation attempt collided with a used or reserved color.
    #[error("no distinguishable color found after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Convert RGB (8-bit channels) to HSV (hue in degrees, s and v in 0-1).
pub fn rgb_to_hsv(rgb: Rgb8) -> (f32, f32, f32) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// [`hsv_to_rgb`] quantized to 8-bit channels.
pub fn rgb8_from_hsv(h: f32, s: f32, v: f32) -> Rgb8 {
    let (r, g, b) = hsv_to_rgb(h.rem_euclid(360.0), s, v);
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ]
}

/// Default color for a newly created object, spread along the golden
/// angle so consecutive ids are visually far apart.
pub fn object_color(id: u32) -> Rgb8 {
    let hue = (id as f32 * GOLDEN_ANGLE) % 360.0;
    rgb8_from_hsv(hue, 0.7, 0.9)
}

/// Return `candidate` if it collides with nothing, otherwise the first
/// hue-rotated variant that is distinct from every used and reserved
/// color. Collision is exact channel equality.
pub fn resolve_color(
    candidate: Rgb8,
    in_use: &HashSet<Rgb8>,
    reserved: &[Rgb8],
) -> Result<Rgb8, PaletteError> {
    let collides = |c: &Rgb8| in_use.contains(c) || reserved.contains(c);

    if !collides(&candidate) {
        return Ok(candidate);
    }

    // Hue rotation cannot leave the gray axis, so lift saturation and
    // value before stepping.
    let (mut h, s, v) = rgb_to_hsv(candidate);
    let s = s.max(0.5);
    let v = v.max(0.6);

    for attempt in 1..=MAX_COLOR_ATTEMPTS {
        h = (h + GOLDEN_ANGLE) % 360.0;
        let next = rgb8_from_hsv(h, s, v);
        if !collides(&next) {
            log::debug!(
                "color {candidate:?} collided, resolved to {next:?} after {attempt} attempt(s)"
            );
            return Ok(next);
        }
    }

    Err(PaletteError::Exhausted {
        attempts: MAX_COLOR_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb8 = [255, 0, 0];
    const GREEN: Rgb8 = [0, 255, 0];
    const BLUE: Rgb8 = [0, 0, 255];
    const YELLOW: Rgb8 = [255, 255, 0];

    #[test]
    fn test_hsv_to_rgb_primaries() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01 && g.abs() < 0.01 && b.abs() < 0.01);

        let (r, g, b) = hsv_to_rgb(120.0, 1.0, 1.0);
        assert!(r.abs() < 0.01 && (g - 1.0).abs() < 0.01 && b.abs() < 0.01);

        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert!(r.abs() < 0.01 && g.abs() < 0.01 && (b - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_rgb_hsv_round_trip() {
        for &color in &[RED, GREEN, BLUE, YELLOW, [13, 200, 87], [128, 128, 128]] {
            let (h, s, v) = rgb_to_hsv(color);
            let back = rgb8_from_hsv(h, s, v);
            for c in 0..3 {
                assert!(
                    color[c].abs_diff(back[c]) <= 1,
                    "channel {c} drifted: {color:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_free_candidate_is_returned_unchanged() {
        let used = HashSet::new();
        assert_eq!(resolve_color(YELLOW, &used, &[BLUE]), Ok(YELLOW));
    }

    #[test]
    fn test_collision_is_resolved_away_from_all_sets() {
        let used: HashSet<Rgb8> = [RED, GREEN].into_iter().collect();
        let reserved = [BLUE];

        let resolved = resolve_color(RED, &used, &reserved).unwrap();
        assert!(!used.contains(&resolved));
        assert!(!reserved.contains(&resolved));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let used: HashSet<Rgb8> = [RED].into_iter().collect();
        let a = resolve_color(RED, &used, &[]).unwrap();
        let b = resolve_color(RED, &used, &[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_gray_candidate_escapes_the_gray_axis() {
        let gray: Rgb8 = [128, 128, 128];
        let used: HashSet<Rgb8> = [gray].into_iter().collect();
        let resolved = resolve_color(gray, &used, &[]).unwrap();
        assert_ne!(resolved, gray);
    }

    #[test]
    fn test_exhaustion_is_reported() {
        // Reserve every color the rotation can reach from RED.
        let (mut h, s, v) = rgb_to_hsv(RED);
        let s = s.max(0.5);
        let v = v.max(0.6);
        let mut reserved = vec![RED];
        for _ in 0..MAX_COLOR_ATTEMPTS {
            h = (h + GOLDEN_ANGLE) % 360.0;
            reserved.push(rgb8_from_hsv(h, s, v));
        }

        let used = HashSet::new();
        assert_eq!(
            resolve_color(RED, &used, &reserved),
            Err(PaletteError::Exhausted {
                attempts: MAX_COLOR_ATTEMPTS
            })
        );
    }

    #[test]
    fn test_object_colors_spread() {
        let a = object_color(1);
        let b = object_color(2);
        let c = object_color(3);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}
