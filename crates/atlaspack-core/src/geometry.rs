//! UV rects and atlas size arithmetic.

use serde::{Deserialize, Serialize};

use crate::config::PackConfig;

/// A rectangle in normalized [0, 1] atlas coordinates.
///
/// `y` grows downward, matching the pixel buffer origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl UvRect {
    /// Create a rect from position and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink inward by `fraction * size / 2` on every side.
    pub fn inset(&self, fraction: f32) -> Self {
        let dx = fraction * (self.width / 2.0);
        let dy = fraction * (self.height / 2.0);
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width - dx * 2.0,
            height: self.height - dy * 2.0,
        }
    }

    /// Multiply x/width by `sx` and y/height by `sy`.
    pub fn scale(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// True when the interiors of the two rects intersect.
    pub fn overlaps(&self, other: &UvRect) -> bool {
        self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }
}

/// UV rect of a unit placed at pixel `(x, y)` in a full-size atlas.
///
/// The padded block is shrunk by `padding` on every side, normalized by the
/// atlas size limit, then inset when configured.
pub fn unit_uv_rect(x: u32, y: u32, config: &PackConfig) -> UvRect {
    let limit = config.atlas_size_limit as f32;
    let padding = config.padding as f32;
    let size = config.padded_unit_size() as f32;

    let content = size - padding * 2.0;
    let rect = UvRect::new(
        (x as f32 + padding) / limit,
        (y as f32 + padding) / limit,
        content / limit,
        content / limit,
    );

    if config.uv_inset > 0.0 {
        rect.inset(config.uv_inset)
    } else {
        rect
    }
}

/// Starting working width: next power of two >= the padded unit size.
pub fn initial_width(padded_unit_size: u32, limit: u32) -> u32 {
    padded_unit_size.next_power_of_two().min(limit)
}

/// Next power of two strictly above `width`, clamped to `limit`.
pub fn grow_width(width: u32, limit: u32) -> u32 {
    (width + 1).next_power_of_two().min(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(unit_size: u32, padding: u32, limit: u32, inset: f32) -> PackConfig {
        PackConfig {
            unit_size,
            padding,
            atlas_size_limit: limit,
            uv_inset: inset,
            ..PackConfig::default()
        }
    }

    #[test]
    fn test_uv_excludes_padding() {
        let c = config(32, 2, 256, 0.0);
        let uv = unit_uv_rect(36, 72, &c);
        assert_eq!(uv.x, 38.0 / 256.0);
        assert_eq!(uv.y, 74.0 / 256.0);
        assert_eq!(uv.width, 32.0 / 256.0);
        assert_eq!(uv.height, 32.0 / 256.0);
    }

    #[test]
    fn test_uv_without_padding_covers_block() {
        let c = config(64, 0, 128, 0.0);
        let uv = unit_uv_rect(64, 0, &c);
        assert_eq!(uv, UvRect::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn test_uv_inset_shrinks_symmetrically() {
        let plain = unit_uv_rect(0, 0, &config(64, 0, 128, 0.0));
        let inset = unit_uv_rect(0, 0, &config(64, 0, 128, 0.1));
        // 10% of the half-width on each side
        assert!((inset.x - (plain.x + 0.025)).abs() < 1e-6);
        assert!((inset.width - plain.width * 0.9).abs() < 1e-6);
        assert!((inset.x + inset.width / 2.0 - (plain.x + plain.width / 2.0)).abs() < 1e-6);
        assert!((inset.y + inset.height / 2.0 - (plain.y + plain.height / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_scale() {
        let uv = UvRect::new(0.25, 0.5, 0.125, 0.25).scale(2.0, 4.0);
        assert_eq!(uv, UvRect::new(0.5, 2.0, 0.25, 1.0));
    }

    #[test]
    fn test_overlaps() {
        let a = UvRect::new(0.0, 0.0, 0.5, 0.5);
        let b = UvRect::new(0.5, 0.0, 0.5, 0.5);
        let c = UvRect::new(0.25, 0.25, 0.5, 0.5);
        assert!(!a.overlaps(&b), "touching edges do not overlap");
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_initial_width() {
        assert_eq!(initial_width(36, 256), 64);
        assert_eq!(initial_width(64, 256), 64);
        assert_eq!(initial_width(36, 50), 50);
    }

    #[test]
    fn test_grow_width() {
        assert_eq!(grow_width(64, 256), 128);
        assert_eq!(grow_width(128, 256), 256);
        assert_eq!(grow_width(256, 300), 300);
        assert_eq!(grow_width(64, 100), 100);
    }
}
