//! RGBA8 pixel buffers.
//!
//! [`PixelBuffer`] is the mutable working surface of an atlas and the pixel
//! block of a unit. Sealing a buffer yields an [`AtlasImage`], which has no
//! mutating API and is what serializers receive.

use crate::error::{PackError, PackResult};

/// One RGBA8 pixel.
pub type Rgba = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// A 2D RGBA8 buffer, row-major, origin at the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data, `width * height` entries.
    pub data: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: u32, height: u32, fill: Rgba) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Build a buffer from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> PackResult<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(PackError::InvalidPixelData(format!(
                "expected {} bytes for {}x{} RGBA8, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a pixel.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.data[self.index(x, y)]
    }

    /// Set a pixel.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.data[idx] = color;
    }

    /// Copy `src` into this buffer with its top-left corner at `(x, y)`.
    ///
    /// The destination rectangle must lie inside the buffer.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        debug_assert!(x + src.width <= self.width && y + src.height <= self.height);
        let row_len = src.width as usize;
        for row in 0..src.height {
            let dst = self.index(x, y + row);
            let from = src.index(0, row);
            self.data[dst..dst + row_len].copy_from_slice(&src.data[from..from + row_len]);
        }
    }

    /// Extract the sub-rectangle `(x, y, width, height)` into a new buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> PixelBuffer {
        debug_assert!(x + width <= self.width && y + height <= self.height);
        let mut out = PixelBuffer::new(width, height);
        let row_len = width as usize;
        for row in 0..height {
            let from = self.index(x, y + row);
            let dst = out.index(0, row);
            out.data[dst..dst + row_len].copy_from_slice(&self.data[from..from + row_len]);
        }
        out
    }

    /// True when every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.iter().all(|px| px[3] == 0)
    }

    /// Flatten to RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for px in &self.data {
            bytes.extend_from_slice(px);
        }
        bytes
    }

    /// Finalize the buffer; no further writes are possible afterwards.
    pub fn seal(self, alpha: AlphaMode) -> AtlasImage {
        AtlasImage {
            buffer: self,
            alpha,
        }
    }
}

/// How the alpha channel of a sealed image is meant to be interpreted.
///
/// Atlases always carry transparency between and around units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Alpha carries transparency.
    Transparent,
}

/// A finalized, read-only atlas image handed to a serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    buffer: PixelBuffer,
    alpha: AlphaMode,
}

impl AtlasImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Alpha interpretation.
    pub fn alpha(&self) -> AlphaMode {
        self.alpha
    }

    /// Get a pixel.
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.buffer.get(x, y)
    }

    /// Read-only view of the pixels.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.buffer.to_rgba8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, [x as u8, y as u8, 7, 255]);
            }
        }
        buffer
    }

    #[test]
    fn test_new_is_transparent() {
        let buffer = PixelBuffer::new(4, 3);
        assert_eq!(buffer.data.len(), 12);
        assert!(buffer.is_transparent());
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(PixelBuffer::from_rgba8(2, 2, &[0; 16]).is_ok());
        let err = PixelBuffer::from_rgba8(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, PackError::InvalidPixelData(_)));
    }

    #[test]
    fn test_rgba8_roundtrip() {
        let buffer = numbered(3, 2);
        let bytes = buffer.to_rgba8();
        assert_eq!(bytes.len(), 24);
        assert_eq!(PixelBuffer::from_rgba8(3, 2, &bytes).unwrap(), buffer);
    }

    #[test]
    fn test_blit_places_block() {
        let mut dst = PixelBuffer::new(8, 8);
        let src = numbered(3, 2);
        dst.blit(&src, 4, 5);
        assert_eq!(dst.get(4, 5), src.get(0, 0));
        assert_eq!(dst.get(6, 6), src.get(2, 1));
        assert_eq!(dst.get(3, 5), TRANSPARENT);
        assert_eq!(dst.get(7, 5), TRANSPARENT);
        assert_eq!(dst.get(4, 7), TRANSPARENT);
    }

    #[test]
    fn test_crop_extracts_region() {
        let buffer = numbered(6, 5);
        let cropped = buffer.crop(1, 2, 3, 2);
        assert_eq!(cropped.width, 3);
        assert_eq!(cropped.height, 2);
        assert_eq!(cropped.get(0, 0), buffer.get(1, 2));
        assert_eq!(cropped.get(2, 1), buffer.get(3, 3));
    }

    #[test]
    fn test_seal_keeps_pixels() {
        let buffer = numbered(2, 2);
        let image = buffer.clone().seal(AlphaMode::Transparent);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.alpha(), AlphaMode::Transparent);
        assert_eq!(image.pixels(), &buffer);
        assert_eq!(image.get(1, 1), buffer.get(1, 1));
    }
}
