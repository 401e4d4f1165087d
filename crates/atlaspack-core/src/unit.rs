//! Units and the source textures they are diced from.

use crate::buffer::PixelBuffer;
use crate::hash::ContentHash;

/// A padded square block of pixels produced by dicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Identity used for deduplication.
    pub hash: ContentHash,
    /// Pixel block of side `unit_size + 2 * padding`, padding included.
    pub pixels: PixelBuffer,
}

impl Unit {
    /// Create a unit, hashing its pixel block.
    pub fn from_pixels(pixels: PixelBuffer) -> Self {
        let hash = ContentHash::of(&pixels.to_rgba8());
        Self { hash, pixels }
    }
}

/// Position of a unit inside its source image, in unit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCell {
    /// Column index (x / unit_size).
    pub column: u32,
    /// Row index (y / unit_size).
    pub row: u32,
    /// Unit occupying this cell.
    pub hash: ContentHash,
}

/// A diced sprite: the atomic item assigned to an atlas.
///
/// All units of a texture land in the same atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTexture {
    /// Name of the original artwork.
    pub name: String,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Distinct units, in dicing order.
    pub units: Vec<Unit>,
    /// Cell layout; may be empty for textures built by hand.
    pub cells: Vec<UnitCell>,
}

impl SourceTexture {
    /// Create a texture from units without cell layout.
    pub fn new(name: impl Into<String>, units: Vec<Unit>) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            units,
            cells: Vec::new(),
        }
    }

    /// Hashes of the texture's units, in order.
    pub fn unique_hashes(&self) -> impl Iterator<Item = &ContentHash> + '_ {
        self.units.iter().map(|u| &u.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_hash_follows_pixels() {
        let a = Unit::from_pixels(PixelBuffer::filled(4, 4, [1, 2, 3, 255]));
        let b = Unit::from_pixels(PixelBuffer::filled(4, 4, [1, 2, 3, 255]));
        let c = Unit::from_pixels(PixelBuffer::filled(4, 4, [3, 2, 1, 255]));
        assert_eq!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn test_texture_hash_order() {
        let a = Unit::from_pixels(PixelBuffer::filled(2, 2, [9, 0, 0, 255]));
        let b = Unit::from_pixels(PixelBuffer::filled(2, 2, [0, 9, 0, 255]));
        let texture = SourceTexture::new("pair", vec![a.clone(), b.clone()]);
        let hashes: Vec<_> = texture.unique_hashes().copied().collect();
        assert_eq!(hashes, vec![a.hash, b.hash]);
        assert!(texture.cells.is_empty());
    }
}
