//! Hand-off of finished atlas images to an asset serializer.

use crate::buffer::AtlasImage;
use crate::error::PackResult;
use crate::png::{write_rgba_to_vec_with_hash, PngConfig};

/// Turns a sealed atlas image into an opaque asset handle.
///
/// Called exactly once per finished atlas, in atlas order.
pub trait AtlasSerializer {
    /// Handle stored in the finished atlas.
    type Asset;

    /// Serialize one atlas image.
    fn serialize(&mut self, image: AtlasImage) -> PackResult<Self::Asset>;
}

/// Keeps the sealed image itself as the asset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageSerializer;

impl AtlasSerializer for ImageSerializer {
    type Asset = AtlasImage;

    fn serialize(&mut self, image: AtlasImage) -> PackResult<AtlasImage> {
        Ok(image)
    }
}

/// A PNG-encoded atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngAsset {
    /// Encoded PNG bytes.
    pub png_data: Vec<u8>,
    /// BLAKE3 hash of `png_data`.
    pub hash: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Encodes atlases as deterministic PNG.
#[derive(Debug, Default, Clone)]
pub struct PngSerializer {
    config: PngConfig,
}

impl PngSerializer {
    /// Serializer with explicit PNG settings.
    pub fn new(config: PngConfig) -> Self {
        Self { config }
    }
}

impl AtlasSerializer for PngSerializer {
    type Asset = PngAsset;

    fn serialize(&mut self, image: AtlasImage) -> PackResult<PngAsset> {
        let (png_data, hash) = write_rgba_to_vec_with_hash(&image, &self.config)?;
        Ok(PngAsset {
            png_data,
            hash,
            width: image.width(),
            height: image.height(),
        })
    }
}
