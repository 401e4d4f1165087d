//! In-progress and finished atlases.
//!
//! An [`AtlasBuilder`] owns one full-size pixel buffer and the content-hash
//! to UV map for that page. UV rects are computed against the full size
//! limit while packing and rescaled once the buffer is cropped in
//! [`AtlasBuilder::finish`].

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::buffer::{AlphaMode, PixelBuffer};
use crate::config::PackConfig;
use crate::error::{PackError, PackResult};
use crate::geometry::{unit_uv_rect, UvRect};
use crate::hash::ContentHash;
use crate::serialize::AtlasSerializer;
use crate::shelf::ShelfPacker;
use crate::unit::SourceTexture;

/// A finished atlas page.
#[derive(Debug, Clone)]
pub struct Atlas<A> {
    /// Serialized image handle.
    pub asset: A,
    /// Final image width in pixels.
    pub width: u32,
    /// Final image height in pixels.
    pub height: u32,
    /// UV rect of every unit in this atlas, valid for the cropped image.
    pub uvs: BTreeMap<ContentHash, UvRect>,
    /// Packed textures in pack order.
    pub textures: Vec<SourceTexture>,
}

impl<A> Atlas<A> {
    /// UV rect of a unit, if it lives in this atlas.
    pub fn uv(&self, hash: &ContentHash) -> Option<&UvRect> {
        self.uvs.get(hash)
    }

    /// True when the named texture was packed into this atlas.
    pub fn contains_texture(&self, name: &str) -> bool {
        self.textures.iter().any(|t| t.name == name)
    }
}

/// One atlas being filled.
#[derive(Debug)]
pub struct AtlasBuilder<'c> {
    config: &'c PackConfig,
    buffer: PixelBuffer,
    shelves: ShelfPacker,
    uvs: BTreeMap<ContentHash, UvRect>,
    textures: Vec<SourceTexture>,
}

impl<'c> AtlasBuilder<'c> {
    /// Start an empty atlas with a `limit x limit` buffer.
    pub fn new(config: &'c PackConfig) -> Self {
        let limit = config.atlas_size_limit;
        Self {
            config,
            buffer: PixelBuffer::new(limit, limit),
            shelves: ShelfPacker::new(config.padded_unit_size(), limit),
            uvs: BTreeMap::new(),
            textures: Vec::new(),
        }
    }

    /// Units placed so far, keyed by content hash.
    pub fn uvs(&self) -> &BTreeMap<ContentHash, UvRect> {
        &self.uvs
    }

    /// Number of distinct units placed.
    pub fn unique_units(&self) -> usize {
        self.uvs.len()
    }

    /// Textures packed so far.
    pub fn textures(&self) -> &[SourceTexture] {
        &self.textures
    }

    /// Place every unit of `texture` not already present by hash.
    ///
    /// Units already in the atlas share the existing UV rect.
    pub fn add_texture(&mut self, texture: SourceTexture) -> PackResult<()> {
        let size = self.config.padded_unit_size();

        for unit in &texture.units {
            if unit.pixels.width != size || unit.pixels.height != size {
                return Err(PackError::UnitSizeMismatch {
                    texture: texture.name.clone(),
                    expected: size,
                    width: unit.pixels.width,
                    height: unit.pixels.height,
                });
            }
        }

        for unit in &texture.units {
            if self.uvs.contains_key(&unit.hash) {
                continue;
            }
            let (x, y) = self.shelves.place().ok_or_else(|| PackError::DoesNotFit {
                texture: texture.name.clone(),
                unique_units: texture.units.len(),
                units_per_atlas: self.config.units_per_atlas(),
                atlas_size_limit: self.config.atlas_size_limit,
            })?;
            self.buffer.blit(&unit.pixels, x, y);
            let uv = unit_uv_rect(x, y, self.config);
            trace!("unit {} -> ({}, {}) in '{}'", unit.hash, x, y, texture.name);
            self.uvs.insert(unit.hash, uv);
        }

        self.textures.push(texture);
        Ok(())
    }

    /// Width and height the finished atlas will have.
    pub fn used_size(&self) -> (u32, u32) {
        let width = self.shelves.width();
        let height = if self.config.force_square {
            width
        } else {
            self.shelves.used_height()
        };
        (width, height)
    }

    /// Crop unused space, rescale UV rects to the crop, seal and serialize.
    ///
    /// Fails with [`PackError::EmptyAtlas`] when no unit was placed; such an
    /// atlas has no rows to crop to.
    pub fn finish<S: AtlasSerializer>(self, serializer: &mut S) -> PackResult<Atlas<S::Asset>> {
        if self.uvs.is_empty() {
            return Err(PackError::EmptyAtlas);
        }
        let limit = self.config.atlas_size_limit;
        let (width, height) = self.used_size();
        let keep_full =
            width == limit && (self.config.force_square || height == limit);

        let (buffer, uvs) = if keep_full {
            (self.buffer, self.uvs)
        } else {
            let sx = limit as f32 / width as f32;
            let sy = limit as f32 / height as f32;
            let uvs = self
                .uvs
                .into_iter()
                .map(|(hash, uv)| (hash, uv.scale(sx, sy)))
                .collect();
            (self.buffer.crop(0, 0, width, height), uvs)
        };

        debug!(
            "finished {}x{} atlas: {} units from {} textures{}",
            width,
            height,
            uvs.len(),
            self.textures.len(),
            if keep_full { "" } else { " (cropped)" }
        );

        let asset = serializer.serialize(buffer.seal(AlphaMode::Transparent))?;
        Ok(Atlas {
            asset,
            width,
            height,
            uvs,
            textures: self.textures,
        })
    }
}
