//! Serializable description of a packing run.
//!
//! The manifest is what downstream mesh/material generators read: for every
//! source texture and every cell of it, which atlas file holds the pixels and
//! at which UV rect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::atlas::Atlas;
use crate::config::PackConfig;
use crate::geometry::UvRect;
use crate::hash::ContentHash;
use crate::serialize::PngAsset;

/// File name of the atlas at `index`.
pub fn atlas_file_name(index: usize) -> String {
    format!("atlas_{index}.png")
}

/// Output of one packing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasManifest {
    /// Unit size used for dicing.
    pub unit_size: u32,
    /// Padding used for dicing.
    pub padding: u32,
    /// UV inset applied to every rect.
    pub uv_inset: f32,
    /// Atlases in emission order.
    pub atlases: Vec<AtlasRecord>,
}

/// One atlas image and its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasRecord {
    /// Image file name, relative to the manifest.
    pub file: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// BLAKE3 hash of the PNG file.
    pub hash: String,
    /// UV rect per unit content hash.
    pub units: BTreeMap<ContentHash, UvRect>,
    /// Textures packed into this atlas, in pack order.
    pub textures: Vec<TextureRecord>,
}

/// Layout of one source texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    /// Texture name.
    pub name: String,
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Cells in row-major order.
    pub cells: Vec<CellRecord>,
}

/// One diced cell of a source texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Column in unit coordinates.
    pub column: u32,
    /// Row in unit coordinates.
    pub row: u32,
    /// Unit content hash; key into [`AtlasRecord::units`].
    pub hash: ContentHash,
}

impl AtlasManifest {
    /// Describe PNG atlases produced with `config`.
    pub fn from_atlases(config: &PackConfig, atlases: &[Atlas<PngAsset>]) -> Self {
        let atlases = atlases
            .iter()
            .enumerate()
            .map(|(index, atlas)| AtlasRecord {
                file: atlas_file_name(index),
                width: atlas.width,
                height: atlas.height,
                hash: atlas.asset.hash.clone(),
                units: atlas.uvs.clone(),
                textures: atlas
                    .textures
                    .iter()
                    .map(|texture| TextureRecord {
                        name: texture.name.clone(),
                        width: texture.width,
                        height: texture.height,
                        cells: texture
                            .cells
                            .iter()
                            .map(|cell| CellRecord {
                                column: cell.column,
                                row: cell.row,
                                hash: cell.hash,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            unit_size: config.unit_size,
            padding: config.padding,
            uv_inset: config.uv_inset,
            atlases,
        }
    }

    /// Atlas index and UV rect for a cell of a named texture.
    pub fn resolve(&self, texture: &str, column: u32, row: u32) -> Option<(usize, UvRect)> {
        self.atlases.iter().enumerate().find_map(|(index, atlas)| {
            let record = atlas.textures.iter().find(|t| t.name == texture)?;
            let cell = record
                .cells
                .iter()
                .find(|c| c.column == column && c.row == row)?;
            atlas.units.get(&cell.hash).map(|uv| (index, *uv))
        })
    }

    /// Total number of packed textures.
    pub fn texture_count(&self) -> usize {
        self.atlases.iter().map(|a| a.textures.len()).sum()
    }
}
