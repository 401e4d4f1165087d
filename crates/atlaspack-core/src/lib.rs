//! Atlaspack core: dicing and atlas packing for sprite textures.
//!
//! Sprites are diced into fixed-size, padded units. Identical units are
//! stored once per atlas and referenced by content hash, and units are laid
//! out on a grid of shelves inside a square working area that grows up to a
//! configured size limit.
//!
//! # Pipeline
//!
//! - **Dicing**: [`dice_texture`] splits an image into a [`SourceTexture`]
//! - **Selection**: the first pending texture, in input order, that still fits
//!   the current atlas goes next; shared units do not count twice
//! - **Placement**: [`shelf::ShelfPacker`] picks the slot for each new unit
//! - **Finalization**: the atlas is cropped, UVs rescaled, and the image handed
//!   to an [`AtlasSerializer`]
//!
//! # Example
//!
//! ```no_run
//! use atlaspack_core::{dice_texture, pack_atlases, PackConfig, PixelBuffer, PngSerializer};
//!
//! let config = PackConfig::default();
//! let image = PixelBuffer::filled(256, 128, [255, 0, 0, 255]);
//! let textures = vec![dice_texture("hero", &image, &config)];
//!
//! let atlases = pack_atlases(textures, &config, &mut PngSerializer::default()).unwrap();
//! for atlas in &atlases {
//!     println!("{}x{} with {} units", atlas.width, atlas.height, atlas.uvs.len());
//! }
//! ```
//!
//! # Determinism
//!
//! Given the same textures in the same order and the same configuration,
//! placement, UV rects and encoded PNG bytes are identical across runs.

pub mod atlas;
pub mod buffer;
pub mod config;
pub mod dice;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod manifest;
pub mod packer;
pub mod png;
pub mod selector;
pub mod serialize;
pub mod shelf;
pub mod unit;

// Re-export main types for convenience
pub use atlas::{Atlas, AtlasBuilder};
pub use buffer::{AlphaMode, AtlasImage, PixelBuffer, Rgba};
pub use config::PackConfig;
pub use dice::dice_texture;
pub use error::{PackError, PackResult};
pub use geometry::UvRect;
pub use hash::ContentHash;
pub use manifest::{AtlasManifest, AtlasRecord, CellRecord, TextureRecord};
pub use packer::{pack_atlases, AtlasPacker, PackProgress};
pub use crate::png::{PngConfig, PngError};
pub use serialize::{AtlasSerializer, ImageSerializer, PngAsset, PngSerializer};
pub use unit::{SourceTexture, Unit, UnitCell};
