//! Outer packing loop: fill atlases one at a time until no texture is left.

use std::ops::ControlFlow;

use log::{debug, info, warn};

use crate::atlas::{Atlas, AtlasBuilder};
use crate::config::PackConfig;
use crate::error::{PackError, PackResult};
use crate::selector::{projected_unique_units, select_next};
use crate::serialize::AtlasSerializer;
use crate::unit::SourceTexture;

/// Snapshot reported at every atlas boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackProgress {
    /// Atlases finished so far.
    pub atlases_done: usize,
    /// Textures placed into finished atlases.
    pub textures_packed: usize,
    /// Textures still waiting.
    pub textures_pending: usize,
}

type ProgressFn<'a> = Box<dyn FnMut(&PackProgress) -> ControlFlow<()> + 'a>;

/// Packs source textures into as few atlases as the heuristic allows.
pub struct AtlasPacker<'a> {
    config: PackConfig,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> AtlasPacker<'a> {
    /// Packer for one configuration.
    pub fn new(config: PackConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Observe progress between atlases; `Break` cancels the run.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&PackProgress) -> ControlFlow<()> + 'a,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Pack `textures` (in input order) and serialize every finished atlas.
    pub fn pack<S: AtlasSerializer>(
        &mut self,
        textures: Vec<SourceTexture>,
        serializer: &mut S,
    ) -> PackResult<Vec<Atlas<S::Asset>>> {
        self.config.validate()?;
        let units_per_atlas = self.config.units_per_atlas();

        let mut pending = textures;
        let mut atlases = Vec::new();
        let mut textures_packed = 0;

        while !pending.is_empty() {
            let progress = PackProgress {
                atlases_done: atlases.len(),
                textures_packed,
                textures_pending: pending.len(),
            };
            if let Some(callback) = self.progress.as_mut() {
                if callback(&progress).is_break() {
                    return Err(PackError::Cancelled {
                        atlases_done: atlases.len(),
                    });
                }
            }

            debug!(
                "starting atlas #{} with {} textures pending",
                atlases.len(),
                pending.len()
            );
            let mut builder = AtlasBuilder::new(&self.config);

            while let Some(index) = select_next(&pending, builder.uvs(), units_per_atlas) {
                let texture = pending.remove(index);
                builder.add_texture(texture)?;
            }

            // Unit-less textures fit anywhere, so a page holding no unit
            // means either the next texture is too big or nothing drawable
            // was left.
            if builder.unique_units() == 0 {
                if let Some(texture) = pending.first() {
                    let unique_units = projected_unique_units(texture, builder.uvs());
                    warn!(
                        "texture '{}' needs {} units, atlas holds {}",
                        texture.name, unique_units, units_per_atlas
                    );
                    return Err(PackError::DoesNotFit {
                        texture: texture.name.clone(),
                        unique_units,
                        units_per_atlas,
                        atlas_size_limit: self.config.atlas_size_limit,
                    });
                }
                warn!(
                    "{} texture(s) have no units; no atlas emitted for them",
                    builder.textures().len()
                );
                break;
            }

            textures_packed += builder.textures().len();
            atlases.push(builder.finish(serializer)?);
        }

        info!(
            "packed {} textures into {} atlas(es)",
            textures_packed,
            atlases.len()
        );
        Ok(atlases)
    }
}

/// Pack `textures` with `config`, serializing each atlas with `serializer`.
pub fn pack_atlases<S: AtlasSerializer>(
    textures: Vec<SourceTexture>,
    config: &PackConfig,
    serializer: &mut S,
) -> PackResult<Vec<Atlas<S::Asset>>> {
    AtlasPacker::new(config.clone()).pack(textures, serializer)
}
