//! Packing configuration.
//!
//! A [`PackConfig`] is usually loaded from a JSON file. Every field has a
//! default, so `{}` is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, PackResult};

/// Largest atlas side accepted by [`PackConfig::validate`].
pub const MAX_ATLAS_SIZE: u32 = 16384;

/// Parameters shared by the dicer and the atlas packer for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    /// Logical tile size in pixels, before padding.
    #[serde(default = "default_unit_size")]
    pub unit_size: u32,
    /// Border pixels added on each side of a tile.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Extra fractional shrink of every UV rect (0 disables).
    #[serde(default)]
    pub uv_inset: f32,
    /// Force the final atlas height to equal its width.
    #[serde(default)]
    pub force_square: bool,
    /// Maximum side length of any emitted atlas.
    #[serde(default = "default_atlas_size_limit")]
    pub atlas_size_limit: u32,
    /// Drop fully transparent units while dicing.
    #[serde(default = "default_trim_transparent")]
    pub trim_transparent: bool,
}

fn default_unit_size() -> u32 {
    64
}

fn default_padding() -> u32 {
    2
}

fn default_atlas_size_limit() -> u32 {
    2048
}

fn default_trim_transparent() -> bool {
    true
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            unit_size: default_unit_size(),
            padding: default_padding(),
            uv_inset: 0.0,
            force_square: false,
            atlas_size_limit: default_atlas_size_limit(),
            trim_transparent: default_trim_transparent(),
        }
    }
}

impl PackConfig {
    /// Side of a unit block including padding on both sides.
    pub fn padded_unit_size(&self) -> u32 {
        self.unit_size + self.padding * 2
    }

    /// Capacity heuristic: units in a full square grid of the size limit.
    pub fn units_per_atlas(&self) -> usize {
        let per_side = (self.atlas_size_limit / self.padded_unit_size()) as usize;
        per_side * per_side
    }

    /// Check the configuration for values the packer cannot work with.
    pub fn validate(&self) -> PackResult<()> {
        if self.unit_size == 0 {
            return Err(PackError::InvalidConfig(
                "unit_size must be non-zero".to_string(),
            ));
        }
        if !self.uv_inset.is_finite() || !(0.0..1.0).contains(&self.uv_inset) {
            return Err(PackError::InvalidConfig(format!(
                "uv_inset must be in [0, 1), got {}",
                self.uv_inset
            )));
        }
        if self.atlas_size_limit == 0 || self.atlas_size_limit > MAX_ATLAS_SIZE {
            return Err(PackError::InvalidConfig(format!(
                "atlas_size_limit must be in 1..={}, got {}",
                MAX_ATLAS_SIZE, self.atlas_size_limit
            )));
        }
        let padded = self
            .unit_size
            .checked_add(self.padding.saturating_mul(2))
            .ok_or_else(|| PackError::InvalidConfig("unit_size + padding overflows".to_string()))?;
        if padded > self.atlas_size_limit {
            return Err(PackError::InvalidConfig(format!(
                "padded unit size {} exceeds atlas_size_limit {}",
                padded, self.atlas_size_limit
            )));
        }
        Ok(())
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> PackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> PackResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
