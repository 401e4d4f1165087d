//! Selection of the next texture to pack into the current atlas.

use std::collections::{BTreeMap, BTreeSet};

use crate::hash::ContentHash;
use crate::unit::SourceTexture;

/// Distinct units the atlas would hold after adding `texture`.
///
/// Units already present by hash are not counted again.
pub fn projected_unique_units<V>(
    texture: &SourceTexture,
    placed: &BTreeMap<ContentHash, V>,
) -> usize {
    let fresh: BTreeSet<&ContentHash> = texture
        .unique_hashes()
        .filter(|hash| !placed.contains_key(hash))
        .collect();
    placed.len() + fresh.len()
}

/// Index of the first pending texture whose projected unit count stays
/// within `units_per_atlas`, or `None` if no texture fits.
///
/// Pending textures are scanned in slice order, which keeps selection
/// reproducible for a given input order.
pub fn select_next<V>(
    pending: &[SourceTexture],
    placed: &BTreeMap<ContentHash, V>,
    units_per_atlas: usize,
) -> Option<usize> {
    pending
        .iter()
        .position(|texture| projected_unique_units(texture, placed) <= units_per_atlas)
}
