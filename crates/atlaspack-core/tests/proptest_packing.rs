//! Property-based packing tests using proptest.
//!
//! Textures are built from flat-colored units so that the seed of a unit is
//! its identity. Every generated run must satisfy the layout guarantees for
//! any input order and any mix of shared units.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p atlaspack-core --test proptest_packing
//! ```

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use atlaspack_core::shelf::ShelfPacker;
use atlaspack_core::{
    pack_atlases, ImageSerializer, PackConfig, PixelBuffer, SourceTexture, Unit, UvRect,
};

// 6 px padded units in a 32 px atlas: 5x5 = 25 units per atlas.
fn config() -> PackConfig {
    PackConfig {
        unit_size: 4,
        padding: 1,
        atlas_size_limit: 32,
        ..PackConfig::default()
    }
}

fn unit(seed: u8) -> Unit {
    Unit::from_pixels(PixelBuffer::filled(6, 6, [seed, seed / 2, 255 - seed, 255]))
}

fn arbitrary_textures() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..48, 1..12), 0..10)
}

fn build(textures: &[Vec<u8>]) -> Vec<SourceTexture> {
    textures
        .iter()
        .enumerate()
        .map(|(i, seeds)| {
            SourceTexture::new(format!("t{i}"), seeds.iter().map(|&s| unit(s)).collect())
        })
        .collect()
}

proptest! {
    /// Every texture is packed exactly once and all of its units live in
    /// the atlas that holds it.
    #[test]
    fn every_texture_packed_whole(textures in arbitrary_textures()) {
        let config = config();
        let atlases = pack_atlases(build(&textures), &config, &mut ImageSerializer).unwrap();

        let mut seen = BTreeSet::new();
        for atlas in &atlases {
            prop_assert!(!atlas.textures.is_empty());
            prop_assert!(atlas.uvs.len() <= config.units_per_atlas());
            for texture in &atlas.textures {
                prop_assert!(seen.insert(texture.name.clone()));
                for unit in &texture.units {
                    prop_assert!(atlas.uvs.contains_key(&unit.hash));
                }
            }
        }
        prop_assert_eq!(seen.len(), textures.len());
    }

    /// UV rects stay inside the atlas and never overlap.
    #[test]
    fn uv_rects_in_bounds_and_disjoint(textures in arbitrary_textures(), inset in 0.0f32..0.5) {
        let config = PackConfig { uv_inset: inset, ..config() };
        let atlases = pack_atlases(build(&textures), &config, &mut ImageSerializer).unwrap();

        for atlas in &atlases {
            let rects: Vec<UvRect> = atlas.uvs.values().copied().collect();
            for (i, a) in rects.iter().enumerate() {
                prop_assert!(a.x >= 0.0 && a.y >= 0.0);
                prop_assert!(a.x_max() <= 1.0 + 1e-5 && a.y_max() <= 1.0 + 1e-5);
                for b in &rects[i + 1..] {
                    prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    /// Identical inputs give identical layouts.
    #[test]
    fn packing_is_reproducible(textures in arbitrary_textures()) {
        let config = config();
        let a = pack_atlases(build(&textures), &config, &mut ImageSerializer).unwrap();
        let b = pack_atlases(build(&textures), &config, &mut ImageSerializer).unwrap();

        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            let ux: BTreeMap<_, _> = x.uvs.iter().map(|(h, uv)| (*h, (uv.x, uv.y))).collect();
            let uy: BTreeMap<_, _> = y.uvs.iter().map(|(h, uv)| (*h, (uv.x, uv.y))).collect();
            prop_assert_eq!(ux, uy);
            prop_assert_eq!(&x.asset, &y.asset);
        }
    }

    /// The shelf layout never leaves the working width and fills exactly
    /// the capacity the selector assumes.
    #[test]
    fn shelf_layout_fills_capacity(size in 4u32..40, limit in 1u32..300) {
        prop_assume!(size <= limit);
        let mut packer = ShelfPacker::new(size, limit);
        let mut cells = BTreeSet::new();
        while let Some((x, y)) = packer.place() {
            prop_assert!(x + size <= packer.width());
            prop_assert!(y + size <= packer.width());
            prop_assert!(packer.width() <= limit);
            prop_assert!(cells.insert((x, y)));
        }
        let per_side = (limit / size) as usize;
        prop_assert_eq!(cells.len(), per_side * per_side);
    }
}
