//! Reference dicer: splits a sprite image into padded, hashed units.
//!
//! The image is covered by a grid of `unit_size` cells. Content pixels that
//! fall outside the image are transparent. Padding pixels are taken from
//! the neighbouring image content, clamped to the grid, so that bilinear
//! sampling near a unit edge sees the same colors it would in the source.

use std::collections::HashSet;

use crate::buffer::{PixelBuffer, Rgba, TRANSPARENT};
use crate::config::PackConfig;
use crate::unit::{SourceTexture, Unit, UnitCell};

/// Dice `image` into a [`SourceTexture`] named `name`.
///
/// Identical padded blocks are stored once and referenced by several cells.
/// With `trim_transparent`, cells without any visible content are skipped.
pub fn dice_texture(
    name: impl Into<String>,
    image: &PixelBuffer,
    config: &PackConfig,
) -> SourceTexture {
    let name = name.into();
    let unit = config.unit_size;
    let columns = image.width.div_ceil(unit);
    let rows = image.height.div_ceil(unit);

    let mut units = Vec::new();
    let mut cells = Vec::new();
    let mut seen = HashSet::new();

    for row in 0..rows {
        for column in 0..columns {
            let origin = (column * unit, row * unit);
            if config.trim_transparent && content_is_transparent(image, origin, unit) {
                continue;
            }

            let block = padded_block(image, origin, config, (columns * unit, rows * unit));
            let diced = Unit::from_pixels(block);
            cells.push(UnitCell {
                column,
                row,
                hash: diced.hash,
            });
            if seen.insert(diced.hash) {
                units.push(diced);
            }
        }
    }

    log::debug!(
        "diced '{}' ({}x{}): {} cells, {} unique units",
        name,
        image.width,
        image.height,
        cells.len(),
        units.len()
    );

    SourceTexture {
        name,
        width: image.width,
        height: image.height,
        units,
        cells,
    }
}

/// Pixel of the image extended with transparency, clamped to the grid.
fn grid_sample(image: &PixelBuffer, x: i64, y: i64, grid: (u32, u32)) -> Rgba {
    let gx = x.clamp(0, grid.0 as i64 - 1) as u32;
    let gy = y.clamp(0, grid.1 as i64 - 1) as u32;
    if gx < image.width && gy < image.height {
        image.get(gx, gy)
    } else {
        TRANSPARENT
    }
}

fn padded_block(
    image: &PixelBuffer,
    origin: (u32, u32),
    config: &PackConfig,
    grid: (u32, u32),
) -> PixelBuffer {
    let size = config.padded_unit_size();
    let padding = config.padding as i64;
    let mut block = PixelBuffer::new(size, size);
    for by in 0..size {
        for bx in 0..size {
            let x = origin.0 as i64 + bx as i64 - padding;
            let y = origin.1 as i64 + by as i64 - padding;
            block.set(bx, by, grid_sample(image, x, y, grid));
        }
    }
    block
}

/// Edge cells are clipped to the image; the area past it counts as empty.
fn content_is_transparent(image: &PixelBuffer, origin: (u32, u32), unit: u32) -> bool {
    let width = unit.min(image.width - origin.0);
    let height = unit.min(image.height - origin.1);
    image.crop(origin.0, origin.1, width, height).is_transparent()
}
