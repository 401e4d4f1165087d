//! Shelf layout of units inside a growing square working area.
//!
//! Units all share one padded size, so a shelf is a row of height
//! `padded_unit_size` and is fully described by its y position and the x of
//! the last unit placed on it. Shelves live in a `BTreeMap` keyed by y so the
//! first and last rows are cheap, ordered queries.
//!
//! Placement of one unit:
//! 1. Among shelves with at least two unit widths left before the working
//!    width, pick the least filled one (lowest y on ties) and place right of
//!    its last unit.
//! 2. Otherwise open the first shelf at y = 0, or a new shelf below the last
//!    one while it still fits in the square working area.
//! 3. Otherwise double the working width (clamped to the size limit) and
//!    continue the first shelf.

use std::collections::BTreeMap;

use crate::geometry::{grow_width, initial_width};

/// Row-based placement state for one atlas.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    padded_unit_size: u32,
    limit: u32,
    width: u32,
    /// y of each shelf -> x of the last unit placed on it.
    shelves: BTreeMap<u32, u32>,
}

impl ShelfPacker {
    /// Create an empty layout.
    pub fn new(padded_unit_size: u32, limit: u32) -> Self {
        Self {
            padded_unit_size,
            limit,
            width: initial_width(padded_unit_size, limit),
            shelves: BTreeMap::new(),
        }
    }

    /// Current working width; never exceeds the size limit.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height down to the bottom of the lowest shelf.
    pub fn used_height(&self) -> u32 {
        self.shelves
            .last_key_value()
            .map_or(0, |(&y, _)| y + self.padded_unit_size)
    }

    /// Reserve space for one unit and return its top-left pixel position.
    ///
    /// Returns `None` when the working area is at the size limit and full.
    pub fn place(&mut self) -> Option<(u32, u32)> {
        let size = self.padded_unit_size;
        let slack = size * 2;

        let least_filled = self
            .shelves
            .iter()
            .filter(|(_, &last_x)| last_x + slack <= self.width)
            .min_by_key(|(&y, &last_x)| (last_x, y))
            .map(|(&y, &last_x)| (y, last_x));

        if let Some((y, last_x)) = least_filled {
            let x = last_x + size;
            self.shelves.insert(y, x);
            return Some((x, y));
        }

        let last_y = match self.shelves.last_key_value() {
            None => {
                self.shelves.insert(0, 0);
                return Some((0, 0));
            }
            Some((&last_y, _)) => last_y,
        };

        if last_y + slack <= self.width {
            let y = last_y + size;
            self.shelves.insert(y, 0);
            return Some((0, y));
        }

        if self.width >= self.limit {
            return None;
        }
        self.width = grow_width(self.width, self.limit);

        let (&first_y, &first_x) = self.shelves.first_key_value()?;
        let x = first_x + size;
        if x + size > self.width {
            return None;
        }
        self.shelves.insert(first_y, x);
        Some((x, first_y))
    }
}
