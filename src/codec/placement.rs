// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Endian, Grid};

/// The location of a field inside a raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The first byte of the field
    pub start: usize,
    /// One past the last byte of the field
    pub end: usize,
    /// Bit to test inside `start` (booleans only)
    pub bit: u8,
    /// The cursor after this field
    pub offset_bit: usize,
}

impl Placement {
    /// Place a field of `width` bits at the cursor `current_bit`.
    ///
    /// The cursor is aligned to `min(width, grid)`. A field narrower than
    /// the grid shares a grid slot with its neighbours; in little-endian
    /// order its byte position inside the slot is mirrored, so the first
    /// sub-word is the most significant byte of the slot value.
    ///
    /// `None` if the field would end beyond `usize::MAX` bits.
    #[must_use]
    pub fn new(current_bit: usize, width: usize, grid: Grid, order: Endian) -> Option<Self> {
        let grid_bits = grid.bits();
        let align = width.clamp(1, grid_bits);
        let aligned = current_bit.div_ceil(align).checked_mul(align)?;
        let offset_bit = aligned.checked_add(width)?;
        let (start, end) = if width >= grid_bits {
            (aligned / 8, offset_bit.div_ceil(8))
        } else {
            let slot = aligned - aligned % grid_bits;
            let slots = grid_bits / 8;
            let index = (aligned % grid_bits) / 8;
            let index = match order {
                Endian::Big => index,
                Endian::Little => slots - 1 - index,
            };
            let start = slot / 8 + index;
            (start, start + width.div_ceil(8))
        };
        Some(Placement {
            start,
            end,
            bit: (aligned % 8) as u8,
            offset_bit,
        })
    }

    /// Number of bytes a buffer needs to contain this field.
    #[must_use]
    pub const fn required_len(&self) -> usize {
        self.end
    }
}
