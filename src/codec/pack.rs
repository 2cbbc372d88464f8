// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Packing of value lists into byte and register buffers.

use super::*;

/// The quantity the values occupy: bits in a byte grid, registers in a
/// register grid.
///
/// Used for the quantity argument of bulk reads and writes.
#[must_use]
pub fn count(values: &[Value], grid: Grid) -> usize {
    let bits = values
        .iter()
        .filter(|v| v.is_wire())
        .try_fold(0, |bit, v| {
            Placement::new(bit, v.length_bits(), grid, Endian::Big).map(|at| at.offset_bit)
        })
        .unwrap_or(usize::MAX);
    match grid {
        Grid::Byte => bits,
        Grid::Register => bits.div_ceil(16),
    }
}

/// Pack values into bytes; booleans share bytes, everything else is byte
/// aligned.
pub fn to_bytes(values: &[Value], order: Endian) -> Result<Vec<u8>> {
    pack(values, Grid::Byte, order)
}

/// Pack values into 16 bit registers.
///
/// Multi-byte values start on a register boundary and the result always
/// has an even length.
pub fn to_registers(values: &[Value], order: Endian) -> Result<Vec<u8>> {
    let mut buf = pack(values, Grid::Register, order)?;
    if buf.len() % 2 != 0 {
        buf.push(0);
    }
    Ok(buf)
}

fn pack(values: &[Value], grid: Grid, order: Endian) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut bit = 0;
    for value in values.iter().filter(|v| v.is_wire()) {
        // In-memory values always fit.
        let Some(at) = Placement::new(bit, value.length_bits(), grid, order) else {
            break;
        };
        let bytes = value.write(order)?;
        if buf.len() < at.end {
            buf.resize(at.end, 0);
        }
        match value {
            Value::Bool(true) => buf[at.start] |= 1 << at.bit,
            Value::Bool(false) => {}
            _ => buf[at.start..at.end].copy_from_slice(&bytes),
        }
        bit = at.offset_bit;
    }
    Ok(buf)
}
