// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame checksums.

use core::str::FromStr;

use crate::{codec::Endian, error::*};

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Sum of all bytes modulo 256
    Mod256,
    /// CRC-16 with the Modbus polynomial
    ModbusCrc16,
}

impl Algorithm {
    /// Number of checksum bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Algorithm::Mod256 => 1,
            Algorithm::ModbusCrc16 => 2,
        }
    }

    /// Compute the checksum of `data` and encode it in the given order.
    #[must_use]
    pub fn checksum(self, data: &[u8], order: Endian) -> Vec<u8> {
        match self {
            Algorithm::Mod256 => vec![mod256(data)],
            Algorithm::ModbusCrc16 => {
                let crc = crc16(data);
                match order {
                    Endian::Big => crc.to_be_bytes().to_vec(),
                    Endian::Little => crc.to_le_bytes().to_vec(),
                }
            }
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mod256" => Ok(Algorithm::Mod256),
            "modbus" | "crc16" => Ok(Algorithm::ModbusCrc16),
            _ => Err(Error::Checksum(name.to_owned())),
        }
    }
}

/// Sum of all bytes, wrapping at 256.
#[must_use]
pub fn mod256(data: &[u8]) -> u8 {
    data.iter().fold(0, |sum, b| sum.wrapping_add(*b))
}

const CRC_TABLE: [u16; 256] = crc_table();

const fn crc_table() -> [u16; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x0001 != 0 {
                (crc >> 1) ^ 0xA001
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Calculate the Modbus CRC-16.
///
/// The result is the register value; Modbus transmits it little-endian.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0xFFFF, |crc, b| {
        (crc >> 8) ^ CRC_TABLE[usize::from((crc ^ u16::from(*b)) as u8)]
    })
}
