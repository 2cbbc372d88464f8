// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{Endian, report::Rendering};

/// A fixed-width numeric type that can live inside a frame.
pub trait Scalar: Copy + PartialOrd + fmt::Display {
    /// Width in bits.
    const WIDTH: usize;

    /// Read from exactly `Self::WIDTH / 8` bytes.
    fn read(bytes: &[u8], order: Endian) -> Self;

    /// Canonical bytes in the given order.
    fn write(self, order: Endian) -> Vec<u8>;

    /// The raw bit pattern, zero-extended.
    fn raw_bits(self) -> u64;

    fn render(self) -> Rendering {
        let raw = self.raw_bits();
        Rendering {
            dec: self.to_string(),
            hex: format!("{raw:0w$X}", w = Self::WIDTH / 4),
            bin: format!("{raw:0w$b}", w = Self::WIDTH),
        }
    }
}

impl Scalar for u8 {
    const WIDTH: usize = 8;

    fn read(bytes: &[u8], _: Endian) -> Self {
        bytes[0]
    }

    fn write(self, _: Endian) -> Vec<u8> {
        vec![self]
    }

    fn raw_bits(self) -> u64 {
        u64::from(self)
    }
}

impl Scalar for i8 {
    const WIDTH: usize = 8;

    fn read(bytes: &[u8], _: Endian) -> Self {
        bytes[0] as i8
    }

    fn write(self, _: Endian) -> Vec<u8> {
        vec![self as u8]
    }

    fn raw_bits(self) -> u64 {
        u64::from(self as u8)
    }
}

macro_rules! impl_scalar {
    ($t:ty, $bits:expr, $read:ident, $write:ident, |$v:ident| $raw:expr) => {
        impl Scalar for $t {
            const WIDTH: usize = $bits;

            fn read(bytes: &[u8], order: Endian) -> Self {
                match order {
                    Endian::Big => BigEndian::$read(bytes),
                    Endian::Little => LittleEndian::$read(bytes),
                }
            }

            fn write(self, order: Endian) -> Vec<u8> {
                let mut buf = vec![0; $bits / 8];
                match order {
                    Endian::Big => BigEndian::$write(&mut buf, self),
                    Endian::Little => LittleEndian::$write(&mut buf, self),
                }
                buf
            }

            fn raw_bits(self) -> u64 {
                let $v = self;
                $raw
            }
        }
    };
}

impl_scalar!(u16, 16, read_u16, write_u16, |v| u64::from(v));
impl_scalar!(u32, 32, read_u32, write_u32, |v| u64::from(v));
impl_scalar!(u64, 64, read_u64, write_u64, |v| v);
impl_scalar!(i16, 16, read_i16, write_i16, |v| u64::from(v as u16));
impl_scalar!(i32, 32, read_i32, write_i32, |v| u64::from(v as u32));
impl_scalar!(i64, 64, read_i64, write_i64, |v| v as u64);
impl_scalar!(f32, 32, read_f32, write_f32, |v| u64::from(v.to_bits()));
impl_scalar!(f64, 64, read_f64, write_f64, |v| v.to_bits());
