// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed test values and their bit-exact wire codec.

use core::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::{error::*, exception::Exception, util::Delay};

mod pack;
mod placement;
mod report;
mod scalar;

pub use self::{pack::*, placement::*, report::*, scalar::*};

/// Byte order of multi-byte values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Endian {
    #[default]
    #[serde(alias = "bigEndian", alias = "BigEndian")]
    Big,
    #[serde(alias = "littleEndian", alias = "LittleEndian")]
    Little,
}

/// The alignment unit fields are packed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    /// Byte oriented frames and bit tables.
    Byte,
    /// 16 bit register tables.
    Register,
}

impl Grid {
    /// Width of one grid unit in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Self::Byte => 8,
            Self::Register => 16,
        }
    }

    /// Cursor position of an explicit address.
    ///
    /// A register grid is addressed in registers. A byte grid is addressed
    /// in bits for booleans and in bytes otherwise.
    #[must_use]
    pub const fn address_bit(self, address: usize, is_bool: bool) -> usize {
        match self {
            Self::Register => address.saturating_mul(16),
            Self::Byte if is_bool => address,
            Self::Byte => address.saturating_mul(8),
        }
    }
}

/// An expected number: either exact or inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expect<T> {
    Exact(T),
    /// A missing bound leaves that side unconstrained.
    Range { min: Option<T>, max: Option<T> },
}

impl<T: Scalar> Expect<T> {
    /// Returns `true` if `got` satisfies the expectation.
    pub fn matches(&self, got: T) -> bool {
        match *self {
            Self::Exact(v) => got == v,
            Self::Range { min, max } => {
                min.is_none_or(|min| got >= min) && max.is_none_or(|max| got <= max)
            }
        }
    }

    fn render(&self) -> Rendering {
        match *self {
            Self::Exact(v) => v.render(),
            Self::Range { min, max } => Rendering::range(min.map(T::render), max.map(T::render)),
        }
    }
}

impl<T> Expect<T> {
    /// Returns `true` for bounds rather than an exact value.
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Empty,
    Int8,
    RangeInt8,
    Int16,
    RangeInt16,
    Int32,
    RangeInt32,
    Int64,
    RangeInt64,
    Uint8,
    RangeUint8,
    Uint16,
    RangeUint16,
    Uint32,
    RangeUint32,
    Uint64,
    RangeUint64,
    Float32,
    RangeFloat32,
    Float64,
    RangeFloat64,
    Bool,
    String,
    Byte,
    Time,
    Error,
}

impl Type {
    const fn get_name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Int8 => "int8",
            Self::RangeInt8 => "minMaxInt8",
            Self::Int16 => "int16",
            Self::RangeInt16 => "minMaxInt16",
            Self::Int32 => "int32",
            Self::RangeInt32 => "minMaxInt32",
            Self::Int64 => "int64",
            Self::RangeInt64 => "minMaxInt64",
            Self::Uint8 => "uint8",
            Self::RangeUint8 => "minMaxUint8",
            Self::Uint16 => "uint16",
            Self::RangeUint16 => "minMaxUint16",
            Self::Uint32 => "uint32",
            Self::RangeUint32 => "minMaxUint32",
            Self::Uint64 => "uint64",
            Self::RangeUint64 => "minMaxUint64",
            Self::Float32 => "float32",
            Self::RangeFloat32 => "minMaxFloat32",
            Self::Float64 => "float64",
            Self::RangeFloat64 => "minMaxFloat64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Byte => "byte",
            Self::Time => "time",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

/// A typed test value: something to write, or something to expect.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Int8(Expect<i8>),
    Int16(Expect<i16>),
    Int32(Expect<i32>),
    Int64(Expect<i64>),
    Uint8(Expect<u8>),
    Uint16(Expect<u16>),
    Uint32(Expect<u32>),
    Uint64(Expect<u64>),
    Float32(Expect<f32>),
    Float64(Expect<f64>),
    Bool(bool),
    String(String),
    Byte(Vec<u8>),
    /// Upper bound of the elapsed time; never read from bytes.
    Time(Delay),
    /// Expected error text; never read from bytes.
    Error(String),
}

/// Evaluate `$body` with `$e` bound to the [`Expect`] of a numeric value.
macro_rules! numeric {
    ($value:expr, $e:ident => $body:expr, _ => $other:expr) => {
        match $value {
            Value::Int8($e) => $body,
            Value::Int16($e) => $body,
            Value::Int32($e) => $body,
            Value::Int64($e) => $body,
            Value::Uint8($e) => $body,
            Value::Uint16($e) => $body,
            Value::Uint32($e) => $body,
            Value::Uint64($e) => $body,
            Value::Float32($e) => $body,
            Value::Float64($e) => $body,
            _ => $other,
        }
    };
}

/// What was received from a device under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct Received<'a> {
    /// Raw payload bytes
    pub bytes: &'a [u8],
    /// Time the device took to answer
    pub elapsed: Duration,
    /// Error text reported instead of an answer
    pub error: &'a str,
}

impl<'a> Received<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Received {
            bytes,
            elapsed: Duration::ZERO,
            error: "",
        }
    }

    #[must_use]
    pub const fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    #[must_use]
    pub const fn with_error(mut self, error: &'a str) -> Self {
        self.error = error;
        self
    }
}

impl Value {
    /// The kind of this value. An exact number is never reported as a range.
    #[must_use]
    pub fn kind(&self) -> Type {
        const fn pick<T>(e: &Expect<T>, exact: Type, range: Type) -> Type {
            if e.is_range() { range } else { exact }
        }
        match self {
            Self::Empty => Type::Empty,
            Self::Int8(e) => pick(e, Type::Int8, Type::RangeInt8),
            Self::Int16(e) => pick(e, Type::Int16, Type::RangeInt16),
            Self::Int32(e) => pick(e, Type::Int32, Type::RangeInt32),
            Self::Int64(e) => pick(e, Type::Int64, Type::RangeInt64),
            Self::Uint8(e) => pick(e, Type::Uint8, Type::RangeUint8),
            Self::Uint16(e) => pick(e, Type::Uint16, Type::RangeUint16),
            Self::Uint32(e) => pick(e, Type::Uint32, Type::RangeUint32),
            Self::Uint64(e) => pick(e, Type::Uint64, Type::RangeUint64),
            Self::Float32(e) => pick(e, Type::Float32, Type::RangeFloat32),
            Self::Float64(e) => pick(e, Type::Float64, Type::RangeFloat64),
            Self::Bool(_) => Type::Bool,
            Self::String(_) => Type::String,
            Self::Byte(_) => Type::Byte,
            Self::Time(_) => Type::Time,
            Self::Error(_) => Type::Error,
        }
    }

    /// Canonical width in bits; zero for values that are not read from bytes.
    #[must_use]
    pub fn length_bits(&self) -> usize {
        const fn width<T: Scalar>(_: &Expect<T>) -> usize {
            T::WIDTH
        }
        match self {
            Self::Bool(_) => 1,
            Self::String(s) => 8 * s.len(),
            Self::Byte(b) => 8 * b.len(),
            Self::Empty | Self::Time(_) | Self::Error(_) => 0,
            _ => numeric!(self, e => width(e), _ => 0),
        }
    }

    /// Returns `true` if the value occupies bytes in a frame.
    #[must_use]
    pub fn is_wire(&self) -> bool {
        !matches!(self, Self::Empty | Self::Time(_) | Self::Error(_))
    }

    /// Serialize the value to its canonical bytes.
    ///
    /// Booleans become a single `0`/`1` byte. Ranges and values that never
    /// appear on the wire can not be written.
    pub fn write(&self, order: Endian) -> Result<Vec<u8>> {
        match self {
            Self::Bool(b) => Ok(vec![u8::from(*b)]),
            Self::String(s) => Ok(s.as_bytes().to_vec()),
            Self::Byte(b) => Ok(b.clone()),
            _ => numeric!(self, e => match e {
                Expect::Exact(v) => Ok(v.write(order)),
                Expect::Range { .. } => Err(Error::NotWritable(self.kind())),
            }, _ => Err(Error::NotWritable(self.kind()))),
        }
    }

    /// Replace an exception name with the text a Modbus client reports.
    ///
    /// Returns `true` if the error text was rewritten.
    pub fn substitute_error(&mut self) -> bool {
        let Self::Error(text) = self else {
            return false;
        };
        let Some(exception) = Exception::from_name(text) else {
            return false;
        };
        *text = exception.error_text();
        true
    }

    /// The expected side of a report.
    #[must_use]
    pub fn expected(&self) -> Rendering {
        match self {
            Self::Empty => Rendering::default(),
            Self::Bool(b) => Rendering::flag(*b),
            Self::String(s) => Rendering::bytes(s.clone(), s.as_bytes()),
            Self::Byte(b) => Rendering::bytes(decimal(b), b),
            Self::Time(delay) => render_delay(*delay),
            Self::Error(text) => Rendering::bytes(text.clone(), text.as_bytes()),
            _ => numeric!(self, e => e.render(), _ => Rendering::default()),
        }
    }

    /// Check the received data against this value.
    ///
    /// `current_bit` is the cursor into `received.bytes`; the returned
    /// cursor points behind this field. A buffer too short for the field
    /// fails the check without reading.
    #[must_use]
    pub fn check(
        &self,
        received: &Received<'_>,
        current_bit: usize,
        grid: Grid,
        order: Endian,
    ) -> (usize, Report) {
        let kind = self.kind();
        let expected = self.expected();
        match self {
            Self::Empty => {
                return (current_bit, Report::new(kind, true, expected, Rendering::default()));
            }
            Self::Time(delay) => {
                let pass = delay.duration().is_some_and(|max| received.elapsed <= max);
                let got = render_delay(Delay::Fixed(received.elapsed));
                return (current_bit, Report::new(kind, pass, expected, got));
            }
            Self::Error(text) => {
                let pass = received.error == text.as_str();
                let got = Rendering::bytes(received.error.into(), received.error.as_bytes());
                return (current_bit, Report::new(kind, pass, expected, got));
            }
            _ => {}
        }

        let Some(at) = Placement::new(current_bit, self.length_bits(), grid, order) else {
            return (
                usize::MAX,
                Report::new(kind, false, expected, Rendering::default()),
            );
        };
        let Some(raw) = received.bytes.get(at.start..at.required_len()) else {
            return (
                at.offset_bit,
                Report::new(kind, false, expected, Rendering::default()),
            );
        };
        let (pass, got) = match self {
            Self::Bool(b) => {
                let bit = (raw[0] >> at.bit) & 1 == 1;
                (bit == *b, Rendering::flag(bit))
            }
            Self::String(s) => (
                raw == s.as_bytes(),
                Rendering::bytes(String::from_utf8_lossy(raw).into_owned(), raw),
            ),
            Self::Byte(b) => (raw == b.as_slice(), Rendering::bytes(decimal(raw), raw)),
            _ => numeric!(self, e => compare(e, raw, order), _ => (false, Rendering::default())),
        };
        (at.offset_bit, Report::new(kind, pass, expected, got))
    }
}

fn compare<T: Scalar>(expect: &Expect<T>, raw: &[u8], order: Endian) -> (bool, Rendering) {
    let got = T::read(raw, order);
    (expect.matches(got), got.render())
}

fn decimal(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_delay(delay: Delay) -> Rendering {
    match delay {
        Delay::Fixed(d) => {
            let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
            Rendering {
                dec: format!("{d:?}"),
                hex: format!("{nanos:016X}"),
                bin: format!("{nanos:064b}"),
            }
        }
        Delay::Interactive => Rendering {
            dec: "interactive".into(),
            hex: "-".into(),
            bin: "-".into(),
        },
    }
}

/// A named value, optionally pinned to an explicit address.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    /// Register offset (register grid), bit or byte offset (byte grid)
    pub address: Option<usize>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Field {
            name: name.into(),
            value,
            address: None,
        }
    }

    #[must_use]
    pub const fn with_address(mut self, address: usize) -> Self {
        self.address = Some(address);
        self
    }

    /// Check this field; an explicit address overrides the cursor.
    #[must_use]
    pub fn check(
        &self,
        received: &Received<'_>,
        current_bit: usize,
        grid: Grid,
        order: Endian,
    ) -> (usize, Report) {
        let is_bool = matches!(self.value, Value::Bool(_));
        let bit = self
            .address
            .map_or(current_bit, |address| grid.address_bit(address, is_bool));
        let (offset_bit, mut report) = self.value.check(received, bit, grid, order);
        report.name.clone_from(&self.name);
        (offset_bit, report)
    }
}

/// Check a list of fields in order, threading the cursor through them.
#[must_use]
pub fn check_fields(
    fields: &[Field],
    received: &Received<'_>,
    grid: Grid,
    order: Endian,
) -> Vec<Report> {
    let mut cursor = 0;
    fields
        .iter()
        .map(|field| {
            let (next, report) = field.check(received, cursor, grid, order);
            #[cfg(feature = "log")]
            if !report.pass {
                log::debug!("{report}");
            }
            cursor = next;
            report
        })
        .collect()
}

#[cfg(test)]
mod tests {

    use super::*;

    fn check(value: &Value, raw: &[u8], bit: usize, grid: Grid, order: Endian) -> (usize, Report) {
        value.check(&Received::new(raw), bit, grid, order)
    }

    #[test]
    fn exact_value_wins_over_range_kind() {
        assert_eq!(Value::Int8(Expect::Exact(1)).kind(), Type::Int8);
        let range = Value::Int8(Expect::Range {
            min: Some(1),
            max: None,
        });
        assert_eq!(range.kind(), Type::RangeInt8);
        assert_eq!(range.kind().to_string(), "minMaxInt8");
        assert_eq!(Value::Empty.kind(), Type::Empty);
    }

    #[test]
    fn length_in_bits() {
        assert_eq!(Value::Bool(true).length_bits(), 1);
        assert_eq!(Value::Uint16(Expect::Exact(0)).length_bits(), 16);
        assert_eq!(
            Value::Float64(Expect::Range {
                min: None,
                max: None
            })
            .length_bits(),
            64
        );
        assert_eq!(Value::String("abc".into()).length_bits(), 24);
        assert_eq!(Value::Byte(vec![1, 0, 2]).length_bits(), 24);
        assert_eq!(Value::Time(Delay::Interactive).length_bits(), 0);
        assert_eq!(Value::Empty.length_bits(), 0);
    }

    #[test]
    fn write_values() {
        assert_eq!(Value::Bool(true).write(Endian::Big).unwrap(), vec![1]);
        assert_eq!(
            Value::Int16(Expect::Exact(-2)).write(Endian::Little).unwrap(),
            vec![0xFE, 0xFF]
        );
        assert_eq!(Value::String("AB".into()).write(Endian::Big).unwrap(), b"AB");
        assert!(matches!(
            Value::Empty.write(Endian::Big),
            Err(Error::NotWritable(Type::Empty))
        ));
        let range = Value::Uint8(Expect::Range {
            min: Some(1),
            max: Some(2),
        });
        assert!(matches!(
            range.write(Endian::Big),
            Err(Error::NotWritable(Type::RangeUint8))
        ));
    }

    #[test]
    fn written_values_check_back() {
        let values = [
            Value::Int8(Expect::Exact(-5)),
            Value::Int16(Expect::Exact(-300)),
            Value::Int32(Expect::Exact(70_000)),
            Value::Int64(Expect::Exact(-1)),
            Value::Uint8(Expect::Exact(200)),
            Value::Uint16(Expect::Exact(0xABCD)),
            Value::Uint32(Expect::Exact(0xDEAD_BEEF)),
            Value::Uint64(Expect::Exact(u64::MAX - 1)),
            Value::Float32(Expect::Exact(3.25)),
            Value::Float64(Expect::Exact(-0.5)),
            Value::Bool(true),
            Value::String("hello".into()),
            Value::Byte(vec![0, 1, 2]),
        ];
        for order in [Endian::Big, Endian::Little] {
            for value in &values {
                let raw = value.write(order).unwrap();
                let (_, report) = check(value, &raw, 0, Grid::Byte, order);
                assert!(report.pass, "{value:?} {order:?}");
                assert_eq!(report.got, report.expected);

                let raw = to_registers(core::slice::from_ref(value), order).unwrap();
                let (_, report) = check(value, &raw, 0, Grid::Register, order);
                assert!(report.pass, "{value:?} {order:?} registers");
                assert_eq!(report.got, report.expected);
            }
        }
    }

    #[test]
    fn cursor_advances_by_field_width() {
        let raw = [0b101, 7, 0, 9];
        let (bit, r) = check(&Value::Bool(true), &raw, 0, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 1);
        let (bit, r) = check(&Value::Bool(false), &raw, bit, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 2);
        let (bit, r) = check(&Value::Bool(true), &raw, bit, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 3);
        let (bit, r) = check(&Value::Uint8(Expect::Exact(7)), &raw, bit, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 16);
        let (bit, r) = check(&Value::Uint16(Expect::Exact(9)), &raw, bit, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 32);
    }

    #[test]
    fn short_buffer_fails_without_reading() {
        let (bit, r) = check(
            &Value::Uint32(Expect::Exact(1)),
            &[0, 0, 1],
            0,
            Grid::Byte,
            Endian::Big,
        );
        assert!(!r.pass);
        assert_eq!(bit, 32);
        assert_eq!(r.got, Rendering::default());
        assert_eq!(r.expected.dec, "1");

        let (_, r) = check(&Value::Bool(false), &[], 0, Grid::Byte, Endian::Big);
        assert!(!r.pass);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let value = Value::Int8(Expect::Range {
            min: Some(2),
            max: Some(4),
        });
        for (raw, pass) in [(1, false), (2, true), (3, true), (4, true), (5, false)] {
            let (_, r) = check(&value, &[raw], 0, Grid::Byte, Endian::Big);
            assert_eq!(r.pass, pass, "{raw}");
            assert_eq!(r.expected.dec, "2..4");
        }
        let open = Value::Uint16(Expect::Range {
            min: None,
            max: Some(10),
        });
        let (_, r) = check(&open, &[0, 0], 0, Grid::Register, Endian::Big);
        assert!(r.pass);
        assert_eq!(r.expected.dec, "..10");
        assert_eq!(r.expected.hex, "..000A");
    }

    #[test]
    fn sub_word_values_in_register_grid() {
        let raw = [0x01, 0x02, 0x00, 0x03];
        let (bit, r) = check(&Value::Uint8(Expect::Exact(1)), &raw, 0, Grid::Register, Endian::Big);
        assert!(r.pass);
        let (bit, r) = check(
            &Value::Uint8(Expect::Exact(2)),
            &raw,
            bit,
            Grid::Register,
            Endian::Big,
        );
        assert!(r.pass);
        let (_, r) = check(
            &Value::Uint16(Expect::Exact(3)),
            &raw,
            bit,
            Grid::Register,
            Endian::Big,
        );
        assert!(r.pass);

        let raw = [0x02, 0x01];
        let (bit, r) = check(
            &Value::Uint8(Expect::Exact(1)),
            &raw,
            0,
            Grid::Register,
            Endian::Little,
        );
        assert!(r.pass);
        let (_, r) = check(
            &Value::Uint8(Expect::Exact(2)),
            &raw,
            bit,
            Grid::Register,
            Endian::Little,
        );
        assert!(r.pass);
    }

    #[test]
    fn elapsed_time_threshold() {
        let value = Value::Time(Delay::Fixed(Duration::from_millis(2)));
        let received = Received::new(&[]).with_elapsed(Duration::from_millis(2));
        let (bit, r) = value.check(&received, 5, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 5);
        assert_eq!(r.got.dec, "2ms");
        let received = Received::new(&[]).with_elapsed(Duration::from_millis(3));
        assert!(!value.check(&received, 0, Grid::Byte, Endian::Big).1.pass);
        let value = Value::Time(Delay::Interactive);
        assert!(!value.check(&Received::default(), 0, Grid::Byte, Endian::Big).1.pass);
    }

    #[test]
    fn error_text_comparison() {
        let mut value = Value::Error("IllegalDataAddress".into());
        assert!(value.substitute_error());
        let text = "modbus: exception 2 (illegal data address)";
        assert_eq!(value, Value::Error(text.into()));
        let received = Received::new(&[]).with_error(text);
        let (bit, r) = value.check(&received, 8, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 8);
        assert!(!value.check(&Received::default(), 0, Grid::Byte, Endian::Big).1.pass);

        let mut other = Value::Error("no answer".into());
        assert!(!other.substitute_error());
        assert!(!Value::Bool(true).substitute_error());
    }

    #[test]
    fn report_renderings() {
        let (_, r) = check(
            &Value::Uint16(Expect::Exact(1)),
            &[0, 2],
            0,
            Grid::Register,
            Endian::Big,
        );
        assert!(!r.pass);
        assert_eq!(r.kind, Type::Uint16);
        assert_eq!(r.expected.hex, "0001");
        assert_eq!(r.got.dec, "2");
        assert_eq!(r.got.hex, "0002");
        assert_eq!(r.got.bin, "0000000000000010");

        let (_, r) = check(&Value::Byte(vec![1, 0, 2]), &[1, 0, 2], 0, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(r.got.dec, "1 0 2");
        assert_eq!(r.got.hex, "01 00 02");
    }

    #[test]
    fn fields_honour_addresses() {
        let fields = [
            Field::new("first", Value::Uint16(Expect::Exact(1))),
            Field::new("pinned", Value::Uint16(Expect::Exact(3))).with_address(2),
            Field::new("next", Value::Uint16(Expect::Exact(4))),
        ];
        let raw = [0, 1, 0, 2, 0, 3, 0, 4];
        let reports = check_fields(&fields, &Received::new(&raw), Grid::Register, Endian::Big);
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.pass));
        assert_eq!(reports[1].name, "pinned");

        let coil = Field::new("coil", Value::Bool(true)).with_address(9);
        let (bit, r) = coil.check(&Received::new(&[0, 0b10]), 0, Grid::Byte, Endian::Big);
        assert!(r.pass);
        assert_eq!(bit, 10);
    }

    #[test]
    fn address_beyond_the_address_space_fails() {
        let raw = [0, 1, 0, 2];
        let far = Field::new("far", Value::Uint16(Expect::Exact(1))).with_address(usize::MAX);
        let (bit, r) = far.check(&Received::new(&raw), 0, Grid::Register, Endian::Big);
        assert!(!r.pass);
        assert_eq!(r.got, Rendering::default());
        assert_eq!(bit, usize::MAX);

        let fields = [far, Field::new("after", Value::Uint16(Expect::Exact(2)))];
        let reports = check_fields(&fields, &Received::new(&raw), Grid::Register, Endian::Big);
        assert!(reports.iter().all(|r| !r.pass));
    }
}
