// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative test values and protocol descriptions.
//!
//! Everything is deserialized from YAML and validated when it is turned
//! into its runtime form, so a broken definition fails at load time.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::{
    codec::{Endian, Expect, Field, Value},
    error::*,
    frame::{
        Algorithm, ChecksumSpec, Consts, DEFAULT_MAX_LEN, Framing, LengthSpec, PerAction,
        Protocol, StaffingRule, Token,
    },
    util::{parse_delay, parse_hex, parse_hex_number},
};

/// One expected or written value.
///
/// At most one kind should be set; if several are, the first one in
/// declaration order wins and an exact value wins over its range bounds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSpec {
    pub int8: Option<i8>,
    pub min_int8: Option<i8>,
    pub max_int8: Option<i8>,
    pub int16: Option<i16>,
    pub min_int16: Option<i16>,
    pub max_int16: Option<i16>,
    pub int32: Option<i32>,
    pub min_int32: Option<i32>,
    pub max_int32: Option<i32>,
    pub int64: Option<i64>,
    pub min_int64: Option<i64>,
    pub max_int64: Option<i64>,
    pub uint8: Option<u8>,
    pub min_uint8: Option<u8>,
    pub max_uint8: Option<u8>,
    pub uint16: Option<u16>,
    pub min_uint16: Option<u16>,
    pub max_uint16: Option<u16>,
    pub uint32: Option<u32>,
    pub min_uint32: Option<u32>,
    pub max_uint32: Option<u32>,
    pub uint64: Option<u64>,
    pub min_uint64: Option<u64>,
    pub max_uint64: Option<u64>,
    pub float32: Option<f32>,
    pub min_float32: Option<f32>,
    pub max_float32: Option<f32>,
    pub float64: Option<f64>,
    pub min_float64: Option<f64>,
    pub max_float64: Option<f64>,
    pub bool: Option<bool>,
    pub string: Option<String>,
    /// Hex literal
    pub byte: Option<String>,
    /// Duration literal
    pub time: Option<String>,
    pub error: Option<String>,
    /// Hex literal
    pub address: Option<String>,
}

impl ValueSpec {
    /// Build the runtime value.
    pub fn resolve(&self) -> Result<Value> {
        macro_rules! numeric {
            ($exact:ident, $min:ident, $max:ident, $variant:ident) => {
                if let Some(v) = self.$exact {
                    return Ok(Value::$variant(Expect::Exact(v)));
                }
                if self.$min.is_some() || self.$max.is_some() {
                    return Ok(Value::$variant(Expect::Range {
                        min: self.$min,
                        max: self.$max,
                    }));
                }
            };
        }

        numeric!(int8, min_int8, max_int8, Int8);
        numeric!(int16, min_int16, max_int16, Int16);
        numeric!(int32, min_int32, max_int32, Int32);
        numeric!(int64, min_int64, max_int64, Int64);
        numeric!(uint8, min_uint8, max_uint8, Uint8);
        numeric!(uint16, min_uint16, max_uint16, Uint16);
        numeric!(uint32, min_uint32, max_uint32, Uint32);
        numeric!(uint64, min_uint64, max_uint64, Uint64);
        numeric!(float32, min_float32, max_float32, Float32);
        numeric!(float64, min_float64, max_float64, Float64);

        if let Some(flag) = self.bool {
            return Ok(Value::Bool(flag));
        }
        if let Some(text) = &self.string {
            return Ok(Value::String(text.clone()));
        }
        if let Some(hex) = &self.byte {
            return parse_hex(hex).map(Value::Byte);
        }
        if let Some(delay) = &self.time {
            return Ok(Value::Time(parse_delay(delay)));
        }
        if let Some(text) = &self.error {
            return Ok(Value::Error(text.clone()));
        }
        Ok(Value::Empty)
    }

    /// The explicit address, if any.
    pub fn address(&self) -> Result<Option<usize>> {
        self.address
            .as_deref()
            .map(|hex| {
                let address = parse_hex_number(hex)?;
                usize::try_from(address).map_err(|_| Error::HexLiteral(hex.to_owned()))
            })
            .transpose()
    }
}

/// A named value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub value: ValueSpec,
}

impl FieldSpec {
    pub fn resolve(&self) -> Result<Field> {
        let field = Field::new(self.name.clone(), self.value.resolve()?);
        Ok(match self.value.address()? {
            Some(address) => field.with_address(address),
            None => field,
        })
    }
}

/// Resolve a list of fields, stopping at the first invalid one.
pub fn resolve_fields(specs: &[FieldSpec]) -> Result<Vec<Field>> {
    specs.iter().map(FieldSpec::resolve).collect()
}

/// `crc` section of a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrcConfig {
    /// `mod256` or `modBus`
    pub algorithm: String,
    #[serde(default)]
    pub byte_order: Option<Endian>,
    #[serde(default)]
    pub staffing: bool,
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

/// `staffing` section of a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaffingConfig {
    /// Hex literal of the escape byte
    pub byte: String,
    /// Names of the constants to escape
    #[serde(default)]
    pub pattern: Vec<String>,
}

/// `len` section of a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenConfig {
    #[serde(default)]
    pub staffing: bool,
    #[serde(default)]
    pub count_staffing: bool,
    #[serde(default = "default_count_bytes")]
    pub count_bytes: u8,
    #[serde(default)]
    pub byte_order: Option<Endian>,
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

const fn default_count_bytes() -> u8 {
    1
}

const fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

/// A framed protocol as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    /// Named constants, each a list of hex literals
    #[serde(rename = "const", default)]
    pub consts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub read_format: Vec<String>,
    #[serde(default)]
    pub write_format: Vec<String>,
    #[serde(default)]
    pub error_format: Vec<String>,
    #[serde(default)]
    pub crc: Option<CrcConfig>,
    #[serde(default)]
    pub staffing: Option<StaffingConfig>,
    #[serde(default)]
    pub len: Option<LenConfig>,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Fallback for `crc` and `len`
    #[serde(default)]
    pub byte_order: Endian,
}

impl ProtocolConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn resolve_consts(&self) -> Result<Consts> {
        let mut consts = Consts::new();
        for (name, literals) in &self.consts {
            let mut bytes = Vec::new();
            for literal in literals {
                bytes.extend(parse_hex(literal)?);
            }
            consts.insert(name.clone(), bytes);
        }
        Ok(consts)
    }

    /// Validate everything and build the runtime protocol.
    pub fn build(&self) -> Result<Protocol> {
        let consts = self.resolve_consts()?;

        let staffing = match &self.staffing {
            Some(staffing) => {
                let escape = match parse_hex(&staffing.byte)?.as_slice() {
                    [escape] => *escape,
                    _ => return Err(Error::HexLiteral(staffing.byte.clone())),
                };
                let patterns = staffing
                    .pattern
                    .iter()
                    .map(|name| consts.resolve(name).map(<[u8]>::to_vec))
                    .collect::<Result<_>>()?;
                StaffingRule::new(escape, patterns)
            }
            None => StaffingRule::default(),
        };

        let checksum = match &self.crc {
            Some(crc) => {
                let mut spec = ChecksumSpec::new(crc.algorithm.parse::<Algorithm>()?)
                    .with_order(crc.byte_order.unwrap_or(self.byte_order))
                    .with_coverage(coverage(&crc.read, &crc.write, &crc.error));
                spec.staffing = crc.staffing;
                Some(spec)
            }
            None => None,
        };

        let length = match &self.len {
            Some(len) => {
                let mut spec =
                    LengthSpec::new(len.count_bytes, len.byte_order.unwrap_or(self.byte_order))?
                        .with_coverage(coverage(&len.read, &len.write, &len.error));
                spec.staffing = len.staffing;
                spec.count_staffing = len.count_staffing;
                Some(spec)
            }
            None => None,
        };

        let framing = Framing {
            consts,
            staffing,
            checksum,
            length,
            max_len: self.max_len,
        };
        let formats = coverage(&self.read_format, &self.write_format, &self.error_format);
        Protocol::new(framing, formats)
    }
}

fn coverage(read: &[String], write: &[String], error: &[String]) -> PerAction<Vec<Token>> {
    PerAction {
        read: Token::parse_all(read),
        write: Token::parse_all(write),
        error: Token::parse_all(error),
    }
}

impl Protocol {
    pub fn from_config(config: &ProtocolConfig) -> Result<Self> {
        config.build()
    }
}

/// Read and validate a protocol definition file.
pub fn load_protocol(path: impl AsRef<Path>) -> Result<Protocol> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)?;
    let protocol = ProtocolConfig::from_yaml(&yaml)?.build()?;
    #[cfg(feature = "log")]
    log::debug!("Loaded protocol from {}", path.display());
    Ok(protocol)
}
