// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, io};

use crate::{codec::Type, frame::Action};

/// fieldbus-harness Error
#[derive(Debug)]
pub enum Error {
    /// Malformed hex literal
    HexLiteral(String),
    /// The value has no wire representation
    NotWritable(Type),
    /// Reference to an undeclared constant
    UnknownConst(String),
    /// `len#` appears after another marker or more than once
    MisplacedLength,
    /// A format without start bytes
    MissingStart,
    /// A format that neither has a length field nor an end constant
    AmbiguousTermination,
    /// `data#` follows the length field without being counted by it
    UncountedData,
    /// `crc#` in a format without a checksum definition
    MissingChecksum,
    /// `len#` in a format without a length definition
    MissingLength,
    /// The protocol has no format for this action
    MissingFormat(Action),
    /// Unsupported checksum algorithm
    Checksum(String),
    /// Unsupported length field width
    LengthWidth(u8),
    /// Computed length does not fit the length field
    LengthOverflow(u64, u8),
    /// The stream ended inside a frame
    UnexpectedEof(usize),
    /// A received frame does not follow its format
    FrameMismatch(usize),
    /// Configuration could not be parsed
    Yaml(serde_yaml::Error),
    /// Reading from the transport failed
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            HexLiteral(text) => write!(f, "Invalid hex literal: {text:?}"),
            NotWritable(kind) => write!(f, "Value of type {kind} can not be written"),
            UnknownConst(name) => write!(f, "Unknown constant: {name}"),
            MisplacedLength => write!(f, "len# must be the first and only length marker"),
            MissingStart => write!(f, "Format has no start bytes"),
            AmbiguousTermination => {
                write!(f, "Format has neither a length field nor end bytes")
            }
            UncountedData => write!(f, "data# after len# must be counted by the length"),
            MissingChecksum => write!(f, "Format uses crc# but no checksum is configured"),
            MissingLength => write!(f, "Format uses len# but no length is configured"),
            MissingFormat(action) => write!(f, "No {action} format configured"),
            Checksum(name) => write!(f, "Unsupported checksum algorithm: {name}"),
            LengthWidth(width) => write!(f, "Unsupported length field width: {width}"),
            LengthOverflow(len, width) => {
                write!(f, "Length {len} does not fit into {width} byte(s)")
            }
            UnexpectedEof(cnt) => write!(f, "Stream ended inside a frame ({cnt} byte(s) left)"),
            FrameMismatch(pos) => write!(f, "Frame does not match its format at byte {pos}"),
            Yaml(err) => write!(f, "Invalid configuration: {err}"),
            Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Yaml(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Crate-wide result type.
pub type Result<T> = core::result::Result<T, Error>;
