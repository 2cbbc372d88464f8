// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame formats, delimiting and the byte-level transforms they rely on.

use std::{collections::BTreeMap, fmt};

use crate::error::*;

pub mod checksum;
pub mod protocol;
pub mod reader;
pub mod split;
pub mod staffing;
pub mod template;

pub use self::{checksum::*, protocol::*, reader::*, split::*, staffing::*, template::*};

/// The kind of frame a format describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
    Error,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Read, Action::Write, Action::Error];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Error => "error",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`Action`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerAction<T> {
    pub read: T,
    pub write: T,
    pub error: T,
}

impl<T> PerAction<T> {
    #[must_use]
    pub const fn get(&self, action: Action) -> &T {
        match action {
            Action::Read => &self.read,
            Action::Write => &self.write,
            Action::Error => &self.error,
        }
    }
}

/// An element of a frame format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A named byte constant
    Const(String),
    /// `len#`
    Len,
    /// `data#`
    Data,
    /// `crc#`
    Crc,
}

impl Token {
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "len#" => Token::Len,
            "data#" => Token::Data,
            "crc#" => Token::Crc,
            name => Token::Const(name.to_owned()),
        }
    }

    /// Parse a whole format list.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Vec<Token> {
        tokens.iter().map(|t| Token::parse(t.as_ref())).collect()
    }

    #[must_use]
    pub const fn is_marker(&self) -> bool {
        !matches!(self, Token::Const(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Const(name) => f.write_str(name),
            Token::Len => f.write_str("len#"),
            Token::Data => f.write_str("data#"),
            Token::Crc => f.write_str("crc#"),
        }
    }
}

/// Named byte constants of a protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consts(BTreeMap<String, Vec<u8>>);

impl Consts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.0.insert(name.into(), bytes);
    }

    pub fn resolve(&self, name: &str) -> Result<&[u8]> {
        self.0
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownConst(name.to_owned()))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<u8>)> for Consts {
    fn from_iter<I: IntoIterator<Item = (K, Vec<u8>)>>(iter: I) -> Self {
        Consts(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The rules shared by all formats of a protocol.
#[derive(Debug, Clone)]
pub struct Framing {
    pub consts: Consts,
    pub staffing: StaffingRule,
    pub checksum: Option<ChecksumSpec>,
    pub length: Option<LengthSpec>,
    pub max_len: usize,
}

/// Frames longer than this are treated as corrupt unless configured otherwise.
pub const DEFAULT_MAX_LEN: usize = 256;

impl Default for Framing {
    fn default() -> Self {
        Framing {
            consts: Consts::default(),
            staffing: StaffingRule::default(),
            checksum: None,
            length: None,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}
