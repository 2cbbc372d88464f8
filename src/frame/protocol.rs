// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding and verification of frames along their formats.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::*;
use crate::codec::Endian;

/// How the checksum of a frame is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumSpec {
    pub algorithm: Algorithm,
    pub order: Endian,
    /// The checksum bytes are stuffed on the wire
    pub staffing: bool,
    /// The frame parts the checksum is computed over
    pub coverage: PerAction<Vec<Token>>,
}

impl ChecksumSpec {
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        ChecksumSpec {
            algorithm,
            order: Endian::default(),
            staffing: false,
            coverage: PerAction::default(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: Endian) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: PerAction<Vec<Token>>) -> Self {
        self.coverage = coverage;
        self
    }
}

/// How the length field of a frame is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthSpec {
    width: u8,
    pub order: Endian,
    /// The length field is stuffed on the wire
    pub staffing: bool,
    /// The length counts wire bytes instead of logical bytes
    pub count_staffing: bool,
    /// The frame parts the length counts
    pub coverage: PerAction<Vec<Token>>,
}

impl LengthSpec {
    /// A length field of `width` bytes (1, 2, 4 or 8).
    pub fn new(width: u8, order: Endian) -> Result<Self> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(Error::LengthWidth(width));
        }
        Ok(LengthSpec {
            width,
            order,
            staffing: false,
            count_staffing: false,
            coverage: PerAction::default(),
        })
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: PerAction<Vec<Token>>) -> Self {
        self.coverage = coverage;
        self
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Encode a length into the field.
    pub fn encode(&self, len: u64) -> Result<Vec<u8>> {
        let width = usize::from(self.width);
        if width < 8 && len >> (8 * width) != 0 {
            return Err(Error::LengthOverflow(len, self.width));
        }
        let mut buf = vec![0; width];
        match self.order {
            Endian::Big => BigEndian::write_uint(&mut buf, len, width),
            Endian::Little => LittleEndian::write_uint(&mut buf, len, width),
        }
        Ok(buf)
    }

    /// Interpret the (un-stuffed) field bytes.
    #[must_use]
    pub fn decode(&self, field: &[u8]) -> u64 {
        let width = usize::from(self.width);
        match self.order {
            Endian::Big => BigEndian::read_uint(field, width),
            Endian::Little => LittleEndian::read_uint(field, width),
        }
    }
}

/// The checksum of a received frame next to the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumCheck {
    pub received: Vec<u8>,
    pub computed: Vec<u8>,
}

impl ChecksumCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.received == self.computed
    }
}

/// A received frame taken apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Un-stuffed payload
    pub data: Vec<u8>,
    /// Value of the length field
    pub length: Option<u64>,
    pub checksum: Option<ChecksumCheck>,
}

impl Decoded {
    /// `true` unless a checksum is present and wrong.
    #[must_use]
    pub fn checksum_ok(&self) -> bool {
        self.checksum.as_ref().is_none_or(ChecksumCheck::is_valid)
    }
}

/// A framed protocol: its shared rules and one format per action.
#[derive(Debug, Clone)]
pub struct Protocol {
    framing: Framing,
    formats: PerAction<Vec<Token>>,
    templates: PerAction<Option<FrameTemplate>>,
}

impl Protocol {
    /// Validate and compile all non-empty formats.
    pub fn new(framing: Framing, formats: PerAction<Vec<Token>>) -> Result<Self> {
        let compile = |action| {
            let tokens = formats.get(action);
            if tokens.is_empty() {
                return Ok(None);
            }
            FrameTemplate::compile(tokens, &framing, action).map(Some)
        };
        let templates = PerAction {
            read: compile(Action::Read)?,
            write: compile(Action::Write)?,
            error: compile(Action::Error)?,
        };
        Ok(Protocol {
            framing,
            formats,
            templates,
        })
    }

    #[must_use]
    pub const fn framing(&self) -> &Framing {
        &self.framing
    }

    pub fn template(&self, action: Action) -> Result<&FrameTemplate> {
        self.templates
            .get(action)
            .as_ref()
            .ok_or(Error::MissingFormat(action))
    }

    /// A frame delimiter for incoming frames of `action`.
    pub fn splitter(&self, action: Action) -> Result<Splitter> {
        let template = self.template(action)?.clone();
        Ok(Splitter::new(template, self.framing.staffing.clone()))
    }

    fn checksum(&self) -> Result<&ChecksumSpec> {
        self.framing.checksum.as_ref().ok_or(Error::MissingChecksum)
    }

    fn length(&self) -> Result<&LengthSpec> {
        self.framing.length.as_ref().ok_or(Error::MissingLength)
    }

    /// The value of the length field for a frame carrying `data`.
    pub fn calc_len(&self, action: Action, data: &[u8]) -> Result<u64> {
        let length = self.length()?;
        let staffing = &self.framing.staffing;
        let mut len = 0;
        for token in length.coverage.get(action) {
            len += match token {
                Token::Const(name) => self.framing.consts.resolve(name)?.len(),
                Token::Data if length.count_staffing => staffing.stuff(data).len(),
                Token::Data => data.len(),
                Token::Len => usize::from(length.width),
                Token::Crc => {
                    let checksum = self.checksum()?;
                    // A checksum over the length can not be measured before
                    // the length is known.
                    if length.count_staffing
                        && checksum.staffing
                        && !checksum.coverage.get(action).contains(&Token::Len)
                    {
                        staffing.stuff(&self.calc_crc(action, data)?).len()
                    } else {
                        checksum.algorithm.len()
                    }
                }
            };
        }
        Ok(len as u64)
    }

    fn length_field(&self, action: Action, data: &[u8]) -> Result<Vec<u8>> {
        self.length()?.encode(self.calc_len(action, data)?)
    }

    /// The checksum bytes for a frame carrying `data`.
    ///
    /// Computed over logical bytes, staffing never applies.
    pub fn calc_crc(&self, action: Action, data: &[u8]) -> Result<Vec<u8>> {
        let checksum = self.checksum()?;
        let mut covered = Vec::new();
        for token in checksum.coverage.get(action) {
            match token {
                Token::Const(name) => covered.extend_from_slice(self.framing.consts.resolve(name)?),
                Token::Data => covered.extend_from_slice(data),
                Token::Len => covered.extend(self.length_field(action, data)?),
                Token::Crc => {}
            }
        }
        let crc = checksum.algorithm.checksum(&covered, checksum.order);
        #[cfg(feature = "log")]
        log::debug!("{action} checksum over {covered:02X?}: {crc:02X?}");
        Ok(crc)
    }

    /// Build the wire bytes of a frame carrying `data`.
    pub fn encode(&self, action: Action, data: &[u8]) -> Result<Vec<u8>> {
        self.template(action)?;
        let staffing = &self.framing.staffing;
        let mut frame = Vec::new();
        for token in self.formats.get(action) {
            match token {
                Token::Const(name) => frame.extend_from_slice(self.framing.consts.resolve(name)?),
                Token::Len => {
                    let field = self.length_field(action, data)?;
                    if self.length()?.staffing {
                        frame.extend(staffing.stuff(&field));
                    } else {
                        frame.extend(field);
                    }
                }
                Token::Data => frame.extend(staffing.stuff(data)),
                Token::Crc => {
                    let crc = self.calc_crc(action, data)?;
                    if self.checksum()?.staffing {
                        frame.extend(staffing.stuff(&crc));
                    } else {
                        frame.extend(crc);
                    }
                }
            }
        }
        Ok(frame)
    }

    /// Take a delimited frame apart along its format.
    ///
    /// A wrong checksum is reported in [`Decoded::checksum`], a frame that
    /// does not follow the format is an error.
    pub fn decode(&self, action: Action, frame: &[u8]) -> Result<Decoded> {
        self.template(action)?;
        let tokens = self.formats.get(action);
        let staffing = &self.framing.staffing;
        let mut pos = 0;
        let mut data = Vec::new();
        let mut length = None;
        let mut received = None;

        for (i, token) in tokens.iter().enumerate() {
            let rest = &frame[pos..];
            let mismatch = Error::FrameMismatch(pos);
            match token {
                Token::Const(name) => {
                    let bytes = self.framing.consts.resolve(name)?;
                    if !rest.starts_with(bytes) {
                        return Err(mismatch);
                    }
                    pos += bytes.len();
                }
                Token::Len => {
                    let spec = self.length()?;
                    let (field, wire) =
                        take(staffing, rest, usize::from(spec.width), spec.staffing)
                            .ok_or(mismatch)?;
                    length = Some(spec.decode(&field));
                    pos += wire;
                }
                Token::Data => {
                    let tail = self.tail_len(&tokens[i + 1..], rest)?.ok_or(mismatch)?;
                    let end = rest.len() - tail;
                    data = staffing.unstuff(&rest[..end]);
                    pos += end;
                }
                Token::Crc => {
                    let spec = self.checksum()?;
                    let (crc, wire) = take(staffing, rest, spec.algorithm.len(), spec.staffing)
                        .ok_or(mismatch)?;
                    received = Some(crc);
                    pos += wire;
                }
            }
        }
        if pos != frame.len() {
            return Err(Error::FrameMismatch(pos));
        }

        let checksum = match received {
            Some(received) => Some(ChecksumCheck {
                computed: self.calc_crc(action, &data)?,
                received,
            }),
            None => None,
        };
        #[cfg(feature = "log")]
        if let Some(check) = checksum.as_ref().filter(|c| !c.is_valid()) {
            log::warn!(
                "Checksum mismatch: received {:02X?}, computed {:02X?}",
                check.received,
                check.computed
            );
        }
        Ok(Decoded {
            data,
            length,
            checksum,
        })
    }

    /// Wire bytes taken by the frame parts after the payload, measured from
    /// the end of `rest`.
    fn tail_len(&self, tokens: &[Token], rest: &[u8]) -> Result<Option<usize>> {
        let mut tail = 0;
        for token in tokens.iter().rev() {
            let Some(wire) = rest.len().checked_sub(tail).map(|end| &rest[..end]) else {
                return Ok(None);
            };
            tail += match token {
                Token::Const(name) => self.framing.consts.resolve(name)?.len(),
                Token::Len => usize::from(self.length()?.width),
                Token::Data => 0,
                Token::Crc => {
                    let spec = self.checksum()?;
                    let n = spec.algorithm.len();
                    if spec.staffing {
                        match self.framing.staffing.stuffed_suffix_len(wire, n) {
                            Some(len) => len,
                            None => return Ok(None),
                        }
                    } else {
                        n
                    }
                }
            };
        }
        Ok((tail <= rest.len()).then_some(tail))
    }
}

/// Read `n` logical bytes from the front of `wire`.
fn take(staffing: &StaffingRule, wire: &[u8], n: usize, staffed: bool) -> Option<(Vec<u8>, usize)> {
    if staffed {
        staffing.unstuff_prefix(wire, n, true)
    } else {
        wire.get(..n).map(|bytes| (bytes.to_vec(), n))
    }
}
