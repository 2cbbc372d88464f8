// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compilation of format token lists into frame templates.

use super::*;

/// A part of a length-driven frame that follows the length field but is not
/// counted by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// The checksum; `staffed` checksums take extra wire bytes
    Crc { len: usize, staffed: bool },
    /// A constant
    Bytes(Vec<u8>),
}

/// What a frame delimiter needs to know about a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTemplate {
    /// Constant bytes every frame starts with
    pub start: Vec<u8>,
    /// Position of the length field, `0` if there is none
    pub len_offset: usize,
    /// The length field definition of length-driven frames
    pub length: Option<LengthSpec>,
    /// Frame parts after the length field it does not count
    pub suffix: Vec<Suffix>,
    /// Constant bytes every frame ends with; empty for length-driven frames
    pub end: Vec<u8>,
    /// Longest acceptable frame
    pub max_len: usize,
}

impl FrameTemplate {
    /// Compile the format of `action`.
    pub fn compile(tokens: &[Token], framing: &Framing, action: Action) -> Result<Self> {
        let counted: &[Token] = framing
            .length
            .as_ref()
            .map(|length| length.coverage.get(action).as_slice())
            .unwrap_or_default();

        let mut start = Vec::new();
        let mut end = Vec::new();
        let mut suffix = Vec::new();
        let mut length = None;
        let mut len_offset = 0;
        let mut seen_marker = false;

        for token in tokens {
            let after_len = length.is_some();
            let uncounted = after_len && !counted.contains(token);
            match token {
                Token::Len => {
                    if seen_marker {
                        return Err(Error::MisplacedLength);
                    }
                    length = Some(framing.length.clone().ok_or(Error::MissingLength)?);
                    len_offset = start.len();
                }
                Token::Data => {
                    if uncounted {
                        return Err(Error::UncountedData);
                    }
                }
                Token::Crc => {
                    let checksum = framing.checksum.as_ref().ok_or(Error::MissingChecksum)?;
                    if uncounted {
                        suffix.push(Suffix::Crc {
                            len: checksum.algorithm.len(),
                            staffed: checksum.staffing,
                        });
                    }
                }
                Token::Const(name) => {
                    let bytes = framing.consts.resolve(name)?;
                    if !seen_marker {
                        start.extend_from_slice(bytes);
                    } else {
                        end.extend_from_slice(bytes);
                        if uncounted {
                            suffix.push(Suffix::Bytes(bytes.to_vec()));
                        }
                    }
                }
            }
            seen_marker |= token.is_marker();
        }

        if start.is_empty() {
            return Err(Error::MissingStart);
        }
        if length.is_some() {
            end.clear();
        } else if end.is_empty() {
            return Err(Error::AmbiguousTermination);
        }
        Ok(FrameTemplate {
            start,
            len_offset,
            length,
            suffix,
            end,
            max_len: framing.max_len,
        })
    }

    /// Frames are delimited by their length field.
    #[must_use]
    pub const fn is_length_driven(&self) -> bool {
        self.len_offset > 0
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::codec::Endian;

    fn framing() -> Framing {
        Framing {
            consts: [
                ("start", vec![0x68]),
                ("addr", vec![0x01, 0x02]),
                ("end", vec![0x16]),
            ]
            .into_iter()
            .collect(),
            checksum: Some(ChecksumSpec::new(Algorithm::Mod256)),
            length: Some(LengthSpec::new(1, Endian::Big).unwrap().with_coverage(PerAction {
                read: vec![Token::Data],
                write: vec![Token::Const("addr".into()), Token::Data],
                error: vec![],
            })),
            ..Framing::default()
        }
    }

    fn compile(tokens: &[&str], action: Action) -> Result<FrameTemplate> {
        FrameTemplate::compile(&Token::parse_all(tokens), &framing(), action)
    }

    #[test]
    fn start_end_format() {
        let t = compile(&["start", "addr", "data#", "crc#", "end"], Action::Read).unwrap();
        assert_eq!(t.start, vec![0x68, 0x01, 0x02]);
        assert_eq!(t.end, vec![0x16]);
        assert_eq!(t.len_offset, 0);
        assert!(t.suffix.is_empty());
        assert!(!t.is_length_driven());
        assert_eq!(t.max_len, DEFAULT_MAX_LEN);
    }

    #[test]
    fn length_driven_format() {
        let t = compile(&["start", "len#", "data#", "crc#", "end"], Action::Read).unwrap();
        assert_eq!(t.start, vec![0x68]);
        assert_eq!(t.len_offset, 1);
        assert!(t.is_length_driven());
        assert!(t.end.is_empty());
        assert_eq!(
            t.suffix,
            vec![
                Suffix::Crc {
                    len: 1,
                    staffed: false
                },
                Suffix::Bytes(vec![0x16])
            ]
        );
    }

    #[test]
    fn counted_constants_are_no_suffix() {
        let t = compile(&["start", "len#", "addr", "data#", "crc#"], Action::Write).unwrap();
        assert_eq!(t.suffix.len(), 1);
        assert!(compile(&["start", "len#", "addr", "data#"], Action::Read)
            .unwrap()
            .suffix
            .contains(&Suffix::Bytes(vec![0x01, 0x02])));
    }

    #[test]
    fn invalid_formats() {
        assert!(matches!(
            compile(&["start", "data#", "len#", "end"], Action::Read),
            Err(Error::MisplacedLength)
        ));
        assert!(matches!(
            compile(&["start", "len#", "len#"], Action::Read),
            Err(Error::MisplacedLength)
        ));
        assert!(matches!(
            compile(&["data#", "end"], Action::Read),
            Err(Error::MissingStart)
        ));
        assert!(matches!(
            compile(&["start", "data#"], Action::Read),
            Err(Error::AmbiguousTermination)
        ));
        assert!(matches!(
            compile(&["start", "nope", "data#", "end"], Action::Read),
            Err(Error::UnknownConst(_))
        ));
        assert!(matches!(
            compile(&["start", "len#", "data#"], Action::Error),
            Err(Error::UncountedData)
        ));
    }

    #[test]
    fn markers_need_their_definitions() {
        let framing = Framing {
            consts: [("start", vec![1]), ("end", vec![2])].into_iter().collect(),
            ..Framing::default()
        };
        let tokens = Token::parse_all(&["start", "data#", "crc#", "end"]);
        assert!(matches!(
            FrameTemplate::compile(&tokens, &framing, Action::Read),
            Err(Error::MissingChecksum)
        ));
        let tokens = Token::parse_all(&["start", "len#", "data#"]);
        assert!(matches!(
            FrameTemplate::compile(&tokens, &framing, Action::Read),
            Err(Error::MissingLength)
        ));
    }
}
