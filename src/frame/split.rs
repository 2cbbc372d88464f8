// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental frame delimiting over a growing buffer.

use super::*;

/// The outcome of one [`Splitter::split`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    /// More bytes are needed
    Incomplete,
    /// Drop this many leading bytes
    Discard(usize),
    /// A complete frame at the beginning of the buffer
    Frame {
        consumed: usize,
        frame: &'a [u8],
        /// No more frames will follow
        last: bool,
    },
    /// The stream ended and nothing is left
    Exhausted,
}

/// Cuts frames of one template out of a byte stream.
#[derive(Debug, Clone)]
pub struct Splitter {
    template: FrameTemplate,
    staffing: StaffingRule,
}

impl Splitter {
    #[must_use]
    pub const fn new(template: FrameTemplate, staffing: StaffingRule) -> Self {
        Splitter { template, staffing }
    }

    #[must_use]
    pub const fn template(&self) -> &FrameTemplate {
        &self.template
    }

    /// Look for the next frame at the beginning of `buf`.
    ///
    /// `eof` signals that `buf` will not grow any more. Before the end of
    /// the stream this never fails.
    pub fn split<'a>(&self, buf: &'a [u8], eof: bool) -> Result<Split<'a>> {
        let Some(pos) = self.find_start(buf) else {
            return Ok(self.no_start(buf, eof));
        };
        if pos > 0 {
            return Ok(Split::Discard(pos));
        }
        let len = if self.template.is_length_driven() {
            self.length_driven(buf, eof)
        } else {
            self.start_end(buf)
        };
        match len {
            Some(len) if len > self.template.max_len => Ok(self.oversized(len)),
            Some(len) if len <= buf.len() => {
                let frame = &buf[..len];
                #[cfg(feature = "log")]
                log::debug!("Frame: {frame:02X?}");
                Ok(Split::Frame {
                    consumed: len,
                    frame,
                    last: eof && len == buf.len(),
                })
            }
            _ if buf.len() > self.template.max_len => Ok(self.oversized(buf.len())),
            _ if eof => {
                #[cfg(feature = "log")]
                log::error!("Stream ended inside a frame ({} byte(s))", buf.len());
                Err(Error::UnexpectedEof(buf.len()))
            }
            _ => Ok(Split::Incomplete),
        }
    }

    fn no_start(&self, buf: &[u8], eof: bool) -> Split<'static> {
        if buf.is_empty() {
            return if eof {
                Split::Exhausted
            } else {
                Split::Incomplete
            };
        }
        if eof {
            return Split::Discard(buf.len());
        }
        // Keep a tail that may still become the start.
        match buf.len().saturating_sub(self.template.start.len()) {
            0 => Split::Incomplete,
            n => Split::Discard(n),
        }
    }

    fn oversized(&self, len: usize) -> Split<'static> {
        let drop = if self.template.is_length_driven() {
            self.template.start.len()
        } else {
            1
        };
        #[cfg(feature = "log")]
        log::warn!(
            "Frame exceeds {} byte(s) ({len}), dropping {drop} byte(s)",
            self.template.max_len
        );
        Split::Discard(drop)
    }

    /// Position of the first start constant that is not an escaped pattern.
    fn find_start(&self, buf: &[u8]) -> Option<usize> {
        let start = &self.template.start;
        if start.is_empty() {
            return Some(0);
        }
        buf.windows(start.len()).enumerate().position(|(pos, w)| {
            w == start.as_slice() && self.staffing.escaped_len(&buf[pos..]).is_none()
        })
    }

    /// Frame length of a start/end frame at the beginning of `buf`.
    ///
    /// Escaped patterns belong to the payload and are skipped as a whole.
    fn start_end(&self, buf: &[u8]) -> Option<usize> {
        let end = &self.template.end;
        let mut pos = self.template.start.len();
        loop {
            let rest = buf.get(pos..)?;
            if let Some(escaped) = self.staffing.escaped_len(rest) {
                pos += escaped;
            } else if rest.starts_with(end) {
                return Some(pos + end.len());
            } else if rest.is_empty() {
                return None;
            } else {
                pos += 1;
            }
        }
    }

    /// Frame length of a length-driven frame at the beginning of `buf`.
    fn length_driven(&self, buf: &[u8], eof: bool) -> Option<usize> {
        let length = self.template.length.as_ref()?;
        let width = usize::from(length.width());
        let mut pos = self.template.len_offset;

        let (field, wire) = if length.staffing {
            self.staffing.unstuff_prefix(buf.get(pos..)?, width, eof)?
        } else {
            (buf.get(pos..pos + width)?.to_vec(), width)
        };
        pos += wire;

        let declared = usize::try_from(length.decode(&field)).unwrap_or(usize::MAX);
        pos = if length.count_staffing || self.staffing.is_identity() {
            pos.saturating_add(declared)
        } else {
            let (_, wire) = self.staffing.unstuff_prefix(buf.get(pos..)?, declared, eof)?;
            pos + wire
        };

        for suffix in &self.template.suffix {
            pos = match suffix {
                Suffix::Bytes(bytes) => pos.saturating_add(bytes.len()),
                Suffix::Crc { len, staffed: false } => pos.saturating_add(*len),
                Suffix::Crc { len, staffed: true } => {
                    let (_, wire) = self.staffing.unstuff_prefix(buf.get(pos..)?, *len, eof)?;
                    pos + wire
                }
            };
        }
        Some(pos)
    }
}
