// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte staffing: an escape byte follows every occurrence of a pattern.

/// Escape rule for pattern bytes inside a frame.
///
/// The default rule has no patterns and leaves data untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffingRule {
    escape: u8,
    patterns: Vec<Vec<u8>>,
}

impl StaffingRule {
    #[must_use]
    pub fn new(escape: u8, patterns: Vec<Vec<u8>>) -> Self {
        let patterns = patterns.into_iter().filter(|p| !p.is_empty()).collect();
        StaffingRule { escape, patterns }
    }

    #[must_use]
    pub const fn escape(&self) -> u8 {
        self.escape
    }

    #[must_use]
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.patterns.is_empty()
    }

    fn pattern_at(&self, buf: &[u8]) -> Option<&[u8]> {
        self.patterns
            .iter()
            .find(|p| buf.starts_with(p))
            .map(Vec::as_slice)
    }

    /// Could `buf` still grow into a pattern?
    fn partial_pattern(&self, buf: &[u8]) -> bool {
        self.patterns
            .iter()
            .any(|p| p.len() > buf.len() && p.starts_with(buf))
    }

    /// Insert the escape byte after every pattern.
    ///
    /// Data is scanned once from the left, so escape bytes inserted here are
    /// never escaped again, even when the escape byte is a pattern itself.
    #[must_use]
    pub fn stuff(&self, data: &[u8]) -> Vec<u8> {
        if self.is_identity() {
            return data.to_vec();
        }
        let mut out = Vec::with_capacity(data.len() + data.len() / 4);
        let mut i = 0;
        while i < data.len() {
            if let Some(p) = self.pattern_at(&data[i..]) {
                out.extend_from_slice(p);
                out.push(self.escape);
                i += p.len();
            } else {
                out.push(data[i]);
                i += 1;
            }
        }
        out
    }

    /// Remove the escape byte following a pattern.
    ///
    /// A pattern without a trailing escape byte is kept as it is.
    #[must_use]
    pub fn unstuff(&self, wire: &[u8]) -> Vec<u8> {
        if self.is_identity() {
            return wire.to_vec();
        }
        let mut out = Vec::with_capacity(wire.len());
        let mut i = 0;
        while i < wire.len() {
            if let Some(p) = self.pattern_at(&wire[i..]) {
                out.extend_from_slice(p);
                i += p.len();
                if wire.get(i) == Some(&self.escape) {
                    i += 1;
                }
            } else {
                out.push(wire[i]);
                i += 1;
            }
        }
        out
    }

    /// Wire length of an escaped pattern at the beginning of `wire`.
    #[must_use]
    pub fn escaped_len(&self, wire: &[u8]) -> Option<usize> {
        let p = self.pattern_at(wire)?;
        (wire.get(p.len()) == Some(&self.escape)).then_some(p.len() + 1)
    }

    /// Un-stuff the first `n` logical bytes of `wire`.
    ///
    /// Returns the logical bytes and the number of wire bytes they occupy,
    /// or `None` if `wire` is too short to tell. With `eof` set, `wire` is
    /// final: a pattern at its end is unescaped and a partial pattern is
    /// taken as plain bytes.
    #[must_use]
    pub fn unstuff_prefix(&self, wire: &[u8], n: usize, eof: bool) -> Option<(Vec<u8>, usize)> {
        if self.is_identity() {
            return wire.get(..n).map(|bytes| (bytes.to_vec(), n));
        }
        let mut out = Vec::with_capacity(n.min(wire.len()));
        let mut i = 0;
        while out.len() < n {
            let rest = wire.get(i..).filter(|rest| !rest.is_empty())?;
            if let Some(p) = self.pattern_at(rest) {
                // The escape byte decides how much wire the pattern takes.
                let escaped = match wire.get(i + p.len()) {
                    Some(&b) => b == self.escape,
                    None if eof => false,
                    None => return None,
                };
                out.extend_from_slice(p);
                i += p.len() + usize::from(escaped);
            } else if !eof && self.partial_pattern(rest) {
                return None;
            } else {
                out.push(rest[0]);
                i += 1;
            }
        }
        out.truncate(n);
        Some((out, i))
    }

    /// Number of wire bytes taken by the last `n` logical bytes of `wire`.
    #[must_use]
    pub fn stuffed_suffix_len(&self, wire: &[u8], n: usize) -> Option<usize> {
        let mut logical = 0;
        let mut end = wire.len();
        while logical < n {
            if end == 0 {
                return None;
            }
            let head = &wire[..end - 1];
            let escaped = (wire[end - 1] == self.escape)
                .then(|| self.patterns.iter().find(|p| head.ends_with(p)))
                .flatten();
            match escaped {
                Some(p) => {
                    logical += p.len();
                    end -= p.len() + 1;
                }
                None => {
                    logical += 1;
                    end -= 1;
                }
            }
        }
        Some(wire.len() - end)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn rule() -> StaffingRule {
        StaffingRule::new(0x00, vec![vec![0x68], vec![0x16]])
    }

    #[test]
    fn stuff_and_unstuff() {
        let data = [0x01, 0x68, 0x02, 0x16];
        let wire = rule().stuff(&data);
        assert_eq!(wire, vec![0x01, 0x68, 0x00, 0x02, 0x16, 0x00]);
        assert_eq!(rule().unstuff(&wire), data);
    }

    #[test]
    fn unstuff_after_stuff_is_identity() {
        let rule = StaffingRule::new(0x7D, vec![vec![0x7E], vec![0xAA, 0xBB]]);
        let samples: [&[u8]; 5] = [
            &[],
            &[0x7E],
            &[0x7E, 0x7E, 0x01],
            &[0xAA, 0xBB, 0xAA, 0xCC, 0xBB],
            &[0x00, 0xAA, 0xBB, 0x7E, 0xFF],
        ];
        for data in samples {
            assert_eq!(rule.unstuff(&rule.stuff(data)), data);
        }
    }

    #[test]
    fn multi_byte_patterns() {
        let rule = StaffingRule::new(0xFF, vec![vec![0x01, 0x02]]);
        assert_eq!(rule.stuff(&[0x01, 0x02, 0x01]), vec![0x01, 0x02, 0xFF, 0x01]);
        assert_eq!(rule.unstuff(&[0x01, 0x02, 0xFF, 0x01]), vec![0x01, 0x02, 0x01]);
    }

    #[test]
    fn no_patterns_is_identity() {
        let rule = StaffingRule::default();
        assert!(rule.is_identity());
        assert_eq!(rule.stuff(&[0x68, 0x00]), vec![0x68, 0x00]);
        assert_eq!(rule.unstuff(&[0x68, 0x00]), vec![0x68, 0x00]);
        assert_eq!(rule.unstuff_prefix(&[1, 2, 3], 2, false), Some((vec![1, 2], 2)));
        assert_eq!(rule.unstuff_prefix(&[1], 2, true), None);
        assert_eq!(rule.stuffed_suffix_len(&[1, 2, 3], 2), Some(2));
    }

    #[test]
    fn unstuff_prefix() {
        let wire = [0x68, 0x00, 0x05, 0x16, 0x00, 0x09];
        assert_eq!(rule().unstuff_prefix(&wire, 1, false), Some((vec![0x68], 2)));
        assert_eq!(rule().unstuff_prefix(&wire, 2, false), Some((vec![0x68, 0x05], 3)));
        assert_eq!(
            rule().unstuff_prefix(&wire, 3, false),
            Some((vec![0x68, 0x05, 0x16], 5))
        );
        // The escape byte is not there yet.
        assert_eq!(rule().unstuff_prefix(&wire[..1], 1, false), None);
        assert_eq!(rule().unstuff_prefix(&wire, 5, false), None);
        // Nothing more will come.
        assert_eq!(rule().unstuff_prefix(&wire[..1], 1, true), Some((vec![0x68], 1)));
        assert_eq!(rule().unstuff_prefix(&wire, 5, true), None);
    }

    #[test]
    fn partial_pattern_at_the_end_of_the_stream() {
        let rule = StaffingRule::new(0x00, vec![vec![0xAA, 0xBB]]);
        assert_eq!(rule.unstuff_prefix(&[0xAA], 1, false), None);
        assert_eq!(rule.unstuff_prefix(&[0xAA], 1, true), Some((vec![0xAA], 1)));
        assert_eq!(
            rule.unstuff_prefix(&[0xAA, 0xBB, 0x00, 0xAA], 3, true),
            Some((vec![0xAA, 0xBB, 0xAA], 4))
        );
    }

    #[test]
    fn escape_byte_as_pattern() {
        let rule = StaffingRule::new(0x7D, vec![vec![0x7E], vec![0x7D]]);
        assert_eq!(rule.stuff(&[0x7E]), vec![0x7E, 0x7D]);
        assert_eq!(rule.stuff(&[0x7D, 0x01]), vec![0x7D, 0x7D, 0x01]);
        assert_eq!(rule.unstuff(&[0x7E, 0x7D, 0x7D, 0x7D]), vec![0x7E, 0x7D]);
    }

    #[test]
    fn escaped_pattern_length() {
        assert_eq!(rule().escaped_len(&[0x16, 0x00, 0x16]), Some(2));
        assert_eq!(rule().escaped_len(&[0x16, 0x01]), None);
        assert_eq!(rule().escaped_len(&[0x16]), None);
        assert_eq!(rule().escaped_len(&[0x01, 0x00]), None);
    }

    #[test]
    fn stuffed_suffix() {
        let wire = [0x01, 0x16, 0x00, 0x68, 0x00];
        assert_eq!(rule().stuffed_suffix_len(&wire, 1), Some(2));
        assert_eq!(rule().stuffed_suffix_len(&wire, 2), Some(4));
        assert_eq!(rule().stuffed_suffix_len(&wire, 3), Some(5));
        assert_eq!(rule().stuffed_suffix_len(&wire, 4), None);
        assert_eq!(rule().stuffed_suffix_len(&[0x05, 0x00], 1), Some(1));
    }
}
