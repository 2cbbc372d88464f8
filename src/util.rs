// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common helpers

use std::time::Duration;

use crate::error::*;

/// Decode a hex literal such as `"0x01 0x0002"` into bytes.
///
/// The text is matched case-insensitively; every `0x` prefix and every space
/// is dropped and each second remaining character closes a byte, so a
/// trailing unpaired digit is ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.to_lowercase().replace(' ', "").replace("0x", "");
    digits
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let pair = core::str::from_utf8(pair).map_err(|_| Error::HexLiteral(text.into()))?;
            u8::from_str_radix(pair, 16).map_err(|_| Error::HexLiteral(text.into()))
        })
        .collect()
}

/// Decode a hex literal into an unsigned number (big-endian digit order).
pub fn parse_hex_number(text: &str) -> Result<u64> {
    let bytes = parse_hex(text)?;
    if bytes.len() > 8 {
        return Err(Error::HexLiteral(text.into()));
    }
    Ok(bytes.iter().fold(0, |acc, b| acc << 8 | u64::from(*b)))
}

/// A parsed duration literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Wait for the given time.
    Fixed(Duration),
    /// Unparsable literal: pause until the operator continues.
    Interactive,
}

impl Delay {
    /// The fixed duration, if any.
    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        match self {
            Self::Fixed(d) => Some(d),
            Self::Interactive => None,
        }
    }
}

/// Parse a duration literal like `"2ms"`, `"1.5s"` or `"3"` (seconds).
///
/// An empty text is a zero duration. Anything unparsable yields
/// [`Delay::Interactive`] instead of an error.
#[must_use]
pub fn parse_delay(text: &str) -> Delay {
    let text = text.trim();
    if text.is_empty() {
        return Delay::Fixed(Duration::ZERO);
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Delay::Fixed(Duration::from_secs(secs));
    }
    let split = text
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let nanos_per_unit: f64 = match unit {
        "ns" => 1.0,
        "us" | "µs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60e9,
        "h" => 3600e9,
        _ => return Delay::Interactive,
    };
    let number = if number.is_empty() {
        1.0
    } else {
        match number.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => n,
            _ => return Delay::Interactive,
        }
    };
    let nanos = (number * nanos_per_unit).round();
    if nanos > u64::MAX as f64 {
        return Delay::Interactive;
    }
    Delay::Fixed(Duration::from_nanos(nanos as u64))
}
