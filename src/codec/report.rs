// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use super::Type;

/// Decimal, hexadecimal and binary text of one side of a check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    pub dec: String,
    pub hex: String,
    pub bin: String,
}

impl Rendering {
    /// Render a `min..max` pair; an unbounded side stays blank.
    #[must_use]
    pub fn range(min: Option<Rendering>, max: Option<Rendering>) -> Self {
        let min = min.unwrap_or_default();
        let max = max.unwrap_or_default();
        Rendering {
            dec: format!("{}..{}", min.dec, max.dec),
            hex: format!("{}..{}", min.hex, max.hex),
            bin: format!("{}..{}", min.bin, max.bin),
        }
    }

    /// Render a byte sequence, one group per byte.
    pub(crate) fn bytes(dec: String, bytes: &[u8]) -> Self {
        let join = |f: fn(&u8) -> String| bytes.iter().map(f).collect::<Vec<_>>().join(" ");
        Rendering {
            dec,
            hex: join(|b| format!("{b:02X}")),
            bin: join(|b| format!("{b:08b}")),
        }
    }

    pub(crate) fn flag(flag: bool) -> Self {
        let digit = if flag { "1" } else { "0" };
        Rendering {
            dec: flag.to_string(),
            hex: digit.into(),
            bin: digit.into(),
        }
    }
}

/// The outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub name: String,
    pub pass: bool,
    pub kind: Type,
    pub expected: Rendering,
    pub got: Rendering,
}

impl Report {
    pub(crate) fn new(kind: Type, pass: bool, expected: Rendering, got: Rendering) -> Self {
        Report {
            name: String::new(),
            pass,
            kind,
            expected,
            got,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): expected {} [0x{}], got {} [0x{}]",
            if self.pass { "PASS" } else { "FAIL" },
            self.name,
            self.kind,
            self.expected.dec,
            self.expected.hex,
            self.got.dec,
            self.got.hex
        )
    }
}
