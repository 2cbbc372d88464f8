// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus exception codes and their canonical error texts.

use core::fmt;

use crate::util::parse_hex_number;

/// A server (slave) exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    ServerDeviceFailure = 0x04,
    Acknowledge = 0x05,
    ServerDeviceBusy = 0x06,
    NegativeAcknowledge = 0x07,
    MemoryParityError = 0x08,
    GatewayPathUnavailable = 0x0A,
    GatewayTargetDevice = 0x0B,
}

const ALL: [Exception; 10] = [
    Exception::IllegalFunction,
    Exception::IllegalDataAddress,
    Exception::IllegalDataValue,
    Exception::ServerDeviceFailure,
    Exception::Acknowledge,
    Exception::ServerDeviceBusy,
    Exception::NegativeAcknowledge,
    Exception::MemoryParityError,
    Exception::GatewayPathUnavailable,
    Exception::GatewayTargetDevice,
];

impl Exception {
    const fn get_name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "Illegal function",
            Self::IllegalDataAddress => "Illegal data address",
            Self::IllegalDataValue => "Illegal data value",
            Self::ServerDeviceFailure => "Server device failure",
            Self::Acknowledge => "Acknowledge",
            Self::ServerDeviceBusy => "Server device busy",
            Self::NegativeAcknowledge => "Negative acknowledge",
            Self::MemoryParityError => "Memory parity error",
            Self::GatewayPathUnavailable => "Gateway path unavailable",
            Self::GatewayTargetDevice => "Gateway target device failed to respond",
        }
    }

    /// The exception code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up an exception by its code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        ALL.into_iter().find(|ex| ex.code() == code)
    }

    /// Look up an exception by a human-readable name.
    ///
    /// Accepts the variant name (`IllegalDataAddress`), the description in
    /// any case and spacing (`illegal data address`) or the code as a
    /// decimal or hex literal (`2`, `0x02`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(code) = name.parse::<u8>() {
            return Self::from_code(code);
        }
        if name.starts_with("0x") || name.starts_with("0X") {
            return parse_hex_number(name)
                .ok()
                .and_then(|code| u8::try_from(code).ok())
                .and_then(Self::from_code);
        }
        let key = normalize(name);
        ALL.into_iter().find(|ex| {
            normalize(ex.get_name()) == key || normalize(&format!("{ex:?}")) == key
        })
    }

    /// The text a Modbus client reports for this exception.
    #[must_use]
    pub fn error_text(self) -> String {
        format!(
            "modbus: exception {} ({})",
            self.code(),
            self.get_name().to_lowercase()
        )
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}
