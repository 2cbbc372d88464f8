// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]

pub mod codec;
pub mod config;
mod error;
pub mod exception;
pub mod frame;
pub mod util;

pub use self::{codec::*, error::*, frame::*};
