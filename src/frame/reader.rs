// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frames from a blocking byte stream.

use std::io::{self, Read};

use super::*;

const CHUNK_SIZE: usize = 256;

/// Yields the frames found in a byte stream.
///
/// Garbage between frames is dropped. Reading stops after the end of the
/// stream or the first error.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    splitter: Splitter,
    buf: Vec<u8>,
    eof: bool,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, splitter: Splitter) -> Self {
        FrameReader {
            inner,
            splitter,
            buf: Vec::with_capacity(CHUNK_SIZE),
            eof: false,
            done: false,
        }
    }

    /// Bytes received but not yet part of a frame.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// The next frame, `None` after the end of the stream.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        while !self.done {
            match self.splitter.split(&self.buf, self.eof) {
                Ok(Split::Frame {
                    consumed,
                    frame,
                    last,
                }) => {
                    let frame = frame.to_vec();
                    self.buf.drain(..consumed);
                    self.done = last;
                    return Ok(Some(frame));
                }
                Ok(Split::Discard(cnt)) => {
                    #[cfg(feature = "log")]
                    log::warn!("Drop {cnt} byte(s): {:02X?}", &self.buf[..cnt]);
                    self.buf.drain(..cnt);
                }
                Ok(Split::Incomplete) => self.fill()?,
                Ok(Split::Exhausted) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            }
        }
        Ok(None)
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0; CHUNK_SIZE];
        match self.inner.read(&mut chunk) {
            Ok(0) => self.eof = true,
            Ok(cnt) => self.buf.extend_from_slice(&chunk[..cnt]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => {
                self.done = true;
                return Err(err.into());
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
