//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Sources of input lines for the editor loop.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};

/// One event from a line source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A line of text, without its newline
    Line(String),
    /// The user interrupted (SIGINT)
    Interrupt,
    /// No more input
    Eof,
}

/// Anything that can feed the editor one line at a time.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Input>;
}

/// Line source over a buffered reader, optionally watching an interrupt
/// flag set by a signal handler.
pub struct ReaderSource<R: BufRead> {
    reader: R,
    interrupt: Option<&'static AtomicBool>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader,
            interrupt: None,
        }
    }

    /// Report `Input::Interrupt` whenever `flag` has been raised.
    pub fn interrupt_on(mut self, flag: &'static AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn take_interrupt(&self) -> bool {
        self.interrupt
            .map(|flag| flag.swap(false, Ordering::SeqCst))
            .unwrap_or(false)
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    /// Read up to the next newline. A partial line pending when an
    /// interrupt arrives is discarded.
    fn next_line(&mut self) -> io::Result<Input> {
        let mut raw = Vec::new();
        loop {
            if self.take_interrupt() {
                return Ok(Input::Interrupt);
            }
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                if raw.is_empty() {
                    return Ok(Input::Eof);
                }
                break;
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    raw.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    break;
                }
                None => {
                    let n = available.len();
                    raw.extend_from_slice(available);
                    self.reader.consume(n);
                }
            }
        }
        Ok(Input::Line(String::from_utf8_lossy(&raw).into_owned()))
    }
}
