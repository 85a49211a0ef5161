//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Line range addresses.
//!
//! An address is `start[,end]` where `start` is a line number, `.` or `$`
//! and `end` is a line number or `$`. Both parts are optional; an address
//! with neither refers to the current line.

use crate::lined::error::{EdError, EdResult};
use std::fmt;

/// One bound of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressInfo {
    /// Not given
    Null,
    /// `.` (or line 0)
    Current,
    /// `$`
    Last,
    Line(usize),
}

/// A parsed `start[,end]` range expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
    pub start: AddressInfo,
    pub end: AddressInfo,
}

impl Address {
    /// The unspecified address: the current line.
    pub fn new() -> Self {
        Address {
            start: AddressInfo::Null,
            end: AddressInfo::Null,
        }
    }

    /// A single explicit line.
    pub fn line(n: usize) -> Self {
        Address {
            start: AddressInfo::Line(n),
            end: AddressInfo::Null,
        }
    }

    /// Lines `start` through `end`.
    pub fn range(start: usize, end: usize) -> Self {
        Address {
            start: AddressInfo::Line(start),
            end: AddressInfo::Line(end),
        }
    }

    /// True when no explicit start or end was given.
    pub fn is_unspecified(&self) -> bool {
        matches!(self.start, AddressInfo::Null | AddressInfo::Current)
            && self.end == AddressInfo::Null
    }

    /// Resolve against a buffer of `size` lines whose current line is `cur`.
    ///
    /// Returns `None` for the unspecified address on an empty buffer;
    /// otherwise the inclusive 1-based range, which is always inside
    /// `1..=size` with `start <= end`.
    pub fn resolve(&self, size: usize, cur: usize) -> EdResult<Option<(usize, usize)>> {
        if self.is_unspecified() {
            return Ok(if size == 0 { None } else { Some((cur, cur)) });
        }

        let start = match self.start {
            AddressInfo::Null | AddressInfo::Current => cur,
            AddressInfo::Last => size,
            AddressInfo::Line(n) => n,
        };
        let end = match self.end {
            AddressInfo::Null => start,
            AddressInfo::Current => cur,
            AddressInfo::Last => size,
            AddressInfo::Line(n) => n,
        };

        if start == 0 || start > end || end > size {
            return Err(EdError::AddressOutOfRange);
        }
        Ok(Some((start, end)))
    }

    /// Parse an address from the front of `input`, returning it together
    /// with the unparsed remainder.
    pub fn parse_prefix(input: &str) -> EdResult<(Address, &str)> {
        let mut addr = Address::new();
        let mut rest = input;

        if let Some(r) = rest.strip_prefix('.') {
            addr.start = AddressInfo::Current;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('$') {
            addr.start = AddressInfo::Last;
            rest = r;
        } else if let Some((n, r)) = split_number(rest)? {
            // line 0 is another spelling of the current line
            addr.start = if n == 0 {
                AddressInfo::Current
            } else {
                AddressInfo::Line(n)
            };
            rest = r;
        }

        if let Some(r) = rest.strip_prefix(',') {
            if let Some(r) = r.strip_prefix('$') {
                addr.end = AddressInfo::Last;
                rest = r;
            } else if let Some((n, r)) = split_number(r)? {
                addr.end = AddressInfo::Line(n);
                rest = r;
            } else {
                return Err(EdError::Parse(format!(
                    "expected line number or '$' after ',' in \"{}\"",
                    input
                )));
            }
        }

        Ok((addr, rest))
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            AddressInfo::Null => {}
            AddressInfo::Current => write!(f, ".")?,
            AddressInfo::Last => write!(f, "$")?,
            AddressInfo::Line(n) => write!(f, "{}", n)?,
        }
        match self.end {
            AddressInfo::Null => Ok(()),
            AddressInfo::Current => write!(f, ",."),
            AddressInfo::Last => write!(f, ",$"),
            AddressInfo::Line(n) => write!(f, ",{}", n),
        }
    }
}

/// Split a leading run of ASCII digits off `s` and parse it.
fn split_number(s: &str) -> EdResult<Option<(usize, &str)>> {
    let len = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return Ok(None);
    }
    let n = s[..len]
        .parse::<usize>()
        .map_err(|e| EdError::Parse(format!("{}: {}", &s[..len], e)))?;
    Ok(Some((n, &s[len..])))
}
