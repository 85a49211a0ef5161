//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Command parsing for the lined editor.
//!
//! A command line is `ADDRESS? VERB? ARGUMENTS?`. The verb is a run of
//! letters, or one of the symbols `=` and `!`.

use crate::lined::address::Address;
use crate::lined::buffer::Buffer;
use crate::lined::error::{EdError, EdResult};
use std::fmt;
use std::str::FromStr;

/// Every command the editor understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    /// (empty) - go to a line and print it
    Move,
    /// = - print the current line number
    Index,
    /// a - append text after the current line
    Append,
    /// c - change lines
    Change,
    /// d - delete lines
    Delete,
    /// e [file] - edit file
    Edit,
    /// f [file] - set/print filename
    File,
    /// i - insert text before the current line
    Insert,
    /// j - join lines
    Join,
    /// n - print with line numbers
    Number,
    /// p - print lines
    Print,
    /// q - quit
    Quit,
    /// r [file] - read file after the current line
    Read,
    /// s [pattern] - search forward
    Search,
    /// !command - shell escape
    Shell,
    /// w [file] - write
    Write,
    /// wq [file] - write and quit
    WriteQuit,
    /// x - paste the clipboard
    Paste,
    /// y - yank lines into the clipboard
    Yank,
}

impl Verb {
    pub const ALL: [Verb; 19] = [
        Verb::Move,
        Verb::Index,
        Verb::Append,
        Verb::Change,
        Verb::Delete,
        Verb::Edit,
        Verb::File,
        Verb::Insert,
        Verb::Join,
        Verb::Number,
        Verb::Print,
        Verb::Quit,
        Verb::Read,
        Verb::Search,
        Verb::Shell,
        Verb::Write,
        Verb::WriteQuit,
        Verb::Paste,
        Verb::Yank,
    ];

    /// The spelling of the verb on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Move => "",
            Verb::Index => "=",
            Verb::Append => "a",
            Verb::Change => "c",
            Verb::Delete => "d",
            Verb::Edit => "e",
            Verb::File => "f",
            Verb::Insert => "i",
            Verb::Join => "j",
            Verb::Number => "n",
            Verb::Print => "p",
            Verb::Quit => "q",
            Verb::Read => "r",
            Verb::Search => "s",
            Verb::Shell => "!",
            Verb::Write => "w",
            Verb::WriteQuit => "wq",
            Verb::Paste => "x",
            Verb::Yank => "y",
        }
    }
}

impl FromStr for Verb {
    type Err = EdError;

    fn from_str(s: &str) -> EdResult<Verb> {
        Verb::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| EdError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub addr: Address,
    pub verb: Verb,
    /// Arguments split on single spaces
    pub args: Vec<String>,
    /// The argument text as typed, trimmed
    pub text: String,
}

impl Command {
    /// Argument `i`, or "" when absent.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map(String::as_str).unwrap_or("")
    }

    /// Check the address against the buffer it will be applied to.
    pub fn validate(&self, buf: &Buffer) -> EdResult<()> {
        self.addr.resolve(buf.size(), buf.index()).map(|_| ())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.addr, self.verb)?;
        if !self.text.is_empty() {
            write!(f, " {}", self.text)?;
        }
        Ok(())
    }
}

/// Parse a command line into a Command.
pub fn parse(line: &str) -> EdResult<Command> {
    let line = line
        .trim_end_matches(|c: char| c == '\n' || c == '\r')
        .trim_start();
    let (addr, rest) = Address::parse_prefix(line)?;

    let verb_len = if rest.starts_with('=') || rest.starts_with('!') {
        1
    } else {
        rest.bytes().take_while(|b| b.is_ascii_alphabetic()).count()
    };
    let verb = rest[..verb_len].parse::<Verb>()?;

    let text = rest[verb_len..].trim().to_string();
    let args = if text.is_empty() {
        Vec::new()
    } else {
        text.split(' ').map(String::from).collect()
    };

    Ok(Command {
        addr,
        verb,
        args,
        text,
    })
}
