//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The editor loop and the session state shared with command handlers.

use crate::lined::buffer::Buffer;
use crate::lined::command;
use crate::lined::dispatch::Registry;
use crate::lined::error::{EdError, EdResult};
use crate::lined::file;
use crate::lined::highlight;
use crate::lined::input::{Input, LineSource};
use regex::Regex;
use std::io::{self, Write};

/// What input lines mean right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Lines are commands
    Command,
    /// Lines are added after the current line
    Append,
    /// Lines are added before the current line
    Insert,
}

/// Session state visible to command handlers.
pub struct Session<W: Write> {
    /// Command output
    pub out: W,
    mode: Mode,
    prompt: String,
    default_prompt: String,
    /// Default file for e, r and w
    pub filename: String,
    /// Lines saved by y, pasted by x
    pub clipboard: Vec<String>,
    /// Last search pattern
    pub pattern: Option<Regex>,
    /// Suppress byte counts and the `!` marker
    pub silent: bool,
    /// Syntax highlight printed lines
    pub highlight: bool,
    /// Exit status of the last shell command
    pub last_status: Option<i32>,
    running: bool,
    inserted: usize,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Session {
            out,
            mode: Mode::Command,
            prompt: String::new(),
            default_prompt: String::new(),
            filename: String::new(),
            clipboard: Vec::new(),
            pattern: None,
            silent: false,
            highlight: false,
            last_status: None,
            running: true,
            inserted: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes. Text entry runs without a prompt; command mode gets
    /// the default prompt back.
    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.inserted = 0;
        self.prompt = match mode {
            Mode::Command => self.default_prompt.clone(),
            Mode::Append | Mode::Insert => String::new(),
        };
    }

    /// Show the prompt, if there is one, and flush pending output.
    pub fn print_prompt(&mut self) -> io::Result<()> {
        if !self.prompt.is_empty() {
            write!(self.out, "{}", self.prompt)?;
        }
        self.out.flush()
    }

    /// Set the command-mode prompt, applying it now if in command mode.
    pub fn set_default_prompt(&mut self, prompt: &str) {
        self.default_prompt = prompt.to_string();
        if self.mode == Mode::Command {
            self.prompt = self.default_prompt.clone();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Print a byte count, unless silent.
    pub fn print_bytes(&mut self, bytes: usize) -> io::Result<()> {
        if !self.silent {
            writeln!(self.out, "{}", bytes)?;
        }
        Ok(())
    }

    /// Lines as they should be displayed: highlighted when enabled, plain
    /// text when not or when highlighting fails.
    pub fn styled(&self, lines: &[String]) -> Vec<String> {
        if !self.highlight {
            return lines.to_vec();
        }
        match highlight::highlight_lines(lines, &self.filename) {
            Ok(styled) => styled,
            Err(e) => {
                log::warn!("{}", e);
                lines.to_vec()
            }
        }
    }
}

/// The editor: a session, a buffer, a command registry and a line source.
pub struct Editor<I: LineSource, W: Write> {
    pub session: Session<W>,
    pub buf: Buffer,
    registry: Registry<W>,
    input: I,
}

impl<I: LineSource, W: Write> Editor<I, W> {
    pub fn new(input: I, out: W) -> Self {
        Editor {
            session: Session::new(out),
            buf: Buffer::new(),
            registry: Registry::with_defaults(),
            input,
        }
    }

    /// Load `path` into the buffer and make it the default filename.
    /// The filename is kept even if the load fails, so `w` can create it.
    pub fn load_file(&mut self, path: &str) -> EdResult<()> {
        if !path.starts_with('!') {
            self.session.filename = path.to_string();
        }
        let (lines, bytes) = file::read_source(path)?;
        self.buf.replace(lines);
        self.session.print_bytes(bytes)?;
        Ok(())
    }

    /// Run until `q`, `wq` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        while self.session.is_running() {
            self.session.print_prompt()?;
            match self.input.next_line()? {
                Input::Line(line) => self.process_line(&line)?,
                Input::Interrupt => self.interrupt(),
                Input::Eof => self.session.stop(),
            }
        }
        log::debug!(
            "session ended with {} lines, last shell status {:?}",
            self.buf.size(),
            self.session.last_status
        );
        self.session.out.flush()
    }

    /// Handle one input line according to the current mode. Command errors
    /// are reported and the session continues; only output failures are
    /// returned.
    pub fn process_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        match self.session.mode {
            Mode::Command => {
                if let Err(e) = self.execute(line) {
                    self.report(&e)?;
                }
            }
            Mode::Append | Mode::Insert if line == "." => self.leave_text_entry(),
            Mode::Append => self.buf.append(line.to_string()),
            Mode::Insert => {
                self.buf.insert(line.to_string());
                self.session.inserted += 1;
            }
        }
        Ok(())
    }

    fn execute(&mut self, line: &str) -> EdResult<()> {
        let cmd = command::parse(line)?;
        cmd.validate(&self.buf)?;
        let handler = self
            .registry
            .get(cmd.verb)
            .ok_or_else(|| EdError::UnknownCommand(cmd.verb.to_string()))?;
        log::debug!("dispatch {:?}: {}", cmd.verb, cmd);
        handler(&mut self.session, &mut self.buf, &cmd)
    }

    fn report(&mut self, err: &EdError) -> io::Result<()> {
        log::debug!("command failed: {:?}", err);
        writeln!(self.session.out, "? {}", err)
    }

    /// An interrupt ends text entry; in command mode it is ignored.
    fn interrupt(&mut self) {
        log::debug!("interrupt in {:?} mode", self.session.mode());
        if self.session.mode() != Mode::Command {
            self.leave_text_entry();
        }
    }

    fn leave_text_entry(&mut self) {
        // inserts leave the cursor on the line after the new text
        if self.session.mode == Mode::Insert && self.session.inserted > 0 {
            self.buf.step_back();
        }
        self.session.set_mode(Mode::Command);
    }
}
