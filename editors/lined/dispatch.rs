//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Command handlers, keyed by verb.
//!
//! Every handler has the same shape: it gets the session, the buffer and
//! the parsed command, and reports failure through `EdResult`. The address
//! has already been checked against the buffer when a handler runs.

use crate::lined::address::Address;
use crate::lined::buffer::Buffer;
use crate::lined::command::{Command, Verb};
use crate::lined::editor::{Mode, Session};
use crate::lined::error::{EdError, EdResult};
use crate::lined::file::{self, ShellOutput};
use regex::Regex;
use std::collections::HashMap;
use std::io::{self, Write};

pub type Handler<W> = fn(&mut Session<W>, &mut Buffer, &Command) -> EdResult<()>;

/// Map from verb to handler.
pub struct Registry<W: Write> {
    handlers: HashMap<Verb, Handler<W>>,
}

impl<W: Write> Registry<W> {
    pub fn new() -> Self {
        Registry {
            handlers: HashMap::new(),
        }
    }

    /// Bind `verb` to `handler`, replacing any earlier binding.
    pub fn register(&mut self, verb: Verb, handler: Handler<W>) {
        self.handlers.insert(verb, handler);
    }

    pub fn get(&self, verb: Verb) -> Option<Handler<W>> {
        self.handlers.get(&verb).copied()
    }

    /// A registry with every built-in command.
    pub fn with_defaults() -> Self {
        let mut r = Registry::new();
        r.register(Verb::Move, cmd_move);
        r.register(Verb::Index, cmd_index);
        r.register(Verb::Append, cmd_append);
        r.register(Verb::Change, cmd_change);
        r.register(Verb::Delete, cmd_delete);
        r.register(Verb::Edit, cmd_edit);
        r.register(Verb::File, cmd_file);
        r.register(Verb::Insert, cmd_insert);
        r.register(Verb::Join, cmd_join);
        r.register(Verb::Number, cmd_number);
        r.register(Verb::Print, cmd_print);
        r.register(Verb::Quit, cmd_quit);
        r.register(Verb::Read, cmd_read);
        r.register(Verb::Search, cmd_search);
        r.register(Verb::Shell, cmd_shell);
        r.register(Verb::Write, cmd_write);
        r.register(Verb::WriteQuit, cmd_write_quit);
        r.register(Verb::Paste, cmd_paste);
        r.register(Verb::Yank, cmd_yank);
        r
    }
}

impl<W: Write> Default for Registry<W> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The line a command refers to: the current line when no address was
/// given, otherwise the end of the range.
fn target_line(buf: &Buffer, cmd: &Command) -> EdResult<usize> {
    if cmd.addr.is_unspecified() {
        return Ok(buf.index());
    }
    let range = cmd.addr.resolve(buf.size(), buf.index())?;
    Ok(range.map(|(_, end)| end).unwrap_or(0))
}

/// The file a command names, falling back to the default filename.
fn target_name<W: Write>(s: &Session<W>, cmd: &Command) -> EdResult<String> {
    if !cmd.text.is_empty() {
        Ok(cmd.text.clone())
    } else if !s.filename.is_empty() {
        Ok(s.filename.clone())
    } else {
        Err(EdError::NoFilename)
    }
}

fn echo_output<W: Write>(s: &mut Session<W>, output: &ShellOutput) -> io::Result<()> {
    s.out.write_all(&output.stdout)?;
    s.out.write_all(&output.stderr)?;
    Ok(())
}

/// (empty) - go to the addressed line and print it
fn cmd_move<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    if buf.is_empty() && cmd.addr.is_unspecified() {
        return Ok(());
    }
    buf.move_to(&cmd.addr)?;
    writeln!(s.out, "{}", buf.current())?;
    Ok(())
}

/// =
fn cmd_index<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let line = target_line(buf, cmd)?;
    writeln!(s.out, "{}", line)?;
    Ok(())
}

/// a
fn cmd_append<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    if !cmd.addr.is_unspecified() {
        buf.move_to(&cmd.addr)?;
    }
    s.set_mode(Mode::Append);
    Ok(())
}

/// i
fn cmd_insert<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    if !cmd.addr.is_unspecified() {
        buf.move_to(&cmd.addr)?;
    }
    if buf.is_empty() {
        s.set_mode(Mode::Append);
    } else {
        s.set_mode(Mode::Insert);
    }
    Ok(())
}

/// c - delete the range, then take replacement text where it was
fn cmd_change<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let Some((start, _)) = cmd.addr.resolve(buf.size(), buf.index())? else {
        s.set_mode(Mode::Append);
        return Ok(());
    };
    buf.delete(&cmd.addr)?;

    if start > 1 {
        buf.move_to(&Address::line(start - 1))?;
        s.set_mode(Mode::Append);
    } else if buf.is_empty() {
        s.set_mode(Mode::Append);
    } else {
        buf.move_to(&Address::line(1))?;
        s.set_mode(Mode::Insert);
    }
    Ok(())
}

/// d
fn cmd_delete<W: Write>(_s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    buf.delete(&cmd.addr)
}

/// e [file] - replace the buffer; nothing changes if the read fails
fn cmd_edit<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let name = target_name(s, cmd)?;
    let (lines, bytes) = file::read_source(&name)?;
    buf.clear();
    buf.put(0, &lines)?;
    if !cmd.text.is_empty() && !name.starts_with('!') {
        s.filename = name;
    }
    s.print_bytes(bytes)?;
    Ok(())
}

/// f [file]
fn cmd_file<W: Write>(s: &mut Session<W>, _buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let name = cmd.arg(0);
    if !name.is_empty() {
        s.filename = name.to_string();
    }
    if !s.filename.is_empty() {
        writeln!(s.out, "{}", s.filename)?;
    }
    Ok(())
}

/// j - with no address, joins the current line and the next
fn cmd_join<W: Write>(_s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    if buf.is_empty() {
        return Ok(());
    }
    let (start, end) = if cmd.addr.is_unspecified() {
        let cur = buf.index();
        if cur >= buf.size() {
            return Err(EdError::AddressOutOfRange);
        }
        (cur, cur + 1)
    } else {
        match cmd.addr.resolve(buf.size(), buf.index())? {
            Some(range) => range,
            None => return Ok(()),
        }
    };
    if start == end {
        return Ok(());
    }

    let range = Address::range(start, end);
    let joined = buf.select(&range)?.concat();
    buf.delete(&range)?;
    buf.put(start - 1, &[joined])
}

/// n
fn cmd_number<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let Some((start, _)) = cmd.addr.resolve(buf.size(), buf.index())? else {
        return Ok(());
    };
    let styled = s.styled(buf.select(&cmd.addr)?);
    for (i, line) in styled.iter().enumerate() {
        let n = start + i;
        let marker = if n == buf.index() { '*' } else { ' ' };
        writeln!(s.out, "{:>4}{} {}", n, marker, line)?;
    }
    Ok(())
}

/// p
fn cmd_print<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    for line in s.styled(buf.select(&cmd.addr)?) {
        writeln!(s.out, "{}", line)?;
    }
    Ok(())
}

/// q
fn cmd_quit<W: Write>(s: &mut Session<W>, _buf: &mut Buffer, _cmd: &Command) -> EdResult<()> {
    s.stop();
    Ok(())
}

/// r [file] - append after the addressed line
fn cmd_read<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let name = target_name(s, cmd)?;
    let after = target_line(buf, cmd)?;
    let (lines, bytes) = file::read_source(&name)?;
    buf.put(after, &lines)?;
    if s.filename.is_empty() && !name.starts_with('!') {
        s.filename = name;
    }
    s.print_bytes(bytes)?;
    Ok(())
}

/// s [pattern] - forward search, wrapping; no pattern reuses the last one
fn cmd_search<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    if !cmd.text.is_empty() {
        s.pattern = Some(Regex::new(&cmd.text)?);
    }
    let re = s.pattern.as_ref().ok_or(EdError::NoPattern)?;
    if !buf.search(re) {
        return Err(EdError::NoMatch);
    }
    writeln!(s.out, "{}", buf.current())?;
    Ok(())
}

/// !command
fn cmd_shell<W: Write>(s: &mut Session<W>, _buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let output = file::run_shell(&cmd.text)?;
    echo_output(s, &output)?;
    s.last_status = Some(output.exit_code);
    if !s.silent {
        writeln!(s.out, "!")?;
    }
    if !output.success() {
        log::info!("{}: exited with status {}", cmd.text, output.exit_code);
        return Err(EdError::ShellStatus(output.exit_code));
    }
    Ok(())
}

/// w [file] - the whole buffer unless a range is given
fn cmd_write<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let name = target_name(s, cmd)?;
    let lines = if cmd.addr.is_unspecified() {
        buf.lines()
    } else {
        buf.select(&cmd.addr)?
    };

    let bytes = match name.strip_prefix('!') {
        Some(command) => {
            let (bytes, output) = file::pipe_to_shell(command, lines)?;
            echo_output(s, &output)?;
            s.last_status = Some(output.exit_code);
            if !output.success() {
                log::info!("{}: exited with status {}", command, output.exit_code);
                return Err(EdError::ShellStatus(output.exit_code));
            }
            bytes
        }
        None => {
            let bytes = file::write_file(&name, lines)?;
            if s.filename.is_empty() {
                s.filename = name;
            }
            bytes
        }
    };
    s.print_bytes(bytes)?;
    Ok(())
}

/// wq [file]
fn cmd_write_quit<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    cmd_write(s, buf, cmd)?;
    s.stop();
    Ok(())
}

/// x - paste the clipboard after the addressed line
fn cmd_paste<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    let after = target_line(buf, cmd)?;
    buf.put(after, &s.clipboard)
}

/// y
fn cmd_yank<W: Write>(s: &mut Session<W>, buf: &mut Buffer, cmd: &Command) -> EdResult<()> {
    s.clipboard = buf.select(&cmd.addr)?.to_vec();
    Ok(())
}
