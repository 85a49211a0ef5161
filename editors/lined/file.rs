//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Loading and saving lines, and running shell commands.
//!
//! A source or destination name starting with `!` is a shell command run
//! through `sh -c`: reading takes its standard output, writing feeds the
//! lines to its standard input.

use crate::lined::buffer::{read_lines, write_lines};
use crate::lined::error::{EdError, EdResult};
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

/// Output of a finished shell command.
#[derive(Debug)]
pub struct ShellOutput {
    /// Exit code (-1 when killed by a signal)
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

fn shell(command: &str) -> EdResult<Command> {
    if command.trim().is_empty() {
        return Err(EdError::NoCommand);
    }
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    Ok(cmd)
}

/// Run `command` to completion, capturing its output.
pub fn run_shell(command: &str) -> EdResult<ShellOutput> {
    log::debug!("running shell command: {}", command);
    let output = shell(command)?.stdin(Stdio::null()).output()?;

    Ok(ShellOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Write `lines` to a child's standard input, then close it. A command
/// that exits without reading everything ends the input early; the bytes
/// handed over until then are returned.
fn feed(stdin: Option<ChildStdin>, lines: &[String]) -> io::Result<usize> {
    let Some(stdin) = stdin else {
        return Ok(0);
    };
    let mut writer = BufWriter::new(stdin);
    let mut bytes = 0;
    for line in lines {
        let res = writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"));
        match res {
            Ok(()) => bytes += line.len() + 1,
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("shell command closed its input after {} bytes", bytes);
                return Ok(bytes);
            }
            Err(e) => return Err(e),
        }
    }
    match writer.flush() {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("shell command closed its input before the last flush");
            Ok(bytes)
        }
        res => res.map(|_| bytes),
    }
}

/// Feed `lines` to the standard input of `command`, capturing its output.
/// Returns the number of bytes written to the command.
///
/// The input is written from a second thread while this one collects the
/// output, so a command echoing more than a pipe holds cannot stall both.
pub fn pipe_to_shell(command: &str, lines: &[String]) -> EdResult<(usize, ShellOutput)> {
    log::debug!("piping {} lines to shell command: {}", lines.len(), command);
    let mut child = shell(command)?
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdin = child.stdin.take();
    let (written, output) = thread::scope(|scope| {
        let writer = scope.spawn(move || feed(stdin, lines));
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("shell input writer panicked")));
        (written, output)
    });

    let output = output?;
    let bytes = written?;
    Ok((
        bytes,
        ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        },
    ))
}

/// Read every line of a named source. Returns the lines and the byte count.
pub fn read_source(name: &str) -> EdResult<(Vec<String>, usize)> {
    if let Some(command) = name.strip_prefix('!') {
        let output = run_shell(command)?;
        if !output.success() {
            log::info!("{}: exited with status {}", command, output.exit_code);
            return Err(EdError::ShellStatus(output.exit_code));
        }
        return Ok(read_lines(&mut output.stdout.as_slice())?);
    }

    let file = fs::File::open(name)?;
    let (lines, bytes) = read_lines(&mut BufReader::new(file))?;
    log::debug!("read {} lines ({} bytes) from {}", lines.len(), bytes, name);
    Ok((lines, bytes))
}

/// Write `lines` to the file `path`, replacing its contents.
pub fn write_file(path: &str, lines: &[String]) -> EdResult<usize> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let bytes = write_lines(lines, &mut writer)?;
    writer.flush()?;
    log::debug!("wrote {} lines ({} bytes) to {}", lines.len(), bytes, path);
    Ok(bytes)
}
