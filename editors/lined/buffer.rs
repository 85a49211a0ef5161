//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Buffer management for the lined editor.

use crate::lined::address::{Address, AddressInfo};
use crate::lined::error::{EdError, EdResult};
use regex::Regex;
use std::io::{self, BufRead, Write};

/// The edit buffer holding all lines.
#[derive(Debug)]
pub struct Buffer {
    /// Current line number (1-indexed, 0 means empty buffer)
    cur_line: usize,
    /// All lines in the buffer, without their newline terminators
    lines: Vec<String>,
}

impl Buffer {
    /// Create a new empty buffer.
    pub fn new() -> Buffer {
        Buffer {
            cur_line: 0,
            lines: Vec::new(),
        }
    }

    /// Return the number of lines in the buffer.
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    /// Return the current line number.
    pub fn index(&self) -> usize {
        self.cur_line
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get a line by number (1-indexed).
    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        if line_num == 0 {
            None
        } else {
            self.lines.get(line_num - 1).map(String::as_str)
        }
    }

    /// Text of the current line, or "" when the buffer is empty.
    pub fn current(&self) -> &str {
        self.get_line(self.cur_line).unwrap_or("")
    }

    /// Add a line after the current line and make it current.
    pub fn append(&mut self, line: String) {
        self.lines.insert(self.cur_line, line);
        self.cur_line += 1;
    }

    /// Add a line before the current line.
    ///
    /// The cursor moves forward with the line it was on, so a run of inserts
    /// lands in the order given. On an empty buffer this is an append.
    pub fn insert(&mut self, line: String) {
        if self.cur_line == 0 {
            self.append(line);
            return;
        }
        self.lines.insert(self.cur_line - 1, line);
        self.cur_line += 1;
    }

    /// Move back one line, stopping at the first.
    pub fn step_back(&mut self) {
        if self.cur_line > 1 {
            self.cur_line -= 1;
        }
    }

    /// Splice `lines` in after line `after` (0 is the top of the buffer).
    /// The last inserted line becomes current.
    pub fn put(&mut self, after: usize, lines: &[String]) -> EdResult<()> {
        if after > self.lines.len() {
            return Err(EdError::AddressOutOfRange);
        }
        self.lines.splice(after..after, lines.iter().cloned());
        if !lines.is_empty() {
            self.cur_line = after + lines.len();
        }
        Ok(())
    }

    /// Delete the addressed lines.
    ///
    /// Deleting the current line (unspecified address) leaves the cursor on
    /// the line before it; deleting an explicit range leaves it on the line
    /// that followed the range, or the last line if the range was at the end.
    pub fn delete(&mut self, addr: &Address) -> EdResult<()> {
        let Some((start, end)) = addr.resolve(self.lines.len(), self.cur_line)? else {
            return Ok(());
        };

        self.lines.drain(start - 1..end);

        self.cur_line = if self.lines.is_empty() {
            0
        } else if addr.is_unspecified() {
            start.saturating_sub(1).max(1)
        } else {
            start.min(self.lines.len())
        };

        Ok(())
    }

    /// Make the start of `addr` the current line.
    pub fn move_to(&mut self, addr: &Address) -> EdResult<()> {
        let target = match addr.start {
            AddressInfo::Null | AddressInfo::Current => {
                if self.lines.is_empty() {
                    return Ok(());
                }
                self.cur_line
            }
            AddressInfo::Last => self.lines.len(),
            AddressInfo::Line(n) => n,
        };

        if target < 1 || target > self.lines.len() {
            return Err(EdError::AddressOutOfRange);
        }
        self.cur_line = target;
        Ok(())
    }

    /// The addressed lines, in order. The cursor does not move.
    pub fn select(&self, addr: &Address) -> EdResult<&[String]> {
        if self.lines.is_empty() {
            return Ok(&[]);
        }
        match addr.resolve(self.lines.len(), self.cur_line)? {
            Some((start, end)) => Ok(&self.lines[start - 1..end]),
            None => Ok(&[]),
        }
    }

    /// Search forward from the line after the current one, wrapping around
    /// to the current line. Moves to the first match.
    pub fn search(&mut self, re: &Regex) -> bool {
        let total = self.lines.len();
        for i in 1..=total {
            let line_num = ((self.cur_line + i - 1) % total) + 1;
            if re.is_match(&self.lines[line_num - 1]) {
                self.cur_line = line_num;
                return true;
            }
        }
        false
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.cur_line = 0;
    }

    /// Replace the whole buffer; the last line becomes current.
    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.cur_line = self.lines.len();
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Read newline-delimited lines. The final line may lack its newline.
/// Returns the lines and the number of bytes consumed.
pub fn read_lines<R: BufRead>(reader: &mut R) -> io::Result<(Vec<String>, usize)> {
    let mut lines = Vec::new();
    let mut byte_count = 0;
    let mut raw = Vec::new();

    loop {
        raw.clear();
        let rc = reader.read_until(b'\n', &mut raw)?;
        if rc == 0 {
            break;
        }
        byte_count += rc;
        if raw.last() == Some(&b'\n') {
            raw.pop();
        }
        lines.push(String::from_utf8_lossy(&raw).into_owned());
    }

    Ok((lines, byte_count))
}

/// Write each line followed by a single newline. Returns bytes written.
pub fn write_lines<W: Write>(lines: &[String], writer: &mut W) -> io::Result<usize> {
    let mut byte_count = 0;
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        byte_count += line.len() + 1;
    }
    writer.flush()?;
    Ok(byte_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn buffer_of(lines: &[&str], cur: usize) -> Buffer {
        let mut buf = Buffer::new();
        buf.replace(lines.iter().map(|l| l.to_string()).collect());
        buf.move_to(&Address::line(cur)).unwrap();
        buf
    }

    fn addr(s: &str) -> Address {
        Address::parse_prefix(s).unwrap().0
    }

    #[test]
    fn test_new_buffer() {
        let buf = Buffer::new();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.index(), 0);
        assert_eq!(buf.current(), "");
    }

    #[test]
    fn test_append_to_empty() {
        let mut buf = Buffer::new();
        buf.append("one".to_string());
        assert_eq!(buf.size(), 1);
        assert_eq!(buf.index(), 1);
        assert_eq!(buf.current(), "one");
    }

    #[test]
    fn test_append_then_delete_current() {
        let mut buf = buffer_of(&["a", "b", "c"], 1);
        buf.append("x".to_string());
        assert_eq!(buf.lines(), ["a", "x", "b", "c"]);
        assert_eq!(buf.index(), 2);

        buf.delete(&Address::new()).unwrap();
        assert_eq!(buf.lines(), ["a", "b", "c"]);
        assert_eq!(buf.index(), 1);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut buf = buffer_of(&["a", "b", "c"], 2);
        buf.insert("x".to_string());
        buf.insert("y".to_string());
        assert_eq!(buf.lines(), ["a", "x", "y", "b", "c"]);
        assert_eq!(buf.current(), "b");
    }

    #[test]
    fn test_insert_into_empty() {
        let mut buf = Buffer::new();
        buf.insert("first".to_string());
        assert_eq!(buf.lines(), ["first"]);
        assert_eq!(buf.index(), 1);
    }

    #[test]
    fn test_delete_range() {
        let mut buf = buffer_of(&["1", "2", "3", "4", "5"], 5);
        buf.delete(&addr("2,3")).unwrap();
        assert_eq!(buf.lines(), ["1", "4", "5"]);
        assert_eq!(buf.index(), 2);
        assert_eq!(buf.select(&Address::new()).unwrap(), ["4"]);
    }

    #[test]
    fn test_delete_range_at_end() {
        let mut buf = buffer_of(&["1", "2", "3"], 1);
        buf.delete(&addr("2,$")).unwrap();
        assert_eq!(buf.lines(), ["1"]);
        assert_eq!(buf.index(), 1);
    }

    #[test]
    fn test_delete_first_line_unspecified() {
        let mut buf = buffer_of(&["1", "2"], 1);
        buf.delete(&Address::new()).unwrap();
        assert_eq!(buf.lines(), ["2"]);
        assert_eq!(buf.index(), 1);
    }

    #[test]
    fn test_delete_everything() {
        let mut buf = buffer_of(&["1", "2", "3"], 2);
        buf.delete(&addr("1,$")).unwrap();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.index(), 0);
        // nothing left to delete
        buf.delete(&Address::new()).unwrap();
        assert_eq!(buf.size(), 0);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut buf = buffer_of(&["1", "2"], 1);
        assert!(matches!(
            buf.delete(&addr("2,5")),
            Err(EdError::AddressOutOfRange)
        ));
        assert_eq!(buf.size(), 2);
    }

    #[test]
    fn test_move_and_current() {
        let mut buf = buffer_of(&["one", "two", "three"], 1);
        buf.move_to(&addr("3")).unwrap();
        assert_eq!(buf.current(), "three");
        buf.move_to(&addr(".")).unwrap();
        assert_eq!(buf.index(), 3);
    }

    #[test]
    fn test_move_out_of_range_keeps_index() {
        let mut buf = buffer_of(&["one", "two"], 2);
        assert!(buf.move_to(&addr("7")).is_err());
        assert_eq!(buf.index(), 2);
    }

    #[test]
    fn test_empty_buffer_no_ops() {
        let mut buf = Buffer::new();
        buf.move_to(&Address::new()).unwrap();
        assert_eq!(buf.index(), 0);
        assert!(buf.select(&Address::new()).unwrap().is_empty());
        assert!(buf.move_to(&addr("1")).is_err());
    }

    #[test]
    fn test_select_range() {
        let buf = buffer_of(&["one", "two", "three"], 1);
        let selected = buf.select(&addr("2,$")).unwrap();
        assert_eq!(selected, ["two", "three"]);
        assert_eq!(buf.index(), 1);
    }

    #[test]
    fn test_search_wraps() {
        let mut buf = buffer_of(&["apple", "banana", "apricot"], 3);
        let re = Regex::new("^ap").unwrap();
        assert!(buf.search(&re));
        assert_eq!(buf.index(), 1);
        assert!(buf.search(&re));
        assert_eq!(buf.index(), 3);
    }

    #[test]
    fn test_search_visits_every_line_once() {
        let mut buf = buffer_of(&["a", "b", "c", "d"], 2);
        let re = Regex::new("").unwrap();
        let mut seen = Vec::new();
        for _ in 0..buf.size() {
            assert!(buf.search(&re));
            seen.push(buf.index());
        }
        assert_eq!(seen, [3, 4, 1, 2]);
    }

    #[test]
    fn test_search_miss_keeps_index() {
        let mut buf = buffer_of(&["a", "b"], 2);
        assert!(!buf.search(&Regex::new("z").unwrap()));
        assert_eq!(buf.index(), 2);
        assert!(!Buffer::new().search(&Regex::new("z").unwrap()));
    }

    #[test]
    fn test_put() {
        let mut buf = buffer_of(&["a", "d"], 1);
        buf.put(1, &["b".to_string(), "c".to_string()]).unwrap();
        assert_eq!(buf.lines(), ["a", "b", "c", "d"]);
        assert_eq!(buf.index(), 3);
        buf.put(0, &["top".to_string()]).unwrap();
        assert_eq!(buf.current(), "top");
        assert!(buf.put(9, &["x".to_string()]).is_err());
    }

    #[test]
    fn test_read_lines_without_final_newline() {
        let (lines, bytes) = read_lines(&mut Cursor::new("b\nc")).unwrap();
        assert_eq!(lines, ["b", "c"]);
        assert_eq!(bytes, 3);
    }

    #[test]
    fn test_write_lines() {
        let buf = buffer_of(&["one", "", "three"], 1);
        let mut out = Vec::new();
        let written = write_lines(buf.lines(), &mut out).unwrap();
        assert_eq!(out, b"one\n\nthree\n");
        assert_eq!(written, out.len());
    }

    #[test]
    fn test_clear() {
        let mut buf = buffer_of(&["a", "b"], 2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.index(), 0);
        assert_eq!(buf.current(), "");
    }
}
