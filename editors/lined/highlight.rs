//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Syntax highlighting of printed lines.

use crate::lined::error::{EdError, EdResult};
use std::path::Path;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::as_24_bit_terminal_escaped;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

/// Pick a syntax from the filename extension, then from the first line
/// (shebangs, modelines), falling back to plain text.
fn detect_syntax<'a>(set: &'a SyntaxSet, filename: &str, source: &str) -> &'a SyntaxReference {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| set.find_syntax_by_extension(ext))
        .or_else(|| {
            source
                .lines()
                .next()
                .and_then(|line| set.find_syntax_by_first_line(line))
        })
        .unwrap_or_else(|| set.find_syntax_plain_text())
}

/// Render `lines` with 24-bit terminal colors, using `filename` as a hint
/// for the language. Each returned string is one line, without its
/// newline, ending in an attribute reset.
pub fn highlight_lines(lines: &[String], filename: &str) -> EdResult<Vec<String>> {
    let set: &SyntaxSet = &SYNTAX_SET;
    let theme = THEME_SET
        .themes
        .get(THEME)
        .ok_or_else(|| EdError::Highlight(format!("missing theme {}", THEME)))?;
    let first = lines.first().map(String::as_str).unwrap_or("");
    let syntax = detect_syntax(set, filename, first);

    let mut h = HighlightLines::new(syntax, theme);
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        // the newline syntaxes expect each line to carry its terminator
        let line = format!("{}\n", line);
        let regions: Vec<(Style, &str)> = h
            .highlight_line(&line, set)
            .map_err(|e| EdError::Highlight(e.to_string()))?;
        let mut styled = as_24_bit_terminal_escaped(&regions, false);
        if styled.ends_with('\n') {
            styled.pop();
        }
        styled.push_str(RESET);
        out.push(styled);
    }
    Ok(out)
}
