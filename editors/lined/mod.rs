//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! lined, a small line-oriented text editor.
//!
//! The buffer is a list of lines with a cursor. Commands address ranges of
//! lines (`start[,end]`) and are dispatched by verb to a registry of
//! handlers. Lines typed after `a`, `i` or `c` are text until a lone `.`.

pub mod address;
pub mod buffer;
pub mod command;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod file;
pub mod highlight;
pub mod input;

pub use editor::Editor;
