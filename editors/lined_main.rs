//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! lined - line-oriented text editor

mod lined;

use clap::{Parser, ValueEnum};
use lined::input::ReaderSource;
use log::LevelFilter;
use std::io::{self, BufWriter, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};

/// Raised by SIGINT, consumed by the line reader.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Highlight when standard output is a terminal
    Auto,
    Always,
    Never,
}

/// lined - line-oriented text editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use string as the prompt when in command mode
    #[arg(short, long, default_value = "> ")]
    prompt: String,

    /// Suppress the writing of byte counts by e, r and w
    /// and the '!' after !command
    #[arg(short, long)]
    silent: bool,

    /// Log debugging detail to standard error
    #[arg(short, long)]
    debug: bool,

    /// Syntax highlight lines printed by p and n
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// File to edit
    file: Option<String>,
}

extern "C" fn sigint_handler(_signo: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// SIGINT interrupts a pending read (no SA_RESTART) so text entry can be
/// abandoned at once; SIGQUIT is ignored.
fn setup_signals() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigint_handler as *const extern "C" fn(libc::c_int) as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&mut sa.sa_mask);
        libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut());

        libc::signal(libc::SIGQUIT, libc::SIG_IGN);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(args.debug);
    setup_signals();

    let highlight = match args.color {
        ColorChoice::Auto => io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = ReaderSource::new(stdin.lock()).interrupt_on(&INTERRUPTED);
    let writer = BufWriter::new(stdout.lock());

    let mut editor = lined::Editor::new(reader, writer);
    editor.session.set_default_prompt(&args.prompt);
    editor.session.silent = args.silent;
    editor.session.highlight = highlight;
    log::debug!("starting with {:?}", args);

    if let Some(ref path) = args.file {
        if let Err(e) = editor.load_file(path) {
            if !args.silent {
                eprintln!("lined: {}: {}", path, e);
            }
        }
    }

    if let Err(e) = editor.run() {
        eprintln!("lined: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
