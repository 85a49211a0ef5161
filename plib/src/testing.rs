//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Run a built workspace binary as a subprocess and check what it prints.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;

/// One scripted run: feed `stdin_data`, expect exactly this output.
pub struct TestPlan {
    pub cmd: String,
    pub args: Vec<String>,
    pub stdin_data: String,
    pub expected_out: String,
    pub expected_err: String,
    pub expected_exit_code: i32,
}

impl TestPlan {
    /// A plan expecting empty stderr and a zero exit status.
    pub fn new(cmd: &str, args: &[&str], stdin_data: &str, expected_out: &str) -> Self {
        TestPlan {
            cmd: cmd.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            stdin_data: stdin_data.to_string(),
            expected_out: expected_out.to_string(),
            expected_err: String::new(),
            expected_exit_code: 0,
        }
    }
}

/// Path of a workspace binary built for the current profile.
///
/// Integration tests run from the package directory; the target directory
/// sits one level up unless CARGO_TARGET_DIR moves it.
pub fn bin_path(cmd: &str) -> PathBuf {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    let target_dir = match std::env::var_os("CARGO_TARGET_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()
            .unwrap()
            .parent()
            .unwrap()
            .join("target"),
    };
    target_dir.join(profile).join(cmd)
}

/// Run `cmd` with `args` and `env_vars`, writing `stdin_data` to it.
pub fn run_test_base_with_env(
    cmd: &str,
    args: &[String],
    stdin_data: &[u8],
    env_vars: &[(&str, &str)],
) -> Output {
    let mut command = Command::new(bin_path(cmd));
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // keep the child's log level independent of the test runner's
        .env_remove("RUST_LOG");
    for (key, value) in env_vars {
        command.env(key, value);
    }

    let mut child = command
        .spawn()
        .unwrap_or_else(|e| panic!("failed to spawn {}: {}", cmd, e));

    // feed stdin from a thread so a chatty child can't fill its stdout
    // pipe while we are still writing
    let writer = child.stdin.take().map(|mut stdin| {
        let data = stdin_data.to_vec();
        thread::spawn(move || {
            // the child may quit before reading everything
            let _ = stdin.write_all(&data);
        })
    });

    let output = child.wait_with_output().expect("failed to wait for child");
    if let Some(writer) = writer {
        writer.join().expect("stdin writer panicked");
    }
    output
}

pub fn run_test_base(cmd: &str, args: &[String], stdin_data: &[u8]) -> Output {
    run_test_base_with_env(cmd, args, stdin_data, &[])
}

fn check_output(plan: &TestPlan, output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, plan.expected_out);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr, plan.expected_err);

    assert_eq!(output.status.code(), Some(plan.expected_exit_code));
}

pub fn run_test(plan: TestPlan) {
    let output = run_test_base(&plan.cmd, &plan.args, plan.stdin_data.as_bytes());
    check_output(&plan, &output);
}

/// Like `run_test`, with extra environment variables for the child.
pub fn run_test_with_env(plan: TestPlan, env_vars: &[(&str, &str)]) {
    let output = run_test_base_with_env(
        &plan.cmd,
        &plan.args,
        plan.stdin_data.as_bytes(),
        env_vars,
    );
    check_output(&plan, &output);
}

/// Run the plan and hand the raw output to `checker` instead of comparing.
pub fn run_test_with_checker<F: FnMut(&TestPlan, &Output)>(plan: TestPlan, mut checker: F) {
    let output = run_test_base(&plan.cmd, &plan.args, plan.stdin_data.as_bytes());
    checker(&plan, &output);
}
