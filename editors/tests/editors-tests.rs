//! Integration tests for the editors crate.
//!
//! This is the test harness - it only contains mod statements.
//! Actual tests are in subdirectories.

mod lined;
