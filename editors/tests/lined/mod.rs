//! Integration tests for the lined editor.
//!
//! Each test drives the lined binary through stdin and checks stdout.

use plib::testing::{run_test, run_test_with_checker, TestPlan};
use std::fs;
use tempfile::{Builder, NamedTempFile, TempDir};

// no prompt, no byte counts, no '!' markers
fn lined_test(stdin: &str, expected_out: &str) {
    run_test(TestPlan::new(
        "lined",
        &["--prompt=", "-s"],
        stdin,
        expected_out,
    ));
}

// like lined_test, editing a file that starts with `file_content`
fn lined_test_with_file(file_content: &str, stdin: &str, expected_out: &str) -> String {
    let temp = NamedTempFile::new().unwrap();
    fs::write(temp.path(), file_content).unwrap();
    let path = temp.path().to_string_lossy().to_string();

    run_test(TestPlan::new(
        "lined",
        &["--prompt=", "-s", &path],
        stdin,
        expected_out,
    ));
    fs::read_to_string(temp.path()).unwrap()
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_lined_quit() {
    lined_test("q\n", "");
}

#[test]
fn test_lined_eof_ends_session() {
    lined_test("a\nnever written\n", "");
}

#[test]
fn test_lined_default_prompt() {
    run_test(TestPlan::new("lined", &["-s"], "a\ntext\n.\nq\n", "> > "));
}

#[test]
fn test_lined_custom_prompt() {
    run_test(TestPlan::new("lined", &["-s", "-p", "* "], "=\nq\n", "* 0\n* "));
}

#[test]
fn test_lined_errors_do_not_end_session() {
    lined_test(
        "9\nzz\n1,p\na\nstill here\n.\np\nq\n",
        "? address out of range\n? unknown command: zz\n\
         ? invalid command: expected line number or '$' after ',' in \"1,p\"\n\
         still here\n",
    );
}

#[test]
fn test_lined_version() {
    run_test(TestPlan::new(
        "lined",
        &["--version"],
        "",
        &format!("lined {}\n", env!("CARGO_PKG_VERSION")),
    ));
}

// ============================================================================
// Text entry
// ============================================================================

#[test]
fn test_lined_append_and_print() {
    lined_test(
        "a\nhello world\nline two\n.\n1,$p\nq\n",
        "hello world\nline two\n",
    );
}

#[test]
fn test_lined_insert_and_print() {
    lined_test(
        "a\nfirst line\n.\ni\nzero\nhalf\n.\n1,$p\n=\nq\n",
        "zero\nhalf\nfirst line\n2\n",
    );
}

#[test]
fn test_lined_insert_into_empty_buffer() {
    lined_test("i\nonly\n.\n=\np\nq\n", "1\nonly\n");
}

#[test]
fn test_lined_change_middle() {
    let after = lined_test_with_file(
        "one\ntwo\nthree\n",
        "2c\nTWO\n2b\n.\n1,$p\nw\nq\n",
        "one\nTWO\n2b\nthree\n",
    );
    assert_eq!(after, "one\nTWO\n2b\nthree\n");
}

#[test]
fn test_lined_change_first_line() {
    lined_test_with_file("one\ntwo\n", "1c\nONE\n.\n1,$p\n=\nq\n", "ONE\ntwo\n1\n");
}

// ============================================================================
// Addressing and display
// ============================================================================

#[test]
fn test_lined_move_prints() {
    lined_test_with_file("a\nb\nc\n", "2\n\n$\n=\nq\n", "b\nb\nc\n3\n");
}

#[test]
fn test_lined_number() {
    lined_test_with_file("one\ntwo\n", "1,$n\nq\n", "   1  one\n   2* two\n");
}

#[test]
fn test_lined_index_of_range() {
    lined_test_with_file("a\nb\nc\n", "1,2=\n$=\n=\nq\n", "2\n3\n3\n");
}

#[test]
fn test_lined_delete() {
    lined_test_with_file("a\nb\nc\nd\n", "2,3d\n1,$p\n=\nq\n", "a\nd\n2\n");
}

#[test]
fn test_lined_delete_current() {
    lined_test_with_file("a\nb\nc\n", "d\n1,$p\n=\nq\n", "a\nb\n2\n");
}

#[test]
fn test_lined_join() {
    lined_test_with_file("a\nb\nc\nd\n", "2,3j\n1,$p\n=\nq\n", "a\nbc\nd\n2\n");
}

#[test]
fn test_lined_search_wraps() {
    lined_test_with_file(
        "apple\nbanana\napricot\n",
        "1\ns ^ap\ns\ns nothing\nq\n",
        "apple\napricot\napple\n? no match\n",
    );
}

#[test]
fn test_lined_yank_and_paste() {
    lined_test_with_file("a\nb\n", "1y\nx\n1,$p\nq\n", "a\nb\na\n");
}

#[test]
fn test_lined_color_always() {
    let temp = Builder::new().suffix(".rs").tempfile().unwrap();
    fs::write(temp.path(), "fn main() {}\n").unwrap();
    let path = temp.path().to_string_lossy().to_string();

    run_test_with_checker(
        TestPlan::new(
            "lined",
            &["--prompt=", "-s", "--color=always", &path],
            "p\nq\n",
            "",
        ),
        |_, output| {
            let stdout = String::from_utf8_lossy(&output.stdout);
            assert!(stdout.contains("\x1b[38;2;"), "no color in {:?}", stdout);
            assert!(stdout.contains("main"));
            assert!(output.status.success());
        },
    );
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_lined_load_prints_byte_count() {
    let temp = NamedTempFile::new().unwrap();
    fs::write(temp.path(), "a\nbc\n").unwrap();
    let path = temp.path().to_string_lossy().to_string();

    run_test(TestPlan::new(
        "lined",
        &["--prompt=", &path],
        "1,$p\nq\n",
        "5\na\nbc\n",
    ));
}

#[test]
fn test_lined_write_new_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.txt");
    let name = path.to_string_lossy().to_string();

    lined_test(
        &format!("a\nx\ny\n.\nw {}\nf\nq\n", name),
        &format!("{}\n", name),
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "x\ny\n");
}

#[test]
fn test_lined_write_quit() {
    let after = lined_test_with_file("old\n", "a\nnew\n.\nwq\n", "");
    assert_eq!(after, "old\nnew\n");
}

#[test]
fn test_lined_missing_file_becomes_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("later.txt");
    let name = path.to_string_lossy().to_string();

    run_test_with_checker(
        TestPlan::new("lined", &["--prompt=", &name], "a\nhi\n.\nw\nq\n", ""),
        |_, output| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.starts_with("lined: "), "stderr: {:?}", stderr);
            assert_eq!(String::from_utf8_lossy(&output.stdout), "3\n");
            assert!(output.status.success());
        },
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
}

#[test]
fn test_lined_missing_file_silent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiet.txt");
    let name = path.to_string_lossy().to_string();

    run_test_with_checker(
        TestPlan::new("lined", &["--prompt=", "-s", &name], "a\nhi\n.\nw\nq\n", ""),
        |_, output| {
            assert!(output.stderr.is_empty(), "stderr: {:?}", output.stderr);
            assert!(output.stdout.is_empty());
            assert!(output.status.success());
        },
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
}

#[test]
fn test_lined_edit_and_read() {
    let other = NamedTempFile::new().unwrap();
    fs::write(other.path(), "from other\n").unwrap();
    let other_name = other.path().to_string_lossy().to_string();

    lined_test_with_file(
        "mine\n",
        &format!("r {}\n1,$p\ne {}\n1,$p\nf\nq\n", other_name, other_name),
        &format!("mine\nfrom other\nfrom other\n{}\n", other_name),
    );
}

#[test]
fn test_lined_write_without_filename() {
    lined_test("a\nx\n.\nw\nq\n", "? no filename specified\n");
}

// ============================================================================
// Shell
// ============================================================================

#[test]
fn test_lined_shell_escape() {
    lined_test("!echo hi\nq\n", "hi\n");
    run_test(TestPlan::new("lined", &["--prompt="], "!echo hi\nq\n", "hi\n!\n"));
}

#[test]
fn test_lined_shell_failure() {
    lined_test("!exit 3\nq\n", "? command exited with status 3\n");
}

#[test]
fn test_lined_read_from_shell() {
    lined_test("r !printf 'a\\nb\\n'\n1,$p\nf\nq\n", "a\nb\n");
}

#[test]
fn test_lined_write_to_shell() {
    lined_test_with_file("abc\n", "w !tr a-z A-Z\nq\n", "ABC\n");
}
