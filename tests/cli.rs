use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const ERROR_MESSAGE: &str = "An error has occurred\n";

fn ash(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ash"))
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ash")
}

fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

fn stderr(output: &Output) -> &str {
    std::str::from_utf8(&output.stderr).unwrap()
}

#[test]
fn too_many_arguments_fail_with_one_message() {
    let dir = tempfile::tempdir().unwrap();
    let output = ash(&["a", "b", "c"], dir.path());

    assert!(!output.status.success());
    assert_eq!(stderr(&output), ERROR_MESSAGE);
    assert_eq!(stdout(&output), "");
}

#[test]
fn unreadable_batch_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = ash(&["no-such-batch-file.txt"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), ERROR_MESSAGE);
}

#[test]
fn batch_runs_without_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.ash");
    fs::write(&script, "path /bin\necho ok\n").unwrap();

    let output = ash(&[script.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output), "ok\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn batch_redirect_truncates_target() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("out.txt"), "old contents that are longer\n").unwrap();
    let script = dir.path().join("script.ash");
    fs::write(&script, "path /bin\necho hi > out.txt\n").unwrap();

    let output = ash(&[script.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
}

#[test]
fn batch_exit_stops_reading() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.ash");
    fs::write(&script, "exit now\nEXIT\npath /bin\necho unreachable\n").unwrap();

    let output = ash(&[script.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), ERROR_MESSAGE);
    assert!(!stdout(&output).contains("unreachable"));
    assert!(stdout(&output).contains("Aggie Shell Project\n"));
}

#[test]
fn batch_reports_each_bad_line_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.ash");
    fs::write(&script, "> out\nls > a b\npath\necho nope\ncd\n").unwrap();

    let output = ash(&[script.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    assert_eq!(stderr(&output), ERROR_MESSAGE.repeat(4));
    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("a").exists());
}

#[test]
fn batch_keeps_going_after_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.ash");
    fs::write(&script, b"path /bin\necho caf\xe9\necho after\n").unwrap();

    let output = ash(&[script.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).ends_with("after\n"));
    assert_eq!(stderr(&output), "");
}

#[test]
fn piped_interactive_input_prompts_and_survives_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_ash"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run ash");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"path /bin\necho caf\xe9\necho after\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "");
    let out = String::from_utf8_lossy(&output.stdout);
    assert!(out.contains("after\n"));
    // One prompt per line read, plus the one answered by end of input.
    assert_eq!(out.matches("ash ").count(), 4);
}
