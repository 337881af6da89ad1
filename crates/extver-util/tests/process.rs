use std::time::Duration;

use extver_util::process::CommandBuilder;

#[cfg(unix)]
#[test]
fn test_builder_simple_command() {
    let output = CommandBuilder::new("echo").arg("hello").exec().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "hello");
}

#[cfg(unix)]
#[test]
fn test_builder_multiple_args() {
    let output = CommandBuilder::new("echo")
        .args(["one", "two", "three"])
        .exec()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "one two three");
}

#[cfg(unix)]
#[test]
fn test_builder_with_env() {
    let output = CommandBuilder::new("sh")
        .arg("-c")
        .arg("echo $MY_TEST_VAR")
        .env("MY_TEST_VAR", "extver_test_value")
        .exec()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.first_line(), "extver_test_value");
}

#[cfg(unix)]
#[test]
fn test_builder_with_cwd() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("extver_cwd_test.marker"), "ok").unwrap();

    let output = CommandBuilder::new("ls")
        .arg("extver_cwd_test.marker")
        .cwd(tmp.path())
        .exec()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.contains("extver_cwd_test.marker"));
}

#[cfg(unix)]
#[test]
fn test_first_line_falls_back_to_stderr() {
    let output = CommandBuilder::new("sh")
        .args(["-c", "echo 3.1.4 1>&2"])
        .exec()
        .unwrap();
    assert!(output.stdout.is_empty());
    assert_eq!(output.first_line(), "3.1.4");
}

#[cfg(unix)]
#[test]
fn test_first_line_prefers_stdout() {
    let output = CommandBuilder::new("sh")
        .args(["-c", "echo warning 1>&2; echo 2.0; echo trailing"])
        .exec()
        .unwrap();
    assert_eq!(output.first_line(), "2.0");
}

#[cfg(unix)]
#[test]
fn test_nonzero_exit_is_reported_in_status() {
    let output = CommandBuilder::new("sh").args(["-c", "exit 3"]).exec().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[cfg(unix)]
#[test]
fn test_timeout_kills_hung_process() {
    let result = CommandBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .exec();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("did not finish"), "got: {err}");
}

#[cfg(unix)]
#[test]
fn test_timeout_not_hit_by_fast_process() {
    let output = CommandBuilder::new("echo")
        .arg("fast")
        .timeout(Duration::from_secs(10))
        .exec()
        .unwrap();
    assert_eq!(output.first_line(), "fast");
}

#[test]
fn test_builder_nonexistent_program() {
    let result = CommandBuilder::new("nonexistent_program_xyz_123").exec();
    assert!(result.is_err());
}
