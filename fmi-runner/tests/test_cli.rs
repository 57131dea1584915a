//! Test the `fmi-runner` binary without the external tools.

use assert_cmd::Command;

fn fmi_runner() -> Command {
    let mut cmd = Command::cargo_bin("fmi-runner").unwrap();
    cmd.env_remove("FMI_RUNNER_MODEL_NAME")
        .env_remove("FMI_RUNNER_MODEL_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    let output = fmi_runner().arg("--help").assert().success().get_output().clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--model-name"));
    assert!(stdout.contains("--final-time"));
}

#[test]
fn test_nonexistent_model_file() {
    let output = fmi_runner()
        .args(["-m", "HelloWorld", "--final-time", "5", "/no/such/dir/HelloWorld.mo"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Compilation failed"), "{stderr}");
}

#[test]
fn test_inverted_interval() {
    let model = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/HelloWorld.mo");
    let output = fmi_runner()
        .args([
            "-m",
            "HelloWorld",
            "--start-time",
            "5",
            "--final-time",
            "0",
            "--omc",
            "/definitely/not/omc",
            model,
        ])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid simulation interval"), "{stderr}");
    assert!(!stderr.contains("Compiling"), "{stderr}");
}

#[test]
fn test_missing_compiler() {
    let model = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/HelloWorld.mo");
    let output = fmi_runner()
        .args(["-m", "HelloWorld", "--omc", "/definitely/not/omc", "-q", model])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Compilation failed"), "{stderr}");
    assert!(stderr.contains("/definitely/not/omc"), "{stderr}");
}

#[test]
fn test_model_not_in_source() {
    let model = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/HelloWorld.mo");
    let output = fmi_runner()
        .args(["-m", "GoodbyeWorld", "--omc", "/definitely/not/omc", model])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Model 'GoodbyeWorld' is not declared"), "{stderr}");
}
