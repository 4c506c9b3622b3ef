use std::path::PathBuf;
use std::process::{Command, Output};

fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_qrace"))
}

fn run(args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .args(args)
        .output()
        .expect("Failed to execute qrace")
}

#[test]
fn test_run_four_queens() {
    let output = run(&["run", "--size", "4", "--delay-ms", "0", "--capacity", "1024", "--boards"]);

    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Running 4 workers on a 4x4 board"),
        "Should announce the run"
    );
    assert!(stdout.contains("Run Statistics:"), "Should print statistics");
    assert!(stdout.contains("Solutions: 2/4"), "Rows 1 and 2 solve, 0 and 3 exhaust");
    assert!(stdout.contains("SOLUTION"));
    assert!(stdout.contains("TERMINATED"));
    // worker 2's board: rows 0..3 hold columns 1,3,0,2
    assert!(stdout.contains(".Q..\n...Q\nQ...\n..Q.\n"));
}

#[test]
fn test_run_rejects_invalid_size() {
    for size in ["0", "-3"] {
        let output = run(&["run", "--size", size]);

        assert!(!output.status.success(), "size {} should fail", size);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("invalid configuration"),
            "stderr should explain the failure: {}",
            stderr
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains("Running"), "no workers should start");
    }
}

#[test]
fn test_run_rejects_too_many_workers() {
    let output = run(&["run", "--size", "4", "--workers", "5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting row 4 is outside the board"));
}

#[test]
fn test_run_timeout_cancels_workers() {
    let output = run(&["run", "--size", "10", "--delay-ms", "10000", "--timeout", "0"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Timed out"));
    assert!(stdout.contains("cancelled"));
    assert!(stdout.contains("Solutions: 0/10"));
}

#[test]
fn test_colors_command() {
    let output = run(&["colors", "--workers", "3"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    for (i, line) in stdout.lines().enumerate() {
        assert!(line.starts_with(&format!("worker {:>3}: #", i)), "unexpected line: {}", line);
    }
    let first = stdout.lines().next().unwrap();
    assert!(first.contains("g=46, b=46"), "hue 0 is red: {}", first);
}
