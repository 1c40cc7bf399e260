#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use helpers::instance_path;
use helpers::run_solver;

#[test]
fn evacuation_network_from_file() {
    let files = run_solver("max-flow", instance_path("evacuation.txt"), &[], "file");

    assert_eq!(files.output_lines(), vec!["6"]);

    files.cleanup().expect("Failed to remove output files");
}

#[test]
fn network_from_standard_input() {
    let mut child = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_bab-solver")))
        .arg("max-flow")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"4 5\n1 2 3\n1 3 2\n2 3 5\n2 4 2\n3 4 3\n")
        .expect("Failed to write the network");

    let output = child.wait_with_output().expect("Failed to wait for solver");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("output is utf-8");
    assert_eq!(
        stdout.lines().filter(|line| !line.starts_with('%')).collect::<Vec<_>>(),
        vec!["5"]
    );
}

#[test]
fn malformed_network_fails() {
    let output = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_bab-solver")))
        .arg("max-flow")
        .arg(instance_path("teams4.txt"))
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run solver.");

    assert!(!output.status.success());
}
