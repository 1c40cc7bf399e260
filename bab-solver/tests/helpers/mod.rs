//! Helpers to run the `bab-solver` binary in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct Files {
    pub(crate) log_file: PathBuf,
    pub(crate) err_file: PathBuf,
}

impl Files {
    pub(crate) fn cleanup(self) -> std::io::Result<()> {
        std::fs::remove_file(self.log_file)?;
        std::fs::remove_file(self.err_file)?;

        Ok(())
    }

    /// The lines which the solver printed to standard out, without the log messages.
    pub(crate) fn output_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log_file)
            .expect("Failed to read solver output")
            .lines()
            .filter(|line| !line.starts_with('%'))
            .map(str::to_owned)
            .collect()
    }
}

pub(crate) fn instance_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/instances/{file_name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

/// Runs `bab-solver <subcommand> <args> <instance>`; the output ends up next to the instance, in
/// files whose extension starts with `prefix`.
pub(crate) fn run_solver(
    subcommand: &str,
    instance_path: impl AsRef<Path>,
    args: &[&str],
    prefix: &str,
) -> Files {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let instance_path = instance_path.as_ref();

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_bab-solver"));

    let log_file_path = instance_path.with_extension(format!("{prefix}.log"));
    let err_file_path = instance_path.with_extension(format!("{prefix}.err"));

    let mut command = Command::new(solver);
    let _ = command.arg(subcommand);

    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(instance_path)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) if status.success() => {}
        Ok(Some(e)) => panic!("error solving instance {e}"),
        Err(e) => panic!("error starting solver: {e}"),
    }

    Files {
        log_file: log_file_path,
        err_file: err_file_path,
    }
}

/// Parses the value behind `prefix` in the first output line which starts with it.
pub(crate) fn value_after(lines: &[String], prefix: &str) -> f64 {
    lines
        .iter()
        .find_map(|line| line.strip_prefix(prefix))
        .unwrap_or_else(|| panic!("no line starts with '{prefix}' in {lines:?}"))
        .trim()
        .parse()
        .expect("the value is a number")
}
