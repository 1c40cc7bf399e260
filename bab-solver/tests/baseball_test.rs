#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::instance_path;
use helpers::run_solver;

fn run_division(file_name: &str, method: &str) -> Vec<String> {
    let files = run_solver(
        "baseball",
        instance_path(file_name),
        &["--method", method],
        method,
    );
    let lines = files.output_lines();
    files.cleanup().expect("Failed to remove output files");
    lines
}

#[test]
fn teams4_with_both_methods() {
    for method in ["network-flow", "linear-programming"] {
        assert_eq!(
            run_division("teams4.txt", method),
            vec![
                "Atlanta: not eliminated",
                "Philadelphia: eliminated by {Atlanta, New_York}",
                "New_York: not eliminated",
                "Montreal: eliminated by {Atlanta}",
            ],
            "method {method}"
        );
    }
}

#[test]
fn teams5_only_detroit_is_eliminated() {
    for method in ["network-flow", "linear-programming"] {
        assert_eq!(
            run_division("teams5.txt", method),
            vec![
                "New_York: not eliminated",
                "Baltimore: not eliminated",
                "Boston: not eliminated",
                "Toronto: not eliminated",
                "Detroit: eliminated by {New_York, Baltimore, Boston, Toronto}",
            ],
            "method {method}"
        );
    }
}
