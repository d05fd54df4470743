//! Integration tests: run the `salesman` binary end to end.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Fresh scratch directory under the system temp dir, unique per test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("salesman-cli-{}-{test}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn salesman(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_salesman"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn solve_prints_length_and_order() {
    let dir = scratch_dir("report");
    let file = dir.join("two.txt");
    std::fs::write(&file, "0 0\n3 4\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Christofides-style Tour Length: 10.000000\nTour order: 0 -> 1 -> 0\n"
    );
}

#[test]
fn solve_unit_square_with_each_solver() {
    let dir = scratch_dir("square");
    let file = dir.join("square.txt");
    std::fs::write(&file, "0 0\n0 1\n1 1\n1 0\n").unwrap();

    for solver in ["christofides", "nearest-neighbor", "exhaustive"] {
        let output = salesman(&["solve", file.to_str().unwrap(), "--solver", solver]);
        assert!(output.status.success(), "{solver}: {}", stderr(&output));
        assert!(
            stdout(&output).contains("Tour Length: 4.000000"),
            "{solver}: {}",
            stdout(&output)
        );
    }
}

#[test]
fn solve_json_output_parses() {
    let dir = scratch_dir("json");
    let file = dir.join("tri.txt");
    std::fs::write(&file, "0 0\n4 0\n0 3\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap(), "--json", "--diagnostics"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let length = value["length"].as_f64().unwrap();
    assert!((length - 12.0).abs() < 1e-9);
    assert_eq!(value["solver"], "Christofides");
    assert!(value["diagnostics"]["span"].is_object());
}

#[test]
fn solve_writes_svg_and_png() {
    let dir = scratch_dir("render");
    let file = dir.join("cities.txt");
    std::fs::write(&file, "10 10\n90 10\n50 80\n").unwrap();
    let svg = dir.join("tour.svg");
    let png = dir.join("tour.png");

    let output = salesman(&[
        "solve",
        file.to_str().unwrap(),
        "--grid-size",
        "100",
        "--svg",
        svg.to_str().unwrap(),
        "--png",
        png.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let svg_text = std::fs::read_to_string(&svg).unwrap();
    assert_eq!(svg_text.matches("<line").count(), 3);
    assert!(svg_text.contains("<title>cities</title>"));
    assert!(std::fs::read(&png).unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn single_city_reports_zero() {
    let dir = scratch_dir("single");
    let file = dir.join("one.txt");
    std::fs::write(&file, "7 7\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Christofides-style Tour Length: 0.000000\nTour order: 0 -> 0\n"
    );
}

#[test]
fn missing_file_exits_with_one() {
    let dir = scratch_dir("missing");
    let output = salesman(&["solve", dir.join("nope.txt").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("could not read"));
}

#[test]
fn usage_errors_exit_with_one() {
    let missing_path = salesman(&["solve"]);
    assert_eq!(missing_path.status.code(), Some(1));
    assert!(stderr(&missing_path).contains("POINTS_FILE"));

    assert_eq!(salesman(&[]).status.code(), Some(1));
    assert_eq!(salesman(&["solve", "x.txt", "--solver", "bogus"]).status.code(), Some(1));
}

#[test]
fn help_and_version_exit_with_zero() {
    let help = salesman(&["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(stdout(&help).contains("solve"));
    assert_eq!(salesman(&["--version"]).status.code(), Some(0));
}

#[test]
fn huge_coordinates_are_solved() {
    let dir = scratch_dir("huge");
    let file = dir.join("huge.txt");
    std::fs::write(&file, "0 0\n1e200 0\n2e200 0\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Tour order: 0 -> 2 -> 1 -> 0"));
}

#[test]
fn malformed_file_exits_with_one() {
    let dir = scratch_dir("malformed");
    let file = dir.join("bad.txt");
    std::fs::write(&file, "0 0\n1 oops\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 2"), "{}", stderr(&output));
}

#[test]
fn empty_file_exits_with_one() {
    let dir = scratch_dir("empty");
    let file = dir.join("empty.txt");
    std::fs::write(&file, "\n\n").unwrap();

    let output = salesman(&["solve", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no points"));
}

#[test]
fn exhaustive_over_cap_exits_with_one() {
    let dir = scratch_dir("cap");
    let file = dir.join("line.txt");
    std::fs::write(&file, "0 0\n1 0\n2 0\n3 0\n4 0\n").unwrap();

    let output = salesman(&[
        "solve",
        file.to_str().unwrap(),
        "--solver",
        "exhaustive",
        "--max-exhaustive-cities",
        "4",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid configuration"));
}

#[test]
fn generate_then_solve() {
    let dir = scratch_dir("generate");
    let base = dir.join("random");

    let output = salesman(&[
        "generate",
        "--count",
        "9",
        "--grid-size",
        "30",
        "--seed",
        "11",
        "--output",
        base.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = std::fs::read_to_string(dir.join("random.txt")).unwrap();
    assert_eq!(text.lines().count(), 9);
    let preview = std::fs::read_to_string(dir.join("random.svg")).unwrap();
    assert_eq!(preview.matches("<circle").count(), 9);
    assert_eq!(preview.matches("<line").count(), 36);

    let first = salesman(&["solve", dir.join("random.txt").to_str().unwrap()]);
    let second = salesman(&["solve", dir.join("random.txt").to_str().unwrap()]);
    assert!(first.status.success());
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn generate_same_seed_same_file() {
    let dir = scratch_dir("seed");
    for name in ["a", "b"] {
        let base = dir.join(name);
        let output = salesman(&["generate", "--seed", "5", "--output", base.to_str().unwrap()]);
        assert!(output.status.success());
    }
    assert_eq!(
        std::fs::read(dir.join("a.txt")).unwrap(),
        std::fs::read(dir.join("b.txt")).unwrap()
    );
}
