//! Shared harness for regression tests.
//!
//! Each test runs a bundled example and compares every CSV file in the output folder against a
//! reference copy under `tests/data`.
use demeter::cli::RunOpts;
use demeter::cli::example::handle_example_run_command;
use demeter::settings::Settings;
use float_cmp::approx_eq;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

/// Run the named example and compare its CSV output against the reference copy
//
// This file is also compiled as a test crate of its own, in which nothing calls the function
#[allow(dead_code)]
pub fn run_regression_test(example_name: &str, debug_model: bool) {
    unsafe { std::env::set_var("DEMETER_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model,
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let expected_dir = PathBuf::from(format!("tests/data/{example_name}"));
    let expected_files = csv_file_names(&expected_dir);
    assert_eq!(
        csv_file_names(&output_dir),
        expected_files,
        "Output CSV files differ from the reference set"
    );

    let mut errors = Vec::new();
    for file_name in &expected_files {
        compare_csv_file(
            &output_dir.join(file_name),
            &expected_dir.join(file_name),
            file_name,
            &mut errors,
        );
    }

    assert!(
        errors.is_empty(),
        "Mismatches against reference output:\n  * {}",
        errors.join("\n  * ")
    );
}

/// The sorted names of CSV files in `dir_path`. Logs and metadata are not compared.
fn csv_file_names(dir_path: &Path) -> Vec<String> {
    let mut file_names = Vec::new();
    for entry in fs::read_dir(dir_path).unwrap() {
        let file_name = entry.unwrap().file_name().into_string().unwrap();
        if file_name.ends_with(".csv") {
            file_names.push(file_name);
        }
    }

    file_names.sort();
    file_names
}

/// Compare two CSV files line by line, appending a description of every mismatch to `errors`
fn compare_csv_file(actual: &Path, expected: &Path, file_name: &str, errors: &mut Vec<String>) {
    let actual = fs::read_to_string(actual).unwrap();
    let expected = fs::read_to_string(expected).unwrap();
    let actual_lines = actual.lines().collect_vec();
    let expected_lines = expected.lines().collect_vec();

    if actual_lines.len() != expected_lines.len() {
        errors.push(format!(
            "{}: different number of lines: {} vs {}",
            file_name,
            actual_lines.len(),
            expected_lines.len()
        ));
    }

    for (num, (line1, line2)) in actual_lines.into_iter().zip(expected_lines).enumerate() {
        if !lines_match(line1, line2) {
            errors.push(format!(
                "{file_name}: line {num}:\n    + \"{line1}\"\n    - \"{line2}\""
            ));
        }
    }
}

/// Whether two CSV lines agree, comparing numeric fields with a tolerance
fn lines_match(line1: &str, line2: &str) -> bool {
    let fields1 = line1.split(',').collect_vec();
    let fields2 = line2.split(',').collect_vec();
    fields1.len() == fields2.len()
        && fields1
            .into_iter()
            .zip(fields2)
            .all(|(f1, f2)| fields_match(f1, f2))
}

/// Compare two fields as floating-point values, falling back on string comparison
fn fields_match(field1: &str, field2: &str) -> bool {
    match (parse_finite(field1), parse_finite(field2)) {
        (Some(value1), Some(value2)) => {
            approx_eq!(f64, value1, value2, epsilon = FLOAT_CMP_TOLERANCE)
        }
        _ => field1 == field2,
    }
}

/// Parse a string into an `f64`, returning `None` if parsing fails or the value isn't finite
fn parse_finite(s: &str) -> Option<f64> {
    s.parse().ok().filter(|f: &f64| f.is_finite())
}
