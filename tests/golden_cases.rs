use std::fs;
use std::path::{Path, PathBuf};

use orgmark::parser::normalize_line_endings;
use orgmark::{Config, convert};

/// Case directories holding an `input.org`, sorted by name.
fn case_dirs() -> Vec<PathBuf> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases");
    let mut dirs: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.join("input.org").is_file())
        .collect();
    dirs.sort();
    dirs
}

fn case_name(dir: &Path) -> String {
    dir.file_name().unwrap().to_string_lossy().into_owned()
}

fn read_normalized(path: &Path) -> String {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    normalize_line_endings(&text).into_owned()
}

/// Renders every case with the default configuration, the same path the CLI takes
/// without flags. With `UPDATE_EXPECTED` set, rewrites `expected.html` instead.
#[test]
fn html_cases() {
    let update = std::env::var_os("UPDATE_EXPECTED").is_some();
    let config = Config::default();
    let mut mismatches = Vec::new();

    for dir in case_dirs() {
        let input = read_normalized(&dir.join("input.org"));
        let output = convert(&input, &config);
        let expected_path = dir.join("expected.html");

        if update {
            fs::write(&expected_path, &output).unwrap();
            eprintln!("updated {}", expected_path.display());
            continue;
        }

        let expected = read_normalized(&expected_path);
        if expected != output {
            mismatches.push((case_name(&dir), expected, output));
        }
    }

    if let Some((name, expected, output)) = mismatches.first() {
        let names: Vec<_> = mismatches.iter().map(|(name, ..)| name.as_str()).collect();
        similar_asserts::assert_eq!(
            expected,
            output,
            "case {name} (failing: {})",
            names.join(", ")
        );
    }
}

#[test]
fn every_case_has_both_renderings() {
    let dirs = case_dirs();
    assert!(!dirs.is_empty());
    for dir in dirs {
        for file in ["expected.html", "expected.txt"] {
            assert!(dir.join(file).is_file(), "{} lacks {file}", case_name(&dir));
        }
    }
}
