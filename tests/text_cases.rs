use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use orgmark::{TextOptions, parse, render_text};

fn cases_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
}

fn run_case(dir: &Path) -> io::Result<()> {
    let input_path = dir.join("input.org");
    let expected_path = dir.join("expected.txt");
    if !expected_path.is_file() {
        return Ok(());
    }

    let input = fs::read_to_string(&input_path)?;
    let expected = fs::read_to_string(&expected_path)?;

    let output = render_text(&parse(&input), &TextOptions::default());

    if output != expected {
        let diff = diff::lines(&expected, &output)
            .into_iter()
            .map(|d| match d {
                diff::Result::Left(l) => format!("-{l}"),
                diff::Result::Right(r) => format!("+{r}"),
                diff::Result::Both(b, _) => format!(" {b}"),
            })
            .collect::<Vec<_>>()
            .join("\n");
        panic!(
            "Mismatch in case: {}\nDiff:\n{}",
            dir.file_name()
                .map(|s| s.to_string_lossy())
                .unwrap_or_default(),
            diff
        );
    }

    Ok(())
}

#[test]
fn text_cases() -> io::Result<()> {
    let root = cases_root();
    for entry in fs::read_dir(&root)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            run_case(&path)?;
        }
    }
    Ok(())
}

#[test]
fn wrapped_paragraph_rerenders_unchanged() {
    let input = "A paragraph that is long enough to be wrapped by the renderer at forty columns.\n";
    let options = TextOptions {
        line_width: 40,
        ..TextOptions::default()
    };
    let once = render_text(&parse(input), &options);
    let twice = render_text(&parse(&once), &options);
    similar_asserts::assert_eq!(once, twice);
}
