//! Run input files.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::direction::{Direction, DirectionDatabase};
use crate::error::{Error, Result};

/// Loads the direction catalog for a run.
///
/// Expected layout:
///
/// ```text
/// Run id: <int>
/// Num directions: <int>
/// Direction(id=0,theta=...,phi=...) Direction(id=1,...) ...
/// ```
///
/// Fails when the embedded run id disagrees with `expected_run_id`,
/// when any direction fails to parse, when fewer directions than
/// declared are present, or when ids are not sequential from 0 (the
/// catalog insert enforces the latter).
pub fn load_directions(path: &Path, expected_run_id: u32) -> Result<DirectionDatabase> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    let run_id: u32 = labeled_value(lines.next(), "Run id:")?;
    if run_id != expected_run_id {
        return Err(Error::RunIdMismatch {
            path: path.display().to_string(),
            expected: expected_run_id,
            found: run_id,
        });
    }

    let num_directions: usize = labeled_value(lines.next(), "Num directions:")?;

    let body = lines.collect::<Vec<_>>().join("\n");
    let mut chunks = direction_chunks(&body);
    let mut db = DirectionDatabase::with_capacity(num_directions);
    for found in 0..num_directions {
        let chunk = chunks.next().ok_or_else(|| {
            Error::ParseHeader(format!(
                "{} declares {num_directions} directions but only {found} could be read",
                path.display()
            ))
        })?;
        db.insert(Direction::parse(chunk)?)?;
    }
    Ok(db)
}

/// Parses `<label> <value>` from a header line.
fn labeled_value<T: FromStr>(line: Option<&str>, label: &str) -> Result<T> {
    let line = line.ok_or_else(|| Error::ParseHeader(format!("missing `{label}` line")))?;
    let value = line
        .strip_prefix(label)
        .ok_or_else(|| Error::ParseHeader(format!("expected a `{label}` line, got {line:?}")))?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::ParseHeader(format!("could not read a number from {line:?}")))
}

/// Yields each `Direction(...)` chunk in the text, ignoring whatever
/// separates them.
fn direction_chunks(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find("Direction(")?;
        let tail = &rest[start..];
        let end = tail.find(')')?;
        let chunk = &tail[..=end];
        rest = &tail[end + 1..];
        Some(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const GOOD: &str = "Run id: 3\n\
                        Num directions: 2\n\
                        Direction(id=0,theta=0.5,phi=0.25) Direction(id=1,theta=1.5,phi=0.75)\n";

    #[test]
    fn test_load_good_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "directions-3.txt", GOOD);
        let db = load_directions(&path, 3).unwrap();
        assert_eq!(db.len(), 2);
        assert!((db.get(1, false).unwrap().theta() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_load_accepts_newline_separated_directions() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "Run id: 0\nNum directions: 2\n\
                        Direction(id=0,theta=0.5,phi=0.25)\n\
                        Direction(id=1,theta=1.5,phi=0.75)\n";
        let path = write_input(dir.path(), "directions-0.txt", contents);
        assert_eq!(load_directions(&path, 0).unwrap().len(), 2);
    }

    #[test]
    fn test_run_id_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "directions-7.txt", GOOD);
        let err = load_directions(&path, 7).unwrap_err();
        assert!(matches!(
            err,
            Error::RunIdMismatch {
                expected: 7,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_too_few_directions() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "Run id: 1\nNum directions: 3\nDirection(id=0,theta=0.5,phi=0.25)\n";
        let path = write_input(dir.path(), "directions-1.txt", contents);
        let err = load_directions(&path, 1).unwrap_err();
        assert!(err.to_string().contains("only 1"));
    }

    #[test]
    fn test_malformed_direction() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "Run id: 1\nNum directions: 1\nDirection(id=0,theta=oops,phi=0.25)\n";
        let path = write_input(dir.path(), "directions-1.txt", contents);
        assert!(matches!(
            load_directions(&path, 1),
            Err(Error::ParseDirection { .. })
        ));
    }

    #[test]
    fn test_out_of_order_ids() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "Run id: 1\nNum directions: 2\n\
                        Direction(id=0,theta=0.1,phi=0.1) Direction(id=2,theta=0.2,phi=0.2)\n";
        let path = write_input(dir.path(), "directions-1.txt", contents);
        assert!(matches!(
            load_directions(&path, 1),
            Err(Error::OutOfOrderInsert { got: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_missing_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "bad.txt", "Num directions: 1\n");
        assert!(matches!(
            load_directions(&path, 1),
            Err(Error::ParseHeader(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.txt");
        assert!(matches!(load_directions(&path, 1), Err(Error::Io(_))));
    }
}
