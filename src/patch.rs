//! Version string rewriting in project files.
//!
//! Rewrites are whole-file: read, transform the text, write back. Only the
//! targeted text changes; every other byte is preserved.

use crate::error::{ReleaseError, Result};
use std::fs;
use std::path::Path;

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ReleaseError::patch(format!("cannot read {}: {}", path.display(), e)))
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| ReleaseError::patch(format!("cannot write {}: {}", path.display(), e)))
}

fn split_first_line(content: &str) -> (&str, Option<&str>) {
    match content.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (content, None),
    }
}

fn join_first_line(first: &str, rest: Option<&str>) -> String {
    match rest {
        Some(rest) => format!("{}\n{}", first, rest),
        None => first.to_string(),
    }
}

/// Replace every literal occurrence of `before` with `after` in the file at `path`.
///
/// Returns the number of replaced occurrences.
pub fn replace_in_file(path: &Path, before: &str, after: &str) -> Result<usize> {
    if before.is_empty() {
        return Err(ReleaseError::patch("refusing to replace an empty string"));
    }

    let old = read(path)?;
    let count = old.matches(before).count();
    write(path, &old.replace(before, after))?;
    Ok(count)
}

/// Rewrite the man page header, e.g. `# TINT2 1 "2017-03-26" 0.14.1`, so its
/// last two tokens become the quoted release date and the version.
pub fn rewrite_man_header(content: &str, version: &str, date: &str) -> Result<String> {
    let (first, rest) = split_first_line(content);

    let mut tokens: Vec<String> = first.split_whitespace().map(str::to_string).collect();
    let len = tokens.len();
    if len < 2 {
        return Err(ReleaseError::patch(format!(
            "man page header '{}' needs a date and a version field",
            first
        )));
    }
    tokens[len - 2] = format!("\"{}\"", date);
    tokens[len - 1] = version.to_string();

    Ok(join_first_line(&tokens.join(" "), rest))
}

/// Replace the unreleased changelog header (ending in `sentinel`) with
/// `<date> <version>`.
pub fn rewrite_changelog_header(
    content: &str,
    version: &str,
    date: &str,
    sentinel: &str,
) -> Result<String> {
    let (first, rest) = split_first_line(content);

    if !first.ends_with(sentinel) {
        return Err(ReleaseError::patch(format!(
            "changelog header '{}' does not end with '{}'",
            first, sentinel
        )));
    }

    Ok(join_first_line(&format!("{} {}", date, version), rest))
}

/// Apply [`rewrite_man_header`] to the file at `path`
pub fn update_man_page(path: &Path, version: &str, date: &str) -> Result<()> {
    let content = read(path)?;
    write(path, &rewrite_man_header(&content, version, date)?)
}

/// Apply [`rewrite_changelog_header`] to the file at `path`
pub fn update_changelog(path: &Path, version: &str, date: &str, sentinel: &str) -> Result<()> {
    let content = read(path)?;
    write(
        path,
        &rewrite_changelog_header(&content, version, date, sentinel)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_man_header_rewrite() {
        let content = "# TINT2 1 \"2017-03-26\" 0.14.1\n\n## NAME\ntint2 - lightweight panel\n";
        let rewritten = rewrite_man_header(content, "0.14.2", "2017-04-01").unwrap();
        assert_eq!(
            rewritten,
            "# TINT2 1 \"2017-04-01\" 0.14.2\n\n## NAME\ntint2 - lightweight panel\n"
        );
    }

    #[test]
    fn test_man_header_collapses_whitespace() {
        let rewritten = rewrite_man_header("#  TINT2   1 \"x\"  y", "2.0", "2024-01-01").unwrap();
        assert_eq!(rewritten, "# TINT2 1 \"2024-01-01\" 2.0");
    }

    #[test]
    fn test_man_header_too_short() {
        assert!(rewrite_man_header("TINT2\nrest", "1.0", "2024-01-01").is_err());
        assert!(rewrite_man_header("", "1.0", "2024-01-01").is_err());
    }

    #[test]
    fn test_changelog_header_rewrite() {
        let content = "2017-03-26 master\n- Fixed crash\n\n2017-03-01 0.14.1\n";
        let rewritten = rewrite_changelog_header(content, "0.14.2", "2017-04-01", "master").unwrap();
        assert_eq!(
            rewritten,
            "2017-04-01 0.14.2\n- Fixed crash\n\n2017-03-01 0.14.1\n"
        );
    }

    #[test]
    fn test_changelog_header_requires_sentinel() {
        let content = "2017-03-01 0.14.1\n- Older entry\n";
        let err = rewrite_changelog_header(content, "0.14.2", "2017-04-01", "master").unwrap_err();
        assert!(err.to_string().contains("does not end with 'master'"));
    }

    #[test]
    fn test_replace_in_file_replaces_every_occurrence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "Latest: 0.14.6\nDownload tint2-0.14.6.tar.gz\n").unwrap();

        let count = replace_in_file(&path, "0.14.6", "0.14.7").unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Latest: 0.14.7\nDownload tint2-0.14.7.tar.gz\n"
        );
    }

    #[test]
    fn test_replace_in_file_shrinks_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "version 16.10.1 here").unwrap();

        replace_in_file(&path, "16.10.1", "17.0").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "version 17.0 here");
    }

    #[test]
    fn test_replace_in_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = replace_in_file(&dir.path().join("nope.md"), "1", "2").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_update_files_on_disk() {
        let dir = TempDir::new().unwrap();
        let man = dir.path().join("tint2.md");
        let log = dir.path().join("ChangeLog");
        fs::write(&man, "# TINT2 1 \"2017-03-26\" 0.14.1\nbody").unwrap();
        fs::write(&log, "2017-03-26 master\nbody").unwrap();

        update_man_page(&man, "0.14.2", "2017-04-01").unwrap();
        update_changelog(&log, "0.14.2", "2017-04-01", "master").unwrap();

        assert_eq!(
            fs::read_to_string(&man).unwrap(),
            "# TINT2 1 \"2017-04-01\" 0.14.2\nbody"
        );
        assert_eq!(fs::read_to_string(&log).unwrap(), "2017-04-01 0.14.2\nbody");
    }
}
