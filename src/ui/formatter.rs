//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Lines printed when no bump flag was given.
pub fn missing_bump_lines() -> [&'static str; 3] {
    [
        "Type of version change is required, but not specified.",
        "Wild version bumps are discouraged.",
        "Options: --fix, --feature, --breakage",
    ]
}

/// Explain that a bump flag is required.
pub fn display_missing_bump() {
    for line in missing_bump_lines() {
        println!("{}", line);
    }
}

/// Format the version change about to be released.
///
/// # Arguments
/// * `old_version` - Latest existing version tag
/// * `new_version` - Version being released
/// * `date` - Release date written into the docs
pub fn format_release_plan(old_version: &str, new_version: &str, date: &str) -> String {
    format!(
        "\n\x1b[1mRelease Plan:\x1b[0m\n  From: \x1b[31m{}\x1b[0m\n  To:   \x1b[32m{}\x1b[0m\n  Date: {}",
        old_version, new_version, date
    )
}

/// Display the version change about to be released.
pub fn display_release_plan(old_version: &str, new_version: &str, date: &str) {
    println!("{}", format_release_plan(old_version, new_version, date));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_missing_bump_lists_every_flag() {
        let lines = missing_bump_lines().join("\n");
        for flag in ["--fix", "--feature", "--breakage"] {
            assert!(lines.contains(flag));
        }
    }

    #[test]
    fn test_format_release_plan() {
        let plan = format_release_plan("v0.14.6", "v0.14.7", "2017-04-01");
        assert!(plan.contains("v0.14.6"));
        assert!(plan.contains("v0.14.7"));
        assert!(plan.contains("2017-04-01"));
    }
}
